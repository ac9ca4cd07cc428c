//! Audio - 音频片段与 PCM 拼接

mod pcm;
mod segment;
pub mod wav;

pub use pcm::{resample_linear, silence_samples, PcmBuffer};
pub use segment::{AudioSegment, SegmentFormat};
