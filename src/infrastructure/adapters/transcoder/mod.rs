//! Transcoder Adapters - 音频编解码

mod audio_transcoder;
mod decoder;

pub use audio_transcoder::AudioTranscoder;
pub use decoder::{decode_wav, DecodeError, DecodedAudio};
