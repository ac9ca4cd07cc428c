//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_decoder;
mod audio_transcoder;
mod inference_runtime;
mod speech_backend;

pub use audio_decoder::{AudioDecoderPort, MonoAudio};
pub use audio_transcoder::{
    AudioFormat, AudioTranscoderPort, TranscodeConfig, TranscodeError, TranscodeResult,
};
pub use inference_runtime::{EngineInit, InferenceEngine, InferenceRuntime, RuntimeError, Waveform};
pub use speech_backend::SpeechBackend;
