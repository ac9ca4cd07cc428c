//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（SpeechBackend、InferenceRuntime、AudioTranscoder）
//! - backend_factory / registry / model_loader: 音色的注册与加载
//! - long_form: 长文本合成流程
//! - commands / queries: 合成命令与音色查询
//! - error: 应用层错误定义

pub mod backend_factory;
pub mod commands;
pub mod error;
pub mod long_form;
pub mod model_loader;
pub mod ports;
pub mod queries;
pub mod registry;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports
pub use backend_factory::{BackendConstructor, BackendContext, BackendFactory};
pub use commands::{
    handlers::{
        SynthesizeLongHandler, SynthesizeLongResponse, SynthesizeShortHandler,
        SynthesizeShortResponse,
    },
    SynthesizeLong, SynthesizeShort,
};
pub use error::ApplicationError;
pub use long_form::{LongFormConfig, LongFormStats, LongFormSynthesizer};
pub use model_loader::{load_models, LoadReport};
pub use ports::{
    AudioDecoderPort, AudioFormat, AudioTranscoderPort, EngineInit, InferenceEngine, InferenceRuntime, MonoAudio,
    RuntimeError, SpeechBackend, TranscodeConfig, TranscodeError, TranscodeResult, Waveform,
};
pub use queries::{
    handlers::{
        CheckVoiceHandler, LanguageVoices, ListVoicesHandler, VoiceListing, VoiceSummary,
    },
    CheckVoice, ListVoices,
};
pub use registry::{LoadedVoice, VoiceRegistry, VoiceRegistryBuilder};
