//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    SynthesizeLongHandler, SynthesizeShortHandler,
    // Query handlers
    CheckVoiceHandler, ListVoicesHandler,
    // Ports & services
    AudioTranscoderPort, LongFormSynthesizer, TranscodeConfig, VoiceRegistry,
};

/// 应用状态
///
/// 注册表在启动后只读，所有请求共享同一份
pub struct AppState {
    pub registry: Arc<VoiceRegistry>,

    // ========== Command Handlers ==========
    pub synthesize_short_handler: SynthesizeShortHandler,
    pub synthesize_long_handler: SynthesizeLongHandler,

    // ========== Query Handlers ==========
    pub list_voices_handler: ListVoicesHandler,
    pub check_voice_handler: CheckVoiceHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        registry: Arc<VoiceRegistry>,
        synthesizer: Arc<LongFormSynthesizer>,
        transcoder: Arc<dyn AudioTranscoderPort>,
        transcode_config: TranscodeConfig,
    ) -> Self {
        Self {
            registry: registry.clone(),

            // Command handlers
            synthesize_short_handler: SynthesizeShortHandler::new(registry.clone()),
            synthesize_long_handler: SynthesizeLongHandler::new(
                registry.clone(),
                synthesizer,
                transcoder,
                transcode_config,
            ),

            // Query handlers
            list_voices_handler: ListVoicesHandler::new(registry.clone()),
            check_voice_handler: CheckVoiceHandler::new(registry),
        }
    }
}
