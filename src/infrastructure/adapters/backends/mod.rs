//! Speech Backends - 内置引擎类型

pub mod coqui;
mod engine;
pub mod mms;

pub use coqui::CoquiBackend;
pub use mms::MmsBackend;

use crate::application::backend_factory::{BackendContext, BackendFactory};
use crate::application::ports::SpeechBackend;

/// 注册 coqui 和 mms
pub fn register_builtin_backends(factory: &mut BackendFactory) {
    factory.register(coqui::MODEL_TYPE, coqui::schema(), |declaration, context| {
        Box::new(CoquiBackend::new(declaration, context)) as Box<dyn SpeechBackend>
    });
    factory.register(mms::MODEL_TYPE, mms::schema(), |declaration, context| {
        Box::new(MmsBackend::new(declaration, context)) as Box<dyn SpeechBackend>
    });
}

/// 带内置引擎类型的工厂
pub fn with_builtin_backends(context: BackendContext) -> BackendFactory {
    let mut factory = BackendFactory::new(context);
    register_builtin_backends(&mut factory);
    factory
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{validate_catalog, ConfigurationError, VoiceDeclaration};
    use crate::infrastructure::adapters::runtime::FakeRuntime;
    use std::sync::Arc;

    fn factory() -> BackendFactory {
        with_builtin_backends(BackendContext::new("/models", Arc::new(FakeRuntime::default())))
    }

    #[test]
    fn test_builtin_tags_are_registered() {
        let factory = factory();
        assert!(factory.is_registered("coqui"));
        assert!(factory.is_registered("mms"));

        let backend = factory
            .create_model(&VoiceDeclaration::new("pau", "ca", "mms"))
            .unwrap();
        assert_eq!(backend.engine_type(), "mms");
        assert_eq!(backend.voice(), "pau");
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let err = factory()
            .create_model(&VoiceDeclaration::new("x", "ca", "piper"))
            .err()
            .unwrap();
        assert!(matches!(err, ConfigurationError::UnknownModelType { .. }));
    }

    #[test]
    fn test_validator_uses_registered_schemas() {
        let factory = factory();
        let document = serde_json::json!({
            "languages": {"ca": "Català"},
            "models": [
                {"voice": "pau", "lang": "ca", "model_type": "mms"}
            ]
        });

        let err = validate_catalog(&document, factory.schemas()).unwrap_err();
        assert!(err.to_string().contains("base_model_path"));
    }
}
