//! Catalog Context - 配置校验
//!
//! 在任何引擎加载之前一次性校验整个文档，
//! 通过后转换为强类型的 VoiceCatalog

use std::collections::{BTreeMap, HashSet};

use serde_json::{Map, Value};

use super::{
    ConfigurationError, EngineSchemas, FieldType, LanguageCatalog, VoiceCatalog,
    VoiceDeclaration, COMMON_OPTIONAL_FIELDS,
};

const UNKNOWN_VOICE: &str = "unknown";

/// 校验并解析音色目录文档
///
/// 规则：
/// 1. 顶层必须是对象，且包含 `languages`（对象）与 `models`（数组）
/// 2. 每个模型必须声明已注册的 `model_type`
/// 3. 必填字段按引擎类型检查
/// 4. 可选字段存在时必须匹配期望类型
/// 5. voice 唯一，同一语言最多一个默认音色
pub fn validate_catalog(
    document: &Value,
    schemas: &EngineSchemas,
) -> Result<VoiceCatalog, ConfigurationError> {
    let root = document.as_object().ok_or(ConfigurationError::NotAnObject)?;

    let languages = parse_languages(root)?;

    let models = root
        .get("models")
        .ok_or(ConfigurationError::MissingSection("models"))?
        .as_array()
        .ok_or(ConfigurationError::InvalidSection {
            section: "models",
            expected: "an array",
        })?;

    let models_root = match root.get("models_root") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            return Err(ConfigurationError::InvalidSection {
                section: "models_root",
                expected: "a string",
            })
        }
    };

    let mut voices = Vec::with_capacity(models.len());
    for model in models {
        let model = model.as_object().ok_or(ConfigurationError::InvalidSection {
            section: "models",
            expected: "an array of objects",
        })?;
        validate_model(model, schemas)?;
        voices.push(to_declaration(model));
    }

    check_unique_voices(&voices)?;
    check_single_default(&voices)?;

    Ok(VoiceCatalog {
        languages,
        models_root,
        voices,
    })
}

fn parse_languages(root: &Map<String, Value>) -> Result<LanguageCatalog, ConfigurationError> {
    let section = root
        .get("languages")
        .ok_or(ConfigurationError::MissingSection("languages"))?
        .as_object()
        .ok_or(ConfigurationError::InvalidSection {
            section: "languages",
            expected: "an object",
        })?;

    let mut languages = LanguageCatalog::new();
    for (code, name) in section {
        let name = name.as_str().ok_or(ConfigurationError::InvalidSection {
            section: "languages",
            expected: "an object of language names",
        })?;
        languages.insert(code.clone(), name);
    }
    Ok(languages)
}

fn voice_name(model: &Map<String, Value>) -> String {
    model
        .get("voice")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_VOICE)
        .to_string()
}

fn validate_model(
    model: &Map<String, Value>,
    schemas: &EngineSchemas,
) -> Result<(), ConfigurationError> {
    let voice = voice_name(model);

    let model_type = match model.get("model_type") {
        None | Some(Value::Null) => {
            return Err(ConfigurationError::MissingModelType { voice });
        }
        Some(Value::String(t)) if !t.is_empty() => t.as_str(),
        Some(Value::String(_)) => {
            return Err(ConfigurationError::MissingModelType { voice });
        }
        Some(_) => {
            return Err(ConfigurationError::InvalidFieldType {
                voice,
                field: "model_type".to_string(),
                expected: FieldType::Str,
            });
        }
    };

    let schema = schemas
        .get(model_type)
        .ok_or_else(|| ConfigurationError::UnknownModelType {
            voice: voice.clone(),
            model_type: model_type.to_string(),
        })?;

    for field in &schema.required {
        match model.get(*field) {
            None | Some(Value::Null) => {
                return Err(ConfigurationError::MissingField {
                    voice,
                    field: field.to_string(),
                });
            }
            Some(value) if !value.is_string() => {
                return Err(ConfigurationError::InvalidFieldType {
                    voice,
                    field: field.to_string(),
                    expected: FieldType::Str,
                });
            }
            Some(_) => {}
        }
    }

    for (field, expected) in schema.optional_fields() {
        if let Some(value) = model.get(*field) {
            if !value.is_null() && !expected.matches(value) {
                return Err(ConfigurationError::InvalidFieldType {
                    voice,
                    field: field.to_string(),
                    expected: *expected,
                });
            }
        }
    }

    Ok(())
}

/// 已校验的模型对象 -> 声明
fn to_declaration(model: &Map<String, Value>) -> VoiceDeclaration {
    let text = |key: &str| {
        model
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let flag = |key: &str| model.get(key).and_then(Value::as_bool).unwrap_or(false);

    let reserved: HashSet<&str> = ["voice", "lang", "model_type"]
        .into_iter()
        .chain(COMMON_OPTIONAL_FIELDS.iter().map(|(name, _)| *name))
        .collect();

    let fields: BTreeMap<String, String> = model
        .iter()
        .filter(|(key, _)| !reserved.contains(key.as_str()))
        .filter_map(|(key, value)| value.as_str().map(|v| (key.clone(), v.to_string())))
        .collect();

    let mut declaration = VoiceDeclaration::new(text("voice"), text("lang"), text("model_type"));
    declaration.preprocessor = model
        .get("preprocessor")
        .and_then(Value::as_str)
        .map(str::to_string);
    declaration.use_cuda = flag("use_cuda");
    declaration.default = flag("default");
    declaration.load = flag("load");
    for (key, value) in fields {
        declaration = declaration.with_field(key, value);
    }
    declaration
}

fn check_unique_voices(voices: &[VoiceDeclaration]) -> Result<(), ConfigurationError> {
    let mut seen = HashSet::new();
    for declaration in voices {
        if !seen.insert(declaration.voice.as_str()) {
            return Err(ConfigurationError::DuplicateVoice(declaration.voice.clone()));
        }
    }
    Ok(())
}

/// 同一语言中被加载的音色最多只能有一个显式默认
fn check_single_default(voices: &[VoiceDeclaration]) -> Result<(), ConfigurationError> {
    let mut defaults: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for declaration in voices.iter().filter(|d| d.load && d.default) {
        defaults
            .entry(declaration.lang.as_str())
            .or_default()
            .push(declaration.voice.clone());
    }

    match defaults.into_iter().find(|(_, voices)| voices.len() > 1) {
        Some((lang, voices)) => Err(ConfigurationError::MultipleDefaults {
            lang: lang.to_string(),
            voices,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::EngineSchema;
    use serde_json::json;

    fn schemas() -> EngineSchemas {
        let mut schemas = EngineSchemas::new();
        schemas.insert(
            "coqui",
            EngineSchema::new(&["voice", "lang", "model_type", "tts_config_path", "tts_model_path"])
                .optional("vocoder_config_path", FieldType::Str)
                .optional("vocoder_model_path", FieldType::Str),
        );
        schemas.insert(
            "mms",
            EngineSchema::new(&["voice", "lang", "model_type", "base_model_path"])
                .optional("checkpoint_name", FieldType::Str),
        );
        schemas
    }

    fn valid_document() -> Value {
        json!({
            "languages": {"en": "English", "rmz": "Marma"},
            "models": [
                {
                    "voice": "test-mms",
                    "lang": "rmz",
                    "model_type": "mms",
                    "base_model_path": "test_path",
                    "load": true
                },
                {
                    "voice": "test-coqui",
                    "lang": "en",
                    "model_type": "coqui",
                    "tts_config_path": "test_config.json",
                    "tts_model_path": "test_model.pth",
                    "load": true,
                    "default": true
                }
            ]
        })
    }

    #[test]
    fn test_valid_document_parses() {
        let catalog = validate_catalog(&valid_document(), &schemas()).unwrap();
        assert_eq!(catalog.voices.len(), 2);
        assert_eq!(catalog.languages.name("rmz"), Some("Marma"));
        assert!(catalog.models_root.is_none());

        let coqui = &catalog.voices[1];
        assert_eq!(coqui.voice, "test-coqui");
        assert!(coqui.load);
        assert!(coqui.default);
        assert_eq!(coqui.field("tts_model_path"), Some("test_model.pth"));
        assert_eq!(coqui.field("voice"), None);
    }

    #[test]
    fn test_not_an_object() {
        let err = validate_catalog(&json!([1, 2]), &schemas()).unwrap_err();
        assert!(matches!(err, ConfigurationError::NotAnObject));
    }

    #[test]
    fn test_missing_sections() {
        let err = validate_catalog(&json!({"models": []}), &schemas()).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingSection("languages")));

        let err = validate_catalog(&json!({"languages": {}}), &schemas()).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingSection("models")));
    }

    #[test]
    fn test_unknown_model_type_names_voice() {
        let doc = json!({
            "languages": {},
            "models": [{"voice": "v1", "lang": "en", "model_type": "espeak"}]
        });
        let err = validate_catalog(&doc, &schemas()).unwrap_err();
        match err {
            ConfigurationError::UnknownModelType { voice, model_type } => {
                assert_eq!(voice, "v1");
                assert_eq!(model_type, "espeak");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_model_type() {
        let doc = json!({"languages": {}, "models": [{"voice": "v1", "lang": "en"}]});
        let err = validate_catalog(&doc, &schemas()).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingModelType { .. }));
    }

    #[test]
    fn test_missing_required_field_names_voice_and_field() {
        let doc = json!({
            "languages": {"en": "English"},
            "models": [{
                "voice": "broken",
                "lang": "en",
                "model_type": "coqui",
                "tts_config_path": "config.json"
            }]
        });
        let err = validate_catalog(&doc, &schemas()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Model broken missing required field: tts_model_path"
        );
    }

    #[test]
    fn test_optional_field_type_mismatch() {
        let doc = json!({
            "languages": {"rmz": "Marma"},
            "models": [{
                "voice": "m",
                "lang": "rmz",
                "model_type": "mms",
                "base_model_path": "dir",
                "use_cuda": "yes"
            }]
        });
        let err = validate_catalog(&doc, &schemas()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Field 'use_cuda' in model m must be of type bool"
        );
    }

    #[test]
    fn test_duplicate_voice_rejected() {
        let mut doc = valid_document();
        doc["models"][1]["voice"] = json!("test-mms");
        let err = validate_catalog(&doc, &schemas()).unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateVoice(v) if v == "test-mms"));
    }

    #[test]
    fn test_multiple_defaults_rejected() {
        let doc = json!({
            "languages": {"lad": "Ladino"},
            "models": [
                {"voice": "a", "lang": "lad", "model_type": "mms", "base_model_path": "a", "load": true, "default": true},
                {"voice": "b", "lang": "lad", "model_type": "mms", "base_model_path": "b", "load": true, "default": true}
            ]
        });
        let err = validate_catalog(&doc, &schemas()).unwrap_err();
        assert!(matches!(err, ConfigurationError::MultipleDefaults { ref lang, .. } if lang == "lad"));
    }

    #[test]
    fn test_default_on_unloaded_voice_is_ignored() {
        let doc = json!({
            "languages": {"lad": "Ladino"},
            "models": [
                {"voice": "a", "lang": "lad", "model_type": "mms", "base_model_path": "a", "load": true, "default": true},
                {"voice": "b", "lang": "lad", "model_type": "mms", "base_model_path": "b", "default": true}
            ]
        });
        assert!(validate_catalog(&doc, &schemas()).is_ok());
    }

    #[test]
    fn test_models_root_read_from_document() {
        let mut doc = valid_document();
        doc["models_root"] = json!("/srv/models");
        let catalog = validate_catalog(&doc, &schemas()).unwrap();
        assert_eq!(catalog.models_root.as_deref(), Some("/srv/models"));
    }
}
