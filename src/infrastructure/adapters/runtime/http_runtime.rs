//! HTTP Inference Runtime - 调用外部推理 sidecar
//!
//! 实现 InferenceRuntime trait，模型计算由 sidecar 完成
//!
//! Sidecar API:
//! POST {base_url}/api/engines
//!   Request: {"voice", "family", "files": {name: path}, "use_accelerator"}
//!   Response: {"engine_id", "sample_rate"?, "reentrant"?}
//! POST {base_url}/api/engines/{engine_id}/infer
//!   Request: {"text": "..."}
//!   Response: audio/wav binary

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{EngineInit, InferenceEngine, InferenceRuntime, RuntimeError, Waveform};
use crate::infrastructure::adapters::transcoder::decode_wav;

/// 引擎初始化请求体
#[derive(Debug, Serialize)]
struct InitRequest<'a> {
    voice: &'a str,
    family: &'a str,
    files: BTreeMap<&'a str, String>,
    use_accelerator: bool,
}

/// 引擎初始化响应体
#[derive(Debug, Deserialize)]
struct InitResponse {
    engine_id: String,
    #[serde(default)]
    sample_rate: Option<u32>,
    #[serde(default = "default_reentrant")]
    reentrant: bool,
}

fn default_reentrant() -> bool {
    true
}

/// 推理请求体
#[derive(Debug, Serialize)]
struct InferRequest<'a> {
    text: &'a str,
}

/// HTTP Runtime 配置
#[derive(Debug, Clone)]
pub struct HttpRuntimeConfig {
    /// Sidecar 基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 网络错误时的重试次数
    pub max_retries: u32,
}

impl Default for HttpRuntimeConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 120,
            max_retries: 0,
        }
    }
}

impl HttpRuntimeConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }
}

fn map_send_error(e: reqwest::Error) -> RuntimeError {
    if e.is_timeout() {
        RuntimeError::Timeout
    } else if e.is_connect() {
        RuntimeError::NetworkError(format!("Cannot connect to inference runtime: {}", e))
    } else {
        RuntimeError::NetworkError(e.to_string())
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, RuntimeError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response.text().await.unwrap_or_default();
    Err(RuntimeError::ServiceError(format!("HTTP {}: {}", status, error_text)))
}

/// HTTP Inference Runtime
pub struct HttpRuntime {
    client: Client,
    config: HttpRuntimeConfig,
}

impl HttpRuntime {
    pub fn new(config: HttpRuntimeConfig) -> Result<Self, RuntimeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RuntimeError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn engines_url(&self) -> String {
        format!("{}/api/engines", self.config.base_url.trim_end_matches('/'))
    }

    fn health_url(&self) -> String {
        format!("{}/health", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl InferenceRuntime for HttpRuntime {
    async fn initialize(&self, init: EngineInit) -> Result<Arc<dyn InferenceEngine>, RuntimeError> {
        let request = InitRequest {
            voice: &init.voice,
            family: &init.family,
            files: init
                .files
                .iter()
                .map(|(name, path)| (name.as_str(), path.display().to_string()))
                .collect(),
            use_accelerator: init.use_accelerator,
        };

        tracing::debug!(
            url = %self.engines_url(),
            voice = %init.voice,
            family = %init.family,
            "Initializing remote engine"
        );

        let response = self
            .client
            .post(self.engines_url())
            .json(&request)
            .send()
            .await
            .map_err(map_send_error)?;

        let body: InitResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| RuntimeError::InvalidResponse(e.to_string()))?;

        tracing::info!(
            voice = %init.voice,
            engine_id = %body.engine_id,
            sample_rate = ?body.sample_rate,
            reentrant = body.reentrant,
            "Remote engine initialized"
        );

        Ok(Arc::new(HttpEngine {
            client: self.client.clone(),
            infer_url: format!("{}/{}/infer", self.engines_url(), body.engine_id),
            engine_id: body.engine_id,
            sample_rate: body.sample_rate,
            reentrant: body.reentrant,
            max_retries: self.config.max_retries,
        }))
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.health_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

/// Sidecar 中的一个引擎
struct HttpEngine {
    client: Client,
    engine_id: String,
    infer_url: String,
    sample_rate: Option<u32>,
    reentrant: bool,
    max_retries: u32,
}

impl HttpEngine {
    async fn infer_once(&self, text: &str) -> Result<Vec<u8>, RuntimeError> {
        let response = self
            .client
            .post(&self.infer_url)
            .json(&InferRequest { text })
            .send()
            .await
            .map_err(map_send_error)?;

        let bytes = ensure_success(response)
            .await?
            .bytes()
            .await
            .map_err(|e| RuntimeError::InvalidResponse(format!("Failed to read audio: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl InferenceEngine for HttpEngine {
    async fn infer(&self, text: &str) -> Result<Waveform, RuntimeError> {
        let mut attempt = 0;
        let audio = loop {
            match self.infer_once(text).await {
                Ok(audio) => break audio,
                Err(e @ (RuntimeError::NetworkError(_) | RuntimeError::Timeout))
                    if attempt < self.max_retries =>
                {
                    attempt += 1;
                    tracing::warn!(engine_id = %self.engine_id, attempt = attempt, error = %e, "Inference request failed, retrying");
                }
                Err(e) => return Err(e),
            }
        };

        let decoded = decode_wav(&audio).map_err(|e| RuntimeError::InvalidResponse(e.to_string()))?;
        let sample_rate = decoded.sample_rate;

        tracing::debug!(
            engine_id = %self.engine_id,
            audio_size = audio.len(),
            duration_ms = decoded.duration_ms(),
            "Remote inference completed"
        );

        Ok(Waveform {
            samples: decoded.into_mono(),
            sample_rate,
        })
    }

    fn output_sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }

    fn is_reentrant(&self) -> bool {
        self.reentrant
    }
}
