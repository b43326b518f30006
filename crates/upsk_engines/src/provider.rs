#![forbid(unsafe_code)]

use std::env;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use thiserror::Error;
use tracing::info;
use upsk_contracts::generation::GENERATION_MODEL_DEFAULT;

const PROVIDER_NAME: &str = "gemini";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_USER_AGENT: &str = "upsk-portal/1.0";

/// One complete, non-streaming text generation call.
pub trait GenerationProvider {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, ProviderCallError>;
}

impl<T: GenerationProvider + ?Sized> GenerationProvider for &T {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, ProviderCallError> {
        (**self).generate(model, prompt)
    }
}

impl<T: GenerationProvider + ?Sized> GenerationProvider for Arc<T> {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, ProviderCallError> {
        (**self).generate(model, prompt)
    }
}

/// Failure of an outbound generation call. The rendered detail carries only
/// the provider, an error kind and the HTTP status; never the key or prompt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.safe_detail())]
pub struct ProviderCallError {
    pub provider: &'static str,
    pub error_kind: &'static str,
    pub http_status: Option<u16>,
}

impl ProviderCallError {
    pub fn new(provider: &'static str, error_kind: &'static str, http_status: Option<u16>) -> Self {
        Self {
            provider,
            error_kind,
            http_status,
        }
    }

    pub fn safe_detail(&self) -> String {
        match self.http_status {
            Some(status) => format!(
                "provider={} error={} status={}",
                self.provider, self.error_kind, status
            ),
            None => format!("provider={} error={}", self.provider, self.error_kind),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct GenerationProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub user_agent: String,
    /// `None` leaves the call bounded only by the transport.
    pub timeout_ms: Option<u32>,
    /// Canned response body used instead of the network call.
    pub fixture_json: Option<String>,
}

impl GenerationProviderConfig {
    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .and_then(trim_non_empty)
            .or_else(|| env::var("API_KEY").ok().and_then(trim_non_empty));
        if api_key.is_none() {
            info!("no generation api key configured; generation calls will fall back");
        }
        Self {
            api_key,
            base_url: env_or_default("UPSK_GENERATION_BASE_URL", DEFAULT_BASE_URL),
            model: env_or_default("UPSK_GENERATION_MODEL", GENERATION_MODEL_DEFAULT),
            user_agent: env_or_default("UPSK_HTTP_USER_AGENT", DEFAULT_USER_AGENT),
            timeout_ms: env::var("UPSK_GENERATION_TIMEOUT_MS")
                .ok()
                .and_then(|raw| raw.trim().parse::<u32>().ok())
                .filter(|ms| *ms > 0),
            fixture_json: None,
        }
    }

    pub fn offline_fixture(fixture_json: impl Into<String>) -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: GENERATION_MODEL_DEFAULT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_ms: None,
            fixture_json: Some(fixture_json.into()),
        }
    }
}

impl std::fmt::Debug for GenerationProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("user_agent", &self.user_agent)
            .field("timeout_ms", &self.timeout_ms)
            .field("fixture_json", &self.fixture_json.is_some())
            .finish()
    }
}

/// Google generative-language `generateContent` over blocking HTTP.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    config: GenerationProviderConfig,
}

impl GeminiProvider {
    pub fn new(config: GenerationProviderConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::new(GenerationProviderConfig::from_env())
    }

    pub fn config(&self) -> &GenerationProviderConfig {
        &self.config
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }
}

impl GenerationProvider for GeminiProvider {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, ProviderCallError> {
        let body: Value = if let Some(fixture) = self.config.fixture_json.as_deref() {
            serde_json::from_str(fixture)
                .map_err(|_| ProviderCallError::new(PROVIDER_NAME, "json_parse", None))?
        } else {
            let api_key = self
                .config
                .api_key
                .as_deref()
                .ok_or_else(|| ProviderCallError::new(PROVIDER_NAME, "missing_api_key", None))?;
            let agent = build_http_agent(self.config.timeout_ms, &self.config.user_agent);
            let response = agent
                .post(&self.endpoint(model))
                .set("Content-Type", "application/json")
                .set("Accept", "application/json")
                .set("x-goog-api-key", api_key)
                .send_json(request_body(prompt))
                .map_err(provider_error_from_ureq)?;
            serde_json::from_reader(response.into_reader())
                .map_err(|_| ProviderCallError::new(PROVIDER_NAME, "json_parse", None))?
        };
        Ok(extract_candidate_text(&body))
    }
}

pub fn request_body(prompt: &str) -> Value {
    json!({
        "contents": [
            { "parts": [ { "text": prompt } ] }
        ]
    })
}

/// Concatenated text parts of the first candidate; empty when the response
/// carries no candidate text (blocked prompt, empty answer).
pub fn extract_candidate_text(root: &Value) -> String {
    root.pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default()
}

fn build_http_agent(timeout_ms: Option<u32>, user_agent: &str) -> ureq::Agent {
    let mut builder = ureq::AgentBuilder::new()
        .user_agent(user_agent)
        .try_proxy_from_env(true);
    if let Some(ms) = timeout_ms {
        builder = builder.timeout(Duration::from_millis(u64::from(ms)));
    }
    builder.build()
}

fn provider_error_from_ureq(err: ureq::Error) -> ProviderCallError {
    match err {
        ureq::Error::Status(status, _) => {
            ProviderCallError::new(PROVIDER_NAME, "http_non_2xx", Some(status))
        }
        ureq::Error::Transport(transport) => {
            let combined = format!("{:?} {}", transport.kind(), transport);
            ProviderCallError::new(PROVIDER_NAME, classify_transport_error_kind(&combined), None)
        }
    }
}

fn classify_transport_error_kind(raw: &str) -> &'static str {
    let lower = raw.to_ascii_lowercase();
    if lower.contains("timeout") || lower.contains("timed out") {
        "timeout"
    } else if lower.contains("tls") || lower.contains("ssl") {
        "tls"
    } else if lower.contains("dns") {
        "dns"
    } else if lower.contains("connection") || lower.contains("connect") {
        "connection"
    } else {
        "transport"
    }
}

fn env_or_default(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .and_then(trim_non_empty)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
}

fn trim_non_empty(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
