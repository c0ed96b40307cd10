//! Generative text oracle boundary
//!
//! The oracle is optional. Every caller treats its output as untrusted text
//! and must be able to continue on the rule-based path when it fails.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Oracle failures; all of them trigger the rule-based fallback
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Oracle returned no content")]
    EmptyResponse,

    #[error("Parse error: {0}")]
    Parse(String),

    /// Reply parsed but does not fit the expected schema
    #[error("Malformed reply: {0}")]
    Malformed(String),
}

/// External generative-text service
#[async_trait]
pub trait TextOracle: Send + Sync {
    /// Short identifier for logs and the health endpoint
    fn name(&self) -> &str;

    /// Whether a call is worth attempting at all
    fn is_available(&self) -> bool;

    /// Send a prompt, get raw reply text back
    async fn generate(&self, prompt: &str) -> Result<String, OracleError>;
}

/// Oracle stand-in used when nothing is configured
///
/// Always unavailable; the assistant goes straight to the rules.
pub struct DisabledOracle {
    reason: String,
}

impl DisabledOracle {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl TextOracle for DisabledOracle {
    fn name(&self) -> &str {
        "disabled"
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn generate(&self, _prompt: &str) -> Result<String, OracleError> {
        Err(OracleError::Unavailable(self.reason.clone()))
    }
}

/// Pull a JSON object out of free-form oracle output
///
/// Strips a byte-order mark and markdown code fences, then tries the whole
/// text before falling back to the outermost `{ ... }` slice.
pub fn extract_json_object(text: &str) -> Result<Map<String, Value>, OracleError> {
    let cleaned = text
        .trim()
        .trim_start_matches('\u{feff}')
        .replace("```json", "")
        .replace("```", "");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return Err(OracleError::EmptyResponse);
    }

    let value = match serde_json::from_str::<Value>(cleaned) {
        Ok(value) => value,
        Err(whole_err) => {
            let slice = match (cleaned.find('{'), cleaned.rfind('}')) {
                (Some(start), Some(end)) if start < end => &cleaned[start..=end],
                _ => return Err(OracleError::Parse(whole_err.to_string())),
            };
            serde_json::from_str::<Value>(slice)
                .map_err(|e| OracleError::Parse(e.to_string()))?
        }
    };

    match value {
        Value::Object(map) => Ok(map),
        other => Err(OracleError::Malformed(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
