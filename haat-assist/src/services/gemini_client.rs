//! Google Generative Language (Gemini) client
//!
//! Single-shot `generateContent` calls; the reply text of every candidate
//! part is concatenated and returned raw for the caller to validate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use haat_common::config::OracleConfig;

use super::oracle::{OracleError, TextOracle};

const USER_AGENT: &str = concat!("haat-assist/", env!("CARGO_PKG_VERSION"));

/// Header carrying the API key; the key never goes into the URL
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Response body; only the fields the client reads
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, parts joined in order
    pub fn first_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Gemini API client
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, OracleError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| OracleError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// Client for the `[oracle]` config section with an already-resolved key
    pub fn from_config(config: &OracleConfig, api_key: String) -> Result<Self, OracleError> {
        Self::new(
            config.base_url.clone(),
            config.model.clone(),
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl TextOracle for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            "Querying Gemini API"
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&request)
            .send()
            .await
            .map_err(|e| OracleError::Network(e.without_url().to_string()))?;

        let status = response.status();

        if status == 401 || status == 403 {
            return Err(OracleError::InvalidApiKey);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(OracleError::ApiError(status.as_u16(), error_text));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Parse(e.without_url().to_string()))?;

        let text = body.first_text().ok_or_else(|| {
            let finish_reason = body
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone())
                .unwrap_or_else(|| "none".to_string());
            tracing::debug!(finish_reason = %finish_reason, "Gemini reply carried no text");
            OracleError::EmptyResponse
        })?;

        tracing::debug!(reply_chars = text.chars().count(), "Gemini reply received");

        Ok(text)
    }
}
