//! Gemini `generateContent` backend for [`DescriptionService`].
//!
//! All connection details come from [`VisionConfig`]. The API key is resolved
//! once at construction; a missing key turns every request into
//! [`DescribeError::Auth`] without touching the network.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::config::VisionConfig;
use crate::intake::EncodedRequest;

use super::service::{DescribeError, DescriptionService};

/// Environment variable consulted when the config carries no API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Longest slice of an error body kept in error messages.
const MAX_ERROR_BODY: usize = 300;

// ---------------------------------------------------------------------------
// GeminiDescriptionService
// ---------------------------------------------------------------------------

/// Calls `POST {base_url}/v1beta/models/{model}:generateContent`.
pub struct GeminiDescriptionService {
    client: reqwest::Client,
    config: VisionConfig,
    api_key: Option<String>,
}

impl GeminiDescriptionService {
    /// Build from config, falling back to `GEMINI_API_KEY` when
    /// `config.api_key` is unset or blank.
    pub fn from_config(config: &VisionConfig) -> Self {
        let api_key = non_blank(config.api_key.clone())
            .or_else(|| non_blank(std::env::var(API_KEY_ENV).ok()));
        Self::new(config, api_key)
    }

    /// Build with an explicit credential (no environment lookup).
    pub fn new(config: &VisionConfig, api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let api_key = non_blank(api_key);
        if api_key.is_none() {
            log::warn!("vision: no API key configured, descriptions will fail until one is set");
        }

        Self {
            client,
            config: config.clone(),
            api_key,
        }
    }

    /// Whether a credential was found at construction time.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl DescriptionService for GeminiDescriptionService {
    async fn generate(&self, request: &EncodedRequest) -> Result<String, DescribeError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DescribeError::Auth(format!("no API key (set {API_KEY_ENV})")))?;

        log::debug!(
            "vision: requesting description ({} base64 chars, max {} tokens)",
            request.data.len(),
            request.max_output_tokens
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", key)
            .json(&request_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| DescribeError::Transport(format!("invalid response body: {e}")))?;

        extract_text(&json)
    }
}

// ---------------------------------------------------------------------------
// Wire format helpers
// ---------------------------------------------------------------------------

/// JSON body for one `generateContent` call.
pub fn request_body(request: &EncodedRequest) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [
                { "inline_data": { "mime_type": request.media_type, "data": request.data } },
                { "text": request.instruction }
            ]
        }],
        "generationConfig": {
            "maxOutputTokens": request.max_output_tokens
        }
    })
}

/// Concatenate the text parts of the first candidate.
pub fn extract_text(json: &Value) -> Result<String, DescribeError> {
    let parts = json["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or(DescribeError::EmptyResult)?;

    let text = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect::<Vec<_>>()
        .join("")
        .trim()
        .to_string();

    if text.is_empty() {
        return Err(DescribeError::EmptyResult);
    }
    Ok(text)
}

/// Map a non-success HTTP status to an error kind.
///
/// Gemini reports an invalid key as `400 API_KEY_INVALID`, so that case
/// counts as an auth failure too.
fn classify_failure(status: StatusCode, body: &str) -> DescribeError {
    let snippet: String = body.chars().take(MAX_ERROR_BODY).collect();
    let message = format!("HTTP {status}: {snippet}");

    let rejected_key = status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || (status == StatusCode::BAD_REQUEST && body.contains("API_KEY_INVALID"));

    if rejected_key {
        DescribeError::Auth(message)
    } else {
        DescribeError::Transport(message)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
