//! Core `DescriptionService` trait and its error type.
//!
//! The pipeline only ever talks to `Arc<dyn DescriptionService>`; the
//! production backend lives in [`super::gemini`], and tests substitute
//! [`MockDescriptionService`].

use async_trait::async_trait;
use thiserror::Error;

use crate::intake::EncodedRequest;

// ---------------------------------------------------------------------------
// DescribeError
// ---------------------------------------------------------------------------

/// Errors a description request can end with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescribeError {
    /// Missing or rejected credential. Retrying will not help until the
    /// configuration is fixed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Network, HTTP or response-format failure.
    #[error("description request failed: {0}")]
    Transport(String),

    /// The service answered but produced no usable text.
    #[error("the service returned no description")]
    EmptyResult,
}

impl DescribeError {
    /// `true` for errors caused by configuration rather than transient
    /// service trouble.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

impl From<reqwest::Error> for DescribeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            DescribeError::Transport("request timed out".into())
        } else {
            DescribeError::Transport(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// DescriptionService trait
// ---------------------------------------------------------------------------

/// Async vision-language backend: image in, descriptive text out.
///
/// Implementors must be `Send + Sync` so they can be shared between
/// in-flight requests behind an `Arc<dyn DescriptionService>`.
///
/// # Contract
///
/// - Returns the generated text, already trimmed and non-empty.
/// - Never retries; each call is one attempt.
#[async_trait]
pub trait DescriptionService: Send + Sync {
    async fn generate(&self, request: &EncodedRequest) -> Result<String, DescribeError>;
}

// Compile-time assertion: Box<dyn DescriptionService> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn DescriptionService>) {}
};

// ---------------------------------------------------------------------------
// MockDescriptionService (tests only)
// ---------------------------------------------------------------------------

/// Returns a fixed outcome and records every request it receives.
#[cfg(test)]
pub struct MockDescriptionService {
    outcome: Result<String, DescribeError>,
    requests: std::sync::Mutex<Vec<EncodedRequest>>,
}

#[cfg(test)]
impl MockDescriptionService {
    pub fn ok(text: &str) -> Self {
        Self::with_outcome(Ok(text.to_string()))
    }

    pub fn failing(err: DescribeError) -> Self {
        Self::with_outcome(Err(err))
    }

    fn with_outcome(outcome: Result<String, DescribeError>) -> Self {
        Self {
            outcome,
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<EncodedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl DescriptionService for MockDescriptionService {
    async fn generate(&self, request: &EncodedRequest) -> Result<String, DescribeError> {
        self.requests.lock().unwrap().push(request.clone());
        self.outcome.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
