//! Errors from the text-generation provider.
//!
//! Nothing retries automatically. [`LlmError::is_transient`] only tells the
//! caller whether the same request could succeed later.

use serde::Deserialize;
use thiserror::Error;

/// Error from a text-generation call.
#[derive(Debug, Clone, Error)]
#[error("{kind}{}: {message}", status_suffix(.status_code))]
pub struct LlmError {
    pub kind: LlmErrorKind,
    /// HTTP status of the provider response, when there was one
    pub status_code: Option<u16>,
    pub message: String,
}

fn status_suffix(status_code: &Option<u16>) -> String {
    match status_code {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}

/// Google APIs wrap failures as `{"error": {"code", "message", "status"}}`.
#[derive(Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

impl LlmError {
    /// Build an error from a non-success response. The provider's own error
    /// message is used when the body carries one, otherwise the raw body.
    pub fn from_status(status_code: u16, body: String) -> Self {
        let message = match serde_json::from_str::<ProviderErrorBody>(&body) {
            Ok(parsed) => parsed.error.message,
            Err(_) => body,
        };
        Self {
            kind: classify_http_status(status_code),
            status_code: Some(status_code),
            message,
        }
    }

    pub fn network_error(message: String) -> Self {
        Self {
            kind: LlmErrorKind::NetworkError,
            status_code: None,
            message,
        }
    }

    /// The response envelope could not be understood.
    pub fn parse_error(message: String) -> Self {
        Self {
            kind: LlmErrorKind::ParseError,
            status_code: None,
            message,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LlmErrorKind {
    /// 429
    #[error("Rate limited")]
    RateLimited,
    /// 5xx
    #[error("Server error")]
    ServerError,
    /// 4xx other than 429: bad key, unknown model, rejected prompt
    #[error("Client error")]
    ClientError,
    /// Connection failure or timeout
    #[error("Network error")]
    NetworkError,
    #[error("Parse error")]
    ParseError,
}

impl LlmErrorKind {
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LlmErrorKind::RateLimited | LlmErrorKind::ServerError | LlmErrorKind::NetworkError
        )
    }
}

/// Map a non-success HTTP status to an error kind.
pub fn classify_http_status(status: u16) -> LlmErrorKind {
    match status {
        429 => LlmErrorKind::RateLimited,
        400..=499 => LlmErrorKind::ClientError,
        _ => LlmErrorKind::ServerError,
    }
}
