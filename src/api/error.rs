//! Handler error type.
//!
//! Handlers return `Result<T, ApiError>`; the [`IntoResponse`] impl maps each
//! failure to its status code and JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use super::types::ErrorResponse;
use crate::extraction::{ExtractError, UnparsableKind};

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body could not be read.
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Extract(ExtractError::InvalidInput) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Extract(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponse {
        // Upstream and JSON parse failures also carry an empty task list
        let tasks = match self {
            ApiError::Extract(ExtractError::Upstream(_))
            | ApiError::Extract(ExtractError::UnparsableResponse {
                kind: UnparsableKind::MalformedJson,
                ..
            }) => Some(Vec::new()),
            _ => None,
        };
        ErrorResponse {
            error: self.to_string(),
            tasks,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Error in extract-tasks: {}", self);
        } else {
            tracing::debug!("Rejected extract-tasks request: {}", self);
        }
        (status, Json(self.body())).into_response()
    }
}
