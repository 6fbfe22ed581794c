//! HTTP client for the extraction service.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

use super::task::Task;
use super::Board;
use crate::api::types::{ErrorResponse, ExtractTasksRequest, ExtractTasksResponse};
use crate::extraction::TaskCandidate;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("No transcript provided. Paste a meeting transcript to extract tasks.")]
    EmptyTranscript,

    #[error("Failed to reach the extraction service: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Extraction failed (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response from the extraction service: {0}")]
    InvalidResponse(String),

    #[error("No tasks found. Try being more specific about tasks and assignments.")]
    NoTasksFound,
}

/// Client for `POST /api/extract-tasks`.
#[derive(Debug, Clone)]
pub struct ExtractionClient {
    client: Client,
    base_url: String,
}

impl ExtractionClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/extract-tasks", self.base_url)
    }

    /// Send `transcript` for extraction. Blank transcripts are rejected
    /// locally, without a request.
    pub async fn extract(&self, transcript: &str) -> Result<Vec<TaskCandidate>, ClientError> {
        if transcript.trim().is_empty() {
            return Err(ClientError::EmptyTranscript);
        }

        let response = self
            .client
            .post(self.endpoint())
            .json(&ExtractTasksRequest {
                transcript: Some(transcript.to_string()),
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(err) => err.error,
                Err(_) if body.trim().is_empty() => format!("API Error: {}", status.as_u16()),
                Err(_) => body,
            };
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ExtractTasksResponse = serde_json::from_str(&body)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        Ok(parsed.tasks)
    }

    /// Extract tasks from the board's transcript and merge them.
    ///
    /// On success the new tasks are appended and the transcript is cleared.
    /// On any failure, including an empty result, the board is left as it was.
    pub async fn extract_into(&self, board: &mut Board) -> Result<Vec<Task>, ClientError> {
        let candidates = self.extract(board.transcript()).await?;
        if candidates.is_empty() {
            return Err(ClientError::NoTasksFound);
        }
        let added = board.merge_extracted(&candidates);
        board.set_transcript("");
        Ok(added)
    }
}
