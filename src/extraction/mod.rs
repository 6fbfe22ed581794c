//! Transcript-to-task extraction.
//!
//! [`ExtractionService::extract`] validates the transcript, builds the
//! prompt, makes one call to the configured [`TextGenerator`] and recovers a
//! JSON array from the reply. The array elements come back untouched as
//! [`TaskCandidate`]s: this module recovers an array from noisy model output,
//! it does not produce valid tasks. Field defaulting happens in
//! [`crate::board::task`].
//!
//! Every failure is terminal for the request. There is no retry, backoff or
//! caching here.

mod prompt;
mod recover;

pub use prompt::build_prompt;
pub use recover::{find_array_slice, recover_array};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::GeminiConfig;
use crate::llm::{GeminiClient, GenerationOptions, LlmError, TextGenerator};

/// An untrusted task proposed by the model, one element of the recovered
/// array. Any field may be missing or of an unexpected type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskCandidate(pub Value);

impl TaskCandidate {
    /// Look up a field; `None` when missing or when the candidate is not an object.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.as_object().and_then(|obj| obj.get(name))
    }
}

impl From<Value> for TaskCandidate {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Why the model output could not be turned into an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnparsableKind {
    /// No `[ ... ]` span in the reply
    NoArray,
    /// The span was found but is not valid JSON
    MalformedJson,
}

/// Extraction failures.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Empty or whitespace-only transcript. Retrying without changing the input is pointless.
    #[error("No transcript provided")]
    InvalidInput,

    /// The upstream model is not configured. Operator-fixable.
    #[error("{0}")]
    Configuration(String),

    /// The model call failed.
    #[error("{0}")]
    Upstream(#[from] LlmError),

    /// The reply did not contain a parsable JSON array.
    #[error("{reason}")]
    UnparsableResponse {
        kind: UnparsableKind,
        reason: String,
        /// The model reply, unmodified
        raw: String,
    },
}

/// Extraction service. Cheap to clone; holds no per-request state.
#[derive(Clone)]
pub struct ExtractionService {
    generator: Option<Arc<dyn TextGenerator>>,
    options: GenerationOptions,
}

impl ExtractionService {
    /// Create a service backed by `generator`.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
            options: GenerationOptions::extraction(),
        }
    }

    /// Create a service with no upstream; every extraction fails with
    /// [`ExtractError::Configuration`].
    pub fn unconfigured() -> Self {
        Self {
            generator: None,
            options: GenerationOptions::extraction(),
        }
    }

    /// Build the service from configuration. A missing API key is not an
    /// error here; it surfaces per request.
    pub fn from_config(config: &GeminiConfig) -> Result<Self, LlmError> {
        match &config.api_key {
            Some(key) => {
                let client = GeminiClient::new(key.clone(), config)?;
                Ok(Self::new(Arc::new(client)))
            }
            None => Ok(Self::unconfigured()),
        }
    }

    /// Check if an upstream generator is available.
    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    /// Extract task candidates from `transcript`.
    pub async fn extract(&self, transcript: &str) -> Result<Vec<TaskCandidate>, ExtractError> {
        if transcript.trim().is_empty() {
            return Err(ExtractError::InvalidInput);
        }

        let generator = self.generator.as_ref().ok_or_else(|| {
            ExtractError::Configuration("Gemini API key not configured".to_string())
        })?;

        let prompt = build_prompt(transcript);
        let reply = generator.generate(&prompt, &self.options).await.map_err(|e| {
            if e.is_transient() {
                tracing::warn!("Upstream generation failed (transient, a retry may succeed): {}", e);
            } else {
                tracing::error!("Upstream generation failed: {}", e);
            }
            ExtractError::Upstream(e)
        })?;

        let items = recover_array(&reply).map_err(|e| {
            tracing::warn!("Unparsable model reply: {}", e);
            e
        })?;

        tracing::info!("Extracted {} task candidates", items.len());
        Ok(items.into_iter().map(TaskCandidate).collect())
    }
}
