//! Generative-text client module.
//!
//! This module provides a trait-based abstraction over text-generation
//! providers, with Google Gemini as the implementation. Callers hand over a
//! prompt and sampling parameters and get back the raw generated text; any
//! interpretation of that text happens elsewhere.

mod error;
mod gemini;

pub use error::{classify_http_status, LlmError, LlmErrorKind};
pub use gemini::GeminiClient;

use async_trait::async_trait;

/// Sampling parameters for a single generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    /// Sampling temperature (0 = deterministic).
    pub temperature: f64,
    /// Top-k sampling.
    pub top_k: u32,
    /// Top-p nucleus sampling.
    pub top_p: f64,
    /// Maximum output tokens to generate.
    pub max_output_tokens: u32,
}

impl GenerationOptions {
    /// Low-randomness, bounded-length parameters that bias the model towards
    /// compact, literal JSON.
    pub fn extraction() -> Self {
        Self {
            temperature: 0.1,
            top_k: 32,
            top_p: 1.0,
            max_output_tokens: 2048,
        }
    }
}

/// Trait for text-generation clients.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt`. Makes exactly one upstream call.
    async fn generate(&self, prompt: &str, options: &GenerationOptions)
        -> Result<String, LlmError>;
}
