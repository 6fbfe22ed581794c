//! JSON array recovery from free-form model output.
//!
//! The match is greedy: it runs from the first `[` in the reply to the last
//! `]`, across lines. A reply holding two separate arrays (`[1,2] ... [{..}]`)
//! therefore yields one slice spanning both, which usually fails to parse.
//! That quirk is kept on purpose; callers depend on the exact slice.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::{ExtractError, UnparsableKind};

fn array_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[[\s\S]*\]").expect("array pattern is valid"))
}

/// Locate the candidate JSON payload in `reply`.
pub fn find_array_slice(reply: &str) -> Option<&str> {
    array_pattern().find(reply).map(|m| m.as_str())
}

/// Recover the JSON array embedded in `reply`.
///
/// Both failure paths report [`ExtractError::UnparsableResponse`] with the
/// reply attached unmodified.
pub fn recover_array(reply: &str) -> Result<Vec<Value>, ExtractError> {
    let slice = find_array_slice(reply).ok_or_else(|| ExtractError::UnparsableResponse {
        kind: UnparsableKind::NoArray,
        reason: format!(
            "Model did not return a valid JSON array. Response was: {}",
            reply
        ),
        raw: reply.to_string(),
    })?;

    serde_json::from_str::<Vec<Value>>(slice).map_err(|e| ExtractError::UnparsableResponse {
        kind: UnparsableKind::MalformedJson,
        reason: format!("Failed to parse JSON array from model response: {}", e),
        raw: reply.to_string(),
    })
}
