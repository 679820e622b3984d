//! Validation of structured (JSON) completions.

use serde_json::Value;

use crate::error::{BackendError, Result};

/// Parse a model completion as JSON.
///
/// Surrounding whitespace and a single markdown code fence are tolerated;
/// anything else that fails to parse is a [`BackendError::MalformedResponse`].
pub fn parse_json_payload(backend: &str, text: &str) -> Result<Value> {
    let body = strip_code_fence(text.trim());

    if body.is_empty() {
        return Err(BackendError::malformed(backend, "empty completion"));
    }

    serde_json::from_str(body)
        .map_err(|e| BackendError::malformed(backend, format!("completion is not valid JSON: {e}")))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
