//! Extraction of proven handles from proof-service claim contexts.
//!
//! A successful proof carries `claimData.context`, itself a JSON-encoded
//! string of the form `{"extractedParameters": {"username": "..."}, ...}`.

use serde_json::Value;

use crate::Platform;

/// Pull the platform-specific handle out of a claim context.
///
/// Returns `None` when the context is not valid JSON, has no
/// `extractedParameters` object, or the platform's parameter is missing or
/// empty. The caller decides what a missing value means for its state.
pub fn extract_verified_value(platform: Platform, context: &str) -> Option<String> {
    let context: Value = serde_json::from_str(context).ok()?;
    let value = context
        .get("extractedParameters")?
        .get(platform.extracted_parameter())?
        .as_str()?;

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
