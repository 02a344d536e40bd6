//! Stored form of `original_metadata`.
//!
//! The payload is serialized to JSON and then passed through
//! [`emoji::tokenize`]; decoding reverses both steps. Malformed stored text
//! is an error, never an empty payload.

use serde_json::Value;
use thiserror::Error;

use crate::emoji;

/// Failure to encode or decode stored metadata.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Stored text is not valid JSON once tokens are restored.
    #[error("malformed stored metadata: {0}")]
    Malformed(String),

    /// The payload could not be serialized.
    #[error("unserializable metadata: {0}")]
    Unserializable(String),
}

/// Encode a metadata payload into its stored text form.
pub fn encode(metadata: &Value) -> Result<String, CodecError> {
    let json =
        serde_json::to_string(metadata).map_err(|e| CodecError::Unserializable(e.to_string()))?;
    Ok(emoji::tokenize(&json).into_owned())
}

/// Decode stored text back into the metadata payload.
pub fn decode(stored: &str) -> Result<Value, CodecError> {
    let json = emoji::detokenize(stored);
    serde_json::from_str(&json).map_err(|e| CodecError::Malformed(e.to_string()))
}

/// Decode an optional stored column, passing `None` through.
pub fn decode_opt(stored: Option<&str>) -> Result<Option<Value>, CodecError> {
    stored.map(decode).transpose()
}
