//! Response decoding helpers shared by every endpoint wrapper.
//!
//! Provides:
//! - Decoding of success bodies, where an empty body reads as JSON `null`
//! - Extraction of a human-readable message from error bodies
//!
//! # Error Body Format
//! Error responses are not standardized by the server. The message is taken
//! from, in order:
//! 1. a `message` string field of a JSON body
//! 2. an `error` string field of a JSON body
//! 3. the raw body text
//! 4. the canonical reason phrase of the status code

use crate::errors::{ClientError, ClientResult};
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Loose view of an error body, tolerant to any extra fields.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// Decodes a success body into `T`.
pub fn decode_body<T: DeserializeOwned>(text: &str) -> ClientResult<T> {
    let result = if text.trim().is_empty() {
        serde_json::from_value(Value::Null)
    } else {
        serde_json::from_str(text)
    };

    result.map_err(|e| ClientError::decode(e.to_string()))
}

/// Picks the most useful message out of an error response.
pub fn error_message(status: StatusCode, text: &str) -> String {
    if let Ok(body) = serde_json::from_str::<ErrorBody>(text) {
        let from_field = [body.message, body.error]
            .into_iter()
            .flatten()
            .find_map(|value| match value {
                Value::String(s) if !s.trim().is_empty() => Some(s),
                _ => None,
            });
        if let Some(message) = from_field {
            return message;
        }
    }

    let trimmed = text.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_string()
}
