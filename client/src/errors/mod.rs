//! Client-wide error types.
//!
//! Every fallible operation in the library returns [`ClientResult`]. Transport
//! failures are propagated as-is; the only local recovery is the session
//! cleanup performed by `AuthService::logout`.

use thiserror::Error;

/// Errors raised while talking to the API or the session store.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (connect failure, timeout, ...).
    #[error("Network error: {message}")]
    Network { message: String },

    /// The server answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not match the expected JSON shape.
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// The session store could not be read or written.
    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    // Helper constructors for common patterns

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::decode(error.to_string())
        } else {
            Self::network(error.to_string())
        }
    }
}
