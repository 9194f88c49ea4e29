//! Data structures for authentication-related payloads.
//!
//! This module defines the auth response the server returns on register and
//! login, the session record mirrored into storage, and the request bodies
//! whose field names are fixed by the API.

use serde::Serialize;
use serde_json::Value;

/// Payload returned by `/auth/register` and `/auth/login`.
///
/// `payload` is the body exactly as received, whatever its shape. The
/// session fields are read from it leniently: a missing, empty or non-string
/// `token` means no session was issued.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthResponse {
    pub token: Option<String>,
    pub user: Option<Value>,
    pub refresh_token: Option<String>,
    pub payload: Value,
}

impl AuthResponse {
    pub fn from_payload(payload: Value) -> Self {
        let string_field = |name: &str| {
            payload
                .get(name)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let token = string_field("token");
        let refresh_token = string_field("refreshToken");
        let user = payload.get("user").filter(|u| !u.is_null()).cloned();

        Self {
            token,
            user,
            refresh_token,
            payload,
        }
    }

    /// True when the server issued a non-empty token.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn into_payload(self) -> Value {
        self.payload
    }
}

impl From<Value> for AuthResponse {
    fn from(payload: Value) -> Self {
        Self::from_payload(payload)
    }
}

/// Client-held session: the token, the user and the optional refresh token.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub token: String,
    pub user: Option<Value>,
    pub refresh_token: Option<String>,
}

/// Body of `/auth/change-password`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}
