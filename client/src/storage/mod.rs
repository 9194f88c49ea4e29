//! Session storage port.
//!
//! The session record (token, user, refresh token) is kept as independent
//! string keys in a key/value store. The store is injected into the services
//! so callers choose between a throwaway in-memory map and a file that
//! survives restarts.

use crate::errors::ClientResult;
use async_trait::async_trait;

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Raw bearer token.
pub const TOKEN_KEY: &str = "token";
/// JSON text of the authenticated user.
pub const USER_KEY: &str = "user";
/// Raw refresh token, only present when the server issued one.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Flat string key/value store holding the session record.
///
/// Writes to different keys are independent; there is no transaction
/// spanning several keys.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Returns the value stored under `key`, if any.
    async fn get(&self, key: &str) -> ClientResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> ClientResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> ClientResult<()>;
}
