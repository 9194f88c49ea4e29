//! Client SDK for the ledger service.
//!
//! Provides async wrappers around the authentication and blockchain read
//! endpoints, a pluggable session store for the token/user/refresh-token
//! triple, and synchronous form-field validators.

pub mod api;
pub mod auth;
pub mod blockchain;
pub mod config;
pub mod errors;
pub mod storage;
pub mod validation;

pub use api::ApiClient;
pub use auth::AuthService;
pub use blockchain::BlockchainService;
pub use config::Config;
pub use errors::{ClientError, ClientResult};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
