//! Authentication module for managing the client session.
//!
//! This module provides the public interface for register, login and logout,
//! profile calls, and access to the locally stored session record.

pub mod models;
pub mod service;

// Re-exports for convenience
pub use models::{AuthResponse, ChangePasswordRequest, SessionRecord};
pub use service::AuthService;
