//! HTTP plumbing for the service API.
//!
//! `client` owns the reqwest transport; `common` holds the body decoding and
//! error-message helpers it relies on.

pub mod client;
pub mod common;

pub use client::ApiClient;
