//! Ledger read endpoints (`/blockchain/*`).

pub mod service;

pub use service::BlockchainService;
