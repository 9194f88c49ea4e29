//! Read-only ledger endpoints.
//!
//! Each method is a single GET with no local logic; payloads are returned as
//! JSON values because their shape belongs to the server.

use crate::api::ApiClient;
use crate::errors::ClientResult;
use serde_json::Value;

#[derive(Clone)]
pub struct BlockchainService {
    api: ApiClient,
}

impl BlockchainService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Chain-wide statistics
    pub async fn get_stats(&self) -> ClientResult<Value> {
        self.api.get("/blockchain/stats").await
    }

    /// Every block in the chain
    pub async fn get_blocks(&self) -> ClientResult<Value> {
        self.api.get("/blockchain/blocks").await
    }

    /// A single block by its height
    pub async fn get_block(&self, index: u64) -> ClientResult<Value> {
        self.api.get(&format!("/blockchain/block/{index}")).await
    }

    pub async fn get_latest_block(&self) -> ClientResult<Value> {
        self.api.get("/blockchain/latest").await
    }

    /// Ask the server to verify the integrity of the chain
    pub async fn validate(&self) -> ClientResult<Value> {
        self.api.get("/blockchain/validate").await
    }
}
