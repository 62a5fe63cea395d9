pub mod sqlite;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::RateRecord;

#[async_trait]
pub trait RateStore: Send + Sync {
    /// Appends one observation. The rate log is insert-only; repeated
    /// observations of the same pair are kept as separate rows.
    async fn append(&self, record: &RateRecord) -> Result<()>;

    /// Most recent observation for a pair, if any.
    async fn latest(&self, from_currency: &str, to_currency: &str)
        -> Result<Option<RateRecord>>;

    /// Up to `limit` observations for a pair, newest first.
    async fn recent(&self, from_currency: &str, to_currency: &str, limit: u32)
        -> Result<Vec<RateRecord>>;
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StorageConfig {
    pub database_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            database_url: "sqlite://rates.db".to_string(),
        }
    }
}
