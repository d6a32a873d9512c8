use crate::analytics::models::{DimensionCount, NewVisit, RecentVisit};
use crate::models::ShortLink;
use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("short id already exists")]
    Conflict,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize the storage (create tables and indexes)
    async fn init(&self) -> Result<()>;

    /// Insert a new mapping; `Conflict` when the short id is already taken
    async fn insert(&self, short_id: &str, long_url: &str) -> StorageResult<ShortLink>;

    /// Get a mapping by short id
    async fn get(&self, short_id: &str) -> Result<Option<ShortLink>>;

    /// Find a mapping by exact long URL match
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortLink>>;

    /// Increment the click counter
    async fn increment_clicks(&self, short_id: &str) -> Result<()>;

    /// Delete a mapping; its visit records cascade away with it
    async fn delete(&self, short_id: &str) -> Result<bool>;

    /// Append one visit record
    async fn record_visit(&self, visit: &NewVisit) -> Result<()>;

    /// Visit counts grouped by country, descending; NULL country is a group
    async fn counts_by_country(&self, short_id: &str, limit: i64) -> Result<Vec<DimensionCount>>;

    /// Visit counts grouped by device class, descending
    async fn counts_by_device(&self, short_id: &str) -> Result<Vec<DimensionCount>>;

    /// Visit counts grouped by non-null referrer, descending
    async fn counts_by_referrer(&self, short_id: &str, limit: i64) -> Result<Vec<DimensionCount>>;

    /// Most recent raw visits, newest first
    async fn recent_visits(&self, short_id: &str, limit: i64) -> Result<Vec<RecentVisit>>;
}
