use crate::analytics::models::{DimensionCount, NewVisit, RecentVisit};
use crate::models::ShortLink;
use crate::storage::{Storage, StorageError, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

pub struct SqliteStorage {
    pool: Arc<SqlitePool>,
}

impl SqliteStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        // foreign_keys must be set per connection for the visit cascade to hold
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS urls (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                short_id TEXT NOT NULL UNIQUE,
                long_url TEXT NOT NULL,
                clicks INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS analytics (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                short_id TEXT NOT NULL,
                ip TEXT,
                country TEXT,
                user_agent TEXT,
                device TEXT NOT NULL DEFAULT 'desktop',
                browser TEXT,
                referrer TEXT,
                created_at INTEGER NOT NULL,
                FOREIGN KEY (short_id) REFERENCES urls(short_id) ON DELETE CASCADE
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_analytics_short_id ON analytics(short_id)")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn insert(&self, short_id: &str, long_url: &str) -> StorageResult<ShortLink> {
        let created_at = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO urls (short_id, long_url, clicks, created_at)
            VALUES (?, ?, 0, ?)
            ON CONFLICT(short_id) DO NOTHING
            "#,
        )
        .bind(short_id)
        .bind(long_url)
        .bind(created_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| StorageError::Other(e.into()))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::Conflict);
        }

        let link = sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT id, short_id, long_url, clicks, created_at
            FROM urls
            WHERE short_id = ?
            "#,
        )
        .bind(short_id)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| StorageError::Other(e.into()))?;

        Ok(link)
    }

    async fn get(&self, short_id: &str) -> Result<Option<ShortLink>> {
        let link = sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT id, short_id, long_url, clicks, created_at
            FROM urls
            WHERE short_id = ?
            "#,
        )
        .bind(short_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortLink>> {
        let link = sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT id, short_id, long_url, clicks, created_at
            FROM urls
            WHERE long_url = ?
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(long_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn increment_clicks(&self, short_id: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE urls
            SET clicks = clicks + 1
            WHERE short_id = ?
            "#,
        )
        .bind(short_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn delete(&self, short_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM urls WHERE short_id = ?")
            .bind(short_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_visit(&self, visit: &NewVisit) -> Result<()> {
        let created_at = chrono::Utc::now().timestamp();

        sqlx::query(
            r#"
            INSERT INTO analytics (short_id, ip, country, user_agent, device, browser, referrer, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&visit.short_id)
        .bind(&visit.ip)
        .bind(&visit.country)
        .bind(&visit.user_agent)
        .bind(&visit.device)
        .bind(&visit.browser)
        .bind(&visit.referrer)
        .bind(created_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn counts_by_country(&self, short_id: &str, limit: i64) -> Result<Vec<DimensionCount>> {
        let counts = sqlx::query_as::<_, DimensionCount>(
            r#"
            SELECT country AS dimension, COUNT(*) AS count
            FROM analytics
            WHERE short_id = ?
            GROUP BY country
            ORDER BY count DESC
            LIMIT ?
            "#,
        )
        .bind(short_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(counts)
    }

    async fn counts_by_device(&self, short_id: &str) -> Result<Vec<DimensionCount>> {
        let counts = sqlx::query_as::<_, DimensionCount>(
            r#"
            SELECT device AS dimension, COUNT(*) AS count
            FROM analytics
            WHERE short_id = ?
            GROUP BY device
            ORDER BY count DESC
            "#,
        )
        .bind(short_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(counts)
    }

    async fn counts_by_referrer(&self, short_id: &str, limit: i64) -> Result<Vec<DimensionCount>> {
        let counts = sqlx::query_as::<_, DimensionCount>(
            r#"
            SELECT referrer AS dimension, COUNT(*) AS count
            FROM analytics
            WHERE short_id = ? AND referrer IS NOT NULL
            GROUP BY referrer
            ORDER BY count DESC
            LIMIT ?
            "#,
        )
        .bind(short_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(counts)
    }

    async fn recent_visits(&self, short_id: &str, limit: i64) -> Result<Vec<RecentVisit>> {
        // created_at has second granularity; id breaks ties so same-second
        // visits still come back newest first
        let visits = sqlx::query_as::<_, RecentVisit>(
            r#"
            SELECT ip, country, device, browser, referrer, created_at
            FROM analytics
            WHERE short_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(short_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(visits)
    }
}
