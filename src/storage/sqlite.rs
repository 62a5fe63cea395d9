use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::Result;
use crate::storage::RateStore;
use crate::types::RateRecord;

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS rates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    from_currency TEXT NOT NULL,
    to_currency TEXT NOT NULL,
    amount TEXT NOT NULL,
    payment_method_id TEXT NOT NULL,
    median_price REAL NOT NULL,
    observed_at TEXT NOT NULL
)";

const PAIR_TIME_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_rates_pair_time ON rates (from_currency, to_currency, observed_at)";

/// SQLite-backed rate log. Holds a connection pool; callers close it
/// once the run is over.
pub struct SqliteRateStore {
    pool: SqlitePool,
}

impl SqliteRateStore {
    /// Opens the database, creating file and schema when missing.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Single connection: the poller writes strictly sequentially.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::query(SCHEMA).execute(&pool).await?;
        sqlx::query(PAIR_TIME_INDEX).execute(&pool).await?;

        Ok(SqliteRateStore { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl RateStore for SqliteRateStore {
    async fn append(&self, record: &RateRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO rates (from_currency, to_currency, amount, payment_method_id, median_price, observed_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&record.from_currency)
        .bind(&record.to_currency)
        .bind(&record.amount)
        .bind(&record.payment_method_id)
        .bind(record.median_price)
        .bind(record.observed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn latest(
        &self,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<Option<RateRecord>> {
        let record = sqlx::query_as::<_, RateRecord>(
            "SELECT from_currency, to_currency, amount, payment_method_id, median_price, observed_at \
             FROM rates WHERE from_currency = ?1 AND to_currency = ?2 \
             ORDER BY observed_at DESC, id DESC LIMIT 1",
        )
        .bind(from_currency)
        .bind(to_currency)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn recent(
        &self,
        from_currency: &str,
        to_currency: &str,
        limit: u32,
    ) -> Result<Vec<RateRecord>> {
        let records = sqlx::query_as::<_, RateRecord>(
            "SELECT from_currency, to_currency, amount, payment_method_id, median_price, observed_at \
             FROM rates WHERE from_currency = ?1 AND to_currency = ?2 \
             ORDER BY observed_at DESC, id DESC LIMIT ?3",
        )
        .bind(from_currency)
        .bind(to_currency)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
