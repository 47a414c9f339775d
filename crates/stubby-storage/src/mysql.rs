use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use stubby_core::store::{LinkStore, ReadStore, Result};
use stubby_core::{LinkRecord, ShortCode, StorageError};
use tracing::trace;

/// MySQL implementation of the storage port.
///
/// One row per code in the `links` table (see `ddl/mysql/links.sql`).
/// Timestamps are stored as Unix milliseconds. Deletes are hard deletes so
/// a removed code can be claimed again.
#[derive(Debug, Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Creates a store from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a store by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `links` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(crate::MYSQL_SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn parse_millis(column: &str, millis: i64) -> Result<Timestamp> {
    Timestamp::from_millisecond(millis).map_err(|e| {
        StorageError::InvalidData(format!("invalid {column} timestamp '{millis}': {e}"))
    })
}

fn row_to_record(row: &MySqlRow) -> Result<LinkRecord> {
    let code: String = row.try_get("code").map_err(map_sqlx_error)?;
    let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
    let created_at_ms: i64 = row.try_get("created_at_ms").map_err(map_sqlx_error)?;
    let validity_minutes: u32 = row.try_get("validity_minutes").map_err(map_sqlx_error)?;
    let expires_at_ms: i64 = row.try_get("expires_at_ms").map_err(map_sqlx_error)?;
    let clicks: u64 = row.try_get("clicks").map_err(map_sqlx_error)?;

    Ok(LinkRecord {
        code: ShortCode::new_unchecked(code),
        original_url,
        created_at: parse_millis("created_at", created_at_ms)?,
        validity_minutes,
        expires_at: parse_millis("expires_at", expires_at_ms)?,
        clicks,
    })
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadStore for MySqlStore {
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        let row = sqlx::query(
            r#"
            SELECT code, original_url, created_at_ms, validity_minutes, expires_at_ms, clicks
            FROM links
            WHERE code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn list_all(&self) -> Result<Vec<LinkRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT code, original_url, created_at_ms, validity_minutes, expires_at_ms, clicks
            FROM links
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(row_to_record).collect()
    }
}

#[async_trait]
impl LinkStore for MySqlStore {
    async fn put(&self, record: LinkRecord) -> Result<()> {
        trace!(code = %record.code, clicks = record.clicks, "upserting link row");

        sqlx::query(
            r#"
            INSERT INTO links (code, original_url, created_at_ms, validity_minutes, expires_at_ms, clicks)
            VALUES (?, ?, ?, ?, ?, ?) AS new
            ON DUPLICATE KEY UPDATE
              original_url = new.original_url,
              created_at_ms = new.created_at_ms,
              validity_minutes = new.validity_minutes,
              expires_at_ms = new.expires_at_ms,
              clicks = new.clicks
            "#,
        )
        .bind(record.code.as_str())
        .bind(record.original_url)
        .bind(record.created_at.as_millisecond())
        .bind(record.validity_minutes)
        .bind(record.expires_at.as_millisecond())
        .bind(record.clicks)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete(&self, code: &ShortCode) -> Result<bool> {
        let result = sqlx::query("DELETE FROM links WHERE code = ?")
            .bind(code.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
