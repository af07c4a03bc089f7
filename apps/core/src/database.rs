use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::types::Json;
use std::path::Path;
use tracing::{debug, info};

use crate::cache::{AnalysisCache, LAST_ANALYSIS_KEY};
use crate::classifier::AnalysisRecord;
use crate::error::AppError;

/// Open (creating if needed) the SQLite database at `db_path` and apply the schema.
pub async fn init_db(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    info!("Initializing database at: {:?}", db_path);

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;
    info!("Database initialized and migrations applied.");

    Ok(pool)
}

/// Create the key-value table if missing.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value JSON NOT NULL,
            updated_at INTEGER NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

// --- Key-value CRUD ---

pub async fn put_value<T: serde::Serialize + Sync>(
    pool: &SqlitePool,
    key: &str,
    value: &T,
) -> Result<(), sqlx::Error> {
    let updated_at = Utc::now().timestamp_millis();

    sqlx::query(
        r#"
        INSERT INTO kv_store (key, value, updated_at)
        VALUES (?, ?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(Json(value))
    .bind(updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_value<T>(pool: &SqlitePool, key: &str) -> Result<Option<T>, sqlx::Error>
where
    T: serde::de::DeserializeOwned + Send + Unpin + 'static,
{
    let row: Option<(Json<T>,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(Json(value),)| value))
}

/// Unix milliseconds of the last write to `key`, if present.
pub async fn updated_at(pool: &SqlitePool, key: &str) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT updated_at FROM kv_store WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await
}

/// `AnalysisCache` persisted in the `kv_store` table under `lastAnalysis`.
#[derive(Debug, Clone)]
pub struct SqliteCache {
    pool: SqlitePool,
}

impl SqliteCache {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl AnalysisCache for SqliteCache {
    async fn set(&self, record: AnalysisRecord) -> Result<(), AppError> {
        put_value(&self.pool, LAST_ANALYSIS_KEY, &record).await?;
        debug!(tone = %record.emotional_tone, "Stored last analysis");
        Ok(())
    }

    async fn get(&self) -> Result<Option<AnalysisRecord>, AppError> {
        Ok(get_value(&self.pool, LAST_ANALYSIS_KEY).await?)
    }
}
