//! SQLite Record Store
//!
//! Persists every collection in a single key-value table:
//! - `collection`: which of the six collections the row belongs to
//! - `id`: record id (unique within its collection)
//! - `body`: the record, JSON-encoded
//!
//! All rows are loaded into an in-memory `Collections` mirror on open, so reads
//! never hit the database.

use super::collections::{Collections, Write, WriteSet};
use super::store::Store;
use crate::error::Result;
use sqlx::sqlite::SqlitePool;
use tracing::{debug, info};

/// SQLite-backed record store
pub struct SqliteStore {
    pool: SqlitePool,
    mirror: Collections,
}

impl SqliteStore {
    /// Opens (or creates) the database and loads all stored records
    ///
    /// # Arguments
    /// * `url` - SQLite connection URL (e.g., "sqlite://registry.db?mode=rwc")
    pub async fn open(url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(url).await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&pool)
        .await?;

        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT collection, body FROM records ORDER BY collection, id")
                .fetch_all(&pool)
                .await?;

        let mut mirror = Collections::new();
        for (collection, body) in &rows {
            mirror.apply(Write::decode(collection, body)?);
        }
        info!("Loaded {} records from {}", mirror.record_count(), url);

        Ok(Self { pool, mirror })
    }

    /// Closes the underlying connection pool
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl Store for SqliteStore {
    fn collections(&self) -> &Collections {
        &self.mirror
    }

    /// Writes the whole set in one transaction, then updates the mirror
    ///
    /// Encoding happens before the transaction opens, and the mirror is only
    /// touched after the transaction commits.
    async fn commit(&mut self, writes: WriteSet) -> Result<()> {
        let mut rows = Vec::with_capacity(writes.len());
        for write in &writes {
            rows.push((write.collection(), write.id().to_string(), write.encode()?));
        }

        let mut tx = self.pool.begin().await?;
        for (collection, id, body) in &rows {
            sqlx::query(
                "INSERT INTO records (collection, id, body) VALUES (?, ?, ?) \
                 ON CONFLICT (collection, id) DO UPDATE SET body = excluded.body",
            )
            .bind(*collection)
            .bind(id.as_str())
            .bind(body.as_str())
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        debug!("Committed {} records", rows.len());

        for write in writes {
            self.mirror.apply(write);
        }
        Ok(())
    }
}
