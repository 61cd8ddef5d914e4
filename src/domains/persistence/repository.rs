use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::types::SnapshotEnvelope;
use crate::errors::{PersistenceError, PersistenceResult};

/// Durable key/value storage for snapshot envelopes
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    async fn load(&self, key: &str) -> PersistenceResult<Option<SnapshotEnvelope>>;

    /// Insert or replace the snapshot stored under `key`
    async fn save(&self, key: &str, envelope: &SnapshotEnvelope) -> PersistenceResult<()>;

    /// Move the snapshot under `key` aside; returns the key it now lives under
    async fn quarantine(&self, key: &str) -> PersistenceResult<String>;

    async fn delete(&self, key: &str) -> PersistenceResult<bool>;
}

fn quarantine_key(key: &str) -> String {
    format!("{}.corrupt.{}", key, Utc::now().format("%Y%m%dT%H%M%S%.6fZ"))
}

/// SQLite implementation
pub struct SqliteSnapshotRepository {
    pool: SqlitePool,
}

impl SqliteSnapshotRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open `database_url` and make sure the snapshot table exists
    pub async fn connect(database_url: &str) -> PersistenceResult<Self> {
        // One connection: writes are serialized by the autosave worker anyway,
        // and `sqlite::memory:` databases are per connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(database_url)
            .await?;
        let repository = Self::new(pool);
        repository.ensure_schema().await?;
        Ok(repository)
    }

    pub async fn ensure_schema(&self) -> PersistenceResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS store_snapshots (
                key TEXT PRIMARY KEY NOT NULL,
                schema_version INTEGER NOT NULL,
                checksum TEXT NOT NULL,
                payload TEXT NOT NULL,
                saved_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl SnapshotRepository for SqliteSnapshotRepository {
    async fn load(&self, key: &str) -> PersistenceResult<Option<SnapshotEnvelope>> {
        let row = sqlx::query(
            "SELECT schema_version, checksum, payload, saved_at FROM store_snapshots WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let schema_version: i64 = row.try_get("schema_version")?;
        let saved_at: String = row.try_get("saved_at")?;
        let corrupt = |reason: String| PersistenceError::Corrupt {
            key: key.to_string(),
            reason,
        };

        Ok(Some(SnapshotEnvelope {
            schema_version: u32::try_from(schema_version)
                .map_err(|_| corrupt(format!("invalid schema version {}", schema_version)))?,
            saved_at: DateTime::parse_from_rfc3339(&saved_at)
                .map_err(|e| corrupt(format!("invalid saved_at: {}", e)))?
                .with_timezone(&Utc),
            checksum: row.try_get("checksum")?,
            payload: row.try_get("payload")?,
        }))
    }

    async fn save(&self, key: &str, envelope: &SnapshotEnvelope) -> PersistenceResult<()> {
        sqlx::query(
            r#"
            INSERT INTO store_snapshots (key, schema_version, checksum, payload, saved_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                schema_version = excluded.schema_version,
                checksum = excluded.checksum,
                payload = excluded.payload,
                saved_at = excluded.saved_at
            "#,
        )
        .bind(key)
        .bind(i64::from(envelope.schema_version))
        .bind(&envelope.checksum)
        .bind(&envelope.payload)
        .bind(envelope.saved_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn quarantine(&self, key: &str) -> PersistenceResult<String> {
        let target = quarantine_key(key);
        sqlx::query("UPDATE store_snapshots SET key = ? WHERE key = ?")
            .bind(&target)
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(target)
    }

    async fn delete(&self, key: &str) -> PersistenceResult<bool> {
        let result = sqlx::query("DELETE FROM store_snapshots WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Process-local repository for tests and ephemeral sessions
#[derive(Default)]
pub struct InMemorySnapshotRepository {
    snapshots: Mutex<HashMap<String, SnapshotEnvelope>>,
    saves: AtomicUsize,
}

impl InMemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save` calls
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn keys(&self) -> PersistenceResult<Vec<String>> {
        let snapshots = self.snapshots.lock().map_err(|_| PersistenceError::LockPoisoned)?;
        let mut keys: Vec<String> = snapshots.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    /// Store an envelope directly, bypassing the save counter
    pub fn insert(&self, key: &str, envelope: SnapshotEnvelope) -> PersistenceResult<()> {
        self.snapshots
            .lock()
            .map_err(|_| PersistenceError::LockPoisoned)?
            .insert(key.to_string(), envelope);
        Ok(())
    }
}

#[async_trait]
impl SnapshotRepository for InMemorySnapshotRepository {
    async fn load(&self, key: &str) -> PersistenceResult<Option<SnapshotEnvelope>> {
        let snapshots = self.snapshots.lock().map_err(|_| PersistenceError::LockPoisoned)?;
        Ok(snapshots.get(key).cloned())
    }

    async fn save(&self, key: &str, envelope: &SnapshotEnvelope) -> PersistenceResult<()> {
        self.insert(key, envelope.clone())?;
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn quarantine(&self, key: &str) -> PersistenceResult<String> {
        let mut snapshots = self.snapshots.lock().map_err(|_| PersistenceError::LockPoisoned)?;
        let target = quarantine_key(key);
        if let Some(envelope) = snapshots.remove(key) {
            snapshots.insert(target.clone(), envelope);
        }
        Ok(target)
    }

    async fn delete(&self, key: &str) -> PersistenceResult<bool> {
        let mut snapshots = self.snapshots.lock().map_err(|_| PersistenceError::LockPoisoned)?;
        Ok(snapshots.remove(key).is_some())
    }
}
