//! Key-value entry operations on the SQLite cache.

use async_trait::async_trait;
use chrono::Utc;
use tokio_rusqlite::params;

use super::{Ack, KvStore};
use super::connection::CacheDb;
use crate::Error;

impl CacheDb {
    /// Get the raw JSON stored under `key`.
    ///
    /// Returns None if the key doesn't exist in the cache.
    pub async fn get_entry(&self, key: &str) -> Result<Option<String>, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let mut stmt = conn.prepare("SELECT value_json FROM kv_cache WHERE key = ?1")?;

                let result = stmt.query_row(params![key], |row| row.get(0));

                match result {
                    Ok(json) => Ok(Some(json)),
                    Err(tokio_rusqlite::rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or overwrite the value under `key`.
    ///
    /// Uses UPSERT semantics in a single statement, so a concurrent reader
    /// sees either the previous value or the new one.
    pub async fn put_entry(&self, key: &str, value_json: &str) -> Result<Ack, Error> {
        let key = key.to_string();
        let value_json = value_json.to_string();
        let written_at = Utc::now().to_rfc3339();

        let ack = Ack { key: key.clone(), written_at: written_at.clone() };

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO kv_cache (key, value_json, updated_at)
                    VALUES (?1, ?2, ?3)
                    ON CONFLICT(key) DO UPDATE SET
                        value_json = excluded.value_json,
                        updated_at = excluded.updated_at",
                    params![key, value_json, written_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)?;

        tracing::debug!(key = %ack.key, "cache entry written");
        Ok(ack)
    }

    /// Number of stored entries.
    pub async fn entry_count(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM kv_cache", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl KvStore for CacheDb {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.get_entry(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<Ack, Error> {
        self.put_entry(key, value).await
    }
}
