//! Schema migrations for the key-value cache.
//!
//! Applied versions are recorded in `schema_version`; opening a database
//! applies whatever is newer than the highest recorded version, each
//! migration in its own transaction together with its version row.

use super::Error;
use tokio_rusqlite::{Connection, params};

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

/// Ordered by version. Later entries must only add to the kv table.
const MIGRATIONS: &[Migration] =
    &[Migration { version: 1, name: "kv_cache", sql: include_str!("../../migrations/001_kv_cache.sql") }];

/// Bring the cache schema up to date.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL
            )",
        )?;

        let applied: i64 =
            conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |row| row.get(0))?;

        for migration in MIGRATIONS.iter().filter(|m| m.version > applied) {
            tracing::info!(version = migration.version, name = migration.name, "migrating kv cache");
            let tx = conn.transaction()?;
            tx.execute_batch(migration.sql)
                .map_err(|e| Error::MigrationFailed(format!("{} ({}): {e}", migration.name, migration.version)))?;
            tx.execute(
                "INSERT INTO schema_version (version, name, applied_at) VALUES (?1, ?2, ?3)",
                params![migration.version, migration.name, chrono::Utc::now().to_rfc3339()],
            )?;
            tx.commit()?;
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn current_version(conn: &Connection) -> Result<i64, Error> {
        conn.call(|conn| -> Result<i64, Error> {
            Ok(conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |row| row.get(0))?)
        })
        .await
        .map_err(Error::from)
    }

    async fn kv_columns(conn: &Connection) -> Vec<String> {
        conn.call(|conn| -> Result<Vec<String>, Error> {
            let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('kv_cache') ORDER BY cid")?;
            let names = stmt.query_map([], |row| row.get(0))?.collect::<Result<Vec<String>, _>>()?;
            Ok(names)
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_fresh_database_gets_kv_table() {
        let conn = Connection::open_in_memory().await.unwrap();
        run(&conn).await.unwrap();

        assert_eq!(kv_columns(&conn).await, vec!["key", "value_json", "updated_at"]);
        assert_eq!(current_version(&conn).await.unwrap(), MIGRATIONS.len() as i64);
    }

    #[tokio::test]
    async fn test_rerun_keeps_cached_products() {
        let conn = Connection::open_in_memory().await.unwrap();
        run(&conn).await.unwrap();
        conn.call(|conn| -> Result<(), Error> {
            conn.execute(
                "INSERT INTO kv_cache (key, value_json, updated_at) VALUES ('product:A1', '{}', 'then')",
                [],
            )?;
            Ok(())
        })
        .await
        .unwrap();

        run(&conn).await.unwrap();

        let rows: i64 = conn
            .call(|conn| -> Result<i64, Error> {
                Ok(conn.query_row("SELECT COUNT(*) FROM kv_cache WHERE key = 'product:A1'", [], |row| row.get(0))?)
            })
            .await
            .unwrap();
        assert_eq!(rows, 1);

        let recorded: i64 = conn
            .call(|conn| -> Result<i64, Error> {
                Ok(conn.query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))?)
            })
            .await
            .unwrap();
        assert_eq!(recorded, MIGRATIONS.len() as i64);
    }

    #[tokio::test]
    async fn test_version_is_zero_before_any_migration() {
        let conn = Connection::open_in_memory().await.unwrap();
        conn.call(|conn| -> Result<(), Error> {
            conn.execute_batch("CREATE TABLE schema_version (version INTEGER PRIMARY KEY, name TEXT NOT NULL, applied_at TEXT NOT NULL)")?;
            Ok(())
        })
        .await
        .unwrap();
        assert_eq!(current_version(&conn).await.unwrap(), 0);
    }
}
