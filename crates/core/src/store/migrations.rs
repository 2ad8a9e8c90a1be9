//! Schema migrations for the cache store.
//!
//! Applied versions are tracked in a `_migrations` table, so a store
//! file created by an older build upgrades in place the next time it
//! is opened.

use super::Error;
use tokio_rusqlite::{Connection, params};

/// Ordered migration batches as (version, SQL).
///
/// Every batch is idempotent through CREATE IF NOT EXISTS, so a replay
/// against an already-migrated store is harmless.
const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../../migrations/001_caches.sql"))];

/// Apply every migration newer than the store's recorded version.
///
/// # Errors
///
/// Fails if the version table cannot be read or a batch fails to
/// execute. Batches applied before the failure stay applied.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            )",
            [],
        )?;

        let current: i64 =
            conn.query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| row.get(0))?;

        for (version, sql) in MIGRATIONS {
            if *version <= current {
                continue;
            }
            conn.execute_batch(sql)
                .map_err(|e| Error::MigrationFailed(format!("version {}: {}", version, e)))?;
            conn.execute(
                "INSERT INTO _migrations (version, applied_at) VALUES (?1, ?2)",
                params![version, chrono::Utc::now().to_rfc3339()],
            )?;
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}
