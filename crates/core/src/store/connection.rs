//! Store handle and connection setup.
//!
//! One SQLite database holds every versioned namespace. The handle
//! wraps a tokio-rusqlite [`Connection`] that runs statements on a
//! dedicated background thread, so it is cheap to clone and hand to
//! background revalidation tasks.

use std::path::Path;

use tokio_rusqlite::Connection;

use super::migrations;
use crate::Error;

/// Handle to the cache store.
#[derive(Clone, Debug)]
pub struct CacheStore {
    pub(crate) conn: Connection,
}

impl CacheStore {
    /// Open (or create) the store file at `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened or a pending migration fails
    /// to apply.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = Connection::open(path).await.map_err(|e| Error::Database(e.into()))?;
        Self::prepare(conn).await
    }

    /// Open a throwaway in-memory store.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory().await.map_err(|e| Error::Database(e.into()))?;
        Self::prepare(conn).await
    }

    /// Apply pragmas and run migrations on a fresh connection.
    ///
    /// Namespace deletion relies on cascading deletes, so foreign key
    /// enforcement is switched on here rather than left to callers.
    async fn prepare(conn: Connection) -> Result<Self, Error> {
        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode=WAL;
                 PRAGMA synchronous=NORMAL;
                 PRAGMA temp_store=MEMORY;
                 PRAGMA foreign_keys=ON;",
            )?;
            Ok(())
        })
        .await
        .map_err(Error::Database)?;

        migrations::run(&conn).await?;

        Ok(Self { conn })
    }
}
