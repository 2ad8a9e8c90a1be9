//! Namespace and entry CRUD operations.
//!
//! Provides namespace handles plus the create, read, update, and delete
//! operations for stored response entries.

use super::connection::CacheStore;
use crate::Error;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A stored response snapshot.
///
/// Represents one cached response inside a namespace, with enough of the
/// original exchange preserved to replay it to a requester later.
#[derive(Debug, Clone)]
pub struct ResponseRecord {
    /// Key of the originating request, from [`super::request_key`].
    pub request_key: String,

    /// URL the body actually came from (after redirects).
    pub url: String,

    /// HTTP status of the stored response.
    pub status: u16,

    /// Content-Type header, if the response carried one.
    pub content_type: Option<String>,

    /// Response header pairs, stored as JSON in the row.
    pub headers: Vec<(String, String)>,

    /// Response body bytes.
    pub body: Vec<u8>,

    /// RFC 3339 timestamp of when the entry was written.
    pub stored_at: String,
}

/// Handle to one named namespace.
///
/// Produced by [`CacheStore::open_cache`]; cheap to clone and to move
/// into background tasks.
#[derive(Debug, Clone)]
pub struct Cache {
    store: CacheStore,
    name: String,
}

impl CacheStore {
    /// Open a namespace, creating its registry row on first access.
    pub async fn open_cache(&self, name: &str) -> Result<Cache, Error> {
        let cache_name = name.to_string();
        let created_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT OR IGNORE INTO caches (name, created_at) VALUES (?1, ?2)",
                    params![cache_name, created_at],
                )
                .map_err(Error::from)?;
                Ok(())
            })
            .await
            .map_err(Error::from)?;

        Ok(Cache { store: self.clone(), name: name.to_string() })
    }

    /// List all namespace names, sorted.
    pub async fn list_caches(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM caches ORDER BY name")?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                let mut names = Vec::new();
                for name in rows {
                    names.push(name?);
                }
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a namespace and everything in it.
    ///
    /// Returns the number of entries dropped. Deleting a namespace that
    /// doesn't exist is a no-op reported as 0.
    pub async fn delete_cache(&self, name: &str) -> Result<u64, Error> {
        let cache_name = name.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let dropped = conn.execute("DELETE FROM entries WHERE cache_name = ?1", params![cache_name])?;
                conn.execute("DELETE FROM caches WHERE name = ?1", params![cache_name])?;
                Ok(dropped as u64)
            })
            .await
            .map_err(Error::from)
    }
}

impl Cache {
    /// The namespace name this handle points at.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert or update an entry.
    ///
    /// Uses UPSERT semantics: inserts if the request key doesn't exist in
    /// this namespace, overwrites all fields if it does.
    pub async fn put(&self, record: &ResponseRecord) -> Result<(), Error> {
        let record = record.clone();
        let cache_name = self.name.clone();
        let headers_json = serde_json::to_string(&record.headers).unwrap_or_default();
        self.store
            .conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO entries (
                    cache_name, request_key, url, status, content_type,
                    headers_json, body, stored_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(cache_name, request_key) DO UPDATE SET
                    url = excluded.url,
                    status = excluded.status,
                    content_type = excluded.content_type,
                    headers_json = excluded.headers_json,
                    body = excluded.body,
                    stored_at = excluded.stored_at",
                    params![
                        &cache_name,
                        &record.request_key,
                        &record.url,
                        record.status,
                        &record.content_type,
                        &headers_json,
                        &record.body,
                        &record.stored_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Get an entry by request key.
    ///
    /// Returns None if the key doesn't exist in this namespace.
    pub async fn get(&self, request_key: &str) -> Result<Option<ResponseRecord>, Error> {
        let cache_name = self.name.clone();
        let request_key = request_key.to_string();
        self.store
            .conn
            .call(move |conn| -> Result<Option<ResponseRecord>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT request_key, url, status, content_type, headers_json, body, stored_at
                FROM entries WHERE cache_name = ?1 AND request_key = ?2",
                )?;

                let result = stmt.query_row(params![cache_name, request_key], |row| {
                    Ok(ResponseRecord {
                        request_key: row.get(0)?,
                        url: row.get(1)?,
                        status: row.get(2)?,
                        content_type: row.get(3)?,
                        headers: serde_json::from_str(&row.get::<_, String>(4)?).unwrap_or_default(),
                        body: row.get(5)?,
                        stored_at: row.get(6)?,
                    })
                });

                match result {
                    Ok(record) => Ok(Some(record)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Check whether an entry exists for the request key.
    pub async fn contains(&self, request_key: &str) -> Result<bool, Error> {
        let cache_name = self.name.clone();
        let request_key = request_key.to_string();
        self.store
            .conn
            .call(move |conn| -> Result<bool, Error> {
                let found: bool = conn
                    .query_row(
                        "SELECT EXISTS(
                    SELECT 1 FROM entries
                    WHERE cache_name = ?1 AND request_key = ?2
                )",
                        params![cache_name, request_key],
                        |row| row.get(0),
                    )
                    .map_err(Error::from)?;

                Ok(found)
            })
            .await
            .map_err(Error::from)
    }

    /// Number of entries in this namespace.
    pub async fn entry_count(&self) -> Result<u64, Error> {
        let cache_name = self.name.clone();
        self.store
            .conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM entries WHERE cache_name = ?1",
                    params![cache_name],
                    |row| row.get(0),
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
