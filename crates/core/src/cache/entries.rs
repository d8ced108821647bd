//! Entry operations within one named store.
//!
//! Entries are keyed by request identity. Only GET requests are storable and
//! a partial (206) response is refused, mirroring what a browser cache accepts.

use super::connection::CacheDb;
use super::storage::ensure_cache;
use crate::Error;
use crate::http::{Request, Response};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;
use url::Url;

/// Handle to a named store.
#[derive(Clone, Debug)]
pub struct Cache {
    db: CacheDb,
    name: String,
}

/// Summary of a stored entry, without the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CachedEntry {
    pub method: String,
    pub url: String,
    pub status: u16,
    pub body_len: usize,
    pub stored_at: String,
}

/// Row ready for insertion; built outside the database thread.
struct EntryRow {
    key_hash: String,
    method: String,
    url: String,
    status: u16,
    status_text: String,
    headers_json: String,
    body: Vec<u8>,
    response_url: Option<String>,
}

impl EntryRow {
    fn build(request: &Request, response: &Response) -> Result<Self, Error> {
        if !request.is_get() {
            return Err(Error::UnsupportedMethod(format!("{} {}", request.method, request.url)));
        }
        if response.status == 206 {
            return Err(Error::PartialResponse(request.url.to_string()));
        }

        let headers_json = serde_json::to_string(&response.headers)
            .map_err(|e| Error::InvalidInput(format!("failed to encode headers: {e}")))?;

        Ok(Self {
            key_hash: request.cache_key(),
            method: request.method.clone(),
            url: request.url.to_string(),
            status: response.status,
            status_text: response.status_text.clone(),
            headers_json,
            body: response.body.to_vec(),
            response_url: response.url.as_ref().map(Url::to_string),
        })
    }

    fn write(&self, conn: &rusqlite::Connection, cache_id: i64, stored_at: &str) -> Result<(), Error> {
        // Delete then insert so a replaced entry moves to the end of the key order.
        conn.execute(
            "DELETE FROM entries WHERE cache_id = ?1 AND key_hash = ?2",
            params![cache_id, &self.key_hash],
        )?;
        conn.execute(
            "INSERT INTO entries (
                cache_id, key_hash, method, url, status, status_text,
                headers_json, body, response_url, stored_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                cache_id,
                &self.key_hash,
                &self.method,
                &self.url,
                self.status,
                &self.status_text,
                &self.headers_json,
                &self.body,
                &self.response_url,
                stored_at,
            ],
        )?;
        Ok(())
    }
}

impl Cache {
    pub(crate) fn new(db: CacheDb, name: &str) -> Self {
        Self { db, name: name.to_string() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store a response under the request's identity, replacing any previous entry.
    pub async fn put(&self, request: &Request, response: &Response) -> Result<(), Error> {
        self.put_all(vec![(request.clone(), response.clone())]).await
    }

    /// Store a batch of responses in one transaction.
    ///
    /// Either every pair lands in the store or none does.
    pub async fn put_all(&self, pairs: Vec<(Request, Response)>) -> Result<(), Error> {
        let rows = pairs
            .iter()
            .map(|(req, resp)| EntryRow::build(req, resp))
            .collect::<Result<Vec<_>, _>>()?;
        let name = self.name.clone();
        let stored_at = chrono::Utc::now().to_rfc3339();

        self.db
            .conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                let cache_id = ensure_cache(&tx, &name)?;
                for row in &rows {
                    row.write(&tx, cache_id, &stored_at)?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Find the stored response for this exact request.
    ///
    /// Non-GET requests never match.
    pub async fn match_request(&self, request: &Request) -> Result<Option<Response>, Error> {
        if !request.is_get() {
            return Ok(None);
        }

        let name = self.name.clone();
        let key_hash = request.cache_key();
        let row = self
            .db
            .conn
            .call(move |conn| -> Result<Option<(u16, String, String, Vec<u8>, Option<String>)>, Error> {
                let result = conn.query_row(
                    "SELECT e.status, e.status_text, e.headers_json, e.body, e.response_url
                     FROM entries e JOIN caches c ON c.id = e.cache_id
                     WHERE c.name = ?1 AND e.key_hash = ?2",
                    params![name, key_hash],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
                );

                match result {
                    Ok(r) => Ok(Some(r)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        let Some((status, status_text, headers_json, body, response_url)) = row else {
            return Ok(None);
        };

        let headers: Vec<(String, String)> = serde_json::from_str(&headers_json)
            .map_err(|e| Error::InvalidInput(format!("corrupt stored headers: {e}")))?;

        Ok(Some(Response {
            status,
            status_text,
            headers,
            body: body.into(),
            url: response_url.and_then(|u| Url::parse(&u).ok()),
        }))
    }

    /// Remove the entry for this request. Returns false if nothing was stored.
    pub async fn delete(&self, request: &Request) -> Result<bool, Error> {
        let name = self.name.clone();
        let key_hash = request.cache_key();
        self.db
            .conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute(
                    "DELETE FROM entries WHERE key_hash = ?2
                     AND cache_id = (SELECT id FROM caches WHERE name = ?1)",
                    params![name, key_hash],
                )?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Stored entries in insertion order.
    pub async fn keys(&self) -> Result<Vec<CachedEntry>, Error> {
        let name = self.name.clone();
        self.db
            .conn
            .call(move |conn| -> Result<Vec<CachedEntry>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT e.method, e.url, e.status, length(e.body), e.stored_at
                     FROM entries e JOIN caches c ON c.id = e.cache_id
                     WHERE c.name = ?1 ORDER BY e.rowid ASC",
                )?;
                let entries = stmt
                    .query_map(params![name], |row| {
                        Ok(CachedEntry {
                            method: row.get(0)?,
                            url: row.get(1)?,
                            status: row.get(2)?,
                            body_len: row.get::<_, i64>(3)? as usize,
                            stored_at: row.get(4)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(entries)
            })
            .await
            .map_err(Error::from)
    }

    pub async fn len(&self) -> Result<usize, Error> {
        Ok(self.keys().await?.len())
    }
}
