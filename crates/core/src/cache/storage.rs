//! Named store operations.
//!
//! Several named stores coexist in one database. Names are listed in the
//! order the stores were created; deleting a store cascades to its entries.

use super::connection::CacheDb;
use super::entries::Cache;
use crate::Error;
use tokio_rusqlite::params;

impl CacheDb {
    /// Handle to the named store without creating it.
    ///
    /// Reads against a store that does not exist miss; the first write creates it.
    pub fn cache(&self, name: &str) -> Cache {
        Cache::new(self.clone(), name)
    }

    /// Open the named store, creating it if absent.
    pub async fn open_cache(&self, name: &str) -> Result<Cache, Error> {
        let owned = name.to_string();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                ensure_cache(conn, &owned)?;
                Ok(())
            })
            .await
            .map_err(Error::from)?;
        Ok(self.cache(name))
    }

    /// Whether a store with this name exists.
    pub async fn has_cache(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let exists: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM caches WHERE name = ?1)",
                    params![name],
                    |row| row.get(0),
                )?;
                Ok(exists)
            })
            .await
            .map_err(Error::from)
    }

    /// All store names in creation order.
    pub async fn cache_names(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM caches ORDER BY id ASC")?;
                let names = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete the named store and everything in it.
    ///
    /// Returns false if no such store existed.
    pub async fn delete_cache(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM caches WHERE name = ?1", params![name])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }
}

/// Insert the store row if missing and return its id.
pub(crate) fn ensure_cache(conn: &tokio_rusqlite::rusqlite::Connection, name: &str) -> Result<i64, Error> {
    conn.execute(
        "INSERT OR IGNORE INTO caches (name, created_at) VALUES (?1, ?2)",
        params![name, chrono::Utc::now().to_rfc3339()],
    )?;
    let id = conn.query_row("SELECT id FROM caches WHERE name = ?1", params![name], |row| row.get(0))?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_once() {
        let db = CacheDb::open_in_memory().await.unwrap();
        assert!(!db.has_cache("v1").await.unwrap());

        db.open_cache("v1").await.unwrap();
        db.open_cache("v1").await.unwrap();

        assert!(db.has_cache("v1").await.unwrap());
        assert_eq!(db.cache_names().await.unwrap(), vec!["v1".to_string()]);
    }

    #[tokio::test]
    async fn test_handle_does_not_create() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let _cache = db.cache("ghost");
        assert!(!db.has_cache("ghost").await.unwrap());
    }

    #[tokio::test]
    async fn test_names_in_creation_order() {
        let db = CacheDb::open_in_memory().await.unwrap();
        for name in ["v2", "v1", "v3"] {
            db.open_cache(name).await.unwrap();
        }
        assert_eq!(db.cache_names().await.unwrap(), vec!["v2", "v1", "v3"]);
    }

    #[tokio::test]
    async fn test_delete_cache() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.open_cache("v1").await.unwrap();

        assert!(db.delete_cache("v1").await.unwrap());
        assert!(!db.delete_cache("v1").await.unwrap());
        assert!(db.cache_names().await.unwrap().is_empty());
    }
}
