//! SQLite-backed storage implementation.
//!
//! Uses `rusqlite` (with bundled SQLite) wrapped in an `Arc<Mutex<Connection>>`
//! to satisfy the `Send + Sync` requirements. All blocking calls are offloaded
//! to a thread-pool via `tokio::task::spawn_blocking`.
//!
//! # Schema
//!
//! - `resources` — one row per registered resource; `resource_scopes` holds a
//!   JSON array of strings.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode};

use super::{ResourceRecord, Storage, StorageError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS resources (
    resource_id        TEXT PRIMARY KEY,
    resource_type      TEXT NOT NULL,
    parent_resource_id TEXT,
    resource_scopes    TEXT NOT NULL DEFAULT '[]'
);
CREATE INDEX IF NOT EXISTS idx_resources_parent ON resources(parent_resource_id);
";

/// SQLite-backed implementation of [`Storage`].
///
/// Holds a single database connection protected by a `Mutex`. All operations
/// run inside `spawn_blocking` to avoid blocking the async runtime.
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    /// Open (or create) the SQLite database at `path` and apply the schema.
    pub fn open(path: &str) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database (data is lost when dropped).
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking thread-pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StorageError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = lock(&conn)?;
            f(&*guard)
        })
        .await
        .map_err(|e| StorageError::Internal(format!("task join error: {e}")))?
    }
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, StorageError> {
    conn.lock()
        .map_err(|_| StorageError::Internal("connection mutex poisoned".into()))
}

// ---------------------------------------------------------------------------
// Error conversions
// ---------------------------------------------------------------------------

fn map_err(e: rusqlite::Error) -> StorageError {
    StorageError::Internal(e.to_string())
}

fn map_json_err(e: serde_json::Error) -> StorageError {
    StorageError::Internal(format!("JSON error: {e}"))
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation
    )
}

fn fetch(conn: &Connection, id: &str) -> Result<Option<ResourceRecord>, StorageError> {
    let result = conn.query_row(
        "SELECT resource_id, resource_type, parent_resource_id, resource_scopes
         FROM resources WHERE resource_id = ?1",
        params![id],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
            ))
        },
    );
    match result {
        Ok((resource_id, resource_type, parent_resource_id, scopes)) => Ok(Some(ResourceRecord {
            resource_id,
            resource_type,
            parent_resource_id,
            resource_scopes: serde_json::from_str(&scopes).map_err(map_json_err)?,
        })),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(map_err(e)),
    }
}

// ---------------------------------------------------------------------------
// Storage impl
// ---------------------------------------------------------------------------

#[async_trait]
impl Storage for SqliteStorage {
    async fn put_resource(&self, resource: &ResourceRecord) -> Result<(), StorageError> {
        let resource = resource.clone();
        let scopes = serde_json::to_string(&resource.resource_scopes).map_err(map_json_err)?;

        self.with_conn(move |conn| {
            // Parent lookup and insert share one transaction; the connection
            // mutex serialises them against deletes.
            let tx = conn.unchecked_transaction().map_err(map_err)?;
            let parent = match resource.parent_resource_id.as_deref() {
                Some(parent_id) => fetch(&tx, parent_id)?,
                None => None,
            };
            resource.check_parent(parent.as_ref())?;

            tx.execute(
                "INSERT INTO resources (resource_id, resource_type, parent_resource_id, resource_scopes)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    resource.resource_id,
                    resource.resource_type,
                    resource.parent_resource_id,
                    scopes,
                ],
            )
            .map_err(|e| {
                if is_constraint_violation(&e) {
                    StorageError::Conflict(format!(
                        "resource {} already exists",
                        resource.resource_id
                    ))
                } else {
                    map_err(e)
                }
            })?;
            tx.commit().map_err(map_err)
        })
        .await
    }

    async fn get_resource(&self, id: &str) -> Result<Option<ResourceRecord>, StorageError> {
        let id = id.to_string();
        self.with_conn(move |conn| fetch(conn, &id)).await
    }

    async fn delete_resource(&self, id: &str) -> Result<(), StorageError> {
        let id = id.to_string();

        self.with_conn(move |conn| {
            let removed = conn
                .execute("DELETE FROM resources WHERE resource_id = ?1", params![id])
                .map_err(map_err)?;
            if removed == 0 {
                return Err(StorageError::NotFound);
            }
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStorage {
        SqliteStorage::open_in_memory().unwrap()
    }

    #[tokio::test]
    async fn put_and_get_round_trips_all_columns() {
        let s = store();
        s.put_resource(&ResourceRecord::new("root", "area")).await.unwrap();
        let r = ResourceRecord {
            resource_id: "r1".into(),
            resource_type: "area".into(),
            parent_resource_id: Some("root".into()),
            resource_scopes: vec!["view".into(), "manage".into()],
        };
        s.put_resource(&r).await.unwrap();
        assert_eq!(s.get_resource("r1").await.unwrap(), Some(r));
    }

    #[tokio::test]
    async fn duplicate_id_conflicts() {
        let s = store();
        s.put_resource(&ResourceRecord::new("r1", "area")).await.unwrap();
        let err = s
            .put_resource(&ResourceRecord::new("r1", "area"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));
    }

    #[tokio::test]
    async fn put_rejects_missing_or_mismatched_parent() {
        let s = store();
        let mut orphan = ResourceRecord::new("child", "area");
        orphan.parent_resource_id = Some("ghost".into());
        assert!(matches!(
            s.put_resource(&orphan).await,
            Err(StorageError::ParentNotFound(id)) if id == "ghost"
        ));
        assert!(s.get_resource("child").await.unwrap().is_none());

        s.put_resource(&ResourceRecord::new("space-1", "space")).await.unwrap();
        let mut mismatched = ResourceRecord::new("child", "area");
        mismatched.parent_resource_id = Some("space-1".into());
        assert!(matches!(
            s.put_resource(&mismatched).await,
            Err(StorageError::ParentTypeMismatch { .. })
        ));
        assert!(s.get_resource("child").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_then_get_is_none() {
        let s = store();
        s.put_resource(&ResourceRecord::new("r1", "area")).await.unwrap();
        s.delete_resource("r1").await.unwrap();
        assert!(s.get_resource("r1").await.unwrap().is_none());
        assert!(matches!(
            s.delete_resource("r1").await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn reopening_a_file_keeps_data() {
        let path = std::env::temp_dir().join(format!(
            "resource-registry-test-{}.db",
            std::process::id()
        ));
        let path_str = path.to_str().unwrap().to_string();
        let _ = std::fs::remove_file(&path);

        {
            let s = SqliteStorage::open(&path_str).unwrap();
            s.put_resource(&ResourceRecord::new("durable", "area"))
                .await
                .unwrap();
        }
        let s = SqliteStorage::open(&path_str).unwrap();
        assert!(s.get_resource("durable").await.unwrap().is_some());

        drop(s);
        let _ = std::fs::remove_file(&path);
    }
}
