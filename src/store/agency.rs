// SQLite-backed agency store.
// Upserts agency records and publishes a live snapshot of the table after every write.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, params};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::api::Agency;
use crate::error::StoreError;

/// Current schema version, stored in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i32 = 1;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS agency (
    id TEXT NOT NULL PRIMARY KEY,
    name TEXT NOT NULL
);";

pub type Result<T> = std::result::Result<T, StoreError>;

/// Shared handle to the agency table.
///
/// Clones share one connection and one snapshot channel. Every successful
/// [`AgencyStore::upsert`] publishes exactly one new snapshot.
#[derive(Clone)]
pub struct AgencyStore {
    inner: Arc<Inner>,
}

struct Inner {
    conn: Mutex<Connection>,
    snapshots: watch::Sender<Vec<Agency>>,
}

impl AgencyStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "opened agency database");
        Self::from_connection(conn)
    }

    /// Open a private in-memory database.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        apply_schema(&conn)?;
        let initial = query_all(&conn)?;
        let (snapshots, _) = watch::channel(initial);

        Ok(Self {
            inner: Arc::new(Inner {
                conn: Mutex::new(conn),
                snapshots,
            }),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.inner.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Insert the agency, or overwrite its name if the id already exists.
    pub fn upsert(&self, id: &str, name: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO agency (id, name) VALUES (?1, ?2)",
            params![id, name],
        )?;

        // Publish while still holding the lock so snapshots follow write order
        let snapshot = query_all(&conn)?;
        debug!(id, name, total = snapshot.len(), "upserted agency");
        self.inner.snapshots.send_replace(snapshot);
        Ok(())
    }

    /// Upsert each agency in order on the blocking pool.
    ///
    /// Every row is its own blocking call, so aborting the calling task stops
    /// before the next row. There is no transaction: a failure or abort
    /// part-way leaves earlier rows written.
    pub async fn upsert_all(&self, agencies: Vec<Agency>) -> Result<usize> {
        let count = agencies.len();
        for agency in agencies {
            let store = self.clone();
            tokio::task::spawn_blocking(move || store.upsert(&agency.id, &agency.name))
                .await
                .map_err(|e| StoreError::Worker(e.to_string()))??;
        }
        Ok(count)
    }

    /// Current contents of the table, ordered by id.
    pub fn select_all(&self) -> Result<Vec<Agency>> {
        let conn = self.lock()?;
        Ok(query_all(&conn)?)
    }

    /// Subscribe to live snapshots of the whole table.
    pub fn observe_all(&self) -> AgencyFeed {
        AgencyFeed {
            rx: self.inner.snapshots.subscribe(),
            primed: false,
        }
    }
}

/// Live feed of full-table snapshots.
///
/// The first [`AgencyFeed::next`] returns the current snapshot without
/// waiting. Later calls wait for the next write. Snapshots a slow reader
/// missed coalesce into the latest one.
pub struct AgencyFeed {
    rx: watch::Receiver<Vec<Agency>>,
    primed: bool,
}

impl AgencyFeed {
    /// Wait for the next snapshot. Returns `None` once every store handle is gone.
    pub async fn next(&mut self) -> Option<Vec<Agency>> {
        if !self.primed {
            self.primed = true;
            return Some(self.rx.borrow_and_update().clone());
        }

        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

fn apply_schema(conn: &Connection) -> Result<()> {
    let found: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if found > SCHEMA_VERSION {
        return Err(StoreError::UnsupportedSchema {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    conn.execute_batch(SCHEMA)?;
    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}

fn query_all(conn: &Connection) -> rusqlite::Result<Vec<Agency>> {
    let mut stmt = conn.prepare_cached("SELECT id, name FROM agency ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok(Agency {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;
    rows.collect()
}
