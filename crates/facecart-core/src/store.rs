//! Local order repository.
//!
//! Orders are kept as a key-value pair per identity: key `order_<name>`,
//! value the JSON-serialized [`Order`]. A second table queues face
//! registrations that failed after their order was already written.

use crate::types::{Identity, Order, UnsyncedRegistration};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("corrupt record {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("serialize: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("bad timestamp {0:?}")]
    BadTimestamp(String),
    #[error("cannot create store directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("store lock poisoned")]
    Poisoned,
}

/// Persistence for orders and pending registrations, keyed by identity.
pub trait OrderStore: Send + Sync {
    /// The stored order for `name`, if one was ever written.
    fn load(&self, name: &Identity) -> Result<Option<Order>, StoreError>;

    /// Write `order` under `name`'s key, replacing any previous record.
    fn save(&self, name: &Identity, order: &Order) -> Result<(), StoreError>;

    /// Queue a registration for later replay. One entry per identity; a
    /// newer entry replaces an older one.
    fn queue_registration(&self, pending: &UnsyncedRegistration) -> Result<(), StoreError>;

    /// Queued registrations, oldest first.
    fn unsynced(&self) -> Result<Vec<UnsyncedRegistration>, StoreError>;

    /// Drop the queued registration for `name`.
    fn mark_synced(&self, name: &Identity) -> Result<(), StoreError>;
}

fn decode_order(key: &str, raw: &str) -> Result<Order, StoreError> {
    serde_json::from_str(raw).map_err(|source| StoreError::Corrupt {
        key: key.to_string(),
        source,
    })
}

/// In-process store; contents vanish with the process.
#[derive(Default)]
pub struct MemoryOrderStore {
    orders: Mutex<HashMap<String, String>>,
    pending: Mutex<Vec<UnsyncedRegistration>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw persisted value for `key`, as it would appear on disk.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.orders.lock().ok()?.get(key).cloned()
    }

    /// Number of order records.
    pub fn len(&self) -> usize {
        self.orders.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OrderStore for MemoryOrderStore {
    fn load(&self, name: &Identity) -> Result<Option<Order>, StoreError> {
        let key = name.order_key();
        let orders = self.orders.lock().map_err(|_| StoreError::Poisoned)?;
        orders.get(&key).map(|raw| decode_order(&key, raw)).transpose()
    }

    fn save(&self, name: &Identity, order: &Order) -> Result<(), StoreError> {
        let raw = serde_json::to_string(order)?;
        let mut orders = self.orders.lock().map_err(|_| StoreError::Poisoned)?;
        orders.insert(name.order_key(), raw);
        Ok(())
    }

    fn queue_registration(&self, pending: &UnsyncedRegistration) -> Result<(), StoreError> {
        let mut queue = self.pending.lock().map_err(|_| StoreError::Poisoned)?;
        queue.retain(|p| p.name != pending.name);
        queue.push(pending.clone());
        Ok(())
    }

    fn unsynced(&self) -> Result<Vec<UnsyncedRegistration>, StoreError> {
        let queue = self.pending.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(queue.clone())
    }

    fn mark_synced(&self, name: &Identity) -> Result<(), StoreError> {
        let mut queue = self.pending.lock().map_err(|_| StoreError::Poisoned)?;
        queue.retain(|p| &p.name != name);
        Ok(())
    }
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS kv (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS pending_registrations (
    name      TEXT PRIMARY KEY,
    face_img  TEXT NOT NULL,
    order_id  TEXT NOT NULL,
    queued_at TEXT NOT NULL
);
";

/// SQLite-backed store. A single connection behind a mutex; there is only
/// ever one writer.
pub struct SqliteOrderStore {
    conn: Mutex<Connection>,
}

impl SqliteOrderStore {
    /// Open (or create) the database at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        tracing::debug!(path = %path.display(), "order store opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl OrderStore for SqliteOrderStore {
    fn load(&self, name: &Identity) -> Result<Option<Order>, StoreError> {
        let key = name.order_key();
        let raw: Option<String> = self
            .conn()?
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        raw.map(|raw| decode_order(&key, &raw)).transpose()
    }

    fn save(&self, name: &Identity, order: &Order) -> Result<(), StoreError> {
        let raw = serde_json::to_string(order)?;
        self.conn()?.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![name.order_key(), raw],
        )?;
        tracing::debug!(name = %name, order_id = %order.id, "order saved");
        Ok(())
    }

    fn queue_registration(&self, pending: &UnsyncedRegistration) -> Result<(), StoreError> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO pending_registrations (name, face_img, order_id, queued_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                pending.name.as_str(),
                pending.face_img,
                pending.order_id,
                pending.queued_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn unsynced(&self) -> Result<Vec<UnsyncedRegistration>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT name, face_img, order_id, queued_at
             FROM pending_registrations ORDER BY queued_at, name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (name, face_img, order_id, queued_at) = row?;
            let queued_at = DateTime::parse_from_rfc3339(&queued_at)
                .map_err(|_| StoreError::BadTimestamp(queued_at.clone()))?
                .with_timezone(&Utc);
            out.push(UnsyncedRegistration {
                name: Identity::new(name),
                face_img,
                order_id,
                queued_at,
            });
        }
        Ok(out)
    }

    fn mark_synced(&self, name: &Identity) -> Result<(), StoreError> {
        self.conn()?.execute(
            "DELETE FROM pending_registrations WHERE name = ?1",
            params![name.as_str()],
        )?;
        Ok(())
    }
}
