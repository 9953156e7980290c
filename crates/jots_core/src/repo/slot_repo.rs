//! Local key-value storage slots.
//!
//! # Responsibility
//! - Provide `localStorage`-like `get_item` / `set_item` access over string
//!   keys and string values.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - `set_item` fully overwrites the previous value of a slot.
//! - A missing slot reads as `None`, never as an error.

use crate::db::DbResult;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// String key-value storage with whole-value overwrite semantics.
///
/// Methods take `&self` so one storage can be shared between the change
/// notifier and the host that reads it back.
pub trait SlotStorage {
    fn get_item(&self, key: &str) -> DbResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> DbResult<()>;
}

impl<S: SlotStorage + ?Sized> SlotStorage for Rc<S> {
    fn get_item(&self, key: &str) -> DbResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> DbResult<()> {
        (**self).set_item(key, value)
    }
}

/// SQLite-backed slot storage.
///
/// Owns a connection returned by `open_db` / `open_db_in_memory`, so the
/// `storage_slots` table is guaranteed to exist.
pub struct SqliteSlotStorage {
    conn: Connection,
}

impl SqliteSlotStorage {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Borrow the underlying connection, mainly for diagnostics in tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl SlotStorage for SqliteSlotStorage {
    fn get_item(&self, key: &str) -> DbResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM storage_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO storage_slots (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Process-local slot storage with no durability.
#[derive(Debug, Default)]
pub struct MemorySlotStorage {
    slots: RefCell<HashMap<String, String>>,
}

impl MemorySlotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-populated with one slot.
    pub fn with_item(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.slots.borrow_mut().insert(key.into(), value.into());
        storage
    }
}

impl SlotStorage for MemorySlotStorage {
    fn get_item(&self, key: &str) -> DbResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> DbResult<()> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
