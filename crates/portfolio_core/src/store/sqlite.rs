//! SQLite-backed record store.
//!
//! # Responsibility
//! - Persist each collection payload as one row of the `collections` table.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - Every write is a single UPSERT statement, so readers never observe a
//!   partially written collection.
//! - The connection must come from `db::open_db*` so migrations are applied.

use super::{Collection, RecordStore, StoreResult};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

/// `RecordStore` over a migrated SQLite connection.
pub struct SqliteRecordStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn read(&self, collection: Collection) -> StoreResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM collections WHERE name = ?1;",
                [collection.key()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn write(&self, collection: Collection, payload: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO collections (name, payload)
             VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET
                payload = excluded.payload,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![collection.key(), payload],
        )?;
        debug!(
            "event=collection_write module=store status=ok collection={} bytes={}",
            collection.key(),
            payload.len()
        );
        Ok(())
    }
}
