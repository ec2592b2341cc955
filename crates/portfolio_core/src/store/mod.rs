//! Record store abstraction over named collections.
//!
//! # Responsibility
//! - Define the get/set-by-collection capability services depend on.
//! - Encode typed records to and from serialized collection payloads.
//!
//! # Invariants
//! - `write` replaces a whole collection; partial writes are never visible.
//! - A collection that was never written reads as `None`, not as empty.
//! - Stores do not validate record shape; callers are trusted.

use crate::db::DbError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryRecordStore;
pub use sqlite::SqliteRecordStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Named collection held by a record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Projects,
}

impl Collection {
    /// Stable storage key for this collection.
    pub fn key(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Projects => "projects",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Error for record store reads and writes.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Stored payload could not be decoded into records.
    InvalidData {
        collection: Collection,
        message: String,
    },
    /// Records could not be encoded for storage.
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData {
                collection,
                message,
            } => write!(f, "invalid persisted `{collection}` data: {message}"),
            Self::Encode(err) => write!(f, "failed to encode records: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData { .. } => None,
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Get/set capability over serialized collections.
///
/// Implementations only move opaque payloads; record encoding lives in the
/// provided `load`/`save` methods.
pub trait RecordStore {
    /// Reads the raw payload of one collection, `None` when never written.
    fn read(&self, collection: Collection) -> StoreResult<Option<String>>;

    /// Replaces the raw payload of one collection.
    fn write(&self, collection: Collection, payload: &str) -> StoreResult<()>;

    /// Returns whether the collection has been written at least once.
    fn contains(&self, collection: Collection) -> StoreResult<bool> {
        Ok(self.read(collection)?.is_some())
    }

    /// Loads all records of a collection in stored order.
    ///
    /// A collection that was never written loads as an empty sequence.
    fn load<T>(&self, collection: Collection) -> StoreResult<Vec<T>>
    where
        Self: Sized,
        T: DeserializeOwned,
    {
        match self.read(collection)? {
            Some(payload) => {
                serde_json::from_str(&payload).map_err(|err| StoreError::InvalidData {
                    collection,
                    message: err.to_string(),
                })
            }
            None => Ok(Vec::new()),
        }
    }

    /// Overwrites a collection with `records`, preserving their order.
    fn save<T>(&self, collection: Collection, records: &[T]) -> StoreResult<()>
    where
        Self: Sized,
        T: Serialize,
    {
        let payload = serde_json::to_string(records).map_err(StoreError::Encode)?;
        self.write(collection, &payload)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn read(&self, collection: Collection) -> StoreResult<Option<String>> {
        (**self).read(collection)
    }

    fn write(&self, collection: Collection, payload: &str) -> StoreResult<()> {
        (**self).write(collection, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::{Collection, MemoryRecordStore, RecordStore, StoreError};

    #[test]
    fn collection_keys_are_stable() {
        assert_eq!(Collection::Users.key(), "users");
        assert_eq!(Collection::Projects.to_string(), "projects");
    }

    #[test]
    fn unwritten_collection_loads_empty() {
        let store = MemoryRecordStore::new();
        let records: Vec<u32> = store.load(Collection::Users).unwrap();
        assert!(records.is_empty());
        assert!(!store.contains(Collection::Users).unwrap());
    }

    #[test]
    fn undecodable_payload_is_reported_with_collection() {
        let store = MemoryRecordStore::new();
        store.write(Collection::Projects, "{not json").unwrap();

        let err = store.load::<u32>(Collection::Projects).unwrap_err();
        match err {
            StoreError::InvalidData { collection, .. } => {
                assert_eq!(collection, Collection::Projects)
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
