//! Process-local record store.
//!
//! Holds payloads in a map for tests and ephemeral sessions. Not shared
//! across threads.

use super::{Collection, RecordStore, StoreResult};
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory `RecordStore` implementation.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    collections: RefCell<HashMap<Collection, String>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn read(&self, collection: Collection) -> StoreResult<Option<String>> {
        Ok(self.collections.borrow().get(&collection).cloned())
    }

    fn write(&self, collection: Collection, payload: &str) -> StoreResult<()> {
        self.collections
            .borrow_mut()
            .insert(collection, payload.to_string());
        Ok(())
    }
}
