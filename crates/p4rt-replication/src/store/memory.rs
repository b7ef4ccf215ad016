//! In-memory APPL_DB table.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::{AppDbTable, StoreResult};
use crate::record::{FieldValue, Operation, TableRecord};

/// BTreeMap-backed table, used for tests and offline tooling.
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    entries: BTreeMap<String, Vec<FieldValue>>,
}

impl MemoryTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts raw field-values for a key, replacing anything already there.
    pub fn insert_raw(&mut self, key: impl Into<String>, fvs: Vec<FieldValue>) {
        self.entries.insert(key.into(), fvs);
    }

    /// Builder form of [`MemoryTable::insert_raw`].
    pub fn with_raw(mut self, key: impl Into<String>, fvs: Vec<FieldValue>) -> Self {
        self.insert_raw(key, fvs);
        self
    }

    /// Returns true if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl AppDbTable for MemoryTable {
    async fn keys(&mut self) -> StoreResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    async fn get(&mut self, key: &str) -> StoreResult<Vec<FieldValue>> {
        Ok(self.entries.get(key).cloned().unwrap_or_default())
    }

    async fn apply(&mut self, record: &TableRecord) -> StoreResult<()> {
        match record.op {
            Operation::Set => {
                self.entries.insert(record.key.clone(), record.fvs.clone());
            }
            Operation::Del => {
                self.entries.remove(&record.key);
            }
        }
        Ok(())
    }
}
