//! APPL_DB table access.
//!
//! The loader and the CLI only need three primitives from the database:
//! enumerate keys, read a key's fields, and apply a [`TableRecord`]. The
//! [`AppDbTable`] trait captures exactly that so the translation logic can
//! run against Redis in production and an in-memory table in tests.

mod memory;
mod redis_backend;

pub use self::memory::MemoryTable;
pub use self::redis_backend::{RedisDatabase, RedisTable};

use async_trait::async_trait;

use crate::error::StoreError;
use crate::record::{FieldValue, TableRecord};

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Keyed access to one APPL_DB table.
///
/// Keys are relative to the table (e.g. `REPLICATION_IP_MULTICAST_TABLE:0x7`
/// inside `P4RT_TABLE`).
#[async_trait]
pub trait AppDbTable: Send {
    /// Returns every key currently in the table.
    async fn keys(&mut self) -> StoreResult<Vec<String>>;

    /// Returns the field-value pairs for a key (empty if the key is absent).
    async fn get(&mut self, key: &str) -> StoreResult<Vec<FieldValue>>;

    /// Applies a mutation. SET replaces the full field set of the key.
    async fn apply(&mut self, record: &TableRecord) -> StoreResult<()>;

    /// Applies a batch of mutations in order, stopping at the first failure.
    async fn apply_all(&mut self, records: &[TableRecord]) -> StoreResult<()> {
        for record in records {
            self.apply(record).await?;
        }
        Ok(())
    }
}
