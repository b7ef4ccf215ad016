//! P4RT packet replication table translation for SONiC.
//!
//! This crate maps P4Runtime packet replication engine entries (IP
//! multicast groups) to and from their APPL_DB representation, and checks
//! APPL_DB against an independently held copy of the same entries:
//!
//! - [`key_codec`]: APPL_DB key and replica field encoding
//! - [`update`]: INSERT/MODIFY/DELETE to [`TableRecord`] translation
//! - [`loader`]: reads all replication entries back out of a table
//! - [`compare`]: reports differences between two entry collections
//! - [`store`]: the [`AppDbTable`] trait with Redis and in-memory backends
//!
//! # Data flow
//!
//! ```text
//! write: PacketReplicationEntry ──> build_update ──> TableRecord ──> APPL_DB
//!
//! read:  APPL_DB ──> load_all ──┐
//!                               ├──> compare_entries ──> discrepancies
//!        P4RT cache ────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use sonic_p4rt_replication::{
//!     build_update, MulticastGroupEntry, PacketReplicationEntry, UpdateType,
//! };
//!
//! let entry: PacketReplicationEntry = MulticastGroupEntry::new(7)
//!     .with_replica("Ethernet0", 0)
//!     .with_replica("Ethernet4", 1)
//!     .into();
//! let record = build_update(&entry, UpdateType::Insert).unwrap();
//! assert_eq!(record.key, "REPLICATION_IP_MULTICAST_TABLE:0x7");
//! assert_eq!(record.get_field("Ethernet4:0x1"), Some("replica"));
//! ```

pub mod compare;
pub mod config;
pub mod error;
pub mod key_codec;
pub mod loader;
pub mod record;
pub mod snapshot;
pub mod store;
pub mod tables;
pub mod types;
pub mod update;

pub use compare::{
    compare_entries, compare_entries_labeled, reconcile, Discrepancy, Side, SourceLabels,
};
pub use config::{RedisConfig, ReplicationConfig};
pub use error::{ReplicationError, ReplicationResult, StoreError};
pub use loader::{load_all, packet_replication_keys};
pub use record::{FieldValue, Operation, TableRecord};
pub use store::{AppDbTable, MemoryTable, RedisDatabase, RedisTable};
pub use types::{
    MulticastGroupEntry, MulticastGroupId, PacketReplicationEntry, Replica, UpdateType,
};
pub use update::{append_update, build_update};
