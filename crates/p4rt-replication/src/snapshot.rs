//! JSON snapshots of packet replication entries.
//!
//! A snapshot is a JSON array of IR entries, e.g. a dump of the P4RT
//! cache or a list of entries to program:
//!
//! ```json
//! [
//!   {"multicast_group_entry": {"multicast_group_id": 7,
//!     "replicas": [{"port": "Ethernet0", "instance": 0}]}}
//! ]
//! ```

use std::fs;
use std::path::Path;

use crate::error::{ReplicationError, ReplicationResult};
use crate::types::PacketReplicationEntry;

/// Parses a snapshot from JSON text.
pub fn parse_snapshot(json: &str) -> ReplicationResult<Vec<PacketReplicationEntry>> {
    serde_json::from_str(json).map_err(|e| ReplicationError::Snapshot(e.to_string()))
}

/// Renders entries as pretty-printed JSON.
pub fn render_snapshot(entries: &[PacketReplicationEntry]) -> ReplicationResult<String> {
    serde_json::to_string_pretty(entries).map_err(|e| ReplicationError::Snapshot(e.to_string()))
}

/// Reads a snapshot file.
pub fn read_snapshot(path: impl AsRef<Path>) -> ReplicationResult<Vec<PacketReplicationEntry>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        ReplicationError::Snapshot(format!("Failed to read {}: {}", path.display(), e))
    })?;
    parse_snapshot(&text)
}

/// Writes entries to a snapshot file, replacing its contents.
pub fn write_snapshot(
    path: impl AsRef<Path>,
    entries: &[PacketReplicationEntry],
) -> ReplicationResult<()> {
    let path = path.as_ref();
    fs::write(path, render_snapshot(entries)?).map_err(|e| {
        ReplicationError::Snapshot(format!("Failed to write {}: {}", path.display(), e))
    })
}
