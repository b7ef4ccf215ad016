//! APPL_DB update generation for packet replication entries.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{ReplicationError, ReplicationResult};
use crate::key_codec::{encode_replica_field, encode_table_key};
use crate::record::TableRecord;
use crate::tables::fields;
use crate::types::{MulticastGroupEntry, PacketReplicationEntry, UpdateType};

/// Builds the APPL_DB record for a packet replication update.
///
/// INSERT and MODIFY produce the same SET record carrying the group's full
/// replica set; orchagent resolves the difference against what it already
/// programmed. DELETE produces a DEL record with no fields.
pub fn build_update(
    entry: &PacketReplicationEntry,
    update_type: UpdateType,
) -> ReplicationResult<TableRecord> {
    debug!(
        update_type = %update_type,
        entry = ?entry,
        "PDPI IR packet replication entry"
    );

    let group = match entry {
        PacketReplicationEntry::MulticastGroupEntry(group) => group,
    };

    match update_type {
        UpdateType::Insert | UpdateType::Modify => Ok(build_set(group)),
        UpdateType::Delete => Ok(TableRecord::del(encode_table_key(group.multicast_group_id))),
        UpdateType::Unspecified => Err(ReplicationError::invalid_argument(format!(
            "Unsupported update type: {}",
            update_type
        ))),
    }
}

/// Builds an update, appends it to `updates`, and returns its key.
pub fn append_update(
    entry: &PacketReplicationEntry,
    update_type: UpdateType,
    updates: &mut Vec<TableRecord>,
) -> ReplicationResult<String> {
    let record = build_update(entry, update_type)?;
    let key = record.key.clone();
    updates.push(record);
    Ok(key)
}

fn build_set(group: &MulticastGroupEntry) -> TableRecord {
    let mut seen = HashSet::with_capacity(group.replicas.len());
    let fvs = group
        .replicas
        .iter()
        .map(encode_replica_field)
        // A repeated (port, instance) pair maps to the same field; keep one.
        .filter(|field| seen.insert(field.clone()))
        .map(|field| (field, fields::REPLICA_VALUE.to_string()))
        .collect();

    TableRecord::set(encode_table_key(group.multicast_group_id), fvs)
}
