//! Encoding between replication entries and APPL_DB keys/fields.
//!
//! Key format: `REPLICATION_IP_MULTICAST_TABLE:<hex group id>`
//! Field format: `<port>:<hex instance>`
//!
//! Hex numbers are lowercase with a `0x` prefix and no padding. Port names
//! never contain `:` in practice; decoding splits on the last one anyway.

use crate::error::{ReplicationError, ReplicationResult};
use crate::tables::{fields, APPL_DB_SEPARATOR, APP_P4RT_REPLICATION_IP_MULTICAST_TABLE_NAME};
use crate::types::{MulticastGroupId, Replica};

/// Returns the key prefix shared by every replication table key.
pub fn table_prefix() -> String {
    format!(
        "{}{}",
        APP_P4RT_REPLICATION_IP_MULTICAST_TABLE_NAME, APPL_DB_SEPARATOR
    )
}

/// Returns true if `key` belongs to the replication table.
pub fn is_replication_key(key: &str) -> bool {
    key.strip_prefix(APP_P4RT_REPLICATION_IP_MULTICAST_TABLE_NAME)
        .is_some_and(|rest| rest.starts_with(APPL_DB_SEPARATOR))
}

/// Renders `value` as `0x`-prefixed lowercase hex.
pub fn to_hex(value: u32) -> String {
    format!("{}{:x}", fields::HEX_PREFIX, value)
}

/// Parses hex text with an optional `0x`/`0X` prefix.
///
/// Returns `None` for empty input, non-hex characters, or values above
/// `u32::MAX`.
pub fn parse_hex(text: &str) -> Option<u32> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Strips the replication table name from an APPL_DB key.
pub fn strip_table_name(key: &str) -> ReplicationResult<&str> {
    key.strip_prefix(APP_P4RT_REPLICATION_IP_MULTICAST_TABLE_NAME)
        .and_then(|rest| rest.strip_prefix(APPL_DB_SEPARATOR))
        .ok_or_else(|| {
            ReplicationError::invalid_input(format!(
                "Invalid packet replication App DB key {}",
                key
            ))
        })
}

/// Builds the APPL_DB key for a multicast group.
pub fn encode_table_key(group_id: MulticastGroupId) -> String {
    format!("{}{}", table_prefix(), to_hex(group_id))
}

/// Decodes the multicast group id from an APPL_DB key.
pub fn decode_table_key(key: &str) -> ReplicationResult<MulticastGroupId> {
    let group_id = strip_table_name(key)?;
    parse_hex(group_id).ok_or_else(|| {
        ReplicationError::invalid_input(format!(
            "Failed to parse multicast_group_id from App DB packet replication entry key '{}'",
            key
        ))
    })
}

/// Builds the field name for a replica.
///
/// Neither port nor instance is unique on its own within a group, so the
/// pair is the field name.
pub fn encode_replica_field(replica: &Replica) -> String {
    format!(
        "{}{}{}",
        replica.port,
        APPL_DB_SEPARATOR,
        to_hex(replica.instance)
    )
}

/// Decodes a replica from its field name.
pub fn decode_replica_field(field: &str) -> ReplicationResult<Replica> {
    let (port, instance) = field.rsplit_once(APPL_DB_SEPARATOR).ok_or_else(|| {
        ReplicationError::invalid_input(format!(
            "Unexpected multicast port/instance format '{}' for APP DB packet replication",
            field
        ))
    })?;

    let instance = parse_hex(instance).ok_or_else(|| {
        ReplicationError::invalid_input(format!(
            "Unexpected replica instance value '{}' for APP DB packet replication",
            instance
        ))
    })?;

    Ok(Replica::new(port, instance))
}
