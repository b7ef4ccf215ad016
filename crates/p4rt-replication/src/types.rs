//! Protocol-neutral packet replication types.
//!
//! These mirror the PDPI IR packet replication entries handed to us by the
//! P4Runtime layer. They are built once per request or per table scan and
//! never mutated afterwards.

use crate::error::{ReplicationError, ReplicationResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Multicast group identifier.
pub type MulticastGroupId = u32;

/// One output target of a multicast group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Replica {
    /// Egress port name (e.g. "Ethernet0")
    pub port: String,
    /// Replica instance, 0 when unspecified upstream
    #[serde(default)]
    pub instance: u32,
}

impl Replica {
    /// Creates a new replica.
    pub fn new(port: impl Into<String>, instance: u32) -> Self {
        Self {
            port: port.into(),
            instance,
        }
    }

    /// Identifier used in reconciliation reports: `<port>_<instance>`.
    pub fn report_id(&self) -> String {
        format!("{}_{}", self.port, self.instance)
    }
}

/// A multicast group and its replicas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MulticastGroupEntry {
    pub multicast_group_id: MulticastGroupId,
    #[serde(default)]
    pub replicas: Vec<Replica>,
}

impl MulticastGroupEntry {
    /// Creates a group with no replicas.
    pub fn new(multicast_group_id: MulticastGroupId) -> Self {
        Self {
            multicast_group_id,
            replicas: Vec::new(),
        }
    }

    /// Sets the replicas.
    pub fn with_replicas(mut self, replicas: Vec<Replica>) -> Self {
        self.replicas = replicas;
        self
    }

    /// Adds a single replica.
    pub fn with_replica(mut self, port: impl Into<String>, instance: u32) -> Self {
        self.replicas.push(Replica::new(port, instance));
        self
    }
}

/// A packet replication engine entry.
///
/// Only multicast groups exist today. Consumers that see a variant they do
/// not handle must route it elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum PacketReplicationEntry {
    /// IP multicast group entry.
    MulticastGroupEntry(MulticastGroupEntry),
}

impl PacketReplicationEntry {
    /// Returns the multicast group carried by this entry, if any.
    pub fn multicast_group_entry(&self) -> Option<&MulticastGroupEntry> {
        match self {
            PacketReplicationEntry::MulticastGroupEntry(group) => Some(group),
        }
    }
}

impl From<MulticastGroupEntry> for PacketReplicationEntry {
    fn from(group: MulticastGroupEntry) -> Self {
        PacketReplicationEntry::MulticastGroupEntry(group)
    }
}

/// P4Runtime update type.
///
/// Discriminants match `p4.v1.Update.Type` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateType {
    Unspecified = 0,
    Insert = 1,
    Modify = 2,
    Delete = 3,
}

impl UpdateType {
    /// Returns the P4Runtime name of this update type.
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateType::Unspecified => "UNSPECIFIED",
            UpdateType::Insert => "INSERT",
            UpdateType::Modify => "MODIFY",
            UpdateType::Delete => "DELETE",
        }
    }

    /// Parses a case-insensitive update type name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unspecified" => Some(UpdateType::Unspecified),
            "insert" => Some(UpdateType::Insert),
            "modify" => Some(UpdateType::Modify),
            "delete" => Some(UpdateType::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i32> for UpdateType {
    type Error = ReplicationError;

    fn try_from(value: i32) -> ReplicationResult<Self> {
        match value {
            0 => Ok(UpdateType::Unspecified),
            1 => Ok(UpdateType::Insert),
            2 => Ok(UpdateType::Modify),
            3 => Ok(UpdateType::Delete),
            other => Err(ReplicationError::invalid_argument(format!(
                "Unsupported update type: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_group_builder() {
        let group = MulticastGroupEntry::new(7)
            .with_replica("Ethernet0", 0)
            .with_replica("Ethernet4", 1);
        assert_eq!(group.multicast_group_id, 7);
        assert_eq!(
            group.replicas,
            vec![Replica::new("Ethernet0", 0), Replica::new("Ethernet4", 1)]
        );
    }

    #[test]
    fn test_report_id_uses_decimal_instance() {
        assert_eq!(Replica::new("Ethernet8", 26).report_id(), "Ethernet8_26");
    }

    #[test]
    fn test_entry_json_shape() {
        let entry: PacketReplicationEntry = MulticastGroupEntry::new(7)
            .with_replica("Ethernet0", 0)
            .into();
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "multicast_group_entry": {
                    "multicast_group_id": 7,
                    "replicas": [{"port": "Ethernet0", "instance": 0}]
                }
            })
        );
    }

    #[test]
    fn test_instance_defaults_to_zero() {
        let json = r#"{"multicast_group_entry": {"multicast_group_id": 3, "replicas": [{"port": "Ethernet12"}]}}"#;
        let entry: PacketReplicationEntry = serde_json::from_str(json).unwrap();
        let group = entry.multicast_group_entry().unwrap();
        assert_eq!(group.replicas, vec![Replica::new("Ethernet12", 0)]);
    }

    #[test]
    fn test_update_type_try_from() {
        assert_eq!(UpdateType::try_from(1).unwrap(), UpdateType::Insert);
        assert_eq!(UpdateType::try_from(3).unwrap(), UpdateType::Delete);
        let err = UpdateType::try_from(9).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_update_type_parse() {
        assert_eq!(UpdateType::parse("MODIFY"), Some(UpdateType::Modify));
        assert_eq!(UpdateType::parse("bogus"), None);
        assert_eq!(UpdateType::Delete.to_string(), "DELETE");
    }
}
