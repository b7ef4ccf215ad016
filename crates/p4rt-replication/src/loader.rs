//! Reads packet replication entries back out of APPL_DB.
//!
//! Any malformed key or field fails the whole load. There is no
//! skip-and-continue: a partially read table would make every later
//! comparison meaningless.

use tracing::debug;

use crate::error::ReplicationResult;
use crate::key_codec::{decode_replica_field, decode_table_key, is_replication_key};
use crate::store::AppDbTable;
use crate::types::{MulticastGroupEntry, PacketReplicationEntry};

/// Returns every key in `table` that belongs to the replication table.
pub async fn packet_replication_keys<T>(table: &mut T) -> ReplicationResult<Vec<String>>
where
    T: AppDbTable + ?Sized,
{
    let keys = table.keys().await?;
    Ok(keys.into_iter().filter(|k| is_replication_key(k)).collect())
}

/// Loads every packet replication entry from `table`.
///
/// Each key is one multicast group carrying all its replicas. Field values
/// are ignored.
pub async fn load_all<T>(table: &mut T) -> ReplicationResult<Vec<PacketReplicationEntry>>
where
    T: AppDbTable + ?Sized,
{
    let keys = packet_replication_keys(table).await?;
    let mut entries = Vec::with_capacity(keys.len());

    for key in keys {
        debug!("Read packet replication engine entry {} from App DB", key);
        let multicast_group_id = decode_table_key(&key)?;

        let replicas = table
            .get(&key)
            .await?
            .iter()
            .map(|(field, _)| decode_replica_field(field))
            .collect::<ReplicationResult<Vec<_>>>()?;

        entries.push(
            MulticastGroupEntry {
                multicast_group_id,
                replicas,
            }
            .into(),
        );
    }

    debug!("Loaded {} packet replication entries", entries.len());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ReplicationError, StoreError};
    use crate::record::{FieldValue, TableRecord};
    use crate::store::{MemoryTable, StoreResult};
    use crate::types::Replica;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    fn replica_fv(field: &str) -> FieldValue {
        (field.to_string(), "replica".to_string())
    }

    #[tokio::test]
    async fn test_load_groups() {
        let mut table = MemoryTable::new()
            .with_raw(
                "REPLICATION_IP_MULTICAST_TABLE:0x7",
                vec![replica_fv("Ethernet0:0x0"), replica_fv("Ethernet4:0x1")],
            )
            .with_raw("REPLICATION_IP_MULTICAST_TABLE:0x1", vec![replica_fv("Ethernet8:0x2")]);

        let entries = load_all(&mut table).await.unwrap();
        let expected: Vec<PacketReplicationEntry> = vec![
            MulticastGroupEntry::new(1).with_replica("Ethernet8", 2).into(),
            MulticastGroupEntry::new(7)
                .with_replica("Ethernet0", 0)
                .with_replica("Ethernet4", 1)
                .into(),
        ];
        assert_eq!(entries, expected);
    }

    #[tokio::test]
    async fn test_foreign_keys_ignored() {
        let mut table = MemoryTable::new()
            .with_raw("FIXED_ROUTER_INTERFACE_TABLE:{\"match/router_interface_id\":\"1\"}", vec![])
            .with_raw("WRONGTABLE:0x3", vec![replica_fv("Ethernet0:0x0")])
            .with_raw("REPLICATION_IP_MULTICAST_TABLE:0x3", vec![replica_fv("Ethernet0:0x0")]);

        let keys = packet_replication_keys(&mut table).await.unwrap();
        assert_eq!(keys, vec!["REPLICATION_IP_MULTICAST_TABLE:0x3".to_string()]);

        let entries = load_all(&mut table).await.unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_values_are_ignored() {
        let mut table = MemoryTable::new().with_raw(
            "REPLICATION_IP_MULTICAST_TABLE:0x2",
            vec![("Ethernet0:0x5".to_string(), "anything".to_string())],
        );

        let entries = load_all(&mut table).await.unwrap();
        let group = entries[0].multicast_group_entry().unwrap();
        assert_eq!(group.replicas, vec![Replica::new("Ethernet0", 5)]);
    }

    #[tokio::test]
    async fn test_group_without_replicas() {
        let mut table = MemoryTable::new().with_raw("REPLICATION_IP_MULTICAST_TABLE:0x9", vec![]);

        let entries = load_all(&mut table).await.unwrap();
        assert_eq!(entries, vec![MulticastGroupEntry::new(9).into()]);
    }

    #[tokio::test]
    async fn test_bad_group_id_fails_load() {
        let mut table = MemoryTable::new()
            .with_raw("REPLICATION_IP_MULTICAST_TABLE:0x1", vec![replica_fv("Ethernet0:0x0")])
            .with_raw("REPLICATION_IP_MULTICAST_TABLE:0xZZ", vec![replica_fv("Ethernet0:0x0")]);

        let err = load_all(&mut table).await.unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("REPLICATION_IP_MULTICAST_TABLE:0xZZ"));
    }

    #[tokio::test]
    async fn test_bad_field_fails_load() {
        let mut table = MemoryTable::new().with_raw(
            "REPLICATION_IP_MULTICAST_TABLE:0x1",
            vec![replica_fv("Ethernet0:0x0"), replica_fv("Ethernet4")],
        );

        let err = load_all(&mut table).await.unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("Ethernet4"));
    }

    #[tokio::test]
    async fn test_bad_instance_fails_load() {
        let mut table = MemoryTable::new().with_raw(
            "REPLICATION_IP_MULTICAST_TABLE:0x1",
            vec![replica_fv("Ethernet0:zero")],
        );

        assert!(load_all(&mut table).await.unwrap_err().is_invalid_input());
    }

    struct UnavailableTable;

    #[async_trait]
    impl AppDbTable for UnavailableTable {
        async fn keys(&mut self) -> StoreResult<Vec<String>> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn get(&mut self, _key: &str) -> StoreResult<Vec<FieldValue>> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn apply(&mut self, _record: &TableRecord) -> StoreResult<()> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let err = load_all(&mut UnavailableTable).await.unwrap_err();
        assert!(matches!(
            err,
            ReplicationError::Store(StoreError::Unavailable(_))
        ));
    }
}
