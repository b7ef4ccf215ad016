//! APPL_DB table name constants for P4RT packet replication

/// P4RT table in APPL_DB that holds every P4RT-programmed entry
pub const APP_P4RT_TABLE_NAME: &str = "P4RT_TABLE";

/// Packet replication (IP multicast) sub-table inside `P4RT_TABLE`
pub const APP_P4RT_REPLICATION_IP_MULTICAST_TABLE_NAME: &str = "REPLICATION_IP_MULTICAST_TABLE";

/// Separator between table name and key in APPL_DB
pub const APPL_DB_SEPARATOR: char = ':';

/// Field names and values used in replication table entries
pub mod fields {
    /// Placeholder value stored with every replica field.
    ///
    /// The store requires each field to carry a value; it is never read back.
    pub const REPLICA_VALUE: &str = "replica";

    /// Prefix used for hex-encoded numbers in keys and fields
    pub const HEX_PREFIX: &str = "0x";
}
