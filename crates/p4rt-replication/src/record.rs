//! Key/operation/field-values records exchanged with APPL_DB.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Table operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    /// Upsert; the record's fields replace every field stored for the key
    Set,
    /// Remove the key
    Del,
}

impl Operation {
    /// Returns true if this is a Set operation.
    pub fn is_set(&self) -> bool {
        matches!(self, Operation::Set)
    }

    /// Returns true if this is a Del operation.
    pub fn is_del(&self) -> bool {
        matches!(self, Operation::Del)
    }

    /// Returns the APPL_DB operation string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Set => "SET",
            Operation::Del => "DEL",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field-value pair from an APPL_DB hash entry.
pub type FieldValue = (String, String);

/// A single table mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    /// Table key, e.g. "REPLICATION_IP_MULTICAST_TABLE:0x7"
    pub key: String,
    pub op: Operation,
    /// Ordered field-value pairs (empty for Del)
    pub fvs: Vec<FieldValue>,
}

impl TableRecord {
    /// Creates a new record.
    pub fn new(key: impl Into<String>, op: Operation, fvs: Vec<FieldValue>) -> Self {
        Self {
            key: key.into(),
            op,
            fvs,
        }
    }

    /// Creates a Set record.
    pub fn set(key: impl Into<String>, fvs: Vec<FieldValue>) -> Self {
        Self::new(key, Operation::Set, fvs)
    }

    /// Creates a Del record.
    pub fn del(key: impl Into<String>) -> Self {
        Self::new(key, Operation::Del, vec![])
    }

    /// Returns the value for a field, if present.
    pub fn get_field(&self, field: &str) -> Option<&str> {
        self.fvs
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if this record has the given field.
    pub fn has_field(&self, field: &str) -> bool {
        self.fvs.iter().any(|(f, _)| f == field)
    }
}

impl fmt::Display for TableRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {:?}", self.key, self.op, self.fvs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_record() {
        let record = TableRecord::set(
            "REPLICATION_IP_MULTICAST_TABLE:0x1",
            vec![("Ethernet0:0x0".to_string(), "replica".to_string())],
        );

        assert!(record.op.is_set());
        assert_eq!(record.get_field("Ethernet0:0x0"), Some("replica"));
        assert!(record.has_field("Ethernet0:0x0"));
        assert!(!record.has_field("Ethernet4:0x0"));
    }

    #[test]
    fn test_del_record() {
        let record = TableRecord::del("REPLICATION_IP_MULTICAST_TABLE:0x1");
        assert!(record.op.is_del());
        assert!(record.fvs.is_empty());
        assert_eq!(
            record.to_string(),
            "REPLICATION_IP_MULTICAST_TABLE:0x1: DEL []"
        );
    }
}
