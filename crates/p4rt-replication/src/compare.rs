//! Reconciliation of two packet replication entry collections.
//!
//! Used to check APPL_DB against the P4RT cache. Groups are matched by
//! multicast group id and replicas by `<port>_<instance>`. Output order is
//! deterministic:
//!
//! 1. groups of side A in ascending id order; for each, either a missing
//!    group message or its replica differences (missing from B first, then
//!    missing from A, each sorted by replica id)
//! 2. groups only present on side B, ascending
//!
//! If a group id appears more than once on one side the last occurrence
//! wins. Callers that care must check uniqueness first.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::types::{MulticastGroupEntry, MulticastGroupId, PacketReplicationEntry};

/// One side of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

/// Names used for each side in rendered messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLabels {
    pub a: String,
    pub b: String,
}

impl Default for SourceLabels {
    fn default() -> Self {
        Self::new("A", "B")
    }
}

impl SourceLabels {
    /// Creates labels for sides A and B.
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }

    /// Labels for an APPL_DB (A) versus P4RT cache (B) check.
    pub fn app_db_and_cache() -> Self {
        Self::new("APP DB", "Packet replication cache")
    }

    /// Returns the label for `side`.
    pub fn label(&self, side: Side) -> &str {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }
}

/// A single difference between the two sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discrepancy {
    /// A multicast group exists on one side only.
    MissingGroup {
        missing_from: Side,
        multicast_group_id: MulticastGroupId,
    },
    /// A group exists on both sides but a replica exists on one side only.
    MissingReplica {
        missing_from: Side,
        multicast_group_id: MulticastGroupId,
        /// `<port>_<instance>`
        replica: String,
    },
}

impl Discrepancy {
    /// Returns the side the entity is missing from.
    pub fn missing_from(&self) -> Side {
        match self {
            Discrepancy::MissingGroup { missing_from, .. }
            | Discrepancy::MissingReplica { missing_from, .. } => *missing_from,
        }
    }

    /// Returns the multicast group the discrepancy concerns.
    pub fn multicast_group_id(&self) -> MulticastGroupId {
        match self {
            Discrepancy::MissingGroup {
                multicast_group_id, ..
            }
            | Discrepancy::MissingReplica {
                multicast_group_id, ..
            } => *multicast_group_id,
        }
    }

    /// Renders the discrepancy using `labels` for the side names.
    pub fn describe(&self, labels: &SourceLabels) -> String {
        match self {
            Discrepancy::MissingGroup {
                missing_from,
                multicast_group_id,
            } => format!(
                "{} is missing multicast group {}",
                labels.label(*missing_from),
                multicast_group_id
            ),
            Discrepancy::MissingReplica {
                missing_from,
                multicast_group_id,
                replica,
            } => format!(
                "{} is missing replica {} for group {}",
                labels.label(*missing_from),
                replica,
                multicast_group_id
            ),
        }
    }
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(&SourceLabels::default()))
    }
}

fn index_groups(
    entries: &[PacketReplicationEntry],
) -> BTreeMap<MulticastGroupId, &MulticastGroupEntry> {
    entries
        .iter()
        .filter_map(PacketReplicationEntry::multicast_group_entry)
        .map(|group| (group.multicast_group_id, group))
        .collect()
}

fn replica_ids(group: &MulticastGroupEntry) -> BTreeSet<String> {
    group.replicas.iter().map(|r| r.report_id()).collect()
}

fn compare_replicas(
    group_a: &MulticastGroupEntry,
    group_b: &MulticastGroupEntry,
    discrepancies: &mut Vec<Discrepancy>,
) {
    // Caller guarantees both groups share the same id.
    let multicast_group_id = group_a.multicast_group_id;
    let ids_a = replica_ids(group_a);
    let ids_b = replica_ids(group_b);

    for replica in ids_a.difference(&ids_b) {
        discrepancies.push(Discrepancy::MissingReplica {
            missing_from: Side::B,
            multicast_group_id,
            replica: replica.clone(),
        });
    }

    for replica in ids_b.difference(&ids_a) {
        discrepancies.push(Discrepancy::MissingReplica {
            missing_from: Side::A,
            multicast_group_id,
            replica: replica.clone(),
        });
    }
}

/// Compares two entry collections and returns every difference.
///
/// Never fails; an empty result means both sides agree.
pub fn reconcile(
    entries_a: &[PacketReplicationEntry],
    entries_b: &[PacketReplicationEntry],
) -> Vec<Discrepancy> {
    let map_a = index_groups(entries_a);
    let map_b = index_groups(entries_b);
    let mut discrepancies = Vec::new();

    for (id, group_a) in &map_a {
        match map_b.get(id) {
            Some(group_b) => compare_replicas(group_a, group_b, &mut discrepancies),
            None => discrepancies.push(Discrepancy::MissingGroup {
                missing_from: Side::B,
                multicast_group_id: *id,
            }),
        }
    }

    // Groups present on both sides were already compared above.
    for id in map_b.keys().filter(|id| !map_a.contains_key(*id)) {
        discrepancies.push(Discrepancy::MissingGroup {
            missing_from: Side::A,
            multicast_group_id: *id,
        });
    }

    discrepancies
}

/// Compares two entry collections and renders one message per difference,
/// naming the sides "A" and "B".
pub fn compare_entries(
    entries_a: &[PacketReplicationEntry],
    entries_b: &[PacketReplicationEntry],
) -> Vec<String> {
    compare_entries_labeled(entries_a, entries_b, &SourceLabels::default())
}

/// Like [`compare_entries`] with caller-chosen side names.
pub fn compare_entries_labeled(
    entries_a: &[PacketReplicationEntry],
    entries_b: &[PacketReplicationEntry],
    labels: &SourceLabels,
) -> Vec<String> {
    reconcile(entries_a, entries_b)
        .iter()
        .map(|d| d.describe(labels))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn group(id: MulticastGroupId, replicas: &[(&str, u32)]) -> PacketReplicationEntry {
        replicas
            .iter()
            .fold(MulticastGroupEntry::new(id), |g, (port, instance)| {
                g.with_replica(*port, *instance)
            })
            .into()
    }

    #[test]
    fn test_identical_inputs_agree() {
        let entries = vec![
            group(1, &[("Ethernet0", 0), ("Ethernet4", 1)]),
            group(2, &[]),
        ];
        assert!(compare_entries(&entries, &entries).is_empty());
    }

    #[test]
    fn test_replica_order_does_not_matter() {
        let a = vec![group(1, &[("Ethernet0", 0), ("Ethernet4", 1)])];
        let b = vec![group(1, &[("Ethernet4", 1), ("Ethernet0", 0)])];
        assert!(compare_entries(&a, &b).is_empty());
    }

    #[test]
    fn test_missing_replica_both_ways() {
        let a = vec![group(5, &[("Ethernet0", 0)])];
        let b = vec![group(5, &[("Ethernet1", 0)])];

        assert_eq!(
            compare_entries(&a, &b),
            vec![
                "B is missing replica Ethernet0_0 for group 5".to_string(),
                "A is missing replica Ethernet1_0 for group 5".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_group_skips_replica_comparison() {
        let a = vec![group(9, &[("Ethernet0", 0), ("Ethernet4", 0)])];
        let b: Vec<PacketReplicationEntry> = vec![];

        assert_eq!(
            compare_entries(&a, &b),
            vec!["B is missing multicast group 9".to_string()]
        );
    }

    #[test]
    fn test_output_order() {
        let a = vec![
            group(3, &[("Ethernet8", 0), ("Ethernet0", 0)]),
            group(1, &[]),
            group(10, &[("Ethernet4", 2)]),
        ];
        let b = vec![
            group(10, &[("Ethernet4", 2), ("Ethernet12", 0)]),
            group(7, &[]),
            group(3, &[("Ethernet20", 1), ("Ethernet16", 1)]),
            group(2, &[]),
        ];

        assert_eq!(
            compare_entries(&a, &b),
            vec![
                "B is missing multicast group 1".to_string(),
                "B is missing replica Ethernet0_0 for group 3".to_string(),
                "B is missing replica Ethernet8_0 for group 3".to_string(),
                "A is missing replica Ethernet16_1 for group 3".to_string(),
                "A is missing replica Ethernet20_1 for group 3".to_string(),
                "A is missing replica Ethernet12_0 for group 10".to_string(),
                "A is missing multicast group 2".to_string(),
                "A is missing multicast group 7".to_string(),
            ]
        );
    }

    #[test]
    fn test_replica_ids_sort_lexicographically() {
        // "Ethernet12_0" sorts before "Ethernet4_0" as text.
        let a = vec![group(1, &[("Ethernet4", 0), ("Ethernet12", 0)])];
        let b = vec![group(1, &[])];

        assert_eq!(
            compare_entries(&a, &b),
            vec![
                "B is missing replica Ethernet12_0 for group 1".to_string(),
                "B is missing replica Ethernet4_0 for group 1".to_string(),
            ]
        );
    }

    #[test]
    fn test_duplicate_group_last_write_wins() {
        let a = vec![group(4, &[("Ethernet0", 0)]), group(4, &[("Ethernet8", 0)])];
        let b = vec![group(4, &[("Ethernet8", 0)])];
        assert!(compare_entries(&a, &b).is_empty());
    }

    #[test]
    fn test_duplicate_replicas_collapse() {
        let a = vec![group(4, &[("Ethernet0", 0), ("Ethernet0", 0)])];
        let b = vec![group(4, &[("Ethernet0", 0)])];
        assert!(compare_entries(&a, &b).is_empty());
    }

    #[test]
    fn test_symmetry() {
        let a = vec![
            group(1, &[("Ethernet0", 0)]),
            group(2, &[("Ethernet4", 1), ("Ethernet8", 0)]),
        ];
        let b = vec![group(2, &[("Ethernet8", 0), ("Ethernet12", 3)]), group(6, &[])];

        // Running B against A with swapped labels must give the same messages.
        let mut forward = compare_entries(&a, &b);
        let mut backward = compare_entries_labeled(&b, &a, &SourceLabels::new("B", "A"));
        forward.sort();
        backward.sort();

        assert!(!forward.is_empty());
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_completeness_for_disjoint_inputs() {
        let a = vec![group(1, &[("Ethernet0", 0)]), group(3, &[])];
        let b = vec![group(2, &[]), group(4, &[("Ethernet4", 0)])];

        let discrepancies = reconcile(&a, &b);
        assert_eq!(discrepancies.len(), 4);
        for id in [1, 2, 3, 4] {
            let count = discrepancies
                .iter()
                .filter(|d| matches!(d, Discrepancy::MissingGroup { multicast_group_id, .. } if *multicast_group_id == id))
                .count();
            assert_eq!(count, 1, "group {} should be reported once", id);
        }
    }

    #[test]
    fn test_labels() {
        let a = vec![group(5, &[("Ethernet0", 0)])];
        let b: Vec<PacketReplicationEntry> = vec![];

        assert_eq!(
            compare_entries_labeled(&a, &b, &SourceLabels::app_db_and_cache()),
            vec!["Packet replication cache is missing multicast group 5".to_string()]
        );
        assert_eq!(
            compare_entries_labeled(&b, &a, &SourceLabels::app_db_and_cache()),
            vec!["APP DB is missing multicast group 5".to_string()]
        );
    }

    #[test]
    fn test_display_uses_default_labels() {
        let d = Discrepancy::MissingReplica {
            missing_from: Side::A,
            multicast_group_id: 8,
            replica: "Ethernet4_2".to_string(),
        };
        assert_eq!(d.to_string(), "A is missing replica Ethernet4_2 for group 8");
    }
}
