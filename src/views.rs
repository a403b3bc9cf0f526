//! Read-only aggregates derived from the current snapshot list.
//!
//! Everything here is recomputed on demand from whatever list the caller
//! holds; nothing is cached or diffed incrementally, and the input is never
//! mutated.

use serde_json::Value;

use crate::types::InterfaceSnapshot;

/// Per-group membership and online tallies.
///
/// Groups are derived, not declared: one exists only while at least one
/// snapshot currently maps to it.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub name: String,
    pub total: usize,
    pub active: usize,
    pub members: Vec<InterfaceSnapshot>,
}

/// Partitions snapshots by group label, preserving first-seen order.
///
/// Absent and empty group names collapse into the `"Ungrouped"` partition.
/// `active` counts members whose interface currently holds a live socket.
pub fn group_by(snapshots: &[InterfaceSnapshot]) -> Vec<GroupSummary> {
    let mut groups: Vec<GroupSummary> = Vec::new();
    for snap in snapshots {
        let label = snap.group_label();
        let idx = match groups.iter().position(|g| g.name == label) {
            Some(idx) => idx,
            None => {
                groups.push(GroupSummary {
                    name: label.to_string(),
                    total: 0,
                    active: 0,
                    members: Vec::new(),
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[idx];
        group.total += 1;
        if snap.info.has_udp_socket {
            group.active += 1;
        }
        group.members.push(snap.clone());
    }
    groups
}

/// Exact-match filter on the group label.  The `"Ungrouped"` label matches
/// records whose group name is absent or empty, mirroring [`group_by`].
pub fn filter_by_group(snapshots: &[InterfaceSnapshot], group: &str) -> Vec<InterfaceSnapshot> {
    snapshots
        .iter()
        .filter(|snap| snap.group_label() == group)
        .cloned()
        .collect()
}

/// Case-insensitive substring search over node names and group labels.
/// An empty query returns the input unchanged.
pub fn search_by_text(snapshots: &[InterfaceSnapshot], query: &str) -> Vec<InterfaceSnapshot> {
    if query.is_empty() {
        return snapshots.to_vec();
    }
    let needle = query.to_lowercase();
    snapshots
        .iter()
        .filter(|snap| {
            snap.info.node_name.to_lowercase().contains(&needle)
                || snap.group_label().to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Detail lookup by the interface's stable identity.
pub fn find_by_index(snapshots: &[InterfaceSnapshot], index: u32) -> Option<&InterfaceSnapshot> {
    snapshots.iter().find(|snap| snap.info.index == index)
}

/// Reads the `elapsed` field of a health-check payload as whole
/// milliseconds.  The node reports `{ "elapsed": { "secs", "nanos" } }`;
/// an absent or non-object payload yields `None`.
pub fn elapsed_ms(hc: &Value) -> Option<u64> {
    let elapsed = hc.get("elapsed")?;
    let secs = elapsed.get("secs").and_then(Value::as_u64).unwrap_or(0);
    let nanos = elapsed.get("nanos").and_then(Value::as_u64).unwrap_or(0);
    Some(secs * 1000 + (nanos + 500_000) / 1_000_000)
}

/// Mean of whichever of the UDP and TCP round-trip times are present.
pub fn average_ping_ms(udp_hc: &Value, tcp_hc: &Value) -> Option<u64> {
    match (elapsed_ms(udp_hc), elapsed_ms(tcp_hc)) {
        (Some(udp), Some(tcp)) => Some((udp + tcp + 1) / 2),
        (Some(udp), None) => Some(udp),
        (None, Some(tcp)) => Some(tcp),
        (None, None) => None,
    }
}

/// Latency banding used by the grid view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingQuality {
    Good,
    Fair,
    Poor,
    Bad,
    Unknown,
}

impl PingQuality {
    /// Bands: < 50 ms good, < 100 ms fair, < 200 ms poor, above that bad.
    pub fn classify(ping_ms: Option<u64>) -> Self {
        match ping_ms {
            None => Self::Unknown,
            Some(ms) if ms < 50 => Self::Good,
            Some(ms) if ms < 100 => Self::Fair,
            Some(ms) if ms < 200 => Self::Poor,
            Some(_) => Self::Bad,
        }
    }
}

/// Number of peers in the opaque peer table.
pub fn peer_count(snapshot: &InterfaceSnapshot) -> usize {
    snapshot.info.node_map.as_object().map_or(0, |map| map.len())
}
