//! Data structures exchanged with the node API.
//!
//! The node reports one record per local mesh interface.  Most of the
//! payload is computed by the node itself (peer tables, health counters,
//! transport modes) and is carried here without interpretation; the only
//! field this layer reads for logic is [`RawInterfaceInfo::has_udp_socket`],
//! which drives the online/offline tallies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentinel group label for records without a group assignment.
pub const UNGROUPED: &str = "Ungrouped";

/// One reporting interface exactly as the node API emits it.
///
/// Field names match the wire format.  Everything except `index` and
/// `node_name` is defaulted so a sparse payload still decodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInterfaceInfo {
    /// Stable identity for the interface within a single node run.
    pub index: u32,
    pub node_name: String,
    /// Grouping key; `None` and `""` both mean ungrouped.
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub addr: String,
    #[serde(default)]
    pub cidr: String,
    /// Transport capability descriptor (p2p/relay lists), opaque.
    #[serde(default)]
    pub mode: Value,
    /// Peer table keyed by peer id, opaque.
    #[serde(default)]
    pub node_map: Value,
    #[serde(default)]
    pub server_addr: String,
    #[serde(default)]
    pub server_udp_hc: Value,
    #[serde(default)]
    pub server_udp_status: Value,
    #[serde(default)]
    pub server_tcp_hc: Value,
    #[serde(default)]
    pub server_is_connected: bool,
    /// Whether the interface currently holds a live socket; the basis for
    /// the derived online/offline status.
    #[serde(default)]
    pub has_udp_socket: bool,
}

/// A raw record plus the instant it arrived at this client.
///
/// The node does not timestamp its own emissions; the receipt stamp is
/// attached batch-wide by [`crate::normalize`], so every snapshot from one
/// emission carries the identical instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceSnapshot {
    #[serde(flatten)]
    pub info: RawInterfaceInfo,
    /// Wall-clock receipt time, epoch milliseconds.
    pub received_at_ms: i64,
    /// Human-readable rendering of the same instant.
    pub received_at_text: String,
}

impl InterfaceSnapshot {
    /// Presentation label for the grouping key.  Absent and empty group
    /// names collapse to [`UNGROUPED`].
    pub fn group_label(&self) -> &str {
        match self.info.group_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => UNGROUPED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_payload_decodes_with_defaults() {
        let json = r#"{"index": 3, "node_name": "edge-3"}"#;
        let raw: RawInterfaceInfo = serde_json::from_str(json).unwrap();
        assert_eq!(raw.index, 3);
        assert_eq!(raw.node_name, "edge-3");
        assert_eq!(raw.group_name, None);
        assert!(raw.addr.is_empty());
        assert!(raw.node_map.is_null());
        assert!(!raw.has_udp_socket);
    }

    #[test]
    fn full_payload_round_trips_opaque_fields() {
        let json = r#"{
            "index": 1,
            "node_name": "lab-a",
            "group_name": "Lab1",
            "addr": "10.0.0.1",
            "cidr": "10.0.0.0/24",
            "mode": {"p2p": ["udp"], "relay": []},
            "node_map": {"peer-1": {"node": {"name": "lab-b"}}},
            "server_addr": "192.168.1.10:12345",
            "server_udp_hc": {"elapsed": {"secs": 0, "nanos": 42000000}},
            "server_udp_status": "Available",
            "server_tcp_hc": {},
            "server_is_connected": true,
            "has_udp_socket": true
        }"#;
        let raw: RawInterfaceInfo = serde_json::from_str(json).unwrap();
        assert_eq!(raw.mode["p2p"][0], "udp");
        assert_eq!(raw.node_map["peer-1"]["node"]["name"], "lab-b");
        assert!(raw.server_is_connected);

        let back = serde_json::to_value(&raw).unwrap();
        assert_eq!(back["server_udp_status"], "Available");
    }

    #[test]
    fn group_label_substitutes_ungrouped() {
        let snap = |group: Option<&str>| InterfaceSnapshot {
            info: RawInterfaceInfo {
                group_name: group.map(String::from),
                ..Default::default()
            },
            received_at_ms: 0,
            received_at_text: String::new(),
        };
        assert_eq!(snap(None).group_label(), UNGROUPED);
        assert_eq!(snap(Some("")).group_label(), UNGROUPED);
        assert_eq!(snap(Some("Lab1")).group_label(), "Lab1");
    }
}
