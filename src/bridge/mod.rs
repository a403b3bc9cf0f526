//! Bridge to the backend node process.
//!
//! The node owns peer networking, health checking, and transport
//! negotiation; this crate only ever asks it for the current interface list
//! or listens for its topology events.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::BridgeError;
use crate::types::RawInterfaceInfo;

pub mod udp;
pub use udp::UdpBridge;

/// Events delivered over the push channel.
#[derive(Debug, Clone)]
pub enum TopologyEvent {
    /// A fresh complete interface list, replacing whatever came before.
    Update(Vec<RawInterfaceInfo>),
    /// The backend is reachable but reported trouble downstream.
    Error(String),
}

/// Access to the backend node process.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetches one complete snapshot of the interface list.
    async fn fetch_network_info(&self) -> Result<Vec<RawInterfaceInfo>, BridgeError>;

    /// Establishes push delivery of topology events.  An `Err` means push
    /// is unavailable and the caller should fall back to polling.
    async fn subscribe(&self) -> Result<mpsc::Receiver<TopologyEvent>, BridgeError>;
}
