//! UDP bridge to the local node API.
//!
//! The node exposes a datagram endpoint that answers a literal `INFO`
//! request with a JSON array of interface records.  Push delivery is built
//! on the same query: an emitter task re-runs it on a fixed cadence and
//! forwards the outcome as topology events until the receiver goes away.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::time::{interval, timeout};

use super::{Backend, TopologyEvent};
use crate::config::Config;
use crate::error::BridgeError;
use crate::types::RawInterfaceInfo;

/// Single-datagram request understood by the node API.
const INFO_REQUEST: &[u8] = b"INFO";

/// Upper bound on a node API reply.
const MAX_DATAGRAM: usize = 65536;

/// Capacity of the push channel.
const EVENT_CHANNEL_CAPACITY: usize = 128;

#[derive(Debug, Clone)]
pub struct UdpBridge {
    api_addr: SocketAddr,
    request_timeout: Duration,
    emit_interval: Duration,
    push_updates: bool,
}

impl UdpBridge {
    pub fn new(api_addr: SocketAddr) -> Self {
        Self {
            api_addr,
            request_timeout: Duration::from_millis(2000),
            emit_interval: Duration::from_millis(500),
            push_updates: true,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self {
            api_addr: cfg.api_addr,
            request_timeout: Duration::from_millis(cfg.request_timeout_ms),
            emit_interval: Duration::from_millis(cfg.push_interval_ms),
            push_updates: cfg.push_updates,
        }
    }

    async fn query_info(&self) -> Result<Vec<RawInterfaceInfo>, BridgeError> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.send_to(INFO_REQUEST, self.api_addr).await?;

        let mut buf = vec![0u8; MAX_DATAGRAM];
        let (len, _) = timeout(self.request_timeout, socket.recv_from(&mut buf))
            .await
            .map_err(|_| BridgeError::Timeout {
                after: self.request_timeout,
            })??;

        Ok(serde_json::from_slice(&buf[..len])?)
    }
}

#[async_trait]
impl Backend for UdpBridge {
    async fn fetch_network_info(&self) -> Result<Vec<RawInterfaceInfo>, BridgeError> {
        self.query_info().await
    }

    async fn subscribe(&self) -> Result<mpsc::Receiver<TopologyEvent>, BridgeError> {
        if !self.push_updates {
            return Err(BridgeError::PushUnavailable(
                "push updates disabled by configuration".into(),
            ));
        }

        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let emitter = self.clone();
        tokio::spawn(async move {
            let mut ticker = interval(emitter.emit_interval);
            loop {
                ticker.tick().await;
                let event = match emitter.query_info().await {
                    Ok(list) => TopologyEvent::Update(list),
                    Err(e) => TopologyEvent::Error(e.to_string()),
                };
                if event_tx.send(event).await.is_err() {
                    debug!("Topology event receiver dropped, stopping emitter");
                    break;
                }
            }
        });
        Ok(event_rx)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn bridge_for(addr: SocketAddr, timeout_ms: u64) -> UdpBridge {
        UdpBridge {
            api_addr: addr,
            request_timeout: Duration::from_millis(timeout_ms),
            emit_interval: Duration::from_millis(500),
            push_updates: true,
        }
    }

    /// One-shot fake node API: answers the first INFO request with `reply`.
    async fn spawn_fake_node(reply: Vec<u8>) -> SocketAddr {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        tokio::spawn(async move {
            let mut buf = [0u8; 64];
            if let Ok((_, from)) = socket.recv_from(&mut buf).await {
                let _ = socket.send_to(&reply, from).await;
            }
        });
        addr
    }

    #[tokio::test]
    async fn fetch_decodes_the_info_reply() {
        let reply = json!([
            {"index": 1, "node_name": "lab-a", "group_name": "Lab1", "has_udp_socket": true}
        ]);
        let addr = spawn_fake_node(serde_json::to_vec(&reply).unwrap()).await;

        let list = bridge_for(addr, 1000).fetch_network_info().await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].node_name, "lab-a");
        assert!(list[0].has_udp_socket);
    }

    #[tokio::test]
    async fn fetch_times_out_when_the_node_stays_silent() {
        // Bound but never read from, so no reply ever comes.
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = silent.local_addr().unwrap();

        let err = bridge_for(addr, 50).fetch_network_info().await.unwrap_err();
        assert!(matches!(err, BridgeError::Timeout { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn fetch_rejects_malformed_payloads() {
        let addr = spawn_fake_node(b"not json".to_vec()).await;
        let err = bridge_for(addr, 1000).fetch_network_info().await.unwrap_err();
        assert!(matches!(err, BridgeError::Decode(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn subscribe_reports_unavailable_when_push_is_disabled() {
        let mut bridge = bridge_for("127.0.0.1:3030".parse().unwrap(), 1000);
        bridge.push_updates = false;
        let err = bridge.subscribe().await.unwrap_err();
        assert!(matches!(err, BridgeError::PushUnavailable(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn subscribe_emits_updates_on_cadence() {
        let reply = json!([{"index": 1, "node_name": "lab-a"}]);
        let addr = spawn_fake_node(serde_json::to_vec(&reply).unwrap()).await;

        let mut bridge = bridge_for(addr, 1000);
        bridge.emit_interval = Duration::from_millis(10);
        let mut events = bridge.subscribe().await.unwrap();

        match events.recv().await.unwrap() {
            TopologyEvent::Update(list) => assert_eq!(list[0].node_name, "lab-a"),
            other => panic!("expected update, got {other:?}"),
        }
    }
}
