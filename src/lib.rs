//! Live mesh-topology state aggregation over the local node API.
//!
//! The backend node process owns peer networking and health checking; this
//! crate keeps one consistent, freshly stamped copy of its interface list.
//! Updates arrive over a push channel when available and over fixed-interval
//! polling otherwise, every ingest replaces the list wholesale, and pure
//! helpers derive the per-group and per-node views consumers render.

pub mod bridge;
pub mod config;
pub mod error;
pub mod normalize;
pub mod service;
pub mod types;
pub mod views;

pub use service::{IngestMode, NetworkService, NetworkState};
pub use types::{InterfaceSnapshot, RawInterfaceInfo, UNGROUPED};
