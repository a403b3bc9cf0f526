//! Error types for the backend bridge.

use std::time::Duration;

use thiserror::Error;

/// Failures crossing the bridge to the node API.
///
/// Consumers of the aggregated view only ever see the rendered display
/// string; the typed variants exist for the bridge and its tests.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("node API request timed out after {after:?}")]
    Timeout { after: Duration },
    #[error("node API i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid node API payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("push delivery unavailable: {0}")]
    PushUnavailable(String),
}
