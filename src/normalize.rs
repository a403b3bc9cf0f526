//! Receipt-time stamping for incoming snapshot batches.

use chrono::{DateTime, Utc};

use crate::types::{InterfaceSnapshot, RawInterfaceInfo};

/// Rendering used for the human-readable receipt time.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Stamps a batch with the current instant.
///
/// "Now" is captured exactly once per call, never per record, so every
/// snapshot in one backend emission carries the identical receipt time.
pub fn normalize(raw: Vec<RawInterfaceInfo>) -> Vec<InterfaceSnapshot> {
    normalize_at(raw, Utc::now())
}

/// Deterministic variant of [`normalize`] for a caller-supplied clock.
/// No transformation beyond the stamp; field values pass through unchanged.
pub fn normalize_at(raw: Vec<RawInterfaceInfo>, at: DateTime<Utc>) -> Vec<InterfaceSnapshot> {
    let received_at_ms = at.timestamp_millis();
    let received_at_text = at.format(TIME_FORMAT).to_string();
    raw.into_iter()
        .map(|info| InterfaceSnapshot {
            info,
            received_at_ms,
            received_at_text: received_at_text.clone(),
        })
        .collect()
}
