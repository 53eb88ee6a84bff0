//! Replay files of recorded CSC notifications.
//!
//! A replay file is a JSON array of `{"timestamp": seconds, "value": "03-64-..."}`
//! objects. Entries are fed to a [`SensorCore`] in file order; timestamps are
//! carried along for the caller but never waited on here.

use super::ReplayError;
use crate::sensors::{CscEventHandler, SensorCore};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One recorded notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayEntry {
    /// Seconds since the first recorded notification
    pub timestamp: f64,
    /// Notification bytes as dash-separated hex
    pub value: String,
}

impl ReplayEntry {
    /// Decode the hex value into notification bytes.
    pub fn bytes(&self) -> Result<Vec<u8>, ReplayError> {
        parse_notification_hex(&self.value)
    }
}

/// Totals from feeding a replay into a sensor core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaySummary {
    /// Entries accepted by the core
    pub processed: usize,
    /// Entries skipped because of bad hex or a malformed notification
    pub rejected: usize,
}

/// Parse a notification written as hex, e.g. `03-64-00-00-00-00-04` or `0x0364`.
pub fn parse_notification_hex(value: &str) -> Result<Vec<u8>, ReplayError> {
    let trimmed = value.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let digits: Vec<char> = trimmed
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect();

    if digits.len() % 2 != 0 {
        return Err(ReplayError::InvalidHex(value.to_string()));
    }

    digits
        .chunks(2)
        .map(|pair| {
            let hi = pair[0].to_digit(16);
            let lo = pair[1].to_digit(16);
            match (hi, lo) {
                (Some(hi), Some(lo)) => Ok((hi * 16 + lo) as u8),
                _ => Err(ReplayError::InvalidHex(value.to_string())),
            }
        })
        .collect()
}

/// Load replay entries from a JSON file.
pub fn load_entries(path: &Path) -> Result<Vec<ReplayEntry>, ReplayError> {
    let content = std::fs::read_to_string(path).map_err(|e| ReplayError::IoError(e.to_string()))?;
    let entries: Vec<ReplayEntry> =
        serde_json::from_str(&content).map_err(|e| ReplayError::JsonError(e.to_string()))?;

    tracing::info!(path = %path.display(), count = entries.len(), "Loaded replay entries");

    Ok(entries)
}

/// Write replay entries to a JSON file.
pub fn save_entries(path: &Path, entries: &[ReplayEntry]) -> Result<(), ReplayError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ReplayError::IoError(e.to_string()))?;
    }

    let content =
        serde_json::to_string_pretty(entries).map_err(|e| ReplayError::JsonError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ReplayError::IoError(e.to_string()))
}

/// Feed entries into a sensor core in order.
///
/// Bad entries are logged and counted, the rest of the replay continues.
pub fn replay_entries<H: CscEventHandler>(
    core: &mut SensorCore<H>,
    entries: &[ReplayEntry],
) -> ReplaySummary {
    let mut summary = ReplaySummary::default();

    for entry in entries {
        let result = entry
            .bytes()
            .and_then(|data| core.process(&data).map_err(ReplayError::from));

        match result {
            Ok(_) => summary.processed += 1,
            Err(e) => {
                tracing::warn!(timestamp = entry.timestamp, value = %entry.value, "Skipping entry: {}", e);
                summary.rejected += 1;
            }
        }
    }

    summary
}
