//! Replay of recorded sensor notifications.
//!
//! Loads recorded notifications from JSON, converts raw notification logs, and
//! feeds recordings into a sensor core without any timing control.

pub mod entries;
pub mod log;

use crate::sensors::CscError;
use thiserror::Error;

pub use entries::{
    load_entries, parse_notification_hex, replay_entries, save_entries, ReplayEntry,
    ReplaySummary,
};
pub use log::{convert_log_file, parse_log};

/// Replay-related errors
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("JSON error: {0}")]
    JsonError(String),

    #[error("Invalid notification hex: {0:?}")]
    InvalidHex(String),

    #[error(transparent)]
    Sensor(#[from] CscError),
}
