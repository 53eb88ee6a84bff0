//! Downstream integrations.
//!
//! Encodes derived metrics for an external publisher. Broker connection and
//! topic management live outside this crate.

pub mod payload;

use thiserror::Error;

pub use payload::{MetricPayload, PayloadPublisher, CADENCE_TAG, PAYLOAD_LEN, SPEED_TAG};

/// Payload decoding errors
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Invalid payload length: {0}")]
    InvalidLength(usize),

    #[error("Unknown payload tag: {0}")]
    UnknownTag(u8),
}
