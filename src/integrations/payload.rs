//! Binary payloads for publishing derived metrics.
//!
//! Each payload is a one-byte type tag followed by the value as a big-endian
//! IEEE-754 single-precision float.

use super::PayloadError;
use crate::sensors::{CscEvent, CscEventHandler};
use crossbeam::channel::Sender;

/// Type tag for speed payloads.
pub const SPEED_TAG: u8 = 4;

/// Type tag for cadence payloads.
pub const CADENCE_TAG: u8 = 5;

/// Encoded payload length.
pub const PAYLOAD_LEN: usize = 5;

/// A published metric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricPayload {
    /// Speed in km/h
    Speed(f32),
    /// Cadence in RPM
    Cadence(f32),
}

impl MetricPayload {
    pub fn tag(&self) -> u8 {
        match self {
            MetricPayload::Speed(_) => SPEED_TAG,
            MetricPayload::Cadence(_) => CADENCE_TAG,
        }
    }

    /// Encode as tag + big-endian f32.
    pub fn encode(&self) -> [u8; PAYLOAD_LEN] {
        let value = match self {
            MetricPayload::Speed(v) | MetricPayload::Cadence(v) => *v,
        };
        let mut out = [0u8; PAYLOAD_LEN];
        out[0] = self.tag();
        out[1..].copy_from_slice(&value.to_be_bytes());
        out
    }

    /// Decode a payload produced by [`MetricPayload::encode`].
    pub fn decode(data: &[u8]) -> Result<Self, PayloadError> {
        if data.len() != PAYLOAD_LEN {
            return Err(PayloadError::InvalidLength(data.len()));
        }
        let value = f32::from_be_bytes([data[1], data[2], data[3], data[4]]);
        match data[0] {
            SPEED_TAG => Ok(MetricPayload::Speed(value)),
            CADENCE_TAG => Ok(MetricPayload::Cadence(value)),
            tag => Err(PayloadError::UnknownTag(tag)),
        }
    }
}

impl From<CscEvent> for MetricPayload {
    fn from(event: CscEvent) -> Self {
        // Wire format is single precision
        match event {
            CscEvent::SpeedUpdated(speed) => MetricPayload::Speed(speed as f32),
            CscEvent::CadenceUpdated(cadence) => MetricPayload::Cadence(cadence as f32),
        }
    }
}

/// Event handler that encodes events and forwards the bytes to a publisher.
pub struct PayloadPublisher {
    tx: Sender<Vec<u8>>,
}

impl PayloadPublisher {
    pub fn new(tx: Sender<Vec<u8>>) -> Self {
        Self { tx }
    }
}

impl CscEventHandler for PayloadPublisher {
    fn on_event(&mut self, event: CscEvent) {
        let payload = MetricPayload::from(event).encode();
        tracing::debug!(%event, ?payload, "Publishing payload");

        if self.tx.send(payload.to_vec()).is_err() {
            tracing::warn!("Payload receiver dropped, discarding {}", event);
        }
    }
}
