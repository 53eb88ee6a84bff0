//! Sensor types for the Cycling Speed and Cadence profile.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cumulative wheel revolution data from one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WheelReading {
    /// Cumulative wheel revolutions (wraps at 2^32)
    pub revolutions: u32,
    /// Last wheel event time in 1/1024 s (wraps at 65536)
    pub event_time: u16,
}

/// Cumulative crank revolution data from one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CrankReading {
    /// Cumulative crank revolutions (wraps at 65536)
    pub revolutions: u16,
    /// Last crank event time in 1/1024 s (wraps at 65536)
    pub event_time: u16,
}

/// Fields decoded from a CSC Measurement notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CscMeasurement {
    /// Raw flags byte
    pub flags: u8,
    /// Wheel data (if present)
    pub wheel: Option<WheelReading>,
    /// Crank data (if present)
    pub crank: Option<CrankReading>,
}

/// Derived values fired by the sensor core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CscEvent {
    /// New instantaneous speed in km/h
    SpeedUpdated(f64),
    /// New instantaneous cadence in RPM
    CadenceUpdated(f64),
}

impl CscEvent {
    /// The carried value, regardless of kind.
    pub fn value(&self) -> f64 {
        match self {
            CscEvent::SpeedUpdated(v) | CscEvent::CadenceUpdated(v) => *v,
        }
    }
}

impl std::fmt::Display for CscEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CscEvent::SpeedUpdated(speed) => write!(f, "Speed: {speed} km/h"),
            CscEvent::CadenceUpdated(cadence) => write!(f, "Cadence: {cadence} rpm"),
        }
    }
}

/// Estimation settings for a speed and cadence sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CscConfig {
    /// Wheel circumference in meters
    pub wheel_circumference: f64,
    /// Consecutive unchanged wheel readings before reporting 0 km/h
    pub wheel_repeat_limit: u32,
    /// Consecutive unchanged crank readings before reporting 0 rpm
    pub crank_repeat_limit: u32,
}

impl Default for CscConfig {
    fn default() -> Self {
        Self {
            wheel_circumference: 2.146,
            wheel_repeat_limit: 7,
            crank_repeat_limit: 3,
        }
    }
}

impl CscConfig {
    /// Check that the settings can produce meaningful values.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.wheel_circumference.is_finite() || self.wheel_circumference <= 0.0 {
            return Err("wheel circumference must be a positive number of meters");
        }
        if self.wheel_repeat_limit == 0 || self.crank_repeat_limit == 0 {
            return Err("repeat limits must be at least 1");
        }
        Ok(())
    }
}

/// Errors raised while processing CSC notifications.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CscError {
    /// Notification shorter than its flags require
    #[error("Notification too short: flags require {required} bytes, got {actual}")]
    Format { required: usize, actual: usize },

    /// Zero or negative elapsed time reached the rate computation
    #[error("Invalid elapsed time between {previous} and {current}")]
    InvalidElapsed { previous: u16, current: u16 },
}
