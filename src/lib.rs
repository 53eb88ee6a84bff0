//! RustCSC - Cycling Speed and Cadence sensor core
//!
//! Decodes CSC Measurement notifications into wheel and crank revolution data
//! and derives instantaneous speed (km/h) and cadence (rpm), handling counter
//! rollover, sensor timer resets, and stationary periods. Derived values are
//! delivered to an injected event handler.

pub mod integrations;
pub mod replay;
pub mod sensors;
pub mod storage;

// Re-export commonly used types
pub use integrations::{MetricPayload, PayloadPublisher};
pub use sensors::{CscConfig, CscError, CscEvent, CscEventHandler, SensorCore};
pub use storage::config::AppConfig;
