//! Sensor module for CSC notification decoding and estimation.

pub mod csc;
pub mod estimator;
pub mod session;
pub mod types;

pub use csc::{parse_csc_measurement, CSC_MEASUREMENT_UUID, CSC_SERVICE_UUID};
pub use estimator::{
    CadenceEstimator, EstimateOutcome, EstimatorState, RevolutionCounter, SpeedEstimator,
};
pub use session::{CscEventHandler, ProcessReport, SensorCore};
pub use types::{CrankReading, CscConfig, CscError, CscEvent, CscMeasurement, WheelReading};
