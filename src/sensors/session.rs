//! Sensor core for one CSC sensor session.
//!
//! Routes decoded notifications to the speed and cadence estimators and fires
//! derived values to an injected event handler.

use crate::sensors::csc::parse_csc_measurement;
use crate::sensors::estimator::{CadenceEstimator, EstimateOutcome, SpeedEstimator};
use crate::sensors::types::{CscConfig, CscError, CscEvent};
use crossbeam::channel::Sender;

/// Receives derived speed and cadence values.
pub trait CscEventHandler {
    /// Handle one event.
    fn on_event(&mut self, event: CscEvent);
}

impl CscEventHandler for Vec<CscEvent> {
    fn on_event(&mut self, event: CscEvent) {
        self.push(event);
    }
}

impl CscEventHandler for Sender<CscEvent> {
    fn on_event(&mut self, event: CscEvent) {
        if self.send(event).is_err() {
            tracing::warn!(?event, "Event receiver dropped");
        }
    }
}

impl<H: CscEventHandler + ?Sized> CscEventHandler for &mut H {
    fn on_event(&mut self, event: CscEvent) {
        (**self).on_event(event);
    }
}

/// What happened to one notification.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProcessReport {
    /// Speed estimator outcome, if wheel data was present
    pub wheel: Option<EstimateOutcome>,
    /// Cadence estimator outcome, if crank data was present
    pub crank: Option<EstimateOutcome>,
}

impl ProcessReport {
    /// Whether either estimator saw its event time go backwards.
    pub fn timer_reset(&self) -> bool {
        self.wheel == Some(EstimateOutcome::TimerReset)
            || self.crank == Some(EstimateOutcome::TimerReset)
    }
}

/// Decoder plus wheel and crank estimators for a single sensor.
///
/// Notifications must be processed in arrival order. Independent sensors get
/// independent cores.
pub struct SensorCore<H> {
    speed: SpeedEstimator,
    cadence: CadenceEstimator,
    handler: H,
}

impl<H: CscEventHandler> SensorCore<H> {
    /// Create a core with the given settings.
    pub fn new(config: &CscConfig, handler: H) -> Self {
        Self {
            speed: SpeedEstimator::new(config.wheel_circumference, config.wheel_repeat_limit),
            cadence: CadenceEstimator::new(config.crank_repeat_limit),
            handler,
        }
    }

    /// Create a core with default settings.
    pub fn with_defaults(handler: H) -> Self {
        Self::new(&CscConfig::default(), handler)
    }

    /// Process one raw CSC Measurement notification.
    ///
    /// A malformed notification leaves all state untouched.
    pub fn process(&mut self, data: &[u8]) -> Result<ProcessReport, CscError> {
        let measurement = parse_csc_measurement(data)?;
        let mut report = ProcessReport::default();

        if let Some(wheel) = measurement.wheel {
            let outcome = self.speed.update(wheel)?;
            if let Some(speed) = outcome.value() {
                tracing::debug!(speed, "Speed updated");
                self.handler.on_event(CscEvent::SpeedUpdated(speed));
            }
            report.wheel = Some(outcome);
        }

        if let Some(crank) = measurement.crank {
            let outcome = self.cadence.update(crank)?;
            if let Some(cadence) = outcome.value() {
                tracing::debug!(cadence, "Cadence updated");
                self.handler.on_event(CscEvent::CadenceUpdated(cadence));
            }
            report.crank = Some(outcome);
        }

        Ok(report)
    }

    pub fn speed_estimator(&self) -> &SpeedEstimator {
        &self.speed
    }

    pub fn cadence_estimator(&self) -> &CadenceEstimator {
        &self.cadence
    }

    /// Borrow the event handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutably borrow the event handler.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Consume the core, returning the event handler.
    pub fn into_handler(self) -> H {
        self.handler
    }
}
