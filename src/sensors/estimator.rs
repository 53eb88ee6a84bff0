//! Speed and cadence estimation from cumulative revolution counters.
//!
//! Both estimators run the same state machine over successive readings:
//! the first reading seeds a baseline, a decreasing event time reseeds it,
//! repeated readings are debounced into an explicit zero, and anything else
//! yields a rate over the elapsed sensor time.

use crate::sensors::types::{CrankReading, CscConfig, CscError, WheelReading};

/// Event time resolution (ticks per second).
pub const EVENT_TIME_TICKS_PER_SECOND: f64 = 1024.0;

/// m/s to km/h.
const MPS_TO_KMH: f64 = 3.6;

/// A cumulative revolution counter of fixed width.
pub trait RevolutionCounter: Copy + PartialEq + Default + std::fmt::Debug {
    /// Forward distance from `previous`, wrapping at the counter width.
    fn revolutions_since(self, previous: Self) -> u32;
}

impl RevolutionCounter for u32 {
    fn revolutions_since(self, previous: Self) -> u32 {
        self.wrapping_sub(previous)
    }
}

impl RevolutionCounter for u16 {
    fn revolutions_since(self, previous: Self) -> u32 {
        u32::from(self.wrapping_sub(previous))
    }
}

/// Baseline and debounce state for one revolution counter.
///
/// A baseline of `(0, 0)` means no reading has been seen yet. A sensor that
/// genuinely reports zero revolutions at time zero is treated the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EstimatorState<R> {
    /// Revolutions of the last baseline reading
    pub previous_revolutions: R,
    /// Event time of the last baseline reading
    pub previous_event_time: u16,
    /// Consecutive repeated readings since the last emission
    pub repeat_count: u32,
}

impl<R: RevolutionCounter> EstimatorState<R> {
    fn has_baseline(&self) -> bool {
        self.previous_revolutions != R::default() || self.previous_event_time != 0
    }

    fn reseed(&mut self, revolutions: R, event_time: u16) {
        self.previous_revolutions = revolutions;
        self.previous_event_time = event_time;
    }

    /// Advance the state machine by one reading.
    fn step(
        &mut self,
        revolutions: R,
        event_time: u16,
        repeat_limit: u32,
    ) -> Result<Step, CscError> {
        if !self.has_baseline() {
            self.reseed(revolutions, event_time);
            return Ok(Step::Baseline);
        }

        if event_time < self.previous_event_time {
            self.reseed(revolutions, event_time);
            return Ok(Step::TimerReset);
        }

        if revolutions == self.previous_revolutions || event_time == self.previous_event_time {
            self.repeat_count += 1;
            if self.repeat_count >= repeat_limit {
                self.repeat_count = 0;
                return Ok(Step::Stationary);
            }
            return Ok(Step::Repeated {
                count: self.repeat_count,
            });
        }

        let ticks = event_time.wrapping_sub(self.previous_event_time);
        if ticks == 0 {
            return Err(CscError::InvalidElapsed {
                previous: self.previous_event_time,
                current: event_time,
            });
        }

        let delta = revolutions.revolutions_since(self.previous_revolutions);
        self.repeat_count = 0;
        self.reseed(revolutions, event_time);

        Ok(Step::Moved {
            revolutions: delta,
            elapsed_secs: f64::from(ticks) / EVENT_TIME_TICKS_PER_SECOND,
        })
    }
}

/// Internal result of one state machine step.
enum Step {
    Baseline,
    TimerReset,
    Repeated { count: u32 },
    Stationary,
    Moved { revolutions: u32, elapsed_secs: f64 },
}

/// What an estimator did with a reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EstimateOutcome {
    /// First reading stored as the baseline
    Baseline,
    /// Event time went backwards; baseline reseeded
    TimerReset,
    /// Unchanged reading counted towards the repeat limit
    Repeated { count: u32 },
    /// Repeat limit reached; reports zero
    Stationary,
    /// Rate computed from the baseline
    Updated(f64),
}

impl EstimateOutcome {
    /// The value to publish, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            EstimateOutcome::Stationary => Some(0.0),
            EstimateOutcome::Updated(value) => Some(*value),
            _ => None,
        }
    }

    fn from_step(step: Step, rate: impl FnOnce(u32, f64) -> f64) -> Self {
        match step {
            Step::Baseline => EstimateOutcome::Baseline,
            Step::TimerReset => EstimateOutcome::TimerReset,
            Step::Repeated { count } => EstimateOutcome::Repeated { count },
            Step::Stationary => EstimateOutcome::Stationary,
            Step::Moved {
                revolutions,
                elapsed_secs,
            } => EstimateOutcome::Updated(rate(revolutions, elapsed_secs)),
        }
    }
}

/// Wheel speed estimator (km/h).
#[derive(Debug, Clone)]
pub struct SpeedEstimator {
    state: EstimatorState<u32>,
    wheel_circumference: f64,
    repeat_limit: u32,
}

impl Default for SpeedEstimator {
    fn default() -> Self {
        let config = CscConfig::default();
        Self::new(config.wheel_circumference, config.wheel_repeat_limit)
    }
}

impl SpeedEstimator {
    /// Create an estimator for a wheel of the given circumference in meters.
    pub fn new(wheel_circumference: f64, repeat_limit: u32) -> Self {
        Self {
            state: EstimatorState::default(),
            wheel_circumference,
            repeat_limit,
        }
    }

    /// Current baseline state.
    pub fn state(&self) -> &EstimatorState<u32> {
        &self.state
    }

    /// Feed the next wheel reading.
    pub fn update(&mut self, reading: WheelReading) -> Result<EstimateOutcome, CscError> {
        let step = self
            .state
            .step(reading.revolutions, reading.event_time, self.repeat_limit)?;

        let circumference = self.wheel_circumference;
        let outcome = EstimateOutcome::from_step(step, |revolutions, elapsed_secs| {
            f64::from(revolutions) * circumference / elapsed_secs * MPS_TO_KMH
        });

        if outcome == EstimateOutcome::TimerReset {
            tracing::info!(
                event_time = reading.event_time,
                "Event time reset detected. Skipping speed calculation."
            );
        }

        Ok(outcome)
    }
}

/// Crank cadence estimator (RPM).
#[derive(Debug, Clone)]
pub struct CadenceEstimator {
    state: EstimatorState<u16>,
    repeat_limit: u32,
}

impl Default for CadenceEstimator {
    fn default() -> Self {
        Self::new(CscConfig::default().crank_repeat_limit)
    }
}

impl CadenceEstimator {
    pub fn new(repeat_limit: u32) -> Self {
        Self {
            state: EstimatorState::default(),
            repeat_limit,
        }
    }

    /// Current baseline state.
    pub fn state(&self) -> &EstimatorState<u16> {
        &self.state
    }

    /// Feed the next crank reading.
    pub fn update(&mut self, reading: CrankReading) -> Result<EstimateOutcome, CscError> {
        let step = self
            .state
            .step(reading.revolutions, reading.event_time, self.repeat_limit)?;

        let outcome = EstimateOutcome::from_step(step, |revolutions, elapsed_secs| {
            f64::from(revolutions) / elapsed_secs * 60.0
        });

        if outcome == EstimateOutcome::TimerReset {
            tracing::info!(
                event_time = reading.event_time,
                "Event time reset detected. Skipping cadence calculation."
            );
        }

        Ok(outcome)
    }
}
