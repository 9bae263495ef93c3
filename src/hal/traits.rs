// src/hal/traits.rs
//! Host collaborator traits consumed by the touch monitor
//!
//! Every call is fire-and-forget: the real-time loop cannot block on an
//! acknowledgment, so none of these return a `Result`.

use crate::hal::types::{StateId, Tristate, WaveId};

/// Externally-owned behavioral state machine
pub trait StateMachine {
    /// Current state id
    fn current_state(&self) -> StateId;

    /// Request an immediate, unconditional transition
    fn force_jump(&mut self, target: StateId, event_id: i32);
}

/// Analog-input subsystem
pub trait AnalogInput {
    /// Instantaneous voltage on a hardware channel
    fn read_voltage(&mut self, channel: u32) -> f64;
}

/// Scheduled-wave output subsystem
pub trait ScheduledWaves {
    /// Start a pre-programmed wave
    fn trigger_wave(&mut self, wave: WaveId);
}

/// Experiment record writer
pub trait ExperimentLog {
    /// Write a named scalar
    fn log_scalar(&mut self, name: &str, value: f64);

    /// Write a named array
    fn log_array(&mut self, name: &str, values: &[f64]);
}

/// Everything the monitor needs from the host runtime
pub trait Host: StateMachine + AnalogInput + ScheduledWaves + ExperimentLog {}

impl<T> Host for T where T: StateMachine + AnalogInput + ScheduledWaves + ExperimentLog {}

/// Lifecycle contract the host scheduler drives
pub trait ProtocolHooks {
    /// Per-tick diagnostic output
    type Report;

    /// Called once before the control loop starts
    fn init<H: Host>(&mut self, host: &mut H);

    /// Called on every trial boundary
    fn start_trial<H: Host>(&mut self, host: &mut H);

    /// Called exactly once per scheduler tick
    fn tick<H: Host>(&mut self, host: &mut H) -> Self::Report;

    /// Threshold classifier used by the host's own input-event detector
    fn thresh(&self, channel: u32, voltage: f64) -> Tristate;
}
