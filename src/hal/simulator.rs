// src/hal/simulator.rs
//! Simulated host runtime
//!
//! Stands in for the rig's state machine, analog inputs, wave scheduler and
//! experiment log. Every call is recorded so a run can be inspected after
//! the fact. Voltage sources advance once per read of their channel.

use crate::hal::traits::{AnalogInput, ExperimentLog, ScheduledWaves, StateMachine};
use crate::hal::types::{StateId, WaveId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;

/// One recorded collaborator call
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    /// State machine queried
    CurrentState,
    /// Analog channel sampled
    ReadVoltage {
        /// Hardware channel
        channel: u32,
    },
    /// Scheduled wave started
    TriggerWave {
        /// Wave started
        wave: WaveId,
    },
    /// Out-of-band state transition
    ForceJump {
        /// Destination state
        target: StateId,
        /// Event id passed with the jump
        event_id: i32,
    },
    /// Scalar written to the experiment record
    LogScalar {
        /// Variable name
        name: String,
        /// Value written
        value: f64,
    },
    /// Array written to the experiment record
    LogArray {
        /// Variable name
        name: String,
        /// Values written
        values: Vec<f64>,
    },
}

/// Voltage pattern fed to one analog channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VoltageSource {
    /// Same value on every read
    Constant(f64),
    /// One value per read; the last value repeats once exhausted
    Script(Vec<f64>),
    /// `before` until the `at_tick`-th read, `after` from then on
    Step {
        /// Zero-based read index of the step
        at_tick: u64,
        /// Value before the step
        before: f64,
        /// Value from the step on
        after: f64,
    },
    /// Uniform jitter of +/- `amplitude` around `base`; `amplitude` must be finite
    Jitter {
        /// Centre value
        base: f64,
        /// Half-width of the jitter band
        amplitude: f64,
    },
}

/// Recording host used by tests, benches and the replay binary
pub struct SimulatedHost {
    state: StateId,
    channels: HashMap<u32, ChannelFeed>,
    rng: StdRng,
    calls: RefCell<Vec<HostCall>>,
}

struct ChannelFeed {
    source: VoltageSource,
    reads: u64,
}

impl HostCall {
    /// True for calls that change something outside the monitor
    pub fn is_effect(&self) -> bool {
        !matches!(self, HostCall::CurrentState | HostCall::ReadVoltage { .. })
    }
}

impl VoltageSource {
    fn sample(&self, read: u64, rng: &mut StdRng) -> f64 {
        match self {
            VoltageSource::Constant(v) => *v,
            VoltageSource::Script(values) => {
                let last = values.len().saturating_sub(1);
                values
                    .get((read as usize).min(last))
                    .copied()
                    .unwrap_or(0.0)
            }
            VoltageSource::Step { at_tick, before, after } => {
                if read >= *at_tick {
                    *after
                } else {
                    *before
                }
            }
            VoltageSource::Jitter { base, amplitude } => {
                let amplitude = amplitude.abs();
                base + rng.gen_range(-amplitude..=amplitude)
            }
        }
    }
}

impl SimulatedHost {
    /// Host sitting in `state` with every channel reading 0 V
    pub fn new(state: StateId) -> Self {
        Self::with_seed(state, 0)
    }

    /// Host with a seeded jitter generator
    pub fn with_seed(state: StateId, seed: u64) -> Self {
        Self {
            state,
            channels: HashMap::new(),
            rng: StdRng::seed_from_u64(seed),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Attach a voltage source to an analog channel
    pub fn with_channel(mut self, channel: u32, source: VoltageSource) -> Self {
        self.set_channel(channel, source);
        self
    }

    /// Replace the source on a channel and reset its read count
    pub fn set_channel(&mut self, channel: u32, source: VoltageSource) {
        self.channels.insert(channel, ChannelFeed { source, reads: 0 });
    }

    /// Move the simulated state machine without recording a call
    pub fn set_state(&mut self, state: StateId) {
        self.state = state;
    }

    /// Current state without recording a call
    pub fn state(&self) -> StateId {
        self.state
    }

    /// All recorded calls in order
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    /// Recorded calls that had an outside effect
    pub fn effects(&self) -> Vec<HostCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.is_effect())
            .cloned()
            .collect()
    }

    /// How many times `wave` was triggered
    pub fn wave_count(&self, wave: WaveId) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, HostCall::TriggerWave { wave: w } if *w == wave))
            .count()
    }

    /// Targets of every forced jump, in order
    pub fn jumps(&self) -> Vec<StateId> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                HostCall::ForceJump { target, .. } => Some(*target),
                _ => None,
            })
            .collect()
    }

    /// Forget all recorded calls
    pub fn clear_calls(&mut self) {
        self.calls.get_mut().clear();
    }

    fn record(&self, call: HostCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl StateMachine for SimulatedHost {
    fn current_state(&self) -> StateId {
        self.record(HostCall::CurrentState);
        self.state
    }

    fn force_jump(&mut self, target: StateId, event_id: i32) {
        self.record(HostCall::ForceJump { target, event_id });
        self.state = target;
    }
}

impl AnalogInput for SimulatedHost {
    fn read_voltage(&mut self, channel: u32) -> f64 {
        self.record(HostCall::ReadVoltage { channel });
        match self.channels.get_mut(&channel) {
            Some(feed) => {
                let v = feed.source.sample(feed.reads, &mut self.rng);
                feed.reads += 1;
                v
            }
            None => 0.0,
        }
    }
}

impl ScheduledWaves for SimulatedHost {
    fn trigger_wave(&mut self, wave: WaveId) {
        self.record(HostCall::TriggerWave { wave });
    }
}

impl ExperimentLog for SimulatedHost {
    fn log_scalar(&mut self, name: &str, value: f64) {
        self.record(HostCall::LogScalar {
            name: name.to_string(),
            value,
        });
    }

    fn log_array(&mut self, name: &str, values: &[f64]) {
        self.record(HostCall::LogArray {
            name: name.to_string(),
            values: values.to_vec(),
        });
    }
}
