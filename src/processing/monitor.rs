// src/processing/monitor.rs
//! Touch-state monitor
//!
//! Runs once per scheduler tick: samples both whisker sensors, updates the
//! fixed-phase windows and their statistics, classifies contact, and drives
//! the host state machine when it sits in one of the trigger states.

use crate::acquisition::SensorWindows;
use crate::config::MonitorConfig;
use crate::error::{TouchError, TouchResult};
use crate::hal::{ContactFlag, Host, StateId, WaveId};
use crate::processing::classifier::{classify_sensors, contact_flag, SensorStates};
use crate::processing::statistics::RunningStats;
use serde::Serialize;
use tracing::{debug, info, trace};

/// Side effect issued to the host during a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Start a scheduled wave
    TriggerWave {
        /// Wave to start
        wave: WaveId,
    },
    /// Move the state machine out of band
    ForceJump {
        /// Destination state
        target: StateId,
        /// Event id reported with the jump
        event_id: i32,
    },
    /// Write a named scalar to the experiment record
    LogScalar {
        /// Marker name
        name: String,
        /// Marker value
        value: f64,
    },
}

/// Everything computed during one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    /// Zero-based tick number
    pub tick: u64,
    /// Machine state read at the start of the tick
    pub state: StateId,
    /// Window slot written this tick
    pub slot: usize,
    /// Raw (channel 1, channel 2) readings in volts
    pub voltages: (f64, f64),
    /// Channel 1 statistics after the write
    pub sensor1: RunningStats,
    /// Channel 2 statistics after the write
    pub sensor2: RunningStats,
    /// Tri-state classification of both sensors
    pub sensor_states: SensorStates,
    /// Combined contact flag
    pub contact: ContactFlag,
    /// Current state is listed in `touch_relevant_states`; informational only
    pub touch_relevant: bool,
    /// Host actions issued, in issue order
    pub actions: Vec<Action>,
}

/// Tick-to-tick state of the monitor, without its configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonitorSnapshot {
    /// Sample windows and their write counter
    pub windows: SensorWindows,
    /// Channel 1 statistics
    pub sensor1: RunningStats,
    /// Channel 2 statistics
    pub sensor2: RunningStats,
    /// Latest sensor classification
    pub sensor_states: SensorStates,
    /// Classification from the tick before
    pub previous_sensor_states: SensorStates,
    /// Latest contact flag
    pub contact: ContactFlag,
    /// Contact flag from the tick before
    pub previous_contact: ContactFlag,
}

/// Touch-state monitor owning all per-tick state
#[derive(Debug, Clone)]
pub struct TouchMonitor {
    config: MonitorConfig,
    windows: SensorWindows,
    stats1: RunningStats,
    stats2: RunningStats,
    sensors: SensorStates,
    previous_sensors: SensorStates,
    contact: ContactFlag,
    previous_contact: ContactFlag,
    ticks: u64,
}

impl Action {
    /// Forward this action to the host
    pub fn apply<H: Host>(&self, host: &mut H) {
        match self {
            Action::TriggerWave { wave } => host.trigger_wave(*wave),
            Action::ForceJump { target, event_id } => host.force_jump(*target, *event_id),
            Action::LogScalar { name, value } => host.log_scalar(name, *value),
        }
    }
}

impl TickReport {
    /// Target of the forced jump issued this tick, if any
    pub fn jumped_to(&self) -> Option<StateId> {
        self.actions.iter().find_map(|action| match action {
            Action::ForceJump { target, .. } => Some(*target),
            _ => None,
        })
    }
}

impl TouchMonitor {
    /// Create monitor with a validated configuration
    pub fn new(config: MonitorConfig) -> TouchResult<Self> {
        config
            .validate_consistency()
            .map_err(TouchError::InvalidConfig)?;

        Ok(Self::fresh(config))
    }

    /// Create monitor with the rig's default wiring and thresholds
    pub fn with_defaults() -> Self {
        Self::fresh(MonitorConfig::default())
    }

    fn fresh(config: MonitorConfig) -> Self {
        Self {
            config,
            windows: SensorWindows::new(),
            stats1: RunningStats::new(),
            stats2: RunningStats::new(),
            sensors: SensorStates::default(),
            previous_sensors: SensorStates::default(),
            contact: ContactFlag::Inactive,
            previous_contact: ContactFlag::Inactive,
            ticks: 0,
        }
    }

    /// Configuration the monitor was built with
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Number of ticks processed so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Copy of the per-tick state as it stands now
    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            windows: self.windows,
            sensor1: self.stats1,
            sensor2: self.stats2,
            sensor_states: self.sensors,
            previous_sensor_states: self.previous_sensors,
            contact: self.contact,
            previous_contact: self.previous_contact,
        }
    }

    /// Run one control cycle against the host
    pub fn process_tick<H: Host>(&mut self, host: &mut H) -> TickReport {
        let state = host.current_state();

        // Dispersion is taken over the windows before this tick's write
        self.stats1
            .update_dispersion(self.windows.sensor1.sum_of_squares());
        self.stats2
            .update_dispersion(self.windows.sensor2.dot(&self.windows.sensor1));

        let v1 = host.read_voltage(self.config.channels.sensor1);
        let v2 = host.read_voltage(self.config.channels.sensor2);

        let slot = self.windows.record(v1, v2);
        self.stats1.update_mean(self.windows.sensor1.mean());
        self.stats2.update_mean(self.windows.sensor2.mean());

        let touch_relevant = self.config.thresholds.is_touch_relevant(state);

        self.sensors = classify_sensors(v1, v2, self.previous_sensors, &self.config.detection);
        self.contact = contact_flag(self.stats1.mean_change, self.config.detection.mean_change);

        let actions = self.dispatch(state);
        for action in &actions {
            action.apply(host);
        }

        trace!(
            tick = self.ticks,
            state = state.0,
            v1,
            v2,
            mean1 = self.stats1.mean,
            mean_change1 = self.stats1.mean_change,
            contact = ?self.contact,
            "touch monitor tick"
        );

        let report = TickReport {
            tick: self.ticks,
            state,
            slot,
            voltages: (v1, v2),
            sensor1: self.stats1,
            sensor2: self.stats2,
            sensor_states: self.sensors,
            contact: self.contact,
            touch_relevant,
            actions,
        };

        self.end_tick();
        report
    }

    /// Log both sample windows to the experiment record
    pub fn log_windows<H: Host>(&self, host: &mut H) {
        host.log_array("sensor1_window", self.windows.sensor1.slots());
        host.log_array("sensor2_window", self.windows.sensor2.slots());
    }

    fn dispatch(&self, state: StateId) -> Vec<Action> {
        let states = &self.config.states;
        let waves = &self.config.waves;
        let markers = &self.config.markers;
        let touch_onset = self.contact.rose_from(self.previous_contact);
        let mut actions = Vec::new();

        if state == states.pole_up() {
            actions.push(Action::TriggerWave { wave: waves.pole_up() });
        }

        if state == states.early_touch() && touch_onset {
            info!(
                tick = self.ticks,
                jump_to = states.aborted_trial,
                "touch during delay, aborting trial"
            );
            actions.push(Action::TriggerWave { wave: waves.noise() });
            actions.push(Action::ForceJump {
                target: states.aborted_trial(),
                event_id: states.jump_event_id,
            });
            actions.push(Action::LogScalar {
                name: markers.touch_trigger_name.clone(),
                value: markers.touch_trigger_value,
            });
        }

        // Only the onset edge acts in the touch window; release and
        // per-sensor edges are ignored here.
        if state == states.touch_window() && touch_onset {
            info!(
                tick = self.ticks,
                jump_to = states.next_trial,
                "touch in response window"
            );
            actions.push(Action::TriggerWave { wave: waves.touch_onset() });
            actions.push(Action::ForceJump {
                target: states.next_trial(),
                event_id: states.jump_event_id,
            });
            actions.push(Action::LogScalar {
                name: markers.touch_trigger_name.clone(),
                value: markers.touch_trigger_value,
            });
            actions.push(Action::TriggerWave { wave: waves.reward() });
        }

        if !actions.is_empty() {
            debug!(tick = self.ticks, count = actions.len(), "issuing host actions");
        }
        actions
    }

    fn end_tick(&mut self) {
        self.previous_sensors = self.sensors;
        self.previous_contact = self.contact;
        self.stats1.end_tick();
        self.stats2.end_tick();
        self.windows.end_tick();
        self.ticks += 1;
    }
}

impl Default for TouchMonitor {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::constants::{states, waves};
    use crate::hal::simulator::{HostCall, SimulatedHost, VoltageSource};

    fn host_in(state: u32) -> SimulatedHost {
        SimulatedHost::new(StateId(state))
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = MonitorConfig::default();
        config.detection.mean_change = -1.0;
        assert!(matches!(
            TouchMonitor::new(config),
            Err(TouchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_first_tick_writes_slot_zero() {
        let mut monitor = TouchMonitor::with_defaults();
        let mut host = host_in(0)
            .with_channel(7, VoltageSource::Constant(1.0))
            .with_channel(9, VoltageSource::Constant(0.5));

        let report = monitor.process_tick(&mut host);
        assert_eq!(report.tick, 0);
        assert_eq!(report.slot, 0);
        assert_eq!(report.voltages, (1.0, 0.5));
        assert!((report.sensor1.mean - 0.1).abs() < 1e-12);
        assert!((report.sensor2.mean - 0.05).abs() < 1e-12);
        assert_eq!(monitor.ticks(), 1);
    }

    #[test]
    fn test_reads_state_before_sensors() {
        let mut monitor = TouchMonitor::with_defaults();
        let mut host = host_in(5);
        monitor.process_tick(&mut host);

        let calls = host.calls();
        assert_eq!(calls[0], HostCall::CurrentState);
        assert_eq!(calls[1], HostCall::ReadVoltage { channel: 7 });
        assert_eq!(calls[2], HostCall::ReadVoltage { channel: 9 });
    }

    #[test]
    fn test_dispersion_uses_previous_window() {
        let mut monitor = TouchMonitor::with_defaults();
        let mut host = host_in(0)
            .with_channel(7, VoltageSource::Constant(1.0))
            .with_channel(9, VoltageSource::Constant(2.0));

        let first = monitor.process_tick(&mut host);
        assert_eq!(first.sensor1.dispersion, 0.0);
        assert_eq!(first.sensor2.dispersion, 0.0);

        let second = monitor.process_tick(&mut host);
        // sum of squares 1.0 minus previous mean 0.1
        assert!((second.sensor1.dispersion - 0.9).abs() < 1e-12);
        // channel 2 product sum is taken against the channel-1 window: 2.0 * 1.0 - 0.2
        assert!((second.sensor2.dispersion - 1.8).abs() < 1e-12);
    }

    #[test]
    fn test_touch_relevant_is_reported_only() {
        let mut monitor = TouchMonitor::with_defaults();
        let mut host = host_in(states::EARLY_TOUCH);
        assert!(monitor.process_tick(&mut host).touch_relevant);

        let mut host = host_in(states::POLE_UP);
        let report = monitor.process_tick(&mut host);
        assert!(!report.touch_relevant);
        assert_eq!(
            report.actions,
            vec![Action::TriggerWave { wave: WaveId(waves::POLE_UP) }]
        );
    }

    #[test]
    fn test_no_actions_outside_trigger_states() {
        let mut monitor = TouchMonitor::with_defaults();
        let mut host = host_in(12).with_channel(7, VoltageSource::Step {
            at_tick: 1,
            before: 0.0,
            after: 1.0,
        });

        for _ in 0..5 {
            assert!(monitor.process_tick(&mut host).actions.is_empty());
        }
        assert!(host.effects().is_empty());
    }

    #[test]
    fn test_log_windows() {
        let mut monitor = TouchMonitor::with_defaults();
        let mut host = host_in(0).with_channel(7, VoltageSource::Constant(0.3));
        monitor.process_tick(&mut host);
        monitor.log_windows(&mut host);

        let arrays: Vec<_> = host
            .effects()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::LogArray { name, values } => Some((name, values)),
                _ => None,
            })
            .collect();
        assert_eq!(arrays.len(), 2);
        assert_eq!(arrays[0].0, "sensor1_window");
        assert_eq!(arrays[0].1[0], 0.3);
        assert_eq!(arrays[0].1.len(), 10);
    }
}
