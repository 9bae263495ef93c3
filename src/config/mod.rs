// src/config/mod.rs
//! Monitor configuration
//!
//! Thresholds, channel assignments and state/wave ids are supplied once
//! before the first tick and never change while the control loop runs.

pub mod constants;
pub mod loader;

pub use constants::*;
pub use loader::{ConfigError, ConfigLoader};

use crate::hal::{StateId, WaveId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Complete monitor configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct MonitorConfig {
    /// Injected touch thresholds and relevant states
    #[serde(default)]
    pub thresholds: TouchThresholds,
    /// Analog channel wiring
    #[serde(default)]
    pub channels: ChannelConfig,
    /// Classification bounds
    #[serde(default)]
    pub detection: DetectionConfig,
    /// State ids
    #[serde(default)]
    pub states: StateConfig,
    /// Wave ids
    #[serde(default)]
    pub waves: WaveConfig,
    /// Experiment-record markers
    #[serde(default)]
    pub markers: MarkerConfig,
}

/// Values the rig software injects before the state program is loaded
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TouchThresholds {
    /// Upper touch threshold (V); carried for the host, not used by classification
    #[serde(default = "defaults::touch_thresh_high")]
    pub touch_thresh_high: f64,

    /// Lower touch threshold (V); carried for the host, not used by classification
    #[serde(default = "defaults::touch_thresh_low")]
    pub touch_thresh_low: f64,

    /// States in which touches are meant to drive transitions
    #[serde(default = "defaults::touch_relevant_states")]
    pub touch_relevant_states: BTreeSet<u32>,
}

/// Analog input channel assignments
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChannelConfig {
    /// Analog channel of whisker sensor 1
    #[serde(default = "defaults::sensor1")]
    pub sensor1: u32,

    /// Analog channel of whisker sensor 2
    #[serde(default = "defaults::sensor2")]
    pub sensor2: u32,

    /// Channels the host classifier may report on
    #[serde(default = "defaults::lickports")]
    pub lickports: Vec<u32>,
}

/// Voltage thresholds used by the per-tick classification
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DetectionConfig {
    /// Channel 1 positive bound (inclusive)
    #[serde(default = "defaults::channel1_high")]
    pub channel1_high: f64,

    /// Channel 1 negative bound (inclusive)
    #[serde(default = "defaults::channel1_low")]
    pub channel1_low: f64,

    /// Channel 2 positive bound (exclusive)
    #[serde(default = "defaults::channel2_high")]
    pub channel2_high: f64,

    /// Channel 2 low bound (exclusive)
    #[serde(default = "defaults::channel2_low")]
    pub channel2_low: f64,

    /// Mean change above which the contact flag is active
    #[serde(default = "defaults::mean_change")]
    pub mean_change: f64,

    /// Lickport positive bound (inclusive)
    #[serde(default = "defaults::lickport_high")]
    pub lickport_high: f64,

    /// Lickport negative bound (inclusive)
    #[serde(default = "defaults::lickport_low")]
    pub lickport_low: f64,
}

/// State machine ids the monitor reacts to or jumps into
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StateConfig {
    /// Pole-up state; the pole-up wave fires on every tick in it
    #[serde(default = "defaults::pole_up_state")]
    pub pole_up: u32,

    /// Delay state in which a touch aborts the trial
    #[serde(default = "defaults::early_touch_state")]
    pub early_touch: u32,

    /// Response window in which a touch is rewarded
    #[serde(default = "defaults::touch_window_state")]
    pub touch_window: u32,

    /// Jump target after an early touch
    #[serde(default = "defaults::aborted_trial_state")]
    pub aborted_trial: u32,

    /// Jump target after a rewarded touch
    #[serde(default = "defaults::next_trial_state")]
    pub next_trial: u32,

    /// Event id passed with every forced jump
    #[serde(default = "defaults::jump_event_id")]
    pub jump_event_id: i32,
}

/// Scheduled wave ids by symbolic name
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct WaveConfig {
    /// Wave started on a rewarded touch
    #[serde(default = "defaults::touch_onset_wave")]
    pub touch_onset: u32,

    /// Wave restarted on every pole-up tick
    #[serde(default = "defaults::pole_up_wave")]
    pub pole_up: u32,

    /// Cue wave; reserved for the state program
    #[serde(default = "defaults::cue_wave")]
    pub cue: u32,

    /// Go wave; reserved for the state program
    #[serde(default = "defaults::go_wave")]
    pub go: u32,

    /// Noise wave started on an early touch
    #[serde(default = "defaults::noise_wave")]
    pub noise: u32,

    /// Reward wave
    #[serde(default = "defaults::reward_wave")]
    pub reward: u32,
}

/// Experiment-record markers
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MarkerConfig {
    /// Marker logged when a touch forces a jump
    #[serde(default = "defaults::touch_trigger_name")]
    pub touch_trigger_name: String,

    /// Value logged with the touch marker
    #[serde(default = "defaults::touch_trigger_value")]
    pub touch_trigger_value: f64,

    /// Marker logged at trial start
    #[serde(default = "defaults::trial_start_name")]
    pub trial_start_name: String,

    /// Value logged with the trial-start marker
    #[serde(default = "defaults::trial_start_value")]
    pub trial_start_value: f64,
}

/// Default value providers using constants
mod defaults {
    use crate::config::constants::*;
    use std::collections::BTreeSet;

    pub fn touch_thresh_high() -> f64 { thresholds::TOUCH_THRESH_HIGH_V }
    pub fn touch_thresh_low() -> f64 { thresholds::TOUCH_THRESH_LOW_V }
    pub fn touch_relevant_states() -> BTreeSet<u32> { states::TOUCH_RELEVANT.into_iter().collect() }

    pub fn sensor1() -> u32 { channels::SENSOR1_AI_CHANNEL }
    pub fn sensor2() -> u32 { channels::SENSOR2_AI_CHANNEL }
    pub fn lickports() -> Vec<u32> { channels::LICKPORT_CHANNELS.to_vec() }

    pub fn channel1_high() -> f64 { thresholds::SENSOR1_HIGH_V }
    pub fn channel1_low() -> f64 { thresholds::SENSOR1_LOW_V }
    pub fn channel2_high() -> f64 { thresholds::SENSOR2_HIGH_V }
    pub fn channel2_low() -> f64 { thresholds::SENSOR2_LOW_V }
    pub fn mean_change() -> f64 { thresholds::MEAN_CHANGE_V }
    pub fn lickport_high() -> f64 { thresholds::LICKPORT_HIGH_V }
    pub fn lickport_low() -> f64 { thresholds::LICKPORT_LOW_V }

    pub fn pole_up_state() -> u32 { states::POLE_UP }
    pub fn early_touch_state() -> u32 { states::EARLY_TOUCH }
    pub fn touch_window_state() -> u32 { states::TOUCH_WINDOW }
    pub fn aborted_trial_state() -> u32 { states::ABORTED_TRIAL }
    pub fn next_trial_state() -> u32 { states::NEXT_TRIAL }
    pub fn jump_event_id() -> i32 { states::JUMP_EVENT_ID }

    pub fn touch_onset_wave() -> u32 { waves::TOUCH_ONSET }
    pub fn pole_up_wave() -> u32 { waves::POLE_UP }
    pub fn cue_wave() -> u32 { waves::CUE }
    pub fn go_wave() -> u32 { waves::GO }
    pub fn noise_wave() -> u32 { waves::NOISE }
    pub fn reward_wave() -> u32 { waves::REWARD }

    pub fn touch_trigger_name() -> String { markers::TOUCH_TRIGGER_NAME.to_string() }
    pub fn touch_trigger_value() -> f64 { markers::TOUCH_TRIGGER_VALUE }
    pub fn trial_start_name() -> String { markers::TRIAL_START_NAME.to_string() }
    pub fn trial_start_value() -> f64 { markers::TRIAL_START_VALUE }
}

impl Default for TouchThresholds {
    fn default() -> Self {
        Self {
            touch_thresh_high: defaults::touch_thresh_high(),
            touch_thresh_low: defaults::touch_thresh_low(),
            touch_relevant_states: defaults::touch_relevant_states(),
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            sensor1: defaults::sensor1(),
            sensor2: defaults::sensor2(),
            lickports: defaults::lickports(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            channel1_high: defaults::channel1_high(),
            channel1_low: defaults::channel1_low(),
            channel2_high: defaults::channel2_high(),
            channel2_low: defaults::channel2_low(),
            mean_change: defaults::mean_change(),
            lickport_high: defaults::lickport_high(),
            lickport_low: defaults::lickport_low(),
        }
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            pole_up: defaults::pole_up_state(),
            early_touch: defaults::early_touch_state(),
            touch_window: defaults::touch_window_state(),
            aborted_trial: defaults::aborted_trial_state(),
            next_trial: defaults::next_trial_state(),
            jump_event_id: defaults::jump_event_id(),
        }
    }
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            touch_onset: defaults::touch_onset_wave(),
            pole_up: defaults::pole_up_wave(),
            cue: defaults::cue_wave(),
            go: defaults::go_wave(),
            noise: defaults::noise_wave(),
            reward: defaults::reward_wave(),
        }
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            touch_trigger_name: defaults::touch_trigger_name(),
            touch_trigger_value: defaults::touch_trigger_value(),
            trial_start_name: defaults::trial_start_name(),
            trial_start_value: defaults::trial_start_value(),
        }
    }
}

impl TouchThresholds {
    /// True when `state` is listed in `touch_relevant_states`
    pub fn is_touch_relevant(&self, state: StateId) -> bool {
        self.touch_relevant_states.contains(&state.0)
    }
}

impl ChannelConfig {
    /// True when `channel` is a lickport input
    pub fn is_lickport(&self, channel: u32) -> bool {
        self.lickports.contains(&channel)
    }
}

impl StateConfig {
    /// Pole-up state
    pub fn pole_up(&self) -> StateId { StateId(self.pole_up) }
    /// Early-touch (delay) state
    pub fn early_touch(&self) -> StateId { StateId(self.early_touch) }
    /// Response-window state
    pub fn touch_window(&self) -> StateId { StateId(self.touch_window) }
    /// Target after an early touch
    pub fn aborted_trial(&self) -> StateId { StateId(self.aborted_trial) }
    /// Target after a rewarded touch
    pub fn next_trial(&self) -> StateId { StateId(self.next_trial) }
}

impl WaveConfig {
    /// Touch-onset wave
    pub fn touch_onset(&self) -> WaveId { WaveId(self.touch_onset) }
    /// Pole-up wave
    pub fn pole_up(&self) -> WaveId { WaveId(self.pole_up) }
    /// Noise wave
    pub fn noise(&self) -> WaveId { WaveId(self.noise) }
    /// Reward wave
    pub fn reward(&self) -> WaveId { WaveId(self.reward) }
}

/// Configuration utility functions
impl MonitorConfig {
    /// Validate configuration consistency
    pub fn validate_consistency(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let t = &self.thresholds;
        if t.touch_thresh_high <= t.touch_thresh_low {
            errors.push(format!(
                "touch_thresh_high ({}) must be greater than touch_thresh_low ({})",
                t.touch_thresh_high, t.touch_thresh_low
            ));
        }

        let d = &self.detection;
        let ordered = [
            ("channel1", d.channel1_high, d.channel1_low),
            ("channel2", d.channel2_high, d.channel2_low),
            ("lickport", d.lickport_high, d.lickport_low),
        ];
        for (name, high, low) in ordered {
            if !(high > low) {
                errors.push(format!(
                    "{} high threshold ({} V) must be greater than low threshold ({} V)",
                    name, high, low
                ));
            }
        }

        if !(d.mean_change > 0.0) {
            errors.push(format!("mean_change ({} V) must be positive", d.mean_change));
        }

        if self.channels.sensor1 == self.channels.sensor2 {
            errors.push(format!(
                "sensor channels must differ (both are {})",
                self.channels.sensor1
            ));
        }

        // A tick dispatches on exactly one of these
        let s = &self.states;
        let trigger_states = [
            ("pole_up", s.pole_up),
            ("early_touch", s.early_touch),
            ("touch_window", s.touch_window),
        ];
        for (i, (a_name, a)) in trigger_states.iter().enumerate() {
            for (b_name, b) in &trigger_states[i + 1..] {
                if a == b {
                    errors.push(format!("{} and {} share state id {}", a_name, b_name, a));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Get configuration summary
    pub fn get_summary(&self) -> ConfigSummary {
        ConfigSummary {
            sensor_channels: (self.channels.sensor1, self.channels.sensor2),
            lickport_channels: self.channels.lickports.clone(),
            mean_change_v: self.detection.mean_change,
            touch_relevant_states: self.thresholds.touch_relevant_states.iter().copied().collect(),
        }
    }
}

/// Configuration summary for display/logging
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    /// (sensor 1, sensor 2) analog channels
    pub sensor_channels: (u32, u32),
    /// Lickport channels
    pub lickport_channels: Vec<u32>,
    /// Contact-flag threshold in volts
    pub mean_change_v: f64,
    /// States listed as touch-relevant, ascending
    pub touch_relevant_states: Vec<u32>,
}
