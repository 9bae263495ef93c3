// src/processing/classifier.rs
//! Threshold classification of sensor and lickport voltages

use crate::config::constants::{channels, thresholds};
use crate::config::{ChannelConfig, DetectionConfig};
use crate::hal::{ContactFlag, Tristate};
use serde::Serialize;

/// Tri-state values of both touch sensors for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SensorStates {
    /// Channel 1 state
    pub sensor1: Tristate,
    /// Channel 2 state
    pub sensor2: Tristate,
}

/// Classify channel 1: both bounds inclusive.
pub fn classify_sensor1(voltage: f64, detection: &DetectionConfig) -> Tristate {
    if voltage >= detection.channel1_high {
        Tristate::Positive
    } else if voltage <= detection.channel1_low {
        Tristate::Negative
    } else {
        Tristate::Neutral
    }
}

/// Classify both sensors from their instantaneous voltages.
///
/// Channel 2 uses exclusive bounds. A channel-2 reading below its low bound
/// marks *channel 1* positive and leaves channel 2 at its previous value;
/// rig analyses recorded so far were produced with this behavior, so it is
/// kept as is.
pub fn classify_sensors(
    v1: f64,
    v2: f64,
    previous: SensorStates,
    detection: &DetectionConfig,
) -> SensorStates {
    let mut sensor1 = classify_sensor1(v1, detection);
    let sensor2 = if v2 > detection.channel2_high {
        Tristate::Positive
    } else if v2 < detection.channel2_low {
        sensor1 = Tristate::Positive;
        previous.sensor2
    } else {
        Tristate::Neutral
    };

    SensorStates { sensor1, sensor2 }
}

/// Combined contact flag from the change of the channel-1 mean (exclusive).
pub fn contact_flag(mean_change: f64, threshold: f64) -> ContactFlag {
    if mean_change > threshold {
        ContactFlag::Active
    } else {
        ContactFlag::Inactive
    }
}

/// Lickport voltage against inclusive bounds
fn lickport_level(voltage: f64, high: f64, low: f64) -> Tristate {
    if voltage >= high {
        Tristate::Positive
    } else if voltage <= low {
        Tristate::Negative
    } else {
        Tristate::Neutral
    }
}

/// Host input-event classifier with the rig's default lickport wiring.
///
/// Only lickport channels ever leave neutral; every other channel is held
/// neutral so the host never raises its own events on the sensor inputs.
pub fn classify(channel: u32, voltage: f64) -> Tristate {
    if !channels::LICKPORT_CHANNELS.contains(&channel) {
        return Tristate::Neutral;
    }
    lickport_level(voltage, thresholds::LICKPORT_HIGH_V, thresholds::LICKPORT_LOW_V)
}

/// Same classifier driven by a loaded configuration
pub fn classify_configured(
    channel: u32,
    voltage: f64,
    channels: &ChannelConfig,
    detection: &DetectionConfig,
) -> Tristate {
    if !channels.is_lickport(channel) {
        return Tristate::Neutral;
    }
    lickport_level(voltage, detection.lickport_high, detection.lickport_low)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection() -> DetectionConfig {
        DetectionConfig::default()
    }

    #[test]
    fn test_sensor1_bounds_inclusive() {
        let d = detection();
        assert_eq!(classify_sensor1(0.2, &d), Tristate::Positive);
        assert_eq!(classify_sensor1(-0.2, &d), Tristate::Negative);
        assert_eq!(classify_sensor1(0.05, &d), Tristate::Neutral);
        assert_eq!(classify_sensor1(0.199, &d), Tristate::Neutral);
        assert_eq!(classify_sensor1(-0.199, &d), Tristate::Neutral);
    }

    #[test]
    fn test_sensor2_bounds_exclusive() {
        let d = detection();
        let prev = SensorStates::default();
        assert_eq!(classify_sensors(0.0, 0.021, prev, &d).sensor2, Tristate::Neutral);
        assert_eq!(classify_sensors(0.0, 0.0211, prev, &d).sensor2, Tristate::Positive);
        assert_eq!(classify_sensors(0.0, -0.21, prev, &d), SensorStates::default());
    }

    #[test]
    fn test_sensor2_negative_overwrites_sensor1() {
        // Known quirk: channel 2 going low marks channel 1 positive
        let d = detection();
        let prev = SensorStates {
            sensor1: Tristate::Neutral,
            sensor2: Tristate::Positive,
        };

        let states = classify_sensors(-0.5, -0.3, prev, &d);
        assert_eq!(states.sensor1, Tristate::Positive);
        assert_eq!(states.sensor2, Tristate::Positive);

        let prev = SensorStates::default();
        let states = classify_sensors(0.0, -0.3, prev, &d);
        assert_eq!(states.sensor1, Tristate::Positive);
        assert_eq!(states.sensor2, Tristate::Neutral);
    }

    #[test]
    fn test_contact_flag_threshold_exclusive() {
        assert_eq!(contact_flag(0.003, 0.0027), ContactFlag::Active);
        assert_eq!(contact_flag(0.002, 0.0027), ContactFlag::Inactive);
        assert_eq!(contact_flag(0.0027, 0.0027), ContactFlag::Inactive);
    }

    #[test]
    fn test_lickport_classification() {
        assert_eq!(classify(0, 4.0), Tristate::Positive);
        assert_eq!(classify(1, 5.0), Tristate::Positive);
        assert_eq!(classify(0, 3.0), Tristate::Negative);
        assert_eq!(classify(1, 0.0), Tristate::Negative);
        assert_eq!(classify(0, 3.5), Tristate::Neutral);
    }

    #[test]
    fn test_non_lickport_always_neutral() {
        for channel in [2, 7, 9, 15] {
            assert_eq!(classify(channel, 10.0), Tristate::Neutral);
            assert_eq!(classify(channel, -10.0), Tristate::Neutral);
            assert_eq!(classify(channel, 3.5), Tristate::Neutral);
        }
    }

    #[test]
    fn test_configured_lickports() {
        let mut channels = ChannelConfig::default();
        channels.lickports = vec![4];
        let d = detection();

        assert_eq!(classify_configured(4, 4.5, &channels, &d), Tristate::Positive);
        assert_eq!(classify_configured(4, 3.0, &channels, &d), Tristate::Negative);
        assert_eq!(classify_configured(4, 3.5, &channels, &d), Tristate::Neutral);
        assert_eq!(classify_configured(0, 4.5, &channels, &d), Tristate::Neutral);
        assert_eq!(classify_configured(0, 0.0, &channels, &d), Tristate::Neutral);
    }
}
