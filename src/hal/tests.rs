// src/hal/tests.rs
//! Unit tests for HAL components

use crate::hal::simulator::{HostCall, SimulatedHost, VoltageSource};
use crate::hal::{
    AnalogInput, ContactFlag, ExperimentLog, ScheduledWaves, StateId, StateMachine, Tristate,
    WaveId,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tristate_default_is_neutral() {
        assert_eq!(Tristate::default(), Tristate::Neutral);
    }

    #[test]
    fn test_contact_flag_edges() {
        use ContactFlag::*;
        assert!(Active.rose_from(Inactive));
        assert!(!Active.rose_from(Active));
        assert!(!Inactive.rose_from(Active));
        assert!(!Inactive.rose_from(Inactive));
    }

    #[test]
    fn test_id_serialization() {
        let json = serde_json::to_string(&StateId(46)).expect("Failed to serialize");
        assert_eq!(json, "46");
        let wave: WaveId = serde_json::from_str("5").expect("Failed to deserialize");
        assert_eq!(wave, WaveId(5));
        assert_eq!(serde_json::to_string(&Tristate::Positive).unwrap(), "\"positive\"");
    }

    #[test]
    fn test_simulated_force_jump_moves_state() {
        let mut host = SimulatedHost::new(StateId(46));
        host.force_jump(StateId(54), 1);

        assert_eq!(host.current_state(), StateId(54));
        assert_eq!(host.jumps(), vec![StateId(54)]);
    }

    #[test]
    fn test_simulated_voltage_sources() {
        let mut host = SimulatedHost::new(StateId(0))
            .with_channel(1, VoltageSource::Script(vec![0.1, 0.2]))
            .with_channel(
                2,
                VoltageSource::Step {
                    at_tick: 2,
                    before: 0.0,
                    after: 1.0,
                },
            );

        let ch1: Vec<f64> = (0..3).map(|_| host.read_voltage(1)).collect();
        let ch2: Vec<f64> = (0..3).map(|_| host.read_voltage(2)).collect();
        assert_eq!(ch1, vec![0.1, 0.2, 0.2]);
        assert_eq!(ch2, vec![0.0, 0.0, 1.0]);
        assert_eq!(host.read_voltage(99), 0.0);
    }

    #[test]
    fn test_jitter_is_bounded_and_seeded() {
        let source = VoltageSource::Jitter {
            base: 1.0,
            amplitude: 0.01,
        };
        let mut a = SimulatedHost::with_seed(StateId(0), 7).with_channel(3, source.clone());
        let mut b = SimulatedHost::with_seed(StateId(0), 7).with_channel(3, source);

        for _ in 0..100 {
            let va = a.read_voltage(3);
            assert!((va - 1.0).abs() <= 0.01);
            assert_eq!(va, b.read_voltage(3));
        }
    }

    #[test]
    fn test_calls_recorded_in_order() {
        let mut host = SimulatedHost::new(StateId(0));
        host.trigger_wave(WaveId(1));
        host.log_scalar("marker", 1.0);
        host.log_array("window", &[0.5, 0.25]);
        let _ = host.current_state();

        assert_eq!(
            host.calls(),
            vec![
                HostCall::TriggerWave { wave: WaveId(1) },
                HostCall::LogScalar { name: "marker".to_string(), value: 1.0 },
                HostCall::LogArray { name: "window".to_string(), values: vec![0.5, 0.25] },
                HostCall::CurrentState,
            ]
        );
        assert_eq!(host.effects().len(), 3);
        assert_eq!(host.wave_count(WaveId(1)), 1);

        host.clear_calls();
        assert!(host.calls().is_empty());
    }
}
