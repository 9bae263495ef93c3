// src/processing/protocol.rs
//! Lifecycle hooks the rig scheduler calls on the touch monitor

use crate::hal::{Host, ProtocolHooks, Tristate};
use crate::processing::classifier::classify_configured;
use crate::processing::monitor::{TickReport, TouchMonitor};
use tracing::debug;

impl ProtocolHooks for TouchMonitor {
    type Report = TickReport;

    /// No host side effects; only reports the active configuration
    fn init<H: Host>(&mut self, _host: &mut H) {
        let summary = self.config().get_summary();
        debug!(?summary, "touch monitor initialised");
    }

    /// Stamp the trial boundary in the experiment record
    fn start_trial<H: Host>(&mut self, host: &mut H) {
        let markers = &self.config().markers;
        host.log_scalar(&markers.trial_start_name, markers.trial_start_value);
        debug!(tick = self.ticks(), "trial started");
    }

    fn tick<H: Host>(&mut self, host: &mut H) -> TickReport {
        self.process_tick(host)
    }

    fn thresh(&self, channel: u32, voltage: f64) -> Tristate {
        let config = self.config();
        classify_configured(channel, voltage, &config.channels, &config.detection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::simulator::{HostCall, SimulatedHost};
    use crate::hal::StateId;

    #[test]
    fn test_init_has_no_host_effects() {
        let mut monitor = TouchMonitor::with_defaults();
        let mut host = SimulatedHost::new(StateId(40));
        monitor.init(&mut host);

        assert!(host.calls().is_empty());
        assert_eq!(monitor.ticks(), 0);
    }

    #[test]
    fn test_start_trial_logs_marker() {
        let mut monitor = TouchMonitor::with_defaults();
        let mut host = SimulatedHost::new(StateId(40));
        monitor.start_trial(&mut host);

        assert_eq!(
            host.calls(),
            vec![HostCall::LogScalar {
                name: "entered_state_40".to_string(),
                value: 1.0,
            }]
        );
    }

    #[test]
    fn test_thresh_delegates_to_lickport_classifier() {
        let monitor = TouchMonitor::with_defaults();
        assert_eq!(monitor.thresh(0, 4.2), Tristate::Positive);
        assert_eq!(monitor.thresh(1, 2.0), Tristate::Negative);
        assert_eq!(monitor.thresh(7, 10.0), Tristate::Neutral);
        assert_eq!(monitor.thresh(9, -10.0), Tristate::Neutral);
    }

    #[test]
    fn test_tick_hook_advances_monitor() {
        let mut monitor = TouchMonitor::with_defaults();
        let mut host = SimulatedHost::new(StateId(0));
        let report = ProtocolHooks::tick(&mut monitor, &mut host);

        assert_eq!(report.tick, 0);
        assert_eq!(monitor.ticks(), 1);
    }
}
