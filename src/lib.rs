//! Touch-Core: real-time touch detection for behavioral-experiment rigs
//!
//! This library implements the per-tick callbacks a rig runtime calls while a
//! trial state machine runs. It features:
//!
//! - Fixed-phase sample windows over two whisker-sensor channels
//! - Tri-state contact classification and a combined contact flag
//! - State-gated trial control (scheduled waves, forced jumps, markers)
//! - A lickport-only threshold classifier for the host's input events
//! - Layered configuration and a recording simulated host
//!
//! # Quick Start
//!
//! ```rust
//! use touch_core::hal::simulator::{SimulatedHost, VoltageSource};
//! use touch_core::{ProtocolHooks, StateId, TouchMonitor};
//!
//! let mut monitor = TouchMonitor::with_defaults();
//! let mut host = SimulatedHost::new(StateId(47))
//!     .with_channel(7, VoltageSource::Step { at_tick: 3, before: 0.0, after: 0.5 });
//!
//! monitor.init(&mut host);
//! monitor.start_trial(&mut host);
//! for _ in 0..5 {
//!     let report = monitor.tick(&mut host);
//!     if let Some(target) = report.jumped_to() {
//!         println!("jumped to {}", target);
//!     }
//! }
//! assert_eq!(host.state(), StateId(48));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod acquisition;
pub mod config;
pub mod error;
pub mod hal;
pub mod processing;

// Re-export commonly used types for convenience
pub use crate::config::{ConfigLoader, MonitorConfig, TouchThresholds};
pub use error::{TouchError, TouchResult};
pub use hal::{
    AnalogInput, ContactFlag, ExperimentLog, Host, ProtocolHooks, ScheduledWaves, StateId,
    StateMachine, Tristate, WaveId,
};
pub use processing::{classify, Action, TickReport, TouchMonitor};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: "Real-time touch detection callbacks for behavioral rigs".to_string(),
        features: vec![
            "Fixed-phase sensor windows".to_string(),
            "State-gated trial control".to_string(),
            "Lickport threshold classifier".to_string(),
            "Layered configuration".to_string(),
        ],
    }
}

/// Library version information
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Library name
    pub name: String,
    /// Version string
    pub version: String,
    /// Description
    pub description: String,
    /// List of features
    pub features: Vec<String>,
}
