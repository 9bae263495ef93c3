// src/processing/mod.rs
//! Touch detection for the behavioral rig

pub mod classifier;
pub mod monitor;
pub mod protocol;
pub mod statistics;

pub use classifier::*;
pub use monitor::*;
pub use statistics::*;
