// src/hal/types.rs
//! Core types shared between the touch monitor and its host runtime

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node in the host-owned behavioral state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(pub u32);

/// Identifier of a pre-programmed scheduled wave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaveId(pub u32);

/// Discretized threshold result for a single voltage reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tristate {
    /// At or beyond the low bound
    Negative,
    /// Between the bounds
    #[default]
    Neutral,
    /// At or beyond the high bound
    Positive,
}

/// Combined binary contact signal derived from the channel-1 mean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactFlag {
    /// Mean change within the threshold
    #[default]
    Inactive,
    /// Mean change above the threshold
    Active,
}

impl ContactFlag {
    /// True for [`ContactFlag::Active`]
    pub fn is_active(self) -> bool {
        self == ContactFlag::Active
    }

    /// True when this tick is active and the previous one was not
    pub fn rose_from(self, previous: ContactFlag) -> bool {
        self.is_active() && !previous.is_active()
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state {}", self.0)
    }
}

impl fmt::Display for WaveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wave {}", self.0)
    }
}

impl From<u32> for StateId {
    fn from(id: u32) -> Self {
        StateId(id)
    }
}

impl From<u32> for WaveId {
    fn from(id: u32) -> Self {
        WaveId(id)
    }
}
