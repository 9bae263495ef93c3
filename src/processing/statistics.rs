// src/processing/statistics.rs
//! Per-channel running statistics over the sample windows

use serde::Serialize;

/// Mean, previous mean and dispersion proxy for one channel
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RunningStats {
    /// Window mean after this tick's write
    pub mean: f64,
    /// Window mean at the end of the previous tick
    pub previous_mean: f64,
    /// `|sum_sq - previous_mean|`, from the window as it stood before this tick's write
    pub dispersion: f64,
    /// `|mean - previous_mean|`
    pub mean_change: f64,
}

/// Dispersion proxy used by the rig: the absolute distance between a
/// product sum of the previous window and the previous mean.
///
/// This is not a standard deviation and must not be turned into one; the
/// timing of downstream decisions was tuned against this exact value.
pub fn dispersion(product_sum: f64, previous_mean: f64) -> f64 {
    (product_sum - previous_mean).abs()
}

impl RunningStats {
    /// All statistics at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispersion from the previous tick's window, before any new sample lands
    pub fn update_dispersion(&mut self, product_sum: f64) {
        self.dispersion = dispersion(product_sum, self.previous_mean);
    }

    /// Record the mean of the window after this tick's write
    pub fn update_mean(&mut self, mean: f64) {
        self.mean = mean;
        self.mean_change = (mean - self.previous_mean).abs();
    }

    /// Carry the current mean over as the next tick's previous mean
    pub fn end_tick(&mut self) {
        self.previous_mean = self.mean;
    }
}
