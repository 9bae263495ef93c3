// src/acquisition/sample_buffer.rs
//! Fixed-phase sample windows for the two touch sensors
//!
//! Readings are written at a slot chosen by a 1-based cycle counter that
//! wraps back to 1 once it passes the window length. The write position is
//! therefore locked to the tick phase, and the statistics downstream depend
//! on that exact phase.

use crate::config::constants::window::WINDOW_LEN;
use serde::Serialize;

/// Ten voltage slots for one channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleWindow {
    slots: [f64; WINDOW_LEN],
}

/// 1-based write counter shared by both channel windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleCounter {
    value: usize,
}

/// Both sensor windows plus their shared write counter
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorWindows {
    /// Channel 1 readings
    pub sensor1: SampleWindow,
    /// Channel 2 readings
    pub sensor2: SampleWindow,
    counter: CycleCounter,
}

impl SampleWindow {
    /// Create a window with every slot at 0 V
    pub fn new() -> Self {
        Self {
            slots: [0.0; WINDOW_LEN],
        }
    }

    /// Overwrite one slot; `slot` must be below the window length
    pub fn write(&mut self, slot: usize, voltage: f64) {
        self.slots[slot] = voltage;
    }

    /// Raw slot contents in slot order
    pub fn slots(&self) -> &[f64; WINDOW_LEN] {
        &self.slots
    }

    /// Sum of all slots
    pub fn sum(&self) -> f64 {
        self.slots.iter().fold(0.0, |acc, v| acc + v)
    }

    /// Arithmetic mean over all slots, unwritten slots counting as zero
    pub fn mean(&self) -> f64 {
        self.sum() / WINDOW_LEN as f64
    }

    /// Sum of squared slots
    pub fn sum_of_squares(&self) -> f64 {
        self.dot(self)
    }

    /// Slot-wise product sum with another window
    pub fn dot(&self, other: &SampleWindow) -> f64 {
        self.slots
            .iter()
            .zip(other.slots.iter())
            .fold(0.0, |acc, (a, b)| acc + a * b)
    }
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleCounter {
    /// Counter at the first slot
    pub fn new() -> Self {
        Self { value: 1 }
    }

    /// Raw 1-based value; may sit one past the window length until claimed
    pub fn value(&self) -> usize {
        self.value
    }

    /// Slot index for this tick, wrapping the counter to 1 past the window end
    pub fn claim_slot(&mut self) -> usize {
        if self.value > WINDOW_LEN {
            self.value = 1;
        }
        self.value - 1
    }

    /// Step to the next slot
    pub fn advance(&mut self) {
        self.value += 1;
    }
}

impl Default for CycleCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorWindows {
    /// Empty windows with the counter at the first slot
    pub fn new() -> Self {
        Self {
            sensor1: SampleWindow::new(),
            sensor2: SampleWindow::new(),
            counter: CycleCounter::new(),
        }
    }

    /// Store this tick's readings; returns the slot written
    pub fn record(&mut self, v1: f64, v2: f64) -> usize {
        let slot = self.counter.claim_slot();
        self.sensor1.write(slot, v1);
        self.sensor2.write(slot, v2);
        slot
    }

    /// Move the counter on at the end of a tick
    pub fn end_tick(&mut self) {
        self.counter.advance();
    }
}

impl Default for SensorWindows {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_counter_phase() {
        let mut counter = CycleCounter::new();
        let mut slots = Vec::new();
        for _ in 0..25 {
            slots.push(counter.claim_slot());
            counter.advance();
        }

        let expected: Vec<usize> = (0..25).map(|i| i % WINDOW_LEN).collect();
        assert_eq!(slots, expected);
    }

    #[test]
    fn test_counter_wraps_lazily() {
        let mut counter = CycleCounter::new();
        for _ in 0..WINDOW_LEN {
            counter.claim_slot();
            counter.advance();
        }
        // Past the end until the next claim resets it
        assert_eq!(counter.value(), WINDOW_LEN + 1);
        assert_eq!(counter.claim_slot(), 0);
        assert_eq!(counter.value(), 1);
    }

    #[test]
    fn test_empty_window_statistics() {
        let window = SampleWindow::new();
        assert_eq!(window.sum(), 0.0);
        assert_eq!(window.mean(), 0.0);
        assert_eq!(window.sum_of_squares(), 0.0);
    }

    #[test]
    fn test_partial_window_mean_counts_zeros() {
        let mut window = SampleWindow::new();
        window.write(0, 1.0);
        window.write(1, 1.0);
        assert!((window.mean() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_dot_product() {
        let mut a = SampleWindow::new();
        let mut b = SampleWindow::new();
        a.write(0, 2.0);
        a.write(3, 1.5);
        b.write(0, 0.5);
        b.write(3, 4.0);
        assert_eq!(a.dot(&b), 7.0);
        assert_eq!(a.sum_of_squares(), 6.25);
    }

    #[test]
    fn test_sensor_windows_share_slot() {
        let mut windows = SensorWindows::new();
        assert_eq!(windows.record(1.0, -1.0), 0);
        windows.end_tick();
        assert_eq!(windows.record(2.0, -2.0), 1);

        assert_eq!(windows.sensor1.slots()[1], 2.0);
        assert_eq!(windows.sensor2.slots()[1], -2.0);
    }

    proptest! {
        #[test]
        fn prop_mean_is_average_of_last_rotation(
            values in prop::collection::vec(-5.0f64..5.0, WINDOW_LEN)
        ) {
            let mut windows = SensorWindows::new();
            for &v in &values {
                windows.record(v, 0.0);
                windows.end_tick();
            }
            let expected = values.iter().sum::<f64>() / WINDOW_LEN as f64;
            prop_assert!((windows.sensor1.mean() - expected).abs() < 1e-9);

            let first = windows.sensor1.mean();
            for &v in &values {
                windows.record(v, 0.0);
                windows.end_tick();
            }
            prop_assert_eq!(windows.sensor1.mean(), first);
        }
    }
}
