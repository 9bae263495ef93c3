// src/acquisition/mod.rs
//! Sensor sample buffering

pub mod sample_buffer;

pub use sample_buffer::*;
