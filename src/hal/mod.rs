// src/hal/mod.rs
//! Host abstraction layer for the rig runtime

pub mod traits;
pub mod types;
pub mod simulator;

#[cfg(test)]
mod tests;

pub use traits::*;
pub use types::*;
