//! Synthetic demo history generation.
//!
//! Lets someone try the tracker (status, history, calibration) without weeks
//! of real logging. Generation is seeded and fully deterministic.

pub mod sample;

pub use sample::*;
