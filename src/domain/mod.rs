//! Domain types shared across the crate.
//!
//! This module defines:
//!
//! - the active plan (`UserConfig`) and its input enums (`Gender`, `ActivityLevel`)
//! - persisted records (`WeightEntry`, `MealEntry`)
//! - calibration outputs (`CalibrationResult`, `MacroSplit`, `Direction`)
//! - the portable backup bundle (`Backup`)

pub mod types;

pub use types::*;
