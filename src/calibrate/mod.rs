//! Plan calibration.
//!
//! Responsibilities:
//!
//! - smooth recent morning weigh-ins into a moving average
//! - measure the deviation from the linear plan and both loss rates
//! - re-estimate real TDEE from logged intake + observed weight change
//! - propose a corrected daily calorie budget (engine)
//! - commit an accepted proposal onto the plan (apply, explicit only)

pub mod apply;
pub mod engine;

pub use apply::*;
pub use engine::*;
