//! Input/output at the system boundary.
//!
//! - CSV exports of the weight and meal logs (`export`)
//! - versioned full-state backup bundles, JSON (`backup`)
//!
//! The calibration core never touches these; they only move the domain
//! record shapes in and out of files.

pub mod backup;
pub mod export;

pub use backup::*;
pub use export::*;
