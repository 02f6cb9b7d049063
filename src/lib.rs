//! `lean-track` library crate.
//!
//! The binary (`lean`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., a future web or TUI front end)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod calibrate;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod metabolic;
pub mod report;
pub mod store;
