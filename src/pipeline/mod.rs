//! Pipeline entry points.
//!
//! - `run_export`: full checkpoint-resumable export run

pub mod run;

pub use run::{RunStats, run_export};
