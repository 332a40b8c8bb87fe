// src/models/mod.rs

//! Domain models for the roster exporter.
//!
//! Wire types mirror the upstream API payloads; checkpoint types are the
//! durable representation of run progress.

mod config;
mod course;
mod teacher;

// Re-export all public types
pub use config::{ApiConfig, Config, FetcherConfig, PathsConfig, RunnerConfig};
pub use course::{Course, Enrollment, EnrollmentUser};
pub use teacher::{Checkpoint, TeacherFact};
