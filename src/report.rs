// src/report.rs

//! Run observability seam.
//!
//! Retry, failure, and progress events go through a single `Reporter`
//! capability instead of ad-hoc print calls, so tests can assert on events
//! without capturing console output.

use std::time::Duration;

use crate::error::AppError;

/// Receiver for fetch and orchestration events.
pub trait Reporter: Send + Sync {
    /// A page request failed with a retryable error and will be retried.
    fn retrying(&self, url: &str, attempt: u32, max_attempts: u32, delay: Duration);

    /// A course completed successfully.
    fn course_done(&self, course_id: u64, teacher_count: usize);

    /// A course failed; it stays unprocessed and will be retried next run.
    fn course_failed(&self, course_id: u64, error: &AppError);

    /// A single enrollment record was skipped as malformed.
    fn malformed_record(&self, course_id: u64, detail: &str);

    /// Periodic progress: completed courses out of the total for this run.
    fn progress(&self, done: usize, total: usize);
}

/// Production reporter backed by the `log` facade.
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn retrying(&self, url: &str, attempt: u32, max_attempts: u32, delay: Duration) {
        log::warn!(
            "Retrying {} (attempt {}/{}) after {}ms",
            url,
            attempt,
            max_attempts,
            delay.as_millis()
        );
    }

    fn course_done(&self, course_id: u64, teacher_count: usize) {
        log::debug!("Course {} done: {} teacher(s)", course_id, teacher_count);
    }

    fn course_failed(&self, course_id: u64, error: &AppError) {
        log::error!("Course {} failed, will retry next run: {}", course_id, error);
    }

    fn malformed_record(&self, course_id: u64, detail: &str) {
        log::warn!("Skipping malformed record in course {}: {}", course_id, detail);
    }

    fn progress(&self, done: usize, total: usize) {
        log::info!("Courses completed: {}/{}", done, total);
    }
}
