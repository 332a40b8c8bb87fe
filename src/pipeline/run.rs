// src/pipeline/run.rs

//! Run orchestration.
//!
//! Single pass: load checkpoint, enumerate courses, fan the unprocessed ones
//! out over a bounded worker pool, merge results in completion order, persist
//! the checkpoint after every completion, then write the final export.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};

use crate::error::Result;
use crate::models::{Checkpoint, Config, Course};
use crate::report::Reporter;
use crate::services::{CourseProcessor, PaginatedFetcher};
use crate::storage::{self, CheckpointStore};

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct RunStats {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Courses listed by the account endpoint.
    pub total_courses: usize,

    /// Courses already completed by a prior run and skipped here.
    pub already_processed: usize,

    /// Courses submitted to the worker pool this run.
    pub submitted: usize,

    pub succeeded: usize,
    pub failed: usize,

    /// Distinct login ids in the final teacher map.
    pub teacher_count: usize,
}

impl RunStats {
    pub fn elapsed_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

/// Run the full export.
///
/// Course-scoped fetch failures are reported and left unprocessed for the
/// next run; they never abort the remaining work. The checkpoint is the only
/// shared mutable state, and all merges go through the single collection loop
/// below, so completions are serialized by construction. A teacher appearing
/// in several courses keeps the facts from whichever course merged first —
/// completion order, which is non-deterministic under concurrency.
pub async fn run_export(
    config: Arc<Config>,
    client: reqwest::Client,
    store: &dyn CheckpointStore,
    reporter: Arc<dyn Reporter>,
    term: Option<u64>,
) -> Result<RunStats> {
    let started_at = Utc::now();

    // Init: a corrupt checkpoint fails the run here, before any fetch.
    let mut checkpoint = store.load().await?;

    // Enumerate
    let fetcher = PaginatedFetcher::new(client, Arc::clone(&config), Arc::clone(&reporter));
    let endpoint = courses_endpoint(&config, term);
    log::info!("Fetching course list from {}", endpoint);
    let all_courses: Vec<Course> = fetcher.fetch_all(&endpoint).await?;

    // The submission set is computed once, from the checkpoint snapshot
    // taken at init; no course is processed twice within a run.
    let to_process: Vec<Course> = all_courses
        .iter()
        .filter(|course| !checkpoint.is_processed(course.id))
        .cloned()
        .collect();

    let total = all_courses.len();
    let mut stats = RunStats {
        started_at,
        finished_at: started_at,
        total_courses: total,
        already_processed: total - to_process.len(),
        submitted: to_process.len(),
        succeeded: 0,
        failed: 0,
        teacher_count: 0,
    };

    log::info!(
        "Total courses: {}, to process: {}",
        total,
        to_process.len()
    );

    // Dispatch + collect
    let processor = CourseProcessor::new(fetcher, Arc::clone(&config), Arc::clone(&reporter));
    let processor = &processor;
    let concurrency = config.runner.max_concurrent.max(1);

    let mut completions = stream::iter(to_process)
        .map(|course| async move {
            let result = processor.process(&course).await;
            (course, result)
        })
        .buffer_unordered(concurrency);

    let mut done = stats.already_processed;
    while let Some((course, result)) = completions.next().await {
        match result {
            Ok(teachers) => {
                reporter.course_done(course.id, teachers.len());
                checkpoint.merge_course(course.id, teachers);
                store.save(&checkpoint).await?;

                stats.succeeded += 1;
                done += 1;
                if done % config.runner.progress_interval == 0 {
                    reporter.progress(done, total);
                }
            }
            Err(error) if error.is_course_scoped() => {
                reporter.course_failed(course.id, &error);
                stats.failed += 1;
            }
            Err(error) => return Err(error),
        }
    }

    // Finalize
    write_final_export(&config, &checkpoint)?;
    reporter.progress(done, total);

    stats.teacher_count = checkpoint.teachers.len();
    stats.finished_at = Utc::now();

    log::info!(
        "Run complete in {:.2}s: {} succeeded, {} failed, {} teacher(s) exported to {}",
        stats.elapsed_secs(),
        stats.succeeded,
        stats.failed,
        stats.teacher_count,
        config.paths.export_file
    );

    Ok(stats)
}

/// Endpoint for the account course listing, optionally filtered to a term.
fn courses_endpoint(config: &Config, term: Option<u64>) -> String {
    let api = &config.api;
    let mut endpoint = format!(
        "{}/accounts/{}/courses?per_page={}",
        api.base_url(),
        api.account_id,
        api.per_page
    );
    if let Some(term_id) = term {
        endpoint.push_str(&format!("&enrollment_term_id={term_id}"));
    }
    endpoint
}

fn write_final_export(config: &Config, checkpoint: &Checkpoint) -> Result<()> {
    storage::write_export(Path::new(&config.paths.export_file), &checkpoint.teachers)
}
