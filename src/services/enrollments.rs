// src/services/enrollments.rs

//! Course processor service.
//!
//! Reduces one course's teacher enrollments to a per-course map of teacher
//! facts. Merging across courses is the orchestrator's job.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{Config, Course, Enrollment, EnrollmentUser, TeacherFact};
use crate::report::Reporter;
use crate::services::PaginatedFetcher;
use crate::utils::{clean_sis_id, extract_course_segment, split_full_name};

/// Service for extracting teacher facts from a course's enrollments.
pub struct CourseProcessor {
    fetcher: PaginatedFetcher,
    config: Arc<Config>,
    reporter: Arc<dyn Reporter>,
}

impl CourseProcessor {
    pub fn new(fetcher: PaginatedFetcher, config: Arc<Config>, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            fetcher,
            config,
            reporter,
        }
    }

    /// Fetch the course's teacher enrollments and reduce them to facts.
    ///
    /// Malformed records (no login id, or a full name with no whitespace to
    /// split on) are skipped and reported rather than failing the course.
    /// Fetch failures propagate unchanged.
    pub async fn process(&self, course: &Course) -> Result<BTreeMap<String, TeacherFact>> {
        let endpoint = self.enrollments_endpoint(course.id);
        let enrollments: Vec<Enrollment> = self.fetcher.fetch_all(&endpoint).await?;

        let segment = extract_course_segment(&course.course_code);
        let mut teachers = BTreeMap::new();

        for enrollment in enrollments {
            match to_fact(course, &segment, &enrollment.user) {
                Ok(fact) => {
                    teachers.entry(fact.login_id.clone()).or_insert(fact);
                }
                Err(AppError::MalformedRecord { message, .. }) => {
                    self.reporter.malformed_record(course.id, &message);
                }
                Err(other) => return Err(other),
            }
        }

        Ok(teachers)
    }

    /// Endpoint for a course's enrollments, filtered to the configured role.
    fn enrollments_endpoint(&self, course_id: u64) -> String {
        let api = &self.config.api;
        format!(
            "{}/courses/{}/enrollments?type[]={}&per_page={}",
            api.base_url(),
            course_id,
            api.role,
            api.per_page
        )
    }
}

/// Build the teacher fact for one enrollment record.
fn to_fact(course: &Course, segment: &str, user: &EnrollmentUser) -> Result<TeacherFact> {
    let login_id = user
        .login_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::malformed(course.id, format!("no login id for '{}'", user.name)))?;

    let (first_name, last_name) = split_full_name(&user.name).ok_or_else(|| {
        AppError::malformed(
            course.id,
            format!("cannot split name '{}' for {}", user.name, login_id),
        )
    })?;

    Ok(TeacherFact {
        first_name,
        last_name,
        login_id: login_id.to_string(),
        course_segment: segment.to_string(),
        sis_id: clean_sis_id(user.sis_user_id.as_deref().unwrap_or("")),
        term_id: course.enrollment_term_id,
    })
}
