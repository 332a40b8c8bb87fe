//! Final CSV export.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::TeacherFact;

/// Fixed header row of the export artifact.
const HEADER: [&str; 6] = [
    "First Name",
    "Last Name",
    "Login ID",
    "Course Segment",
    "SIS ID",
    "Term ID",
];

/// Write the accumulated teacher map as a CSV file, one row per login id.
pub fn write_export(path: &Path, teachers: &BTreeMap<String, TeacherFact>) -> Result<()> {
    let fail = |e: &dyn fmt::Display| AppError::export(path.display().to_string(), e);

    let mut writer = csv::Writer::from_path(path).map_err(|e| fail(&e))?;
    writer.write_record(HEADER).map_err(|e| fail(&e))?;

    for fact in teachers.values() {
        let term = fact.term_id.map(|t| t.to_string()).unwrap_or_default();
        writer
            .write_record([
                fact.first_name.as_str(),
                fact.last_name.as_str(),
                fact.login_id.as_str(),
                fact.course_segment.as_str(),
                fact.sis_id.as_str(),
                term.as_str(),
            ])
            .map_err(|e| fail(&e))?;
    }

    writer.flush().map_err(|e| fail(&e))?;
    Ok(())
}
