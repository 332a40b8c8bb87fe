//! Field extraction helpers for enrollment records.

pub mod http;

use std::sync::OnceLock;

use regex::Regex;

/// Extract the course segment from a course code.
///
/// Matches an uppercase-letter prefix followed by a `NNNN-NN` suffix, e.g.
/// `"MATH 2024-01"` yields `"MATH"`. No match yields an empty string.
pub fn extract_course_segment(course_code: &str) -> String {
    static SEGMENT: OnceLock<Regex> = OnceLock::new();
    let re = SEGMENT.get_or_init(|| {
        Regex::new(r"\b([A-Z]+)\b \d{4}-\d{2}").expect("course segment pattern is valid")
    });

    re.captures(course_code)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Strip the trailing `_e` cross-listed-section marker from a SIS id.
pub fn clean_sis_id(sis_id: &str) -> String {
    sis_id
        .strip_suffix("_e")
        .unwrap_or(sis_id)
        .to_string()
}

/// Split a full name into (first, last) on the first whitespace boundary.
///
/// Returns `None` when there is no whitespace to split on; callers decide
/// how to treat that record.
pub fn split_full_name(full_name: &str) -> Option<(String, String)> {
    let trimmed = full_name.trim();
    let (first, last) = trimmed.split_once(char::is_whitespace)?;
    Some((first.to_string(), last.trim_start().to_string()))
}
