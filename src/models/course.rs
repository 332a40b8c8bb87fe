//! Wire types for the upstream enrollment API.

use serde::{Deserialize, Serialize};

/// A course as listed by the account courses endpoint.
///
/// Identity is `id`; the upstream API is the source of truth and these
/// records are read-only to this tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: u64,

    #[serde(default)]
    pub course_code: String,

    /// Term is optional on the wire; missing terms export as empty.
    #[serde(default)]
    pub enrollment_term_id: Option<u64>,
}

/// A single enrollment record from a course's enrollments endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Enrollment {
    pub user: EnrollmentUser,
}

/// The user embedded in an enrollment record.
#[derive(Debug, Clone, Deserialize)]
pub struct EnrollmentUser {
    #[serde(default)]
    pub name: String,

    /// Absent for some service accounts; such records are malformed here.
    #[serde(default)]
    pub login_id: Option<String>,

    #[serde(default)]
    pub sis_user_id: Option<String>,
}
