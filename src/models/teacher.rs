//! Accumulated teacher facts and the durable progress checkpoint.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// The facts retained for one teacher, keyed by login id across the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherFact {
    pub first_name: String,
    pub last_name: String,
    pub login_id: String,
    pub course_segment: String,
    pub sis_id: String,

    /// Term of the course the teacher was first seen in.
    #[serde(default)]
    pub term_id: Option<u64>,
}

/// Durable snapshot of run progress.
///
/// `processed` only ever grows; `teachers` holds at most one fact per login
/// id. The on-disk form round-trips exactly through serde_json, and a
/// `BTreeMap` keeps export row order stable across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Checkpoint {
    #[serde(default)]
    pub processed: HashSet<u64>,

    #[serde(default)]
    pub teachers: BTreeMap<String, TeacherFact>,
}

impl Checkpoint {
    /// Merge one course's teacher map and mark the course processed.
    ///
    /// First-seen-wins per login id: a teacher already present keeps the
    /// facts from whichever course merged first, so merge order (completion
    /// order under the worker pool) decides attribution for teachers who
    /// appear in multiple courses.
    pub fn merge_course(&mut self, course_id: u64, teachers: BTreeMap<String, TeacherFact>) {
        for (login_id, fact) in teachers {
            self.teachers.entry(login_id).or_insert(fact);
        }
        self.processed.insert(course_id);
    }

    /// Whether a course was already completed in this or a prior run.
    pub fn is_processed(&self, course_id: u64) -> bool {
        self.processed.contains(&course_id)
    }
}
