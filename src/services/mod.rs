// src/services/mod.rs

//! Service layer: the paginated fetch engine and the per-course processor.

mod enrollments;
mod paginate;

pub use enrollments::CourseProcessor;
pub use paginate::PaginatedFetcher;
