//! Enrollment Module
//! Mission: Idempotent bidirectional user/category link maintenance

pub mod api;
pub mod coordinator;

pub use api::EnrollState;
pub use coordinator::{EnrollError, EnrollmentCoordinator, EnrollmentOutcome};
