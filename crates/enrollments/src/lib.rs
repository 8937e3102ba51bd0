//! `alturas-enrollments` — the learner-course relationship and its lifecycle.
//!
//! An enrollment starts `Enrolled`, moves to `InProgress` when the learner
//! first touches course content, and becomes `Completed` when the compliance
//! evaluator confirms every required document is approved. Completion is
//! one-directional: later document rejections never revert it.

pub mod enrollment;

pub use enrollment::{
    CompleteOnCompliance, Enrollment, EnrollmentCommand, EnrollmentEvent, EnrollmentStatus,
    RegisterEnrollment, StartCourse, WithdrawEnrollment,
};
