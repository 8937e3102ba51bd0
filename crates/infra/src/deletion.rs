//! Course deletion cascade.
//!
//! Deletion is **blocked** while any enrollment references the course: the
//! caller must unenroll learners explicitly first. Once clear, every
//! dependent record is removed in a fixed dependency order inside one
//! transaction - children before the parents they are resolved through, so
//! the plan reads top-down like the foreign-key graph.
//!
//! The order is a visible constant rather than an accident of statement
//! order; tests assert both the order and the end state.

use thiserror::Error;
use tracing::info;

use alturas_core::CourseId;

use crate::store::{StoreError, Tables};

/// Why a course could not be deleted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeletionError {
    #[error("course not found")]
    NotFound,

    /// Active enrollments still reference the course.
    #[error("course has {active_enrollments} active enrollment(s); unenroll them before deleting")]
    Blocked { active_enrollments: usize },

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// One layer of the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionStep {
    Certifications,
    Surveys,
    /// Bookings resolve through the course's practice sessions, so they go
    /// before the sessions themselves.
    PracticeBookings,
    PracticeSessions,
    /// Attendance and documents resolve through the course's enrollments.
    AttendanceRecords,
    EnrollmentDocuments,
    Enrollments,
    /// Quiz data resolves through the course's modules.
    QuizAttempts,
    ModuleProgress,
    Questions,
    Modules,
}

/// The fixed, dependency-ordered cascade.
pub const DELETION_PLAN: [DeletionStep; 11] = [
    DeletionStep::Certifications,
    DeletionStep::Surveys,
    DeletionStep::PracticeBookings,
    DeletionStep::PracticeSessions,
    DeletionStep::AttendanceRecords,
    DeletionStep::EnrollmentDocuments,
    DeletionStep::Enrollments,
    DeletionStep::QuizAttempts,
    DeletionStep::ModuleProgress,
    DeletionStep::Questions,
    DeletionStep::Modules,
];

/// Remove the course and every dependent, assuming the blocked-policy check
/// already passed. Runs inside the caller's transaction.
pub(crate) fn execute_plan(tables: &mut Tables, course_id: CourseId) {
    for step in DELETION_PLAN {
        run_step(tables, course_id, step);
    }

    tables.courses.remove(&course_id);
    info!(course_id = %course_id, "course and dependents deleted");
}

fn run_step(tables: &mut Tables, course_id: CourseId, step: DeletionStep) {
    match step {
        DeletionStep::Certifications => {
            tables.certifications.retain(|_, c| c.course_id != course_id);
        }
        DeletionStep::Surveys => {
            tables.surveys.retain(|_, s| s.course_id != Some(course_id));
        }
        DeletionStep::PracticeBookings => {
            let sessions: Vec<_> = tables
                .practice_sessions
                .values()
                .filter(|s| s.course_id == course_id)
                .map(|s| s.id)
                .collect();
            tables
                .practice_bookings
                .retain(|_, b| !sessions.contains(&b.session_id));
        }
        DeletionStep::PracticeSessions => {
            tables.practice_sessions.retain(|_, s| s.course_id != course_id);
        }
        DeletionStep::AttendanceRecords => {
            let enrollments = tables.enrollment_ids_for_course(course_id);
            tables
                .attendance_records
                .retain(|_, a| !enrollments.contains(&a.enrollment_id));
        }
        DeletionStep::EnrollmentDocuments => {
            let enrollments = tables.enrollment_ids_for_course(course_id);
            tables.documents.retain(|_, d| match d.enrollment() {
                Some(e) => !enrollments.contains(&e),
                // Unlinked legacy documents are never touched.
                None => true,
            });
        }
        DeletionStep::Enrollments => {
            tables.enrollments.retain(|_, e| e.course() != Some(course_id));
        }
        DeletionStep::QuizAttempts => {
            let modules = tables.module_ids_for_course(course_id);
            tables
                .quiz_attempts
                .retain(|_, q| !modules.contains(&q.module_id));
        }
        DeletionStep::ModuleProgress => {
            let modules = tables.module_ids_for_course(course_id);
            tables
                .module_progress
                .retain(|_, p| !modules.contains(&p.module_id));
        }
        DeletionStep::Questions => {
            let modules = tables.module_ids_for_course(course_id);
            tables.questions.retain(|_, q| !modules.contains(&q.module_id));
        }
        DeletionStep::Modules => {
            tables.modules.retain(|_, m| m.course_id != course_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_are_removed_before_the_parents_they_resolve_through() {
        fn position(step: DeletionStep) -> usize {
            DELETION_PLAN.iter().position(|s| *s == step).unwrap()
        }

        assert!(position(DeletionStep::PracticeBookings) < position(DeletionStep::PracticeSessions));
        assert!(position(DeletionStep::AttendanceRecords) < position(DeletionStep::Enrollments));
        assert!(position(DeletionStep::EnrollmentDocuments) < position(DeletionStep::Enrollments));
        assert!(position(DeletionStep::QuizAttempts) < position(DeletionStep::Modules));
        assert!(position(DeletionStep::ModuleProgress) < position(DeletionStep::Modules));
        assert!(position(DeletionStep::Questions) < position(DeletionStep::Modules));
    }

    #[test]
    fn plan_covers_every_step_exactly_once() {
        let mut seen = DELETION_PLAN.to_vec();
        seen.dedup();
        assert_eq!(seen.len(), DELETION_PLAN.len());
        assert_eq!(DELETION_PLAN.len(), 11);
    }
}
