//! In-memory registry store with all-or-nothing transactions.
//!
//! Stands in for the relational collaborator. Writers run one at a time
//! against a staged copy of the tables; the copy replaces the live state only
//! when the closure succeeds, so a failing operation leaves no partial
//! writes behind. Serializing writers is the in-memory equivalent of the
//! row-level write locks a database transaction would take.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;
use uuid::Uuid;

use alturas_core::{CourseId, DocumentId, EnrollmentId, ModuleId, UserId};
use alturas_courses::{Course, Module};
use alturas_documents::Document;
use alturas_enrollments::Enrollment;
use alturas_identity::UserProfile;

use crate::records::{
    AttendanceRecord, CertificationRecord, ModuleProgressRecord, PracticeBookingRecord,
    PracticeSessionRecord, QuestionRecord, QuizAttemptRecord, SurveyRecord,
};

/// Store operation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Every table the registry keeps.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub users: HashMap<UserId, UserProfile>,
    pub courses: HashMap<CourseId, Course>,
    pub modules: HashMap<ModuleId, Module>,
    pub enrollments: HashMap<EnrollmentId, Enrollment>,
    pub documents: HashMap<DocumentId, Document>,
    pub certifications: HashMap<Uuid, CertificationRecord>,
    pub surveys: HashMap<Uuid, SurveyRecord>,
    pub practice_sessions: HashMap<Uuid, PracticeSessionRecord>,
    pub practice_bookings: HashMap<Uuid, PracticeBookingRecord>,
    pub attendance_records: HashMap<Uuid, AttendanceRecord>,
    pub quiz_attempts: HashMap<Uuid, QuizAttemptRecord>,
    pub module_progress: HashMap<Uuid, ModuleProgressRecord>,
    pub questions: HashMap<Uuid, QuestionRecord>,
}

impl Tables {
    /// The enrollment for a (learner, course) pair, if any. At most one row
    /// exists per pair.
    pub fn enrollment_for(&self, learner: UserId, course: CourseId) -> Option<&Enrollment> {
        self.enrollments
            .values()
            .find(|e| e.learner() == Some(learner) && e.course() == Some(course))
    }

    /// All enrollment ids referencing a course.
    pub fn enrollment_ids_for_course(&self, course: CourseId) -> Vec<EnrollmentId> {
        self.enrollments
            .values()
            .filter(|e| e.course() == Some(course))
            .map(|e| e.id_typed())
            .collect()
    }

    pub fn enrollment_count_for_course(&self, course: CourseId) -> u32 {
        self.enrollments
            .values()
            .filter(|e| e.course() == Some(course))
            .count() as u32
    }

    /// Documents linked to a specific enrollment (legacy unlinked documents
    /// are excluded by construction).
    pub fn documents_for_enrollment(&self, enrollment: EnrollmentId) -> Vec<&Document> {
        self.documents
            .values()
            .filter(|d| d.enrollment() == Some(enrollment))
            .collect()
    }

    pub fn module_ids_for_course(&self, course: CourseId) -> Vec<ModuleId> {
        self.modules
            .values()
            .filter(|m| m.course_id == course)
            .map(|m| m.id)
            .collect()
    }

    pub fn progress_for(&self, user: UserId, module: ModuleId) -> Option<&ModuleProgressRecord> {
        self.module_progress
            .values()
            .find(|p| p.user_id == user && p.module_id == module)
    }
}

/// In-memory registry store.
///
/// Intended for tests/dev and as the reference semantics for a real storage
/// backend. Not optimized for performance.
#[derive(Debug, Default)]
pub struct RegistryStore {
    state: RwLock<Tables>,
}

impl RegistryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` inside one transaction.
    ///
    /// The closure receives a staged copy of all tables. On `Ok` the copy is
    /// swapped in atomically; on `Err` it is dropped and the live state is
    /// untouched.
    pub fn transaction<T, E>(&self, f: impl FnOnce(&mut Tables) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut guard = self.state.write().map_err(|_| StoreError::Poisoned)?;

        let mut staged = guard.clone();
        let value = f(&mut staged)?;
        *guard = staged;

        Ok(value)
    }

    /// Read-only access to the live tables.
    pub fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T, StoreError> {
        let guard = self.state.read().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&guard))
    }
}
