//! Enrollment operations: registration, withdrawal, progress.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use tracing::info;
use uuid::Uuid;

use alturas_core::{Aggregate as _, AggregateRoot as _, CourseId, DomainError, ModuleId, UserId};
use alturas_enrollments::{
    Enrollment, EnrollmentCommand, EnrollmentStatus, RegisterEnrollment, StartCourse,
    WithdrawEnrollment,
};
use alturas_events::{EventBus, EventEnvelope};

use crate::error::RegistryError;
use crate::records::{ModuleProgressRecord, ProgressStatus};
use crate::services::publish_all;
use crate::store::RegistryStore;

const AGGREGATE_TYPE: &str = "enrollments.enrollment";

/// Enrollment service.
pub struct EnrollmentService<B> {
    store: Arc<RegistryStore>,
    bus: Arc<B>,
}

impl<B> EnrollmentService<B>
where
    B: EventBus<EventEnvelope<JsonValue>>,
{
    pub fn new(store: Arc<RegistryStore>, bus: Arc<B>) -> Self {
        Self { store, bus }
    }

    /// Enroll a learner in a course.
    ///
    /// Idempotent per (learner, course): a second call returns the existing
    /// enrollment unchanged and creates no row.
    pub fn enroll(
        &self,
        learner: UserId,
        course: CourseId,
        now: DateTime<Utc>,
    ) -> Result<Enrollment, RegistryError> {
        let (enrollment, events) = self.store.transaction(|tables| {
            if !tables.users.contains_key(&learner) {
                return Err(RegistryError::from(DomainError::NotFound));
            }
            if !tables.courses.contains_key(&course) {
                return Err(RegistryError::from(DomainError::NotFound));
            }

            if let Some(existing) = tables.enrollment_for(learner, course) {
                return Ok((existing.clone(), Vec::new()));
            }

            let enrollment_id = alturas_core::EnrollmentId::new();
            let mut enrollment = Enrollment::empty(enrollment_id);
            let cmd = EnrollmentCommand::RegisterEnrollment(RegisterEnrollment {
                enrollment_id,
                learner,
                course,
                occurred_at: now,
            });
            let events = enrollment.handle(&cmd)?;
            for event in &events {
                enrollment.apply(event);
            }

            tables.enrollments.insert(enrollment_id, enrollment.clone());
            Ok((enrollment, events))
        })?;

        if !events.is_empty() {
            publish_all(
                self.bus.as_ref(),
                Uuid::from(enrollment.id_typed()),
                AGGREGATE_TYPE,
                enrollment.version(),
                &events,
            )?;
            info!(enrollment_id = %enrollment.id_typed(), %learner, %course, "learner enrolled");
        }

        Ok(enrollment)
    }

    /// Remove a learner from a course (hard delete of the enrollment row).
    pub fn unenroll(
        &self,
        course: CourseId,
        learner: UserId,
        now: DateTime<Utc>,
    ) -> Result<(), RegistryError> {
        let (enrollment, events) = self.store.transaction::<_, RegistryError>(|tables| {
            let existing = tables
                .enrollment_for(learner, course)
                .cloned()
                .ok_or(DomainError::NotFound)?;

            let cmd = EnrollmentCommand::WithdrawEnrollment(WithdrawEnrollment {
                enrollment_id: existing.id_typed(),
                occurred_at: now,
            });
            let events = existing.handle(&cmd)?;
            let mut enrollment = existing;
            for event in &events {
                enrollment.apply(event);
            }

            tables.enrollments.remove(&enrollment.id_typed());
            Ok((enrollment, events))
        })?;

        publish_all(
            self.bus.as_ref(),
            Uuid::from(enrollment.id_typed()),
            AGGREGATE_TYPE,
            enrollment.version(),
            &events,
        )?;

        info!(enrollment_id = %enrollment.id_typed(), "learner unenrolled");
        Ok(())
    }

    /// Record a learner's progress on a module.
    ///
    /// The first activity flips the enrollment from `Enrolled` to
    /// `InProgress`; later calls only update the progress record. Returns
    /// the (possibly updated) enrollment status.
    pub fn record_module_progress(
        &self,
        learner: UserId,
        course: CourseId,
        module_id: ModuleId,
        status: ProgressStatus,
        seconds_spent: u32,
        now: DateTime<Utc>,
    ) -> Result<EnrollmentStatus, RegistryError> {
        let (enrollment, events) = self.store.transaction(|tables| {
            let existing = tables
                .enrollment_for(learner, course)
                .cloned()
                .ok_or(DomainError::NotFound)?;

            let module_belongs = tables
                .modules
                .get(&module_id)
                .is_some_and(|m| m.course_id == course);
            if !module_belongs {
                return Err(RegistryError::from(DomainError::NotFound));
            }

            let existing_progress = tables.progress_for(learner, module_id).map(|p| p.id);
            match existing_progress {
                Some(id) => {
                    if let Some(progress) = tables.module_progress.get_mut(&id) {
                        progress.status = status;
                        progress.seconds_spent = seconds_spent;
                        progress.last_updated = now;
                    }
                }
                None => {
                    let record = ModuleProgressRecord {
                        id: Uuid::now_v7(),
                        user_id: learner,
                        module_id,
                        status,
                        seconds_spent,
                        last_updated: now,
                    };
                    tables.module_progress.insert(record.id, record);
                }
            }

            let cmd = EnrollmentCommand::StartCourse(StartCourse {
                enrollment_id: existing.id_typed(),
                occurred_at: now,
            });
            let events = existing.handle(&cmd)?;
            let mut enrollment = existing;
            for event in &events {
                enrollment.apply(event);
            }

            tables
                .enrollments
                .insert(enrollment.id_typed(), enrollment.clone());
            Ok((enrollment, events))
        })?;

        if !events.is_empty() {
            publish_all(
                self.bus.as_ref(),
                Uuid::from(enrollment.id_typed()),
                AGGREGATE_TYPE,
                enrollment.version(),
                &events,
            )?;
        }

        Ok(enrollment.status())
    }
}
