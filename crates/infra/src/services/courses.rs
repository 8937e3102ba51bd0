//! Course catalog operations.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use tracing::info;
use uuid::Uuid;

use alturas_core::{AggregateRoot as _, Aggregate as _, CourseId, DomainError, UserId};
use alturas_courses::{
    Course, CourseCommand, CourseDelivery, CreateCourse, RequiredDocuments, UpdateCourse,
    seed_modules,
};
use alturas_events::{EventBus, EventEnvelope};
use alturas_identity::check_trainer_eligible;

use crate::deletion::{DeletionError, execute_plan};
use crate::error::RegistryError;
use crate::services::publish_all;
use crate::store::RegistryStore;

const AGGREGATE_TYPE: &str = "courses.course";

/// Fields for course creation. Already validated at the boundary: the core
/// never sees an empty string masquerading as a missing value.
#[derive(Debug, Clone)]
pub struct CreateCourseInput {
    pub course_id: CourseId,
    pub name: String,
    pub description: Option<String>,
    pub required_hours: u32,
    pub delivery: CourseDelivery,
    pub price: u64,
    pub required_documents: RequiredDocuments,
    pub start_date: Option<DateTime<Utc>>,
    pub duration_days: u32,
    pub location: Option<String>,
    pub capacity: u32,
    pub trainer: Option<UserId>,
}

/// Fields for course update. Updates replace the whole record; omitting a
/// field is expressed as `None`, not as "keep the old value".
#[derive(Debug, Clone)]
pub struct UpdateCourseInput {
    pub course_id: CourseId,
    pub name: String,
    pub description: Option<String>,
    pub required_hours: u32,
    pub delivery: CourseDelivery,
    pub price: u64,
    pub required_documents: RequiredDocuments,
    pub start_date: Option<DateTime<Utc>>,
    pub duration_days: u32,
    pub location: Option<String>,
    pub capacity: u32,
    pub trainer: Option<UserId>,
}

/// Course catalog service.
pub struct CourseService<B> {
    store: Arc<RegistryStore>,
    bus: Arc<B>,
}

impl<B> CourseService<B>
where
    B: EventBus<EventEnvelope<JsonValue>>,
{
    pub fn new(store: Arc<RegistryStore>, bus: Arc<B>) -> Self {
        Self { store, bus }
    }

    /// Create a course: gate the trainer's license, derive the code, seed
    /// the syllabus modules, persist everything in one transaction.
    pub fn create_course(
        &self,
        input: CreateCourseInput,
        now: DateTime<Utc>,
    ) -> Result<Course, RegistryError> {
        let (course, events) = self.store.transaction(|tables| {
            if tables.courses.contains_key(&input.course_id) {
                return Err(RegistryError::from(DomainError::conflict(
                    "course already exists",
                )));
            }

            // License gate fires only when a trainer is being assigned.
            if let Some(trainer_id) = input.trainer {
                let trainer = tables
                    .users
                    .get(&trainer_id)
                    .ok_or(DomainError::NotFound)?;
                check_trainer_eligible(trainer, now)?;
            }

            let mut course = Course::empty(input.course_id);
            let cmd = CourseCommand::CreateCourse(CreateCourse {
                course_id: input.course_id,
                name: input.name.clone(),
                description: input.description.clone(),
                required_hours: input.required_hours,
                delivery: input.delivery,
                price: input.price,
                required_documents: input.required_documents.clone(),
                start_date: input.start_date,
                duration_days: input.duration_days,
                location: input.location.clone(),
                capacity: input.capacity,
                trainer: input.trainer,
                occurred_at: now,
            });
            let events = course.handle(&cmd)?;
            for event in &events {
                course.apply(event);
            }

            // Course codes carry a unique index in storage; a collision fails
            // the creation rather than auto-suffixing.
            if course.code().is_some()
                && tables.courses.values().any(|c| c.code() == course.code())
            {
                return Err(RegistryError::from(DomainError::conflict(
                    "course code already exists",
                )));
            }

            tables.courses.insert(course.id_typed(), course.clone());
            for module in seed_modules(course.id_typed(), course.name()) {
                tables.modules.insert(module.id, module);
            }

            Ok((course, events))
        })?;

        publish_all(
            self.bus.as_ref(),
            Uuid::from(course.id_typed()),
            AGGREGATE_TYPE,
            course.version(),
            &events,
        )?;

        info!(course_id = %course.id_typed(), code = ?course.code(), "course created");
        Ok(course)
    }

    /// Update a course: capacity may never drop below the current enrollment
    /// count, and assigning a trainer re-runs the license gate. Clearing the
    /// trainer never does.
    pub fn update_course(
        &self,
        input: UpdateCourseInput,
        now: DateTime<Utc>,
    ) -> Result<Course, RegistryError> {
        let (course, events) = self.store.transaction::<_, RegistryError>(|tables| {
            let existing = tables
                .courses
                .get(&input.course_id)
                .cloned()
                .ok_or(DomainError::NotFound)?;

            let enrolled_count = tables.enrollment_count_for_course(input.course_id);

            if let Some(trainer_id) = input.trainer {
                let trainer = tables
                    .users
                    .get(&trainer_id)
                    .ok_or(DomainError::NotFound)?;
                check_trainer_eligible(trainer, now)?;
            }

            let cmd = CourseCommand::UpdateCourse(UpdateCourse {
                course_id: input.course_id,
                name: input.name.clone(),
                description: input.description.clone(),
                required_hours: input.required_hours,
                delivery: input.delivery,
                price: input.price,
                required_documents: input.required_documents.clone(),
                start_date: input.start_date,
                duration_days: input.duration_days,
                location: input.location.clone(),
                capacity: input.capacity,
                trainer: input.trainer,
                enrolled_count,
                occurred_at: now,
            });
            let events = existing.handle(&cmd)?;
            let mut course = existing;
            for event in &events {
                course.apply(event);
            }

            tables.courses.insert(course.id_typed(), course.clone());
            Ok((course, events))
        })?;

        publish_all(
            self.bus.as_ref(),
            Uuid::from(course.id_typed()),
            AGGREGATE_TYPE,
            course.version(),
            &events,
        )?;

        info!(course_id = %course.id_typed(), "course updated");
        Ok(course)
    }

    /// Delete a course and all dependents, or refuse while enrollments exist.
    ///
    /// Fully transactional: a failure anywhere leaves course and dependents
    /// untouched.
    pub fn delete_course(&self, course_id: CourseId) -> Result<(), DeletionError> {
        self.store.transaction(|tables| {
            if !tables.courses.contains_key(&course_id) {
                return Err(DeletionError::NotFound);
            }

            let active = tables.enrollment_ids_for_course(course_id).len();
            if active > 0 {
                return Err(DeletionError::Blocked {
                    active_enrollments: active,
                });
            }

            execute_plan(tables, course_id);
            Ok(())
        })
    }
}
