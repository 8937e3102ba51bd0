use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use alturas_core::{Aggregate, AggregateRoot, CourseId, DomainError, UserId};
use alturas_events::Event;

use crate::code::CourseCode;
use crate::requirements::RequiredDocuments;

/// Delivery mode of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseDelivery {
    Theory,
    Practice,
    Blended,
}

/// Course aggregate error.
///
/// Capacity violations carry the offending numbers so the caller can report
/// them; everything else is a generic domain failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CourseError {
    #[error("capacity cannot be less than current enrollments ({enrolled}): requested {capacity}")]
    CapacityExceeded { capacity: u32, enrolled: u32 },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Aggregate root: Course.
///
/// The course code is derived once at creation from name + start date and is
/// deliberately never regenerated on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    name: String,
    code: Option<CourseCode>,
    description: Option<String>,
    required_hours: u32,
    delivery: CourseDelivery,
    /// Price in smallest currency unit.
    price: u64,
    required_documents: RequiredDocuments,
    start_date: Option<DateTime<Utc>>,
    duration_days: u32,
    location: Option<String>,
    capacity: u32,
    trainer: Option<UserId>,
    version: u64,
    created: bool,
}

impl Course {
    /// Create an empty, not-yet-created aggregate instance for rehydration.
    pub fn empty(id: CourseId) -> Self {
        Self {
            id,
            name: String::new(),
            code: None,
            description: None,
            required_hours: 0,
            delivery: CourseDelivery::Blended,
            price: 0,
            required_documents: RequiredDocuments::none(),
            start_date: None,
            duration_days: 1,
            location: None,
            capacity: 0,
            trainer: None,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> CourseId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> Option<&CourseCode> {
        self.code.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn required_hours(&self) -> u32 {
        self.required_hours
    }

    pub fn delivery(&self) -> CourseDelivery {
        self.delivery
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn required_documents(&self) -> &RequiredDocuments {
        &self.required_documents
    }

    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn trainer(&self) -> Option<UserId> {
        self.trainer
    }
}

impl AggregateRoot for Course {
    type Id = CourseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateCourse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCourse {
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
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateCourse.
///
/// `enrolled_count` is the enrollment count the caller read in the same
/// transaction; the capacity invariant is checked against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCourse {
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
    pub enrolled_count: u32,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseCommand {
    CreateCourse(CreateCourse),
    UpdateCourse(UpdateCourse),
}

/// Event: CourseCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseCreated {
    pub course_id: CourseId,
    pub name: String,
    pub code: Option<CourseCode>,
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
    pub occurred_at: DateTime<Utc>,
}

/// Event: CourseUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseUpdated {
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
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseEvent {
    CourseCreated(CourseCreated),
    CourseUpdated(CourseUpdated),
}

impl Event for CourseEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CourseEvent::CourseCreated(_) => "courses.course.created",
            CourseEvent::CourseUpdated(_) => "courses.course.updated",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CourseEvent::CourseCreated(e) => e.occurred_at,
            CourseEvent::CourseUpdated(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Course {
    type Command = CourseCommand;
    type Event = CourseEvent;
    type Error = CourseError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CourseEvent::CourseCreated(e) => {
                self.id = e.course_id;
                self.name = e.name.clone();
                self.code = e.code.clone();
                self.description = e.description.clone();
                self.required_hours = e.required_hours;
                self.delivery = e.delivery;
                self.price = e.price;
                self.required_documents = e.required_documents.clone();
                self.start_date = e.start_date;
                self.duration_days = e.duration_days;
                self.location = e.location.clone();
                self.capacity = e.capacity;
                self.trainer = e.trainer;
                self.created = true;
            }
            CourseEvent::CourseUpdated(e) => {
                self.name = e.name.clone();
                self.description = e.description.clone();
                self.required_hours = e.required_hours;
                self.delivery = e.delivery;
                self.price = e.price;
                self.required_documents = e.required_documents.clone();
                self.start_date = e.start_date;
                self.duration_days = e.duration_days;
                self.location = e.location.clone();
                self.capacity = e.capacity;
                self.trainer = e.trainer;
                // Code intentionally untouched.
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CourseCommand::CreateCourse(cmd) => self.handle_create(cmd),
            CourseCommand::UpdateCourse(cmd) => self.handle_update(cmd),
        }
    }
}

impl Course {
    fn ensure_course_id(&self, course_id: CourseId) -> Result<(), DomainError> {
        if self.id != course_id {
            return Err(DomainError::invariant("course_id mismatch"));
        }
        Ok(())
    }

    fn validate_fields(name: &str, required_hours: u32, capacity: u32) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if required_hours == 0 {
            return Err(DomainError::validation("required_hours must be positive"));
        }
        if capacity == 0 {
            return Err(DomainError::validation("capacity must be positive"));
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateCourse) -> Result<Vec<CourseEvent>, CourseError> {
        if self.created {
            return Err(DomainError::conflict("course already exists").into());
        }

        Self::validate_fields(&cmd.name, cmd.required_hours, cmd.capacity)?;

        let code = CourseCode::generate(&cmd.name, cmd.start_date);

        Ok(vec![CourseEvent::CourseCreated(CourseCreated {
            course_id: cmd.course_id,
            name: cmd.name.clone(),
            code,
            description: cmd.description.clone(),
            required_hours: cmd.required_hours,
            delivery: cmd.delivery,
            price: cmd.price,
            required_documents: cmd.required_documents.clone(),
            start_date: cmd.start_date,
            duration_days: cmd.duration_days,
            location: cmd.location.clone(),
            capacity: cmd.capacity,
            trainer: cmd.trainer,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update(&self, cmd: &UpdateCourse) -> Result<Vec<CourseEvent>, CourseError> {
        if !self.created {
            return Err(DomainError::not_found().into());
        }
        self.ensure_course_id(cmd.course_id)?;

        Self::validate_fields(&cmd.name, cmd.required_hours, cmd.capacity)?;

        if cmd.capacity < cmd.enrolled_count {
            return Err(CourseError::CapacityExceeded {
                capacity: cmd.capacity,
                enrolled: cmd.enrolled_count,
            });
        }

        Ok(vec![CourseEvent::CourseUpdated(CourseUpdated {
            course_id: cmd.course_id,
            name: cmd.name.clone(),
            description: cmd.description.clone(),
            required_hours: cmd.required_hours,
            delivery: cmd.delivery,
            price: cmd.price,
            required_documents: cmd.required_documents.clone(),
            start_date: cmd.start_date,
            duration_days: cmd.duration_days,
            location: cmd.location.clone(),
            capacity: cmd.capacity,
            trainer: cmd.trainer,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alturas_core::DocumentType;
    use chrono::TimeZone;

    fn test_course_id() -> CourseId {
        CourseId::new()
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn march_start() -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2025, 3, 5, 8, 0, 0).unwrap())
    }

    fn create_cmd(course_id: CourseId) -> CreateCourse {
        CreateCourse {
            course_id,
            name: "Curso Básico Operativo".to_string(),
            description: None,
            required_hours: 8,
            delivery: CourseDelivery::Blended,
            price: 250_000,
            required_documents: RequiredDocuments::new(vec![
                DocumentType::IdCard,
                DocumentType::MedicalConcept,
            ]),
            start_date: march_start(),
            duration_days: 2,
            location: Some("Sede Norte".to_string()),
            capacity: 20,
            trainer: None,
            occurred_at: test_time(),
        }
    }

    fn created(course_id: CourseId) -> Course {
        let mut course = Course::empty(course_id);
        let events = course
            .handle(&CourseCommand::CreateCourse(create_cmd(course_id)))
            .unwrap();
        course.apply(&events[0]);
        course
    }

    fn update_cmd(course_id: CourseId) -> UpdateCourse {
        let c = create_cmd(course_id);
        UpdateCourse {
            course_id,
            name: c.name,
            description: c.description,
            required_hours: c.required_hours,
            delivery: c.delivery,
            price: c.price,
            required_documents: c.required_documents,
            start_date: c.start_date,
            duration_days: c.duration_days,
            location: c.location,
            capacity: c.capacity,
            trainer: c.trainer,
            enrolled_count: 0,
            occurred_at: test_time(),
        }
    }

    #[test]
    fn create_course_derives_a_code_from_name_and_start_date() {
        let course = created(test_course_id());
        assert_eq!(course.code().unwrap().as_str(), "CUR-BÁS-050325");
        assert_eq!(course.version(), 1);
    }

    #[test]
    fn create_without_start_date_leaves_code_empty() {
        let course_id = test_course_id();
        let mut cmd = create_cmd(course_id);
        cmd.start_date = None;

        let course = Course::empty(course_id);
        let events = course
            .handle(&CourseCommand::CreateCourse(cmd))
            .unwrap();
        match &events[0] {
            CourseEvent::CourseCreated(e) => assert!(e.code.is_none()),
            _ => panic!("expected CourseCreated"),
        }
    }

    #[test]
    fn create_rejects_empty_name_and_zero_capacity() {
        let course_id = test_course_id();
        let course = Course::empty(course_id);

        let mut cmd = create_cmd(course_id);
        cmd.name = "  ".to_string();
        assert!(matches!(
            course.handle(&CourseCommand::CreateCourse(cmd)),
            Err(CourseError::Domain(DomainError::Validation(_)))
        ));

        let mut cmd = create_cmd(course_id);
        cmd.capacity = 0;
        assert!(matches!(
            course.handle(&CourseCommand::CreateCourse(cmd)),
            Err(CourseError::Domain(DomainError::Validation(_)))
        ));
    }

    #[test]
    fn duplicate_creation_is_a_conflict() {
        let course_id = test_course_id();
        let course = created(course_id);

        let err = course
            .handle(&CourseCommand::CreateCourse(create_cmd(course_id)))
            .unwrap_err();
        assert!(matches!(err, CourseError::Domain(DomainError::Conflict(_))));
    }

    #[test]
    fn update_below_enrolled_count_is_capacity_exceeded() {
        let course_id = test_course_id();
        let course = created(course_id);

        let mut cmd = update_cmd(course_id);
        cmd.capacity = 3;
        cmd.enrolled_count = 5;

        let err = course
            .handle(&CourseCommand::UpdateCourse(cmd))
            .unwrap_err();
        match err {
            CourseError::CapacityExceeded { capacity, enrolled } => {
                assert_eq!(capacity, 3);
                assert_eq!(enrolled, 5);
            }
            _ => panic!("expected CapacityExceeded"),
        }
    }

    #[test]
    fn update_at_exactly_enrolled_count_is_allowed() {
        let course_id = test_course_id();
        let mut course = created(course_id);

        let mut cmd = update_cmd(course_id);
        cmd.capacity = 5;
        cmd.enrolled_count = 5;

        let events = course
            .handle(&CourseCommand::UpdateCourse(cmd))
            .unwrap();
        course.apply(&events[0]);
        assert_eq!(course.capacity(), 5);
    }

    #[test]
    fn update_never_regenerates_the_code() {
        let course_id = test_course_id();
        let mut course = created(course_id);
        let original_code = course.code().cloned();

        let mut cmd = update_cmd(course_id);
        cmd.name = "Reentrenamiento Anual".to_string();
        cmd.start_date = Some(Utc.with_ymd_and_hms(2026, 1, 15, 8, 0, 0).unwrap());

        let events = course
            .handle(&CourseCommand::UpdateCourse(cmd))
            .unwrap();
        course.apply(&events[0]);

        assert_eq!(course.name(), "Reentrenamiento Anual");
        assert_eq!(course.code().cloned(), original_code);
    }

    #[test]
    fn update_replaces_trainer_wholesale() {
        let course_id = test_course_id();
        let mut course = created(course_id);

        let trainer = UserId::new();
        let mut cmd = update_cmd(course_id);
        cmd.trainer = Some(trainer);
        let events = course.handle(&CourseCommand::UpdateCourse(cmd)).unwrap();
        course.apply(&events[0]);
        assert_eq!(course.trainer(), Some(trainer));

        let mut cmd = update_cmd(course_id);
        cmd.trainer = None;
        let events = course.handle(&CourseCommand::UpdateCourse(cmd)).unwrap();
        course.apply(&events[0]);
        assert_eq!(course.trainer(), None);
    }

    #[test]
    fn update_before_creation_is_not_found() {
        let course_id = test_course_id();
        let course = Course::empty(course_id);

        let err = course
            .handle(&CourseCommand::UpdateCourse(update_cmd(course_id)))
            .unwrap_err();
        assert!(matches!(err, CourseError::Domain(DomainError::NotFound)));
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let course_id = test_course_id();
        let course = created(course_id);
        let before = course.clone();

        let cmd = CourseCommand::UpdateCourse(update_cmd(course_id));
        let events1 = course.handle(&cmd).unwrap();
        let events2 = course.handle(&cmd).unwrap();

        assert_eq!(course, before);
        assert_eq!(events1, events2);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// The capacity invariant holds for any pair of values: an update
            /// is accepted iff capacity >= enrolled_count.
            #[test]
            fn capacity_invariant(capacity in 1u32..500, enrolled in 0u32..500) {
                let course_id = test_course_id();
                let course = created(course_id);

                let mut cmd = update_cmd(course_id);
                cmd.capacity = capacity;
                cmd.enrolled_count = enrolled;

                let outcome = course.handle(&CourseCommand::UpdateCourse(cmd));
                prop_assert_eq!(outcome.is_ok(), capacity >= enrolled);
            }
        }
    }
}
