use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use alturas_core::{Aggregate, AggregateRoot, CourseId, DomainError, EnrollmentId, UserId};
use alturas_events::Event;

/// Enrollment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    Enrolled,
    InProgress,
    Completed,
}

/// Aggregate root: Enrollment.
///
/// Links one learner to one course. The service layer guarantees at most one
/// enrollment per (learner, course) pair; this aggregate owns the status
/// machine. Completion is terminal for this subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    id: EnrollmentId,
    learner: Option<UserId>,
    course: Option<CourseId>,
    status: EnrollmentStatus,
    progress_percent: u32,
    withdrawn: bool,
    version: u64,
    created: bool,
}

impl Enrollment {
    /// Create an empty, not-yet-registered instance for rehydration.
    pub fn empty(id: EnrollmentId) -> Self {
        Self {
            id,
            learner: None,
            course: None,
            status: EnrollmentStatus::Enrolled,
            progress_percent: 0,
            withdrawn: false,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> EnrollmentId {
        self.id
    }

    pub fn learner(&self) -> Option<UserId> {
        self.learner
    }

    pub fn course(&self) -> Option<CourseId> {
        self.course
    }

    pub fn status(&self) -> EnrollmentStatus {
        self.status
    }

    pub fn progress_percent(&self) -> u32 {
        self.progress_percent
    }

    pub fn is_completed(&self) -> bool {
        self.status == EnrollmentStatus::Completed
    }
}

impl AggregateRoot for Enrollment {
    type Id = EnrollmentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: RegisterEnrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterEnrollment {
    pub enrollment_id: EnrollmentId,
    pub learner: UserId,
    pub course: CourseId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: StartCourse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartCourse {
    pub enrollment_id: EnrollmentId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CompleteOnCompliance.
///
/// Only dispatched by the document-review path once the compliance evaluator
/// has confirmed the requirement set is covered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteOnCompliance {
    pub enrollment_id: EnrollmentId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: WithdrawEnrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawEnrollment {
    pub enrollment_id: EnrollmentId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrollmentCommand {
    RegisterEnrollment(RegisterEnrollment),
    StartCourse(StartCourse),
    CompleteOnCompliance(CompleteOnCompliance),
    WithdrawEnrollment(WithdrawEnrollment),
}

/// Event: EnrollmentRegistered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRegistered {
    pub enrollment_id: EnrollmentId,
    pub learner: UserId,
    pub course: CourseId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CourseStarted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseStarted {
    pub enrollment_id: EnrollmentId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: EnrollmentCompleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentCompleted {
    pub enrollment_id: EnrollmentId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: EnrollmentWithdrawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentWithdrawn {
    pub enrollment_id: EnrollmentId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrollmentEvent {
    EnrollmentRegistered(EnrollmentRegistered),
    CourseStarted(CourseStarted),
    EnrollmentCompleted(EnrollmentCompleted),
    EnrollmentWithdrawn(EnrollmentWithdrawn),
}

impl Event for EnrollmentEvent {
    fn event_type(&self) -> &'static str {
        match self {
            EnrollmentEvent::EnrollmentRegistered(_) => "enrollments.enrollment.registered",
            EnrollmentEvent::CourseStarted(_) => "enrollments.enrollment.started",
            EnrollmentEvent::EnrollmentCompleted(_) => "enrollments.enrollment.completed",
            EnrollmentEvent::EnrollmentWithdrawn(_) => "enrollments.enrollment.withdrawn",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            EnrollmentEvent::EnrollmentRegistered(e) => e.occurred_at,
            EnrollmentEvent::CourseStarted(e) => e.occurred_at,
            EnrollmentEvent::EnrollmentCompleted(e) => e.occurred_at,
            EnrollmentEvent::EnrollmentWithdrawn(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Enrollment {
    type Command = EnrollmentCommand;
    type Event = EnrollmentEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            EnrollmentEvent::EnrollmentRegistered(e) => {
                self.id = e.enrollment_id;
                self.learner = Some(e.learner);
                self.course = Some(e.course);
                self.status = EnrollmentStatus::Enrolled;
                self.progress_percent = 0;
                self.created = true;
            }
            EnrollmentEvent::CourseStarted(_) => {
                self.status = EnrollmentStatus::InProgress;
            }
            EnrollmentEvent::EnrollmentCompleted(_) => {
                self.status = EnrollmentStatus::Completed;
                self.progress_percent = 100;
            }
            EnrollmentEvent::EnrollmentWithdrawn(_) => {
                self.withdrawn = true;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            EnrollmentCommand::RegisterEnrollment(cmd) => self.handle_register(cmd),
            EnrollmentCommand::StartCourse(cmd) => self.handle_start(cmd),
            EnrollmentCommand::CompleteOnCompliance(cmd) => self.handle_complete(cmd),
            EnrollmentCommand::WithdrawEnrollment(cmd) => self.handle_withdraw(cmd),
        }
    }
}

impl Enrollment {
    fn ensure_live(&self, enrollment_id: EnrollmentId) -> Result<(), DomainError> {
        if !self.created || self.withdrawn {
            return Err(DomainError::not_found());
        }
        if self.id != enrollment_id {
            return Err(DomainError::invariant("enrollment_id mismatch"));
        }
        Ok(())
    }

    fn handle_register(
        &self,
        cmd: &RegisterEnrollment,
    ) -> Result<Vec<EnrollmentEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("enrollment already exists"));
        }

        Ok(vec![EnrollmentEvent::EnrollmentRegistered(
            EnrollmentRegistered {
                enrollment_id: cmd.enrollment_id,
                learner: cmd.learner,
                course: cmd.course,
                occurred_at: cmd.occurred_at,
            },
        )])
    }

    fn handle_start(&self, cmd: &StartCourse) -> Result<Vec<EnrollmentEvent>, DomainError> {
        self.ensure_live(cmd.enrollment_id)?;

        // Starting an already-started or completed enrollment changes nothing.
        if self.status != EnrollmentStatus::Enrolled {
            return Ok(vec![]);
        }

        Ok(vec![EnrollmentEvent::CourseStarted(CourseStarted {
            enrollment_id: cmd.enrollment_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_complete(
        &self,
        cmd: &CompleteOnCompliance,
    ) -> Result<Vec<EnrollmentEvent>, DomainError> {
        self.ensure_live(cmd.enrollment_id)?;

        if self.status == EnrollmentStatus::Completed {
            return Ok(vec![]);
        }

        Ok(vec![EnrollmentEvent::EnrollmentCompleted(
            EnrollmentCompleted {
                enrollment_id: cmd.enrollment_id,
                occurred_at: cmd.occurred_at,
            },
        )])
    }

    fn handle_withdraw(
        &self,
        cmd: &WithdrawEnrollment,
    ) -> Result<Vec<EnrollmentEvent>, DomainError> {
        self.ensure_live(cmd.enrollment_id)?;

        Ok(vec![EnrollmentEvent::EnrollmentWithdrawn(
            EnrollmentWithdrawn {
                enrollment_id: cmd.enrollment_id,
                occurred_at: cmd.occurred_at,
            },
        )])
    }
}
