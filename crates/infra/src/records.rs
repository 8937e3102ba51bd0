//! Dependent records the registry tracks alongside the first-class
//! aggregates.
//!
//! These exist as course/enrollment children: issued certifications,
//! satisfaction surveys, practice scheduling, attendance, quiz attempts and
//! per-learner module progress. They carry no decision logic of their own -
//! they are created by explicitly invoked operations and removed by the
//! deletion cascade.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use alturas_core::{CourseId, EnrollmentId, ModuleId, UserId};

/// An issued certification (separate, explicitly invoked operation -
/// never triggered automatically by enrollment completion).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificationRecord {
    pub id: Uuid,
    pub user_id: UserId,
    pub course_id: CourseId,
    pub issue_date: DateTime<Utc>,
    pub expiration_date: DateTime<Utc>,
    pub certificate_code: String,
    pub pdf_url: Option<String>,
}

/// Course satisfaction survey (course link optional: general surveys exist).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyRecord {
    pub id: Uuid,
    pub user_id: UserId,
    pub course_id: Option<CourseId>,
    /// 1-5.
    pub rating: u8,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Scheduled,
    Completed,
    Cancelled,
}

/// A scheduled practice session for a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeSessionRecord {
    pub id: Uuid,
    pub course_id: CourseId,
    pub trainer_id: Option<UserId>,
    pub date: DateTime<Utc>,
    pub location: String,
    pub capacity: u32,
    pub status: SessionStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Attended,
}

/// A learner's booking into a practice session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeBookingRecord {
    pub id: Uuid,
    pub session_id: Uuid,
    pub student_id: UserId,
    pub booking_date: DateTime<Utc>,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Excused,
}

/// One attendance mark for one enrollment on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub enrollment_id: EnrollmentId,
    pub trainer_id: UserId,
    pub date: DateTime<Utc>,
    pub status: AttendanceStatus,
    pub signature_url: Option<String>,
}

/// A graded quiz attempt against a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAttemptRecord {
    pub id: Uuid,
    pub user_id: UserId,
    pub module_id: ModuleId,
    pub score: u32,
    pub passed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressStatus {
    Locked,
    InProgress,
    Completed,
}

/// Per-learner progress through one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleProgressRecord {
    pub id: Uuid,
    pub user_id: UserId,
    pub module_id: ModuleId,
    pub status: ProgressStatus,
    pub seconds_spent: u32,
    pub last_updated: DateTime<Utc>,
}

/// A quiz question belonging to a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: Uuid,
    pub module_id: ModuleId,
    pub text: String,
    pub options: Vec<String>,
    pub correct_option_index: usize,
}
