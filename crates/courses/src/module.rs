//! Course module entity.

use serde::{Deserialize, Serialize};

use alturas_core::{CourseId, Entity, ModuleId};

/// One content unit of a course.
///
/// Modules carry the learning content and the optional module quiz; their
/// quiz attempts and per-learner progress live in the registry as dependent
/// records and are removed with the course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    pub course_id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub content_url: Option<String>,
    pub order_index: u32,
    pub min_duration_seconds: u32,
    pub has_quiz: bool,
    pub passing_score: u32,
}

impl Module {
    pub fn new(course_id: CourseId, title: impl Into<String>, order_index: u32) -> Self {
        Self {
            id: ModuleId::new(),
            course_id,
            title: title.into(),
            description: None,
            content_url: None,
            order_index,
            min_duration_seconds: 0,
            has_quiz: false,
            passing_score: 80,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Entity for Module {
    type Id = ModuleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
