//! `alturas-courses` — course catalog domain.
//!
//! Owns the `Course` aggregate (creation/update with the capacity invariant
//! and trainer assignment), human-readable course codes, the lenient
//! requirement-list parsing, course modules and the syllabus templates that
//! seed them.

pub mod code;
pub mod course;
pub mod module;
pub mod requirements;
pub mod syllabus;

pub use code::CourseCode;
pub use course::{
    Course, CourseCommand, CourseDelivery, CourseError, CourseEvent, CreateCourse, UpdateCourse,
};
pub use module::Module;
pub use requirements::RequiredDocuments;
pub use syllabus::seed_modules;
