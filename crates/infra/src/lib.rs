//! Infrastructure layer: the in-memory registry store, application services
//! orchestrating the domain aggregates, and the course deletion cascade.
//!
//! The store stands in for the relational collaborator: every public
//! operation runs inside one `transaction` (all-or-nothing), and domain
//! events are published to the bus only after the transaction commits.

pub mod deletion;
pub mod error;
pub mod records;
pub mod services;
pub mod store;

pub use deletion::{DELETION_PLAN, DeletionError, DeletionStep};
pub use error::RegistryError;
pub use services::courses::{CourseService, CreateCourseInput, UpdateCourseInput};
pub use services::documents::{DocumentService, ReviewOutcome, ReviewVerdict, SubmitDocumentInput};
pub use services::enrollments::EnrollmentService;
pub use store::{RegistryStore, StoreError, Tables};
