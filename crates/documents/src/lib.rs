//! `alturas-documents` — compliance document lifecycle and evaluation.
//!
//! A document is one uploaded artifact (ID card, medical concept, rescue
//! certificate, ...) owned by a learner and optionally linked to one
//! enrollment. Reviewers move it Pending → Approved/Rejected; the compliance
//! evaluator decides whether an enrollment's approved documents cover a
//! course's requirement set.

pub mod compliance;
pub mod document;

pub use compliance::{approved_types, is_enrollment_compliant};
pub use document::{
    ApproveDocument, Document, DocumentCommand, DocumentEvent, DocumentStatus, RejectDocument,
    SubmitDocument,
};
