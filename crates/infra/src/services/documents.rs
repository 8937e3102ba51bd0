//! Document submission, review, and the approval-driven completion path.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use tracing::info;
use uuid::Uuid;

use alturas_core::{
    Aggregate as _, AggregateRoot as _, CourseId, DocumentId, DocumentType, DomainError,
    EnrollmentId, UserId,
};
use alturas_documents::{
    ApproveDocument, Document, DocumentCommand, RejectDocument, SubmitDocument,
    is_enrollment_compliant,
};
use alturas_enrollments::{CompleteOnCompliance, Enrollment, EnrollmentCommand, EnrollmentStatus};
use alturas_events::{EventBus, EventEnvelope};

use crate::error::RegistryError;
use crate::services::publish_all;
use crate::store::RegistryStore;

const DOCUMENT_AGGREGATE: &str = "documents.document";
const ENROLLMENT_AGGREGATE: &str = "enrollments.enrollment";

/// Fields for a document submission.
#[derive(Debug, Clone)]
pub struct SubmitDocumentInput {
    pub document_id: DocumentId,
    pub owner: UserId,
    pub enrollment: Option<EnrollmentId>,
    pub kind: DocumentType,
    pub file_url: String,
    pub expiration_date: Option<DateTime<Utc>>,
}

/// Reviewer decision for a pending (or previously reviewed) document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewVerdict {
    Approve,
    Reject { reason: Option<String> },
}

/// Result of a review: the updated document, and the enrollment status when
/// the document was linked to one.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub document: Document,
    pub enrollment_status: Option<EnrollmentStatus>,
}

/// Document service.
pub struct DocumentService<B> {
    store: Arc<RegistryStore>,
    bus: Arc<B>,
}

impl<B> DocumentService<B>
where
    B: EventBus<EventEnvelope<JsonValue>>,
{
    pub fn new(store: Arc<RegistryStore>, bus: Arc<B>) -> Self {
        Self { store, bus }
    }

    /// Submit a document for review. Starts Pending.
    pub fn submit(
        &self,
        input: SubmitDocumentInput,
        now: DateTime<Utc>,
    ) -> Result<Document, RegistryError> {
        let (document, events) = self.store.transaction(|tables| {
            if !tables.users.contains_key(&input.owner) {
                return Err(RegistryError::from(DomainError::NotFound));
            }
            if let Some(enrollment_id) = input.enrollment {
                if !tables.enrollments.contains_key(&enrollment_id) {
                    return Err(RegistryError::from(DomainError::NotFound));
                }
            }

            let mut document = Document::empty(input.document_id);
            let cmd = DocumentCommand::SubmitDocument(SubmitDocument {
                document_id: input.document_id,
                owner: input.owner,
                enrollment: input.enrollment,
                kind: input.kind,
                file_url: input.file_url.clone(),
                expiration_date: input.expiration_date,
                occurred_at: now,
            });
            let events = document.handle(&cmd)?;
            for event in &events {
                document.apply(event);
            }

            tables
                .documents
                .insert(document.id_typed(), document.clone());
            Ok((document, events))
        })?;

        publish_all(
            self.bus.as_ref(),
            Uuid::from(document.id_typed()),
            DOCUMENT_AGGREGATE,
            document.version(),
            &events,
        )?;

        info!(document_id = %document.id_typed(), kind = ?document.kind(), "document submitted");
        Ok(document)
    }

    /// Review a document.
    ///
    /// Approval of an enrollment-linked document re-evaluates compliance for
    /// that enrollment inside the same transaction and completes it when the
    /// whole requirement set is covered. Rejection never re-evaluates and
    /// never reverts a completed enrollment.
    pub fn review(
        &self,
        document_id: DocumentId,
        verdict: ReviewVerdict,
        now: DateTime<Utc>,
    ) -> Result<ReviewOutcome, RegistryError> {
        let (document, doc_events, completed) = self.store.transaction::<_, RegistryError>(|tables| {
            let existing = tables
                .documents
                .get(&document_id)
                .cloned()
                .ok_or(DomainError::NotFound)?;

            let cmd = match &verdict {
                ReviewVerdict::Approve => DocumentCommand::ApproveDocument(ApproveDocument {
                    document_id,
                    occurred_at: now,
                }),
                ReviewVerdict::Reject { reason } => DocumentCommand::RejectDocument(RejectDocument {
                    document_id,
                    reason: reason.clone(),
                    occurred_at: now,
                }),
            };
            let doc_events = existing.handle(&cmd)?;
            let mut document = existing;
            for event in &doc_events {
                document.apply(event);
            }
            tables
                .documents
                .insert(document.id_typed(), document.clone());

            // Completion check fires only on the approval path.
            let mut completed = None;
            if matches!(&verdict, ReviewVerdict::Approve) {
                if let Some(enrollment_id) = document.enrollment() {
                    completed = try_complete(tables, enrollment_id, now)?;
                }
            }

            Ok((document, doc_events, completed))
        })?;

        publish_all(
            self.bus.as_ref(),
            Uuid::from(document.id_typed()),
            DOCUMENT_AGGREGATE,
            document.version(),
            &doc_events,
        )?;

        let enrollment_status = match completed {
            Some((enrollment, events)) => {
                if !events.is_empty() {
                    publish_all(
                        self.bus.as_ref(),
                        Uuid::from(enrollment.id_typed()),
                        ENROLLMENT_AGGREGATE,
                        enrollment.version(),
                        &events,
                    )?;
                    info!(
                        enrollment_id = %enrollment.id_typed(),
                        "enrollment completed via document approval"
                    );
                }
                Some(enrollment.status())
            }
            None => None,
        };

        Ok(ReviewOutcome {
            document,
            enrollment_status,
        })
    }

    /// Evaluate compliance for one enrollment against its course's
    /// requirement set, without mutating anything.
    pub fn evaluate_compliance(
        &self,
        course_id: CourseId,
        enrollment_id: EnrollmentId,
    ) -> Result<bool, RegistryError> {
        let verdict = self.store.read(|tables| -> Result<bool, RegistryError> {
            let course = tables
                .courses
                .get(&course_id)
                .ok_or(DomainError::NotFound)?;
            let enrollment = tables
                .enrollments
                .get(&enrollment_id)
                .ok_or(DomainError::NotFound)?;
            if enrollment.course() != Some(course_id) {
                return Err(DomainError::invariant("enrollment does not belong to course").into());
            }

            let documents = tables.documents_for_enrollment(enrollment_id);
            Ok(is_enrollment_compliant(
                course.required_documents().types(),
                documents,
            ))
        })??;

        Ok(verdict)
    }
}

/// Re-evaluate one enrollment and complete it if compliant. Returns the
/// refreshed enrollment (with any decided events) when it exists.
type CompletionResult = Option<(Enrollment, Vec<alturas_enrollments::EnrollmentEvent>)>;

fn try_complete(
    tables: &mut crate::store::Tables,
    enrollment_id: EnrollmentId,
    now: DateTime<Utc>,
) -> Result<CompletionResult, RegistryError> {
    let Some(existing) = tables.enrollments.get(&enrollment_id).cloned() else {
        // A document may point at an enrollment deleted since upload; the
        // review itself still succeeds.
        return Ok(None);
    };

    let Some(course) = existing.course().and_then(|id| tables.courses.get(&id)) else {
        return Ok(None);
    };

    let required = course.required_documents().types().to_vec();
    let compliant = {
        let documents = tables.documents_for_enrollment(enrollment_id);
        is_enrollment_compliant(&required, documents)
    };

    if !compliant {
        return Ok(Some((existing, Vec::new())));
    }

    let cmd = EnrollmentCommand::CompleteOnCompliance(CompleteOnCompliance {
        enrollment_id,
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

    Ok(Some((enrollment, events)))
}
