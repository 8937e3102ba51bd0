use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use alturas_core::{Aggregate, AggregateRoot, DocumentId, DocumentType, DomainError, EnrollmentId, UserId};
use alturas_events::Event;

/// Review status of a compliance document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Pending,
    Approved,
    Rejected,
}

/// Aggregate root: Document.
///
/// Submission starts the document Pending; review moves it to Approved or
/// Rejected. Re-review is allowed (a rejected document can be approved after
/// a correction), but reviewing into the current status is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: DocumentId,
    owner: Option<UserId>,
    enrollment: Option<EnrollmentId>,
    kind: Option<DocumentType>,
    status: DocumentStatus,
    file_url: String,
    expiration_date: Option<DateTime<Utc>>,
    rejection_reason: Option<String>,
    version: u64,
    created: bool,
}

impl Document {
    /// Create an empty, not-yet-submitted instance for rehydration.
    pub fn empty(id: DocumentId) -> Self {
        Self {
            id,
            owner: None,
            enrollment: None,
            kind: None,
            status: DocumentStatus::Pending,
            file_url: String::new(),
            expiration_date: None,
            rejection_reason: None,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> DocumentId {
        self.id
    }

    pub fn owner(&self) -> Option<UserId> {
        self.owner
    }

    /// Enrollment this document was uploaded for, if any. Legacy documents
    /// predate the linkage and stay unlinked.
    pub fn enrollment(&self) -> Option<EnrollmentId> {
        self.enrollment
    }

    pub fn kind(&self) -> Option<DocumentType> {
        self.kind
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    pub fn file_url(&self) -> &str {
        &self.file_url
    }

    pub fn expiration_date(&self) -> Option<DateTime<Utc>> {
        self.expiration_date
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    pub fn is_approved(&self) -> bool {
        self.status == DocumentStatus::Approved
    }
}

impl AggregateRoot for Document {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: SubmitDocument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitDocument {
    pub document_id: DocumentId,
    pub owner: UserId,
    pub enrollment: Option<EnrollmentId>,
    pub kind: DocumentType,
    pub file_url: String,
    pub expiration_date: Option<DateTime<Utc>>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ApproveDocument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveDocument {
    pub document_id: DocumentId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RejectDocument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectDocument {
    pub document_id: DocumentId,
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentCommand {
    SubmitDocument(SubmitDocument),
    ApproveDocument(ApproveDocument),
    RejectDocument(RejectDocument),
}

/// Event: DocumentSubmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSubmitted {
    pub document_id: DocumentId,
    pub owner: UserId,
    pub enrollment: Option<EnrollmentId>,
    pub kind: DocumentType,
    pub file_url: String,
    pub expiration_date: Option<DateTime<Utc>>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: DocumentApproved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentApproved {
    pub document_id: DocumentId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: DocumentRejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRejected {
    pub document_id: DocumentId,
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentEvent {
    DocumentSubmitted(DocumentSubmitted),
    DocumentApproved(DocumentApproved),
    DocumentRejected(DocumentRejected),
}

impl Event for DocumentEvent {
    fn event_type(&self) -> &'static str {
        match self {
            DocumentEvent::DocumentSubmitted(_) => "documents.document.submitted",
            DocumentEvent::DocumentApproved(_) => "documents.document.approved",
            DocumentEvent::DocumentRejected(_) => "documents.document.rejected",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            DocumentEvent::DocumentSubmitted(e) => e.occurred_at,
            DocumentEvent::DocumentApproved(e) => e.occurred_at,
            DocumentEvent::DocumentRejected(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Document {
    type Command = DocumentCommand;
    type Event = DocumentEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            DocumentEvent::DocumentSubmitted(e) => {
                self.id = e.document_id;
                self.owner = Some(e.owner);
                self.enrollment = e.enrollment;
                self.kind = Some(e.kind);
                self.status = DocumentStatus::Pending;
                self.file_url = e.file_url.clone();
                self.expiration_date = e.expiration_date;
                self.rejection_reason = None;
                self.created = true;
            }
            DocumentEvent::DocumentApproved(_) => {
                self.status = DocumentStatus::Approved;
            }
            DocumentEvent::DocumentRejected(e) => {
                self.status = DocumentStatus::Rejected;
                if e.reason.is_some() {
                    self.rejection_reason = e.reason.clone();
                }
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            DocumentCommand::SubmitDocument(cmd) => self.handle_submit(cmd),
            DocumentCommand::ApproveDocument(cmd) => self.handle_approve(cmd),
            DocumentCommand::RejectDocument(cmd) => self.handle_reject(cmd),
        }
    }
}

impl Document {
    fn ensure_document_id(&self, document_id: DocumentId) -> Result<(), DomainError> {
        if self.id != document_id {
            return Err(DomainError::invariant("document_id mismatch"));
        }
        Ok(())
    }

    fn handle_submit(&self, cmd: &SubmitDocument) -> Result<Vec<DocumentEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("document already submitted"));
        }

        if cmd.file_url.trim().is_empty() {
            return Err(DomainError::validation("file_url cannot be empty"));
        }

        Ok(vec![DocumentEvent::DocumentSubmitted(DocumentSubmitted {
            document_id: cmd.document_id,
            owner: cmd.owner,
            enrollment: cmd.enrollment,
            kind: cmd.kind,
            file_url: cmd.file_url.clone(),
            expiration_date: cmd.expiration_date,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_approve(&self, cmd: &ApproveDocument) -> Result<Vec<DocumentEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_document_id(cmd.document_id)?;

        // Approving an already-approved document is a no-op.
        if self.status == DocumentStatus::Approved {
            return Ok(vec![]);
        }

        Ok(vec![DocumentEvent::DocumentApproved(DocumentApproved {
            document_id: cmd.document_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_reject(&self, cmd: &RejectDocument) -> Result<Vec<DocumentEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_document_id(cmd.document_id)?;

        if self.status == DocumentStatus::Rejected {
            return Ok(vec![]);
        }

        Ok(vec![DocumentEvent::DocumentRejected(DocumentRejected {
            document_id: cmd.document_id,
            reason: cmd.reason.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_document_id() -> DocumentId {
        DocumentId::new()
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn submit_cmd(document_id: DocumentId) -> SubmitDocument {
        SubmitDocument {
            document_id,
            owner: UserId::new(),
            enrollment: Some(EnrollmentId::new()),
            kind: DocumentType::MedicalConcept,
            file_url: "uploads/medical.pdf".to_string(),
            expiration_date: None,
            occurred_at: test_time(),
        }
    }

    fn submitted(document_id: DocumentId) -> Document {
        let mut doc = Document::empty(document_id);
        let events = doc
            .handle(&DocumentCommand::SubmitDocument(submit_cmd(document_id)))
            .unwrap();
        doc.apply(&events[0]);
        doc
    }

    #[test]
    fn submit_document_starts_pending() {
        let document_id = test_document_id();
        let doc = submitted(document_id);

        assert_eq!(doc.status(), DocumentStatus::Pending);
        assert_eq!(doc.kind(), Some(DocumentType::MedicalConcept));
        assert!(doc.enrollment().is_some());
        assert_eq!(doc.version(), 1);
    }

    #[test]
    fn submit_rejects_empty_file_url() {
        let document_id = test_document_id();
        let doc = Document::empty(document_id);
        let mut cmd = submit_cmd(document_id);
        cmd.file_url = "   ".to_string();

        let err = doc
            .handle(&DocumentCommand::SubmitDocument(cmd))
            .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("expected Validation error for empty file_url"),
        }
    }

    #[test]
    fn duplicate_submission_is_a_conflict() {
        let document_id = test_document_id();
        let doc = submitted(document_id);

        let err = doc
            .handle(&DocumentCommand::SubmitDocument(submit_cmd(document_id)))
            .unwrap_err();
        match err {
            DomainError::Conflict(_) => {}
            _ => panic!("expected Conflict for duplicate submission"),
        }
    }

    #[test]
    fn approve_moves_pending_to_approved() {
        let document_id = test_document_id();
        let mut doc = submitted(document_id);

        let events = doc
            .handle(&DocumentCommand::ApproveDocument(ApproveDocument {
                document_id,
                occurred_at: test_time(),
            }))
            .unwrap();
        doc.apply(&events[0]);

        assert!(doc.is_approved());
    }

    #[test]
    fn approving_twice_is_a_noop() {
        let document_id = test_document_id();
        let mut doc = submitted(document_id);

        let approve = DocumentCommand::ApproveDocument(ApproveDocument {
            document_id,
            occurred_at: test_time(),
        });
        let events = doc.handle(&approve).unwrap();
        doc.apply(&events[0]);

        let again = doc.handle(&approve).unwrap();
        assert!(again.is_empty());
        assert_eq!(doc.version(), 2);
    }

    #[test]
    fn reject_records_reason() {
        let document_id = test_document_id();
        let mut doc = submitted(document_id);

        let events = doc
            .handle(&DocumentCommand::RejectDocument(RejectDocument {
                document_id,
                reason: Some("illegible scan".to_string()),
                occurred_at: test_time(),
            }))
            .unwrap();
        doc.apply(&events[0]);

        assert_eq!(doc.status(), DocumentStatus::Rejected);
        assert_eq!(doc.rejection_reason(), Some("illegible scan"));
    }

    #[test]
    fn rejected_document_can_be_approved_later() {
        // A correction workflow: the reviewer rejects, the learner fixes the
        // upload out of band, the reviewer approves the same record.
        let document_id = test_document_id();
        let mut doc = submitted(document_id);

        let events = doc
            .handle(&DocumentCommand::RejectDocument(RejectDocument {
                document_id,
                reason: None,
                occurred_at: test_time(),
            }))
            .unwrap();
        doc.apply(&events[0]);

        let events = doc
            .handle(&DocumentCommand::ApproveDocument(ApproveDocument {
                document_id,
                occurred_at: test_time(),
            }))
            .unwrap();
        doc.apply(&events[0]);

        assert!(doc.is_approved());
    }

    #[test]
    fn review_before_submission_is_not_found() {
        let document_id = test_document_id();
        let doc = Document::empty(document_id);

        let err = doc
            .handle(&DocumentCommand::ApproveDocument(ApproveDocument {
                document_id,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        match err {
            DomainError::NotFound => {}
            _ => panic!("expected NotFound for unsubmitted document"),
        }
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let document_id = test_document_id();
        let doc = submitted(document_id);
        let before = doc.clone();

        let approve = DocumentCommand::ApproveDocument(ApproveDocument {
            document_id,
            occurred_at: test_time(),
        });
        let events1 = doc.handle(&approve).unwrap();
        let events2 = doc.handle(&approve).unwrap();

        assert_eq!(doc, before);
        assert_eq!(events1, events2);
    }
}
