//! Document compliance evaluation.
//!
//! Decides whether an enrollment's submitted documents satisfy a course's
//! requirement set. The caller passes the documents already scoped to one
//! enrollment; evaluation itself is pure.

use std::collections::BTreeSet;

use alturas_core::DocumentType;

use crate::document::Document;

/// The set of document types that have at least one approved submission.
pub fn approved_types<'a>(
    documents: impl IntoIterator<Item = &'a Document>,
) -> BTreeSet<DocumentType> {
    documents
        .into_iter()
        .filter(|d| d.is_approved())
        .filter_map(|d| d.kind())
        .collect()
}

/// True iff every required type has at least one approved document.
///
/// The required set is treated as a set (order irrelevant). An empty
/// requirement set is never compliant: a course that requires nothing cannot
/// auto-complete through document review. Extra approved documents of
/// non-required types never change the verdict. Where several documents share
/// a type, one approval suffices.
pub fn is_enrollment_compliant<'a>(
    required_types: &[DocumentType],
    enrollment_documents: impl IntoIterator<Item = &'a Document>,
) -> bool {
    if required_types.is_empty() {
        return false;
    }

    let approved = approved_types(enrollment_documents);
    required_types.iter().all(|t| approved.contains(t))
}
