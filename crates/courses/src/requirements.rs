//! Required-document lists with lenient parsing.

use serde::{Deserialize, Serialize};

use alturas_core::{DocumentType, ValueObject};

/// Ordered list of document types a course requires.
///
/// The storage layer persists this as a JSON array of tags. Parsing is
/// deliberately forgiving: malformed data (broken JSON, wrong shape, unknown
/// tags) degrades to the empty set instead of erroring, and an empty set can
/// never satisfy the compliance evaluator - so bad data fails closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequiredDocuments(Vec<DocumentType>);

impl RequiredDocuments {
    pub fn new(types: Vec<DocumentType>) -> Self {
        Self(types)
    }

    /// The empty requirement set.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    /// Parse the persisted representation.
    ///
    /// `None` (column never set) and any malformed value both yield the
    /// empty set.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::none();
        };

        match serde_json::from_str::<Vec<DocumentType>>(raw) {
            Ok(types) => Self(types),
            Err(_) => Self::none(),
        }
    }

    /// Serialize back to the persisted JSON-array representation.
    pub fn to_json(&self) -> String {
        // A Vec of unit enum variants cannot fail to serialize.
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn types(&self) -> &[DocumentType] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl ValueObject for RequiredDocuments {}

impl From<Vec<DocumentType>> for RequiredDocuments {
    fn from(types: Vec<DocumentType>) -> Self {
        Self(types)
    }
}
