//! Service-level error taxonomy.

use thiserror::Error;

use alturas_core::DomainError;
use alturas_courses::CourseError;
use alturas_identity::EligibilityError;

use crate::deletion::DeletionError;
use crate::store::StoreError;

/// Error surfaced by the registry services.
///
/// Every variant is a typed failure the (excluded) HTTP layer can map to a
/// client-facing status. Nothing here is swallowed: the one locally-recovered
/// condition (malformed requirement lists) never reaches this type.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Course(#[from] CourseError),

    #[error(transparent)]
    Eligibility(#[from] EligibilityError),

    #[error(transparent)]
    Deletion(#[from] DeletionError),

    #[error(transparent)]
    Storage(#[from] StoreError),

    /// Event publication failed after a successful commit. The state change
    /// is durable; the caller may retry publication.
    #[error("event publication failed: {0}")]
    Publish(String),
}

impl RegistryError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RegistryError::Domain(DomainError::NotFound)
                | RegistryError::Deletion(DeletionError::NotFound)
        )
    }
}
