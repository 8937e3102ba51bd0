//! User profile record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use alturas_core::{Entity, UserId};

use crate::role::UserRole;

/// Profile of a registered user.
///
/// `license_expiration` is only meaningful for trainers (SST license); it is
/// what the eligibility check gates course assignment on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    /// National identity document number (unique in storage).
    pub document_number: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub license_expiration: Option<DateTime<Utc>>,
}

impl UserProfile {
    pub fn new(
        id: UserId,
        document_number: impl Into<String>,
        email: impl Into<String>,
        full_name: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            id,
            document_number: document_number.into(),
            email: email.into(),
            full_name: full_name.into(),
            role,
            is_active: true,
            license_expiration: None,
        }
    }

    pub fn with_license_expiration(mut self, expires: DateTime<Utc>) -> Self {
        self.license_expiration = Some(expires);
        self
    }
}

impl Entity for UserProfile {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
