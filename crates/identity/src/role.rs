use serde::{Deserialize, Serialize};

/// Role a user plays in the platform.
///
/// Closed vocabulary: the registry has exactly these four actor kinds, and
/// authorization decisions at the (excluded) HTTP boundary key off them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Student,
    Trainer,
    Admin,
    Company,
}

impl UserRole {
    pub fn is_trainer(&self) -> bool {
        matches!(self, UserRole::Trainer)
    }
}

impl core::fmt::Display for UserRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            UserRole::Student => "STUDENT",
            UserRole::Trainer => "TRAINER",
            UserRole::Admin => "ADMIN",
            UserRole::Company => "COMPANY",
        };
        f.write_str(s)
    }
}
