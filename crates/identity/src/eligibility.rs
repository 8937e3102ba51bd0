//! Trainer eligibility check.
//!
//! A trainer may be assigned to a course only while their SST license is
//! valid. The rule is evaluated against a caller-provided `now` so the clock
//! stays a boundary collaborator.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::user::UserProfile;

/// Why a trainer cannot be assigned to a course.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EligibilityError {
    /// The user is not registered as a trainer at all.
    #[error("user {trainer} is not a trainer")]
    NotATrainer { trainer: String },

    /// No SST license expiration date on file.
    #[error("cannot assign trainer {trainer}: SST license expiration date is missing")]
    MissingLicense { trainer: String },

    /// The SST license has expired (or expires exactly now).
    #[error("cannot assign trainer {trainer}: SST license expired on {expired_at}")]
    ExpiredLicense {
        trainer: String,
        expired_at: DateTime<Utc>,
    },
}

/// Check whether `trainer` may be assigned to a course at instant `now`.
///
/// Eligible iff a license expiration is on file and it is strictly in the
/// future. An expiration equal to `now` is already expired.
pub fn check_trainer_eligible(
    trainer: &UserProfile,
    now: DateTime<Utc>,
) -> Result<(), EligibilityError> {
    if !trainer.role.is_trainer() {
        return Err(EligibilityError::NotATrainer {
            trainer: trainer.full_name.clone(),
        });
    }

    match trainer.license_expiration {
        None => Err(EligibilityError::MissingLicense {
            trainer: trainer.full_name.clone(),
        }),
        Some(expired_at) if expired_at <= now => Err(EligibilityError::ExpiredLicense {
            trainer: trainer.full_name.clone(),
            expired_at,
        }),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::UserRole;
    use alturas_core::UserId;
    use chrono::{Duration, TimeZone};

    fn trainer(name: &str) -> UserProfile {
        UserProfile::new(UserId::new(), "900123456", "t@alturas.co", name, UserRole::Trainer)
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 5, 12, 0, 0).unwrap()
    }

    #[test]
    fn future_license_is_eligible() {
        let t = trainer("Laura Ortiz").with_license_expiration(fixed_now() + Duration::days(30));
        assert!(check_trainer_eligible(&t, fixed_now()).is_ok());
    }

    #[test]
    fn missing_license_is_rejected() {
        let t = trainer("Laura Ortiz");
        let err = check_trainer_eligible(&t, fixed_now()).unwrap_err();
        match err {
            EligibilityError::MissingLicense { trainer } => assert_eq!(trainer, "Laura Ortiz"),
            _ => panic!("expected MissingLicense"),
        }
    }

    #[test]
    fn expired_license_is_rejected_and_carries_timestamp() {
        let expired_at = fixed_now() - Duration::days(1);
        let t = trainer("Laura Ortiz").with_license_expiration(expired_at);
        let err = check_trainer_eligible(&t, fixed_now()).unwrap_err();
        match err {
            EligibilityError::ExpiredLicense { expired_at: at, .. } => assert_eq!(at, expired_at),
            _ => panic!("expected ExpiredLicense"),
        }
    }

    #[test]
    fn expiry_exactly_now_is_rejected() {
        // Strict comparison: a license expiring at the evaluation instant is
        // already invalid.
        let t = trainer("Laura Ortiz").with_license_expiration(fixed_now());
        assert!(check_trainer_eligible(&t, fixed_now()).is_err());
    }

    #[test]
    fn non_trainer_roles_are_rejected_up_front() {
        let mut t = trainer("Carlos Pinzón").with_license_expiration(fixed_now() + Duration::days(5));
        t.role = UserRole::Student;
        let err = check_trainer_eligible(&t, fixed_now()).unwrap_err();
        assert!(matches!(err, EligibilityError::NotATrainer { .. }));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Any strictly-future expiration is eligible; any past-or-now
            /// expiration is not.
            #[test]
            fn eligibility_matches_strict_ordering(offset_secs in -86_400_000i64..86_400_000i64) {
                let now = fixed_now();
                let expires = now + Duration::seconds(offset_secs);
                let t = trainer("Laura Ortiz").with_license_expiration(expires);

                let verdict = check_trainer_eligible(&t, now);
                prop_assert_eq!(verdict.is_ok(), expires > now);
            }
        }
    }
}
