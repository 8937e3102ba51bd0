//! `alturas-identity` — user roles, profiles, and trainer eligibility.
//!
//! This crate is intentionally decoupled from HTTP, session issuance and
//! storage; it only knows who a user is and whether a trainer may be
//! assigned to a course.

pub mod eligibility;
pub mod role;
pub mod user;

pub use eligibility::{EligibilityError, check_trainer_eligible};
pub use role::UserRole;
pub use user::UserProfile;
