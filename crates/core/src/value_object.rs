//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value** - identity does
/// not matter, only the attribute values do. To "modify" one, construct a new
/// one. A generated course code or a parsed requirement list are value
/// objects; a course or an enrollment are entities.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
