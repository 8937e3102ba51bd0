use chrono::{DateTime, Utc};

/// A domain event.
///
/// Events are **immutable facts** (something that already happened), are
/// **versioned** for schema evolution, and are published only after the state
/// change they describe has been committed.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "enrollments.enrollment.completed").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
