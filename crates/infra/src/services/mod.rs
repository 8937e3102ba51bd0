//! Application services: load state, run pure aggregate decisions, persist
//! inside one transaction, publish the committed events.
//!
//! The pipeline for every mutating operation is the same:
//!
//! ```text
//! input → transaction { load → handle (pure) → apply → persist } → publish
//! ```
//!
//! Events are published only after the transaction commits; a publish
//! failure therefore never undoes a state change (at-least-once delivery,
//! consumers must be idempotent).

pub mod courses;
pub mod documents;
pub mod enrollments;

use serde::Serialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use alturas_events::{Event, EventBus, EventEnvelope};

use crate::error::RegistryError;

/// Publish a batch of freshly committed events for one aggregate.
///
/// `final_version` is the aggregate version after applying the batch; the
/// envelope sequence numbers are reconstructed from it so they line up with
/// the aggregate's own version tracking.
pub(crate) fn publish_all<B, E>(
    bus: &B,
    aggregate_id: Uuid,
    aggregate_type: &str,
    final_version: u64,
    events: &[E],
) -> Result<(), RegistryError>
where
    E: Event + Serialize,
    B: EventBus<EventEnvelope<JsonValue>>,
{
    let first_sequence = final_version - events.len() as u64 + 1;

    for (idx, event) in events.iter().enumerate() {
        let payload = serde_json::to_value(event)
            .map_err(|e| RegistryError::Publish(format!("payload serialization failed: {e}")))?;

        let envelope = EventEnvelope::new(
            Uuid::now_v7(),
            aggregate_id,
            aggregate_type,
            first_sequence + idx as u64,
            payload,
        );

        bus.publish(envelope)
            .map_err(|e| RegistryError::Publish(format!("{e:?}")))?;
    }

    Ok(())
}
