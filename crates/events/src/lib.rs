//! Domain event abstractions: the `Event` trait, the persisted/published
//! envelope, and the pub/sub bus seam with an in-memory implementation.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::InMemoryEventBus;
