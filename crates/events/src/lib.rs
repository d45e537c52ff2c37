//! Change notification plumbing.
//!
//! The inventory store publishes one message per effective mutation; views
//! subscribe and re-read the containers they render.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
