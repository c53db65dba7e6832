//! # Pulse Core
//!
//! In-process publish/subscribe event dispatcher: handlers are registered
//! against a concrete event type and events are delivered synchronously, in
//! priority order, with optional early termination through a cancellation
//! flag carried on the event.

pub mod bus;
pub mod discovery;
pub mod error;
pub mod event;
pub mod listener;

// Re-export key public types/traits for easier use by consumers
pub use bus::EventBus;
pub use discovery::{HandlerDef, ListenerFactory, Receiver, Subscriber, SubscriberDescriptor};
pub use error::{EventBusError, FactoryError, Result};
pub use event::{CancelFlag, Cancellable, Event};
pub use listener::{handler_fn, priority, HandlerFn, Listener};
