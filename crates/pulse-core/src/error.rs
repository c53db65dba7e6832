//! # Pulse Core Errors
//!
//! Defines error types surfaced by the event bus.
//!
//! Discovery failures are deliberately fatal to the whole subscribe call: a
//! registered handler that silently never fires is a worse outcome than a
//! startup crash, so nothing here is downgraded to a per-listener skip.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventBusError {
    /// No registered factory prefix matches the subscriber type's namespace.
    #[error("no listener factory registered for '{subscriber}'")]
    NoFactory { subscriber: &'static str },

    /// A matched factory could not produce a callable for an eligible
    /// handler descriptor.
    #[error("failed to bind handler '{handler}' of '{subscriber}'")]
    Bind {
        subscriber: &'static str,
        handler: &'static str,
        #[source]
        source: FactoryError,
    },
}

/// Failures a [`ListenerFactory`](crate::discovery::ListenerFactory) can
/// report while binding a handler descriptor.
#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("unknown handler '{0}'")]
    UnknownHandler(String),

    #[error("instance handler bound without a receiver")]
    MissingReceiver,

    #[error("receiver is not an instance of the declaring type")]
    ReceiverMismatch,

    #[error("{0}")]
    Other(String),
}

/// Result alias for bus operations.
pub type Result<T> = std::result::Result<T, EventBusError>;
