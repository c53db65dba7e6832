//! The event bus: listener registry plus dispatch, and the subscribe /
//! unsubscribe orchestration over discovery.

pub(crate) mod registry;

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use log::{debug, trace};

use crate::discovery::{Discovery, ListenerFactory, Subscriber};
use crate::error::Result;
use crate::event::Event;
use crate::listener::Listener;

use registry::ListenerRegistry;

/// Manages event listeners and posts events to them.
///
/// The bus is fully synchronous: `post` runs every matching listener on the
/// calling thread before returning. It is also `Send + Sync`; independent
/// threads may post and (un)subscribe concurrently, and an in-flight
/// dispatch iterates the snapshot taken at lookup time.
pub struct EventBus {
    registry: ListenerRegistry,
    discovery: Discovery,
}

impl EventBus {
    /// Creates an empty bus with no factories registered.
    pub fn new() -> Self {
        Self {
            registry: ListenerRegistry::new(),
            discovery: Discovery::new(),
        }
    }

    /// Registers a listener factory for subscriber types whose fully
    /// qualified name starts with `prefix`, eg `"my_app::handlers"`.
    ///
    /// Factories are tried in registration order and the first matching
    /// prefix wins. Subscribing a type no factory matches fails with
    /// [`EventBusError::NoFactory`](crate::error::EventBusError::NoFactory).
    pub fn register_factory<F>(&self, prefix: impl Into<String>, factory: F)
    where
        F: ListenerFactory + 'static,
    {
        self.discovery.register_factory(prefix.into(), Arc::new(factory));
    }

    /// Posts an event to all listeners registered for its exact type and
    /// returns it.
    ///
    /// A cancellable event has its flag reset to false before dispatch
    /// begins, even when no listener is registered; delivery then stops at
    /// the first listener that cancels. A panic inside a listener propagates
    /// to the caller unmodified and skips the rest of the dispatch.
    pub fn post<E: Event>(&self, event: E) -> E {
        match event.as_cancellable() {
            Some(cancellable) => {
                cancellable.set_cancelled(false);

                if let Some(listeners) = self.registry.lookup(TypeId::of::<E>()) {
                    trace!(
                        "Dispatching '{}' to {} listener(s)",
                        std::any::type_name::<E>(),
                        listeners.len()
                    );
                    for listener in listeners.iter() {
                        listener.call(&event);
                        if cancellable.is_cancelled() {
                            trace!("'{}' cancelled, stopping dispatch", std::any::type_name::<E>());
                            break;
                        }
                    }
                }
            }
            None => {
                if let Some(listeners) = self.registry.lookup(TypeId::of::<E>()) {
                    trace!(
                        "Dispatching '{}' to {} listener(s)",
                        std::any::type_name::<E>(),
                        listeners.len()
                    );
                    for listener in listeners.iter() {
                        listener.call(&event);
                    }
                }
            }
        }

        event
    }

    /// Discovers `receiver`'s handlers (instance and static) and subscribes
    /// them.
    ///
    /// Discovery runs once per receiver identity; every later subscribe or
    /// unsubscribe of the same `Arc` reuses the cached listeners. The cache
    /// keeps the receiver alive until the bus is dropped.
    pub fn subscribe<S: Subscriber>(&self, receiver: &Arc<S>) -> Result<()> {
        let listeners = self.discovery.instance_listeners(receiver)?;
        self.insert_all(std::any::type_name::<S>(), &listeners);
        Ok(())
    }

    /// Discovers `S`'s static handlers and subscribes them. Instance-bound
    /// handlers declared on `S` are not touched.
    pub fn subscribe_static<S: Subscriber>(&self) -> Result<()> {
        let listeners = self.discovery.static_listeners::<S>()?;
        self.insert_all(std::any::type_name::<S>(), &listeners);
        Ok(())
    }

    /// Subscribes a manually constructed listener, bypassing discovery.
    pub fn subscribe_listener(&self, listener: Arc<Listener>) {
        debug!("Subscribed listener for '{}'", listener.target_name());
        self.registry.insert(listener);
    }

    /// Removes the listeners previously discovered for `receiver`. A
    /// receiver that was never subscribed is a no-op.
    pub fn unsubscribe<S: Subscriber>(&self, receiver: &Arc<S>) -> Result<()> {
        let listeners = self.discovery.instance_listeners(receiver)?;
        self.remove_all(std::any::type_name::<S>(), &listeners);
        Ok(())
    }

    /// Removes `S`'s static listeners. Mirrors [`EventBus::subscribe_static`].
    pub fn unsubscribe_static<S: Subscriber>(&self) -> Result<()> {
        let listeners = self.discovery.static_listeners::<S>()?;
        self.remove_all(std::any::type_name::<S>(), &listeners);
        Ok(())
    }

    /// Removes a manually subscribed listener by instance identity; removing
    /// it twice is a no-op.
    pub fn unsubscribe_listener(&self, listener: &Arc<Listener>) {
        self.registry.remove(listener);
    }

    /// True if at least one listener is registered for `E` at this instant.
    pub fn is_listening<E: Event>(&self) -> bool {
        self.registry.is_listening(TypeId::of::<E>())
    }

    fn insert_all(&self, subscriber: &'static str, listeners: &[Arc<Listener>]) {
        for listener in listeners {
            self.registry.insert(Arc::clone(listener));
        }
        debug!("Subscribed {} listener(s) for '{}'", listeners.len(), subscriber);
    }

    fn remove_all(&self, subscriber: &'static str, listeners: &[Arc<Listener>]) {
        for listener in listeners {
            self.registry.remove(listener);
        }
        debug!("Unsubscribed {} listener(s) for '{}'", listeners.len(), subscriber);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

// Manual Debug implementation, listeners are opaque
impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listener_count", &self.registry.listener_count())
            .finish_non_exhaustive()
    }
}

// Test module declaration
#[cfg(test)]
mod tests;
