//! The atomic registration unit: a target event type, a priority, a
//! static/instance flag and a type-erased callable.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::event::Event;

/// Default listener priorities. Higher values are delivered earlier; any
/// `i32` is a valid priority.
pub mod priority {
    pub const HIGHEST: i32 = 200;
    pub const HIGH: i32 = 100;
    pub const MEDIUM: i32 = 0;
    pub const LOW: i32 = -100;
    pub const LOWEST: i32 = -200;
}

/// Type-erased handler callable. Invoked with exactly one argument, the
/// posted event, and returns nothing.
pub type HandlerFn = Arc<dyn Fn(&dyn Any) + Send + Sync>;

/// A single registration in the bus.
///
/// Listeners are shared as `Arc<Listener>`; the registry removes them by
/// pointer identity, so the same underlying handler registered twice yields
/// two independent registrations.
pub struct Listener {
    target: TypeId,
    target_name: &'static str,
    priority: i32,
    is_static: bool,
    callable: HandlerFn,
}

impl Listener {
    /// Creates a listener from a plain closure over a concrete event type.
    ///
    /// Closure listeners are treated as instance-bound (`is_static` false)
    /// so a type-level unsubscribe never touches them.
    pub fn new<E, F>(priority: i32, handler: F) -> Arc<Self>
    where
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        Arc::new(Self {
            target: TypeId::of::<E>(),
            target_name: std::any::type_name::<E>(),
            priority,
            is_static: false,
            callable: handler_fn(handler),
        })
    }

    /// Listener over an already type-erased callable, as produced by a
    /// listener factory during discovery.
    pub(crate) fn bound(
        target: TypeId,
        target_name: &'static str,
        priority: i32,
        is_static: bool,
        callable: HandlerFn,
    ) -> Arc<Self> {
        Arc::new(Self {
            target,
            target_name,
            priority,
            is_static,
            callable,
        })
    }

    /// The exact event type this listener accepts.
    pub fn target(&self) -> TypeId {
        self.target
    }

    /// Name of the target event type, for diagnostics.
    pub fn target_name(&self) -> &'static str {
        self.target_name
    }

    /// Delivery priority; higher runs earlier.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// True if this listener is not bound to a receiver instance.
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Calls the listener with the given event.
    pub fn call(&self, event: &dyn Any) {
        (self.callable)(event)
    }
}

// Manual Debug implementation, the callable is opaque
impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("target", &self.target_name)
            .field("priority", &self.priority)
            .field("is_static", &self.is_static)
            .finish_non_exhaustive()
    }
}

/// Wraps a typed closure into the type-erased handler shape.
///
/// Events whose runtime type is not `E` are ignored; the registry only ever
/// routes exact matches here, so the downcast is a final guard rather than a
/// filter.
pub fn handler_fn<E, F>(handler: F) -> HandlerFn
where
    E: Event,
    F: Fn(&E) + Send + Sync + 'static,
{
    Arc::new(move |event: &dyn Any| {
        if let Some(event) = event.downcast_ref::<E>() {
            handler(event);
        }
    })
}
