//! Event contract shared by everything posted through the bus.
//!
//! Any `'static` value can be an event by implementing [`Event`]; the trait
//! carries a single capability hook so cancellable events can opt into
//! short-circuiting dispatch without a separate post path.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};

/// Marker trait for values that can be posted through the bus.
///
/// The default implementation is empty; cancellable event types override
/// [`Event::as_cancellable`] to expose their flag.
pub trait Event: Any + Send + Sync {
    /// Cancellation capability hook.
    ///
    /// Returns `Some(self)` for events that carry a cancelled flag. Dispatch
    /// resets the flag before delivery and stops at the first listener that
    /// sets it.
    fn as_cancellable(&self) -> Option<&dyn Cancellable> {
        None
    }
}

/// Cancellable events expose a mutable cancelled flag.
///
/// The flag uses interior mutability; listeners receive the event by shared
/// reference and may still cancel it.
pub trait Cancellable {
    /// Sets the cancelled flag.
    fn set_cancelled(&self, cancelled: bool);

    /// Returns true if the event has been cancelled.
    fn is_cancelled(&self) -> bool;

    /// Cancels the event.
    fn cancel(&self) {
        self.set_cancelled(true);
    }
}

/// Atomic storage for a cancelled flag.
///
/// Event types embed one of these and forward the [`Cancellable`] methods to
/// it instead of hand-rolling the atomics.
#[derive(Debug, Default)]
pub struct CancelFlag(AtomicBool);

impl CancelFlag {
    /// Create a new, unset flag.
    pub fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Store the flag value.
    pub fn set(&self, cancelled: bool) {
        self.0.store(cancelled, Ordering::Release);
    }

    /// Load the flag value.
    pub fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

// Leaf std types are valid events as-is. Handler discovery still refuses
// scalar targets (see the discovery module); these impls exist so such
// values can be posted and matched by manually constructed listeners.
macro_rules! impl_event_for {
    ($($ty:ty),* $(,)?) => {
        $(impl Event for $ty {})*
    };
}

impl_event_for!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, String,
    &'static str,
);
