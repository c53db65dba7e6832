//! Per-type listener storage.
//!
//! Each event type maps to an immutable, priority-sorted snapshot
//! (`Arc<Vec<_>>`). Mutation clones the vector and swaps the snapshot in
//! under the write lock; lookups clone the `Arc` and iterate outside any
//! lock, so an in-flight dispatch is never corrupted by a concurrent
//! subscribe or unsubscribe.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::listener::Listener;

type ListenerList = Arc<Vec<Arc<Listener>>>;

pub(crate) struct ListenerRegistry {
    map: RwLock<HashMap<TypeId, ListenerList>>,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        Self {
            map: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts preserving the sorted invariant: the insertion point is the
    /// first index whose priority is strictly less than the new listener's,
    /// so equal priorities keep subscribe order.
    pub(crate) fn insert(&self, listener: Arc<Listener>) {
        let mut map = self.map.write().unwrap();
        let slot = map.entry(listener.target()).or_default();

        let mut next: Vec<Arc<Listener>> = slot.as_ref().clone();
        let at = next
            .iter()
            .position(|existing| listener.priority() > existing.priority())
            .unwrap_or(next.len());
        next.insert(at, listener);

        *slot = Arc::new(next);
    }

    /// Removes by instance identity; a listener that was never inserted (or
    /// was already removed) is a no-op.
    pub(crate) fn remove(&self, listener: &Arc<Listener>) {
        let mut map = self.map.write().unwrap();
        let Some(slot) = map.get_mut(&listener.target()) else {
            return;
        };
        let Some(at) = slot.iter().position(|existing| Arc::ptr_eq(existing, listener)) else {
            return;
        };

        let mut next: Vec<Arc<Listener>> = slot.as_ref().clone();
        next.remove(at);

        if next.is_empty() {
            map.remove(&listener.target());
        } else {
            *slot = Arc::new(next);
        }
    }

    /// Snapshot of the current listener order for an exact event type.
    pub(crate) fn lookup(&self, target: TypeId) -> Option<ListenerList> {
        self.map.read().unwrap().get(&target).map(Arc::clone)
    }

    pub(crate) fn is_listening(&self, target: TypeId) -> bool {
        self.map.read().unwrap().contains_key(&target)
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.map.read().unwrap().values().map(|list| list.len()).sum()
    }
}
