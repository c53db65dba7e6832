//! Identity-keyed cache of discovery results.
//!
//! Instance keys pair the subscriber's `TypeId` with the receiver `Arc`'s
//! data pointer, never value equality: two distinct receivers must never
//! collide even if their type compares equal. Cached instance listeners keep
//! a clone of the receiver `Arc` alive, which also pins the address the key
//! was taken from.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::discovery::Subscriber;
use crate::error::Result;
use crate::listener::Listener;

/// A cached, priority-ordered discovery result shared between the cache and
/// every subscribe/unsubscribe that resolves through it.
pub(crate) type CachedListeners = Arc<Vec<Arc<Listener>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CacheKey {
    /// A live receiver: subscriber type plus allocation address.
    Instance(TypeId, usize),
    /// A bare type, static handlers only.
    Static(TypeId),
}

impl CacheKey {
    pub(crate) fn instance<S: Subscriber>(receiver: &Arc<S>) -> Self {
        Self::Instance(TypeId::of::<S>(), Arc::as_ptr(receiver) as *const () as usize)
    }

    pub(crate) fn of_type<S: Subscriber>() -> Self {
        Self::Static(TypeId::of::<S>())
    }
}

pub(crate) struct DiscoveryCache {
    entries: RwLock<HashMap<CacheKey, CachedListeners>>,
}

impl DiscoveryCache {
    pub(crate) fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached sequence for `key`, building it at most once.
    ///
    /// The build runs under the write lock so a concurrent subscribe of the
    /// same receiver observes the finished entry, never a second scan.
    pub(crate) fn get_or_try_init<F>(&self, key: CacheKey, build: F) -> Result<CachedListeners>
    where
        F: FnOnce() -> Result<Vec<Arc<Listener>>>,
    {
        if let Some(hit) = self.entries.read().unwrap().get(&key) {
            return Ok(Arc::clone(hit));
        }

        let mut entries = self.entries.write().unwrap();
        if let Some(hit) = entries.get(&key) {
            return Ok(Arc::clone(hit));
        }

        let built = Arc::new(build()?);
        entries.insert(key, Arc::clone(&built));
        Ok(built)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }
}
