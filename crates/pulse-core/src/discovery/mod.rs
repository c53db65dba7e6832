//! Listener discovery: turning a subscriber object or bare type into a
//! sequence of [`Listener`]s.
//!
//! Subscriber types declare their handlers as [`HandlerDef`] descriptors; a
//! registered [`ListenerFactory`] converts each descriptor plus an optional
//! receiver into a callable. Results are cached by receiver identity (or by
//! type, for static-only discovery) and computed at most once per key.

pub mod cache;
pub mod factory;

use std::any::{Any, TypeId};
use std::sync::Arc;

use log::debug;

use crate::error::{EventBusError, Result};
use crate::event::Event;
use crate::listener::Listener;

use cache::{CacheKey, CachedListeners, DiscoveryCache};
use factory::FactoryRegistry;

pub use factory::{downcast_receiver, ListenerFactory, Receiver};

/// Describes one handler declared by a subscriber type.
///
/// The descriptor is the annotation-scan analog: it names the handler, the
/// exact event type it accepts, its priority and whether it is bound to a
/// receiver instance. Binding a descriptor to a callable is the job of a
/// [`ListenerFactory`].
#[derive(Debug, Clone)]
pub struct HandlerDef {
    name: &'static str,
    target: TypeId,
    target_name: &'static str,
    priority: i32,
    is_static: bool,
}

impl HandlerDef {
    /// Descriptor for a handler bound to a receiver instance.
    pub fn instance<E: Event>(name: &'static str, priority: i32) -> Self {
        Self::of::<E>(name, priority, false)
    }

    /// Descriptor for a handler that needs no receiver.
    pub fn static_fn<E: Event>(name: &'static str, priority: i32) -> Self {
        Self::of::<E>(name, priority, true)
    }

    fn of<E: Event>(name: &'static str, priority: i32, is_static: bool) -> Self {
        Self {
            name,
            target: TypeId::of::<E>(),
            target_name: std::any::type_name::<E>(),
            priority,
            is_static,
        }
    }

    /// Handler name, used by factories to select the method to bind.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Exact event type the handler accepts.
    pub fn target(&self) -> TypeId {
        self.target
    }

    /// Name of the target event type.
    pub fn target_name(&self) -> &'static str {
        self.target_name
    }

    /// Delivery priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// True if the handler needs no receiver.
    pub fn is_static(&self) -> bool {
        self.is_static
    }
}

/// The handler set a subscriber type declares: its own descriptors plus an
/// optional link to an ancestor subscriber whose handlers are discovered as
/// well.
pub struct SubscriberDescriptor {
    owner: &'static str,
    defs: Vec<HandlerDef>,
    parent: Option<fn() -> SubscriberDescriptor>,
}

impl SubscriberDescriptor {
    /// Start a descriptor for subscriber type `S`.
    pub fn new<S: Subscriber>() -> Self {
        Self {
            owner: std::any::type_name::<S>(),
            defs: Vec::new(),
            parent: None,
        }
    }

    /// Add a handler descriptor.
    pub fn with(mut self, def: HandlerDef) -> Self {
        self.defs.push(def);
        self
    }

    /// Link an ancestor subscriber. Its handlers are discovered after this
    /// type's own, and nothing is shadowed.
    pub fn inherit(mut self, parent: fn() -> SubscriberDescriptor) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Fully qualified name of the declaring type; factories are selected by
    /// matching registered namespace prefixes against it.
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    /// The handler descriptors declared at this level.
    pub fn defs(&self) -> &[HandlerDef] {
        &self.defs
    }

    /// The ancestor link, if any.
    pub fn parent(&self) -> Option<fn() -> SubscriberDescriptor> {
        self.parent
    }
}

/// Types whose handler methods can be discovered by the bus.
pub trait Subscriber: Any + Send + Sync {
    /// The handler set this type declares.
    fn descriptor() -> SubscriberDescriptor
    where
        Self: Sized;
}

/// Discovery engine: factory registry plus the identity-keyed result cache.
pub(crate) struct Discovery {
    factories: FactoryRegistry,
    cache: DiscoveryCache,
}

impl Discovery {
    pub(crate) fn new() -> Self {
        Self {
            factories: FactoryRegistry::new(),
            cache: DiscoveryCache::new(),
        }
    }

    pub(crate) fn register_factory(&self, prefix: String, factory: Arc<dyn ListenerFactory>) {
        self.factories.register(prefix, factory);
    }

    /// Listeners for a live receiver: instance and static handlers.
    pub(crate) fn instance_listeners<S: Subscriber>(
        &self,
        receiver: &Arc<S>,
    ) -> Result<CachedListeners> {
        let key = CacheKey::instance(receiver);
        self.cache.get_or_try_init(key, || {
            let untyped: Receiver = receiver.clone();
            self.build(S::descriptor(), Some(&untyped), false)
        })
    }

    /// Listeners for a bare type: static handlers only.
    pub(crate) fn static_listeners<S: Subscriber>(&self) -> Result<CachedListeners> {
        self.cache
            .get_or_try_init(CacheKey::of_type::<S>(), || {
                self.build(S::descriptor(), None, true)
            })
    }

    #[cfg(test)]
    pub(crate) fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Walks the descriptor chain, skipping ineligible defs and binding the
    /// rest through the matching factory. Any bind failure aborts the whole
    /// discovery.
    fn build(
        &self,
        descriptor: SubscriberDescriptor,
        receiver: Option<&Receiver>,
        static_only: bool,
    ) -> Result<Vec<Arc<Listener>>> {
        let mut listeners = Vec::new();
        let mut level = Some(descriptor);

        while let Some(desc) = level {
            let owner = desc.owner();
            let factory = self
                .factories
                .find(owner)
                .ok_or(EventBusError::NoFactory { subscriber: owner })?;

            for def in desc.defs() {
                if is_scalar_target(def.target()) {
                    debug!(
                        "Skipping handler '{}' of '{}': scalar event type '{}'",
                        def.name(),
                        owner,
                        def.target_name()
                    );
                    continue;
                }
                if static_only && !def.is_static() {
                    continue;
                }

                let bound_receiver = if def.is_static() {
                    None
                } else {
                    receiver.cloned()
                };
                let callable =
                    factory
                        .bind(owner, bound_receiver, def)
                        .map_err(|source| EventBusError::Bind {
                            subscriber: owner,
                            handler: def.name(),
                            source,
                        })?;

                listeners.push(Listener::bound(
                    def.target(),
                    def.target_name(),
                    def.priority(),
                    def.is_static(),
                    callable,
                ));
            }

            level = desc.parent().map(|parent| parent());
        }

        Ok(listeners)
    }
}

/// Scalar event targets are rejected at discovery time; a newtype wrapper
/// over the same value is accepted.
fn is_scalar_target(target: TypeId) -> bool {
    [
        TypeId::of::<i8>(),
        TypeId::of::<i16>(),
        TypeId::of::<i32>(),
        TypeId::of::<i64>(),
        TypeId::of::<i128>(),
        TypeId::of::<isize>(),
        TypeId::of::<u8>(),
        TypeId::of::<u16>(),
        TypeId::of::<u32>(),
        TypeId::of::<u64>(),
        TypeId::of::<u128>(),
        TypeId::of::<usize>(),
        TypeId::of::<f32>(),
        TypeId::of::<f64>(),
        TypeId::of::<bool>(),
        TypeId::of::<char>(),
    ]
    .contains(&target)
}
