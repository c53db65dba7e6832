//! The dynamic invocation adapter seam.
//!
//! A [`ListenerFactory`] converts a (declaring type, receiver-or-none,
//! handler descriptor) triple into a callable. Factories are registered
//! against a namespace prefix; the first registered prefix matching a
//! subscriber type's fully qualified name wins.

use std::any::Any;
use std::sync::{Arc, RwLock};

use log::debug;

use crate::discovery::HandlerDef;
use crate::error::FactoryError;
use crate::listener::HandlerFn;

/// A subscriber instance handed to a factory, untyped. Factories downcast it
/// back to the declaring type with `Arc::downcast`.
pub type Receiver = Arc<dyn Any + Send + Sync>;

/// Produces callables for discovered handler descriptors.
///
/// `receiver` is `None` exactly when `def.is_static()` holds. Returning an
/// error fails the whole discovery of the subscriber; there is no
/// per-listener skip path.
pub trait ListenerFactory: Send + Sync {
    fn bind(
        &self,
        owner: &'static str,
        receiver: Option<Receiver>,
        def: &HandlerDef,
    ) -> std::result::Result<HandlerFn, FactoryError>;
}

/// Recovers the typed receiver inside a factory's `bind`.
///
/// Fails with [`FactoryError::MissingReceiver`] when called for a static
/// descriptor and with [`FactoryError::ReceiverMismatch`] when the receiver
/// is not an `S`.
pub fn downcast_receiver<S: Any + Send + Sync>(
    receiver: Option<Receiver>,
) -> std::result::Result<Arc<S>, FactoryError> {
    receiver
        .ok_or(FactoryError::MissingReceiver)?
        .downcast::<S>()
        .map_err(|_| FactoryError::ReceiverMismatch)
}

/// Registered factories in registration order.
pub(crate) struct FactoryRegistry {
    factories: RwLock<Vec<(String, Arc<dyn ListenerFactory>)>>,
}

impl FactoryRegistry {
    pub(crate) fn new() -> Self {
        Self {
            factories: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn register(&self, prefix: String, factory: Arc<dyn ListenerFactory>) {
        debug!("Registered listener factory for namespace '{}'", prefix);
        self.factories.write().unwrap().push((prefix, factory));
    }

    /// First registered prefix matching `owner` wins.
    pub(crate) fn find(&self, owner: &str) -> Option<Arc<dyn ListenerFactory>> {
        self.factories
            .read()
            .unwrap()
            .iter()
            .find(|(prefix, _)| owner.starts_with(prefix.as_str()))
            .map(|(_, factory)| Arc::clone(factory))
    }
}
