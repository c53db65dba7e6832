use std::any::TypeId;
use std::sync::Arc;

use crate::bus::registry::ListenerRegistry;
use crate::event::Event;
use crate::listener::{priority, Listener};

#[derive(Debug)]
struct OrderedEvent;

impl Event for OrderedEvent {}

#[derive(Debug)]
struct UnrelatedEvent;

impl Event for UnrelatedEvent {}

fn listener(priority: i32) -> Arc<Listener> {
    Listener::new::<OrderedEvent, _>(priority, |_event| {})
}

#[test]
fn test_insert_keeps_non_increasing_priority_order() {
    let registry = ListenerRegistry::new();

    registry.insert(listener(priority::MEDIUM));
    registry.insert(listener(priority::HIGH));
    registry.insert(listener(priority::LOWEST));
    registry.insert(listener(priority::HIGHEST));

    let listeners = registry.lookup(TypeId::of::<OrderedEvent>()).unwrap();
    let priorities: Vec<i32> = listeners.iter().map(|l| l.priority()).collect();
    assert_eq!(
        priorities,
        vec![priority::HIGHEST, priority::HIGH, priority::MEDIUM, priority::LOWEST]
    );
}

#[test]
fn test_equal_priority_preserves_insertion_order() {
    let registry = ListenerRegistry::new();

    let first = listener(priority::MEDIUM);
    let second = listener(priority::MEDIUM);
    let third = listener(priority::MEDIUM);
    registry.insert(Arc::clone(&first));
    registry.insert(Arc::clone(&second));
    registry.insert(Arc::clone(&third));

    let listeners = registry.lookup(TypeId::of::<OrderedEvent>()).unwrap();
    assert!(Arc::ptr_eq(&listeners[0], &first));
    assert!(Arc::ptr_eq(&listeners[1], &second));
    assert!(Arc::ptr_eq(&listeners[2], &third));
}

#[test]
fn test_remove_is_by_instance_identity() {
    let registry = ListenerRegistry::new();

    // Same shape, distinct registrations
    let kept = listener(priority::MEDIUM);
    let removed = listener(priority::MEDIUM);
    registry.insert(Arc::clone(&kept));
    registry.insert(Arc::clone(&removed));

    registry.remove(&removed);

    let listeners = registry.lookup(TypeId::of::<OrderedEvent>()).unwrap();
    assert_eq!(listeners.len(), 1);
    assert!(Arc::ptr_eq(&listeners[0], &kept));
}

#[test]
fn test_remove_of_absent_listener_is_a_no_op() {
    let registry = ListenerRegistry::new();

    let inserted = listener(priority::MEDIUM);
    let never_inserted = listener(priority::MEDIUM);
    registry.insert(Arc::clone(&inserted));

    registry.remove(&never_inserted);
    registry.remove(&never_inserted);

    assert_eq!(registry.lookup(TypeId::of::<OrderedEvent>()).unwrap().len(), 1);
}

#[test]
fn test_empty_type_entry_is_dropped() {
    let registry = ListenerRegistry::new();

    let only = listener(priority::MEDIUM);
    registry.insert(Arc::clone(&only));
    assert!(registry.is_listening(TypeId::of::<OrderedEvent>()));

    registry.remove(&only);
    assert!(!registry.is_listening(TypeId::of::<OrderedEvent>()));
    assert!(registry.lookup(TypeId::of::<OrderedEvent>()).is_none());
}

#[test]
fn test_lookup_is_exact_type_only() {
    let registry = ListenerRegistry::new();
    registry.insert(listener(priority::MEDIUM));

    assert!(registry.lookup(TypeId::of::<UnrelatedEvent>()).is_none());
}

#[test]
fn test_lookup_returns_a_stable_snapshot() {
    let registry = ListenerRegistry::new();
    registry.insert(listener(priority::MEDIUM));

    let snapshot = registry.lookup(TypeId::of::<OrderedEvent>()).unwrap();
    registry.insert(listener(priority::HIGH));

    // The snapshot taken before the insert is unaffected
    assert_eq!(snapshot.len(), 1);
    assert_eq!(registry.lookup(TypeId::of::<OrderedEvent>()).unwrap().len(), 2);
}
