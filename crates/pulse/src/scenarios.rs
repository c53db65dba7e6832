//! Demo scenarios wired through a single listener factory.
//!
//! Each scenario builds its own bus, registers [`DemoFactory`] for this
//! crate's namespace and posts a couple of events, printing what fires and
//! in which order.

use std::sync::Arc;

use pulse_core::discovery::downcast_receiver;
use pulse_core::{
    handler_fn, priority, CancelFlag, Cancellable, Event, EventBus, FactoryError, HandlerDef,
    HandlerFn, Listener, Receiver, Result, Subscriber, SubscriberDescriptor,
};

#[derive(Debug)]
struct ChatEvent {
    text: String,
}

impl Event for ChatEvent {}

#[derive(Debug, Default)]
struct DuelEvent {
    flag: CancelFlag,
}

impl Event for DuelEvent {
    fn as_cancellable(&self) -> Option<&dyn Cancellable> {
        Some(self)
    }
}

impl Cancellable for DuelEvent {
    fn set_cancelled(&self, cancelled: bool) {
        self.flag.set(cancelled);
    }

    fn is_cancelled(&self) -> bool {
        self.flag.get()
    }
}

/// Static handlers only; the high-priority one cancels the duel.
struct Referee;

impl Subscriber for Referee {
    fn descriptor() -> SubscriberDescriptor {
        SubscriberDescriptor::new::<Self>()
            .with(HandlerDef::static_fn::<DuelEvent>("on_duel_high", priority::HIGH))
            .with(HandlerDef::static_fn::<DuelEvent>("on_duel_medium", priority::MEDIUM))
    }
}

/// Two instance handlers on the same event type at different priorities.
struct Announcer {
    name: &'static str,
}

impl Announcer {
    fn on_chat_high(&self, event: &ChatEvent) {
        println!("[{}] high: {}", self.name, event.text);
    }

    fn on_chat_low(&self, event: &ChatEvent) {
        println!("[{}] low: {}", self.name, event.text);
    }
}

impl Subscriber for Announcer {
    fn descriptor() -> SubscriberDescriptor {
        SubscriberDescriptor::new::<Self>()
            .with(HandlerDef::instance::<ChatEvent>("on_chat_high", priority::HIGH))
            .with(HandlerDef::instance::<ChatEvent>("on_chat_low", priority::LOW))
    }
}

/// Ancestor subscriber; Rookie below declares nothing of its own.
struct Fighter;

impl Fighter {
    fn on_chat(&self, event: &ChatEvent) {
        println!("[fighter] inherited handler: {}", event.text);
    }
}

impl Subscriber for Fighter {
    fn descriptor() -> SubscriberDescriptor {
        SubscriberDescriptor::new::<Self>()
            .with(HandlerDef::instance::<ChatEvent>("on_chat_fighter", priority::MEDIUM))
    }
}

struct Rookie {
    fighter: Fighter,
}

impl Subscriber for Rookie {
    fn descriptor() -> SubscriberDescriptor {
        SubscriberDescriptor::new::<Self>().inherit(Fighter::descriptor)
    }
}

/// Binds every handler the demo subscribers declare.
struct DemoFactory;

impl pulse_core::ListenerFactory for DemoFactory {
    fn bind(
        &self,
        _owner: &'static str,
        receiver: Option<Receiver>,
        def: &HandlerDef,
    ) -> std::result::Result<HandlerFn, FactoryError> {
        match def.name() {
            "on_duel_high" => Ok(handler_fn(|event: &DuelEvent| {
                println!("[referee] high: stopping the duel");
                event.cancel();
            })),
            "on_duel_medium" => Ok(handler_fn(|_event: &DuelEvent| {
                println!("[referee] medium: never reached");
            })),
            "on_chat_high" => {
                let announcer = downcast_receiver::<Announcer>(receiver)?;
                Ok(handler_fn(move |event: &ChatEvent| {
                    announcer.on_chat_high(event)
                }))
            }
            "on_chat_low" => {
                let announcer = downcast_receiver::<Announcer>(receiver)?;
                Ok(handler_fn(move |event: &ChatEvent| {
                    announcer.on_chat_low(event)
                }))
            }
            // Declared on Fighter, bound against the subscribing Rookie
            "on_chat_fighter" => {
                let rookie = downcast_receiver::<Rookie>(receiver)?;
                Ok(handler_fn(move |event: &ChatEvent| {
                    rookie.fighter.on_chat(event)
                }))
            }
            other => Err(FactoryError::UnknownHandler(other.to_string())),
        }
    }
}

fn demo_bus() -> EventBus {
    let bus = EventBus::new();
    bus.register_factory("pulse::scenarios", DemoFactory);
    bus
}

/// Cancellation short-circuit: the high-priority referee handler cancels,
/// the medium one never prints.
pub fn cancel() -> Result<()> {
    let bus = demo_bus();
    bus.subscribe_static::<Referee>()?;

    let event = bus.post(DuelEvent::default());
    println!("duel cancelled: {}", event.is_cancelled());

    Ok(())
}

/// Priority ordering across a closure listener and discovered handlers.
pub fn ordering() -> Result<()> {
    let bus = demo_bus();

    // Closure listener, bypassing discovery, runs before everything else
    bus.subscribe_listener(Listener::new::<ChatEvent, _>(
        priority::HIGHEST,
        |event: &ChatEvent| {
            println!("[closure] highest: {}", event.text);
        },
    ));

    let announcer = Arc::new(Announcer { name: "announcer" });
    bus.subscribe(&announcer)?;

    bus.post(ChatEvent {
        text: "round one".to_string(),
    });

    bus.unsubscribe(&announcer)?;
    bus.post(ChatEvent {
        text: "nobody left but the closure".to_string(),
    });

    Ok(())
}

/// A subtype with no handlers of its own still receives its ancestor's.
pub fn inherit() -> Result<()> {
    let bus = demo_bus();

    let rookie = Arc::new(Rookie { fighter: Fighter });
    bus.subscribe(&rookie)?;

    bus.post(ChatEvent {
        text: "fall in".to_string(),
    });

    Ok(())
}
