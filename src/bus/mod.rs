//! Event bus
//!
//! The coordination spine of the game. Subsystems never call each other
//! directly; they publish [`GameEvent`]s and subscribe to [`Topic`]s.
//! Dispatch is synchronous and single-threaded: `publish` returns after
//! every live subscriber has run.
//!
//! Rules the bus guarantees:
//! - subscribers run in registration order;
//! - a handler that returns an error is logged and skipped, the rest of
//!   the delivery continues;
//! - a handler unsubscribed mid-dispatch does not fire later in that
//!   same dispatch;
//! - a publish from inside a handler is queued and delivered after the
//!   current delivery finishes, never nested inside it.

mod event;

pub use event::{GameEvent, Topic};

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// Handle returned by [`EventBus::subscribe`]. Needed to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Handler = Box<dyn FnMut(&GameEvent) -> anyhow::Result<()>>;

struct Subscriber {
    id: SubscriberId,
    /// Shared liveness flag. Cleared on unsubscribe so snapshots taken
    /// for an in-flight dispatch skip the handler.
    active: Rc<Cell<bool>>,
    handler: Rc<RefCell<Handler>>,
}

#[derive(Default)]
struct BusState {
    next_id: u64,
    subscribers: HashMap<Topic, Vec<Subscriber>>,
    /// Events published while a dispatch is running.
    pending: VecDeque<GameEvent>,
    dispatching: bool,
}

/// Synchronous topic bus. Interior mutability so subsystems can hold
/// `&EventBus` and publish from inside handlers.
#[derive(Default)]
pub struct EventBus {
    state: RefCell<BusState>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` on `topic`. Handlers fire in registration order.
    pub fn subscribe<F>(&self, topic: Topic, handler: F) -> SubscriberId
    where
        F: FnMut(&GameEvent) -> anyhow::Result<()> + 'static,
    {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = SubscriberId(state.next_id);
        state
            .subscribers
            .entry(topic)
            .or_default()
            .push(Subscriber {
                id,
                active: Rc::new(Cell::new(true)),
                handler: Rc::new(RefCell::new(Box::new(handler))),
            });
        id
    }

    /// Remove one subscriber. Returns false if it was already gone,
    /// so double-unsubscribe is harmless.
    pub fn unsubscribe(&self, topic: Topic, id: SubscriberId) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(subs) = state.subscribers.get_mut(&topic) else {
            return false;
        };
        let Some(pos) = subs.iter().position(|s| s.id == id) else {
            return false;
        };
        let sub = subs.remove(pos);
        sub.active.set(false);
        true
    }

    /// Drop every subscriber on one topic.
    pub fn clear_topic(&self, topic: Topic) {
        let mut state = self.state.borrow_mut();
        if let Some(subs) = state.subscribers.remove(&topic) {
            for sub in &subs {
                sub.active.set(false);
            }
        }
    }

    /// Drop every subscriber on every topic. Used on teardown.
    pub fn clear(&self) {
        let mut state = self.state.borrow_mut();
        for subs in state.subscribers.values() {
            for sub in subs {
                sub.active.set(false);
            }
        }
        state.subscribers.clear();
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.state
            .borrow()
            .subscribers
            .get(&topic)
            .map_or(0, |subs| subs.len())
    }

    /// Deliver `event` to every subscriber of its topic, in order.
    ///
    /// Publishing from inside a handler queues the event; it is delivered
    /// after the current delivery completes and before `publish` returns
    /// to the outermost caller.
    pub fn publish(&self, event: GameEvent) {
        {
            let mut state = self.state.borrow_mut();
            if state.dispatching {
                state.pending.push_back(event);
                return;
            }
            state.dispatching = true;
        }
        self.dispatch(&event);
        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                match state.pending.pop_front() {
                    Some(queued) => queued,
                    None => {
                        state.dispatching = false;
                        return;
                    }
                }
            };
            self.dispatch(&next);
        }
    }

    fn dispatch(&self, event: &GameEvent) {
        let topic = event.topic();
        // Snapshot outside the borrow so handlers can subscribe,
        // unsubscribe, and publish without re-entering the RefCell.
        let snapshot: Vec<(Rc<Cell<bool>>, Rc<RefCell<Handler>>)> = {
            let state = self.state.borrow();
            match state.subscribers.get(&topic) {
                Some(subs) => subs
                    .iter()
                    .map(|s| (s.active.clone(), s.handler.clone()))
                    .collect(),
                None => return,
            }
        };
        log::trace!("dispatch {} to {} subscriber(s)", topic, snapshot.len());
        for (active, handler) in snapshot {
            if !active.get() {
                continue;
            }
            if let Err(err) = (handler.borrow_mut())(event) {
                log::warn!("subscriber failed on {}: {:#}", topic, err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn health_event(current: i32) -> GameEvent {
        GameEvent::HealthChanged { current, max: 100 }
    }

    #[test]
    fn test_delivery_in_registration_order() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let seen = seen.clone();
            bus.subscribe(Topic::HealthChanged, move |_| {
                seen.borrow_mut().push(tag);
                Ok(())
            });
        }

        bus.publish(health_event(90));
        assert_eq!(*seen.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_failing_handler_does_not_stop_delivery() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        bus.subscribe(Topic::HealthChanged, |_| Err(anyhow!("broken handler")));
        {
            let seen = seen.clone();
            bus.subscribe(Topic::HealthChanged, move |_| {
                seen.borrow_mut().push("survivor");
                Ok(())
            });
        }

        bus.publish(health_event(90));
        assert_eq!(*seen.borrow(), vec!["survivor"]);
    }

    #[test]
    fn test_unsubscribe_mid_dispatch_suppresses_later_handler() {
        let bus = Rc::new(EventBus::new());
        let seen = Rc::new(RefCell::new(Vec::new()));

        // Reserve the id slot first so the closure below can capture it.
        let victim_id = Rc::new(Cell::new(None));

        {
            let bus = bus.clone();
            let victim_id = victim_id.clone();
            let seen = seen.clone();
            bus.clone().subscribe(Topic::HealthChanged, move |_| {
                seen.borrow_mut().push("remover");
                if let Some(id) = victim_id.get() {
                    bus.unsubscribe(Topic::HealthChanged, id);
                }
                Ok(())
            });
        }
        {
            let seen = seen.clone();
            let id = bus.subscribe(Topic::HealthChanged, move |_| {
                seen.borrow_mut().push("victim");
                Ok(())
            });
            victim_id.set(Some(id));
        }

        bus.publish(health_event(90));
        // The victim was unsubscribed by the first handler before its turn.
        assert_eq!(*seen.borrow(), vec!["remover"]);

        bus.publish(health_event(80));
        assert_eq!(*seen.borrow(), vec!["remover", "remover"]);
    }

    #[test]
    fn test_nested_publish_is_deferred() {
        let bus = Rc::new(EventBus::new());
        let seen = Rc::new(RefCell::new(Vec::new()));

        {
            let bus = bus.clone();
            let seen = seen.clone();
            bus.clone().subscribe(Topic::HealthChanged, move |_| {
                seen.borrow_mut().push("health-a");
                bus.publish(GameEvent::GamePaused {
                    source: crate::game::PauseSource::Menu,
                });
                Ok(())
            });
        }
        {
            let seen = seen.clone();
            bus.subscribe(Topic::HealthChanged, move |_| {
                seen.borrow_mut().push("health-b");
                Ok(())
            });
        }
        {
            let seen = seen.clone();
            bus.subscribe(Topic::GamePaused, move |_| {
                seen.borrow_mut().push("paused");
                Ok(())
            });
        }

        bus.publish(health_event(90));
        // The nested publish ran after the full health delivery.
        assert_eq!(*seen.borrow(), vec!["health-a", "health-b", "paused"]);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let bus = EventBus::new();
        let id = bus.subscribe(Topic::RealmChange, |_| Ok(()));
        assert!(bus.unsubscribe(Topic::RealmChange, id));
        assert!(!bus.unsubscribe(Topic::RealmChange, id));
    }

    #[test]
    fn test_publish_without_subscribers_is_noop() {
        let bus = EventBus::new();
        bus.publish(health_event(100));
        assert_eq!(bus.subscriber_count(Topic::HealthChanged), 0);
    }

    #[test]
    fn test_clear_deactivates_everything() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(0u32));
        {
            let seen = seen.clone();
            bus.subscribe(Topic::HealthChanged, move |_| {
                *seen.borrow_mut() += 1;
                Ok(())
            });
        }
        bus.publish(health_event(90));
        bus.clear();
        bus.publish(health_event(80));
        assert_eq!(*seen.borrow(), 1);
        assert_eq!(bus.subscriber_count(Topic::HealthChanged), 0);
    }
}
