//! Event bus following Game Engine Architecture Ch 16.8
//! Key principles:
//! - Handler returns bool (true = consumed, stops forwarding)
//! - Queuing support (send now, dispatch at a well-defined point in the frame)
//! - Events no handler consumed are handed back to the caller

use std::collections::VecDeque;

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
/// Returns false to allow forwarding to other handlers
pub trait EventHandler<E> {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &E) -> bool;
}

/// Queued event bus with chain-of-responsibility delivery
pub struct EventBus<E> {
    queue: VecDeque<E>,
    handlers: Vec<Box<dyn EventHandler<E>>>,
    dispatched: u64,
}

impl<E> EventBus<E> {
    /// Create a new empty bus
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            handlers: Vec::new(),
            dispatched: 0,
        }
    }

    /// Register a handler; handlers are offered events in registration order
    pub fn register_handler(&mut self, handler: Box<dyn EventHandler<E>>) {
        self.handlers.push(handler);
    }

    /// Queue an event for the next dispatch
    pub fn send(&mut self, event: E) {
        self.queue.push_back(event);
    }

    /// Deliver all queued events.
    ///
    /// Returns the events that no handler consumed, in send order.
    pub fn dispatch(&mut self) -> Vec<E> {
        let mut unconsumed = Vec::new();
        while let Some(event) = self.queue.pop_front() {
            self.dispatched += 1;
            let consumed = self.handlers.iter_mut().any(|h| h.on_event(&event));
            if !consumed {
                unconsumed.push(event);
            }
        }
        unconsumed
    }

    /// Take queued events without offering them to handlers
    pub fn drain(&mut self) -> Vec<E> {
        self.queue.drain(..).collect()
    }

    /// Number of queued events
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Total events dispatched so far
    pub fn dispatched_count(&self) -> u64 {
        self.dispatched
    }

    /// Clear all queued events (useful for state transitions)
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("pending", &self.queue.len())
            .field("handlers", &self.handlers.len())
            .field("dispatched", &self.dispatched)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum TestEvent {
        Clicked(u32),
        Hovered,
    }

    struct Recorder {
        seen: Rc<RefCell<Vec<TestEvent>>>,
        consume: bool,
    }

    impl EventHandler<TestEvent> for Recorder {
        fn on_event(&mut self, event: &TestEvent) -> bool {
            self.seen.borrow_mut().push(event.clone());
            self.consume
        }
    }

    #[test]
    fn test_unhandled_events_are_returned() {
        let mut bus = EventBus::new();
        bus.send(TestEvent::Clicked(42));
        bus.send(TestEvent::Hovered);
        assert_eq!(bus.pending(), 2);

        let rest = bus.dispatch();
        assert_eq!(rest, vec![TestEvent::Clicked(42), TestEvent::Hovered]);
        assert_eq!(bus.pending(), 0);
        assert_eq!(bus.dispatched_count(), 2);
    }

    #[test]
    fn test_event_consumption() {
        let first = Rc::new(RefCell::new(Vec::new()));
        let second = Rc::new(RefCell::new(Vec::new()));

        let mut bus = EventBus::new();
        bus.register_handler(Box::new(Recorder { seen: first.clone(), consume: true }));
        bus.register_handler(Box::new(Recorder { seen: second.clone(), consume: false }));

        bus.send(TestEvent::Clicked(1));
        let rest = bus.dispatch();

        assert!(rest.is_empty());
        assert_eq!(first.borrow().len(), 1);
        // Second handler never sees a consumed event
        assert!(second.borrow().is_empty());
    }

    #[test]
    fn test_drain_skips_handlers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.register_handler(Box::new(Recorder { seen: seen.clone(), consume: true }));

        bus.send(TestEvent::Hovered);
        assert_eq!(bus.drain(), vec![TestEvent::Hovered]);
        assert!(seen.borrow().is_empty());
        assert_eq!(bus.dispatched_count(), 0);
    }
}
