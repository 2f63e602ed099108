//! Typed publish/subscribe primitive shared by every engine.
//!
//! # Responsibility
//! - Deliver owned notification snapshots to registered handlers.
//! - Hand out subscriber ids that remove exactly one handler.
//!
//! # Invariants
//! - Handlers run synchronously, to completion, inside the emitting call;
//!   there is no queue and no background delivery.
//! - Handlers always receive snapshot values, never live references into
//!   engine state.
//! - Each engine declares its own notification enum, so the set of event
//!   tags is closed at compile time.

/// Handle identifying one connected handler on one signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Synchronous single-threaded notification fan-out.
pub struct Signal<N> {
    next_id: u64,
    handlers: Vec<(SubscriberId, Box<dyn FnMut(&N)>)>,
}

impl<N> Default for Signal<N> {
    fn default() -> Self {
        Self {
            next_id: 0,
            handlers: Vec::new(),
        }
    }
}

impl<N> Signal<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler and returns the id that removes it again.
    pub fn connect(&mut self, handler: impl FnMut(&N) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Removes exactly the handler registered under `id`.
    ///
    /// Returns `false` when the id was already removed or never existed.
    pub fn disconnect(&mut self, id: SubscriberId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        self.handlers.len() != before
    }

    /// Invokes every connected handler with the notification snapshot.
    pub fn emit(&mut self, notification: &N) {
        for (_, handler) in &mut self.handlers {
            handler(notification);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::Signal;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn emit_reaches_every_connected_handler() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut signal: Signal<u32> = Signal::new();

        let first = Rc::clone(&seen);
        signal.connect(move |value| first.borrow_mut().push(*value));
        let second = Rc::clone(&seen);
        signal.connect(move |value| second.borrow_mut().push(*value + 100));

        signal.emit(&7);
        assert_eq!(*seen.borrow(), vec![7, 107]);
    }

    #[test]
    fn disconnect_removes_exactly_one_handler() {
        let seen = Rc::new(RefCell::new(0u32));
        let mut signal: Signal<u32> = Signal::new();

        let kept = Rc::clone(&seen);
        signal.connect(move |value| *kept.borrow_mut() += value);
        let dropped = Rc::clone(&seen);
        let id = signal.connect(move |value| *dropped.borrow_mut() += value * 10);

        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id), "second removal reports false");

        signal.emit(&3);
        assert_eq!(*seen.borrow(), 3);
        assert_eq!(signal.subscriber_count(), 1);
    }

    #[test]
    fn emit_with_no_handlers_is_a_no_op() {
        let mut signal: Signal<&str> = Signal::new();
        signal.emit(&"nothing listens");
        assert_eq!(signal.subscriber_count(), 0);
    }
}
