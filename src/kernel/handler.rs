use core::cell::Cell;

use critical_section::Mutex;

use crate::kernel::event::EventSource;

/// Foreground callback. Receives the context the dispatcher runs for.
pub type Handler<C> = fn(&C);

/// One optional handler per [`EventSource`].
///
/// Slots are filled during initialization; the button and tick slots are
/// filled later by application code. Registering replaces the previous
/// handler for that source.
pub struct HandlerTable<C> {
    slots: [Mutex<Cell<Option<Handler<C>>>>; EventSource::COUNT],
}

impl<C> HandlerTable<C> {
    pub const fn new() -> Self {
        Self {
            slots: [const { Mutex::new(Cell::new(None)) }; EventSource::COUNT],
        }
    }

    pub fn register(&self, source: EventSource, handler: Handler<C>) {
        critical_section::with(|cs| self.slots[source.id()].borrow(cs).set(Some(handler)));
    }

    pub fn unregister(&self, source: EventSource) {
        critical_section::with(|cs| self.slots[source.id()].borrow(cs).set(None));
    }

    pub fn get(&self, source: EventSource) -> Option<Handler<C>> {
        critical_section::with(|cs| self.slots[source.id()].borrow(cs).get())
    }

    pub fn is_registered(&self, source: EventSource) -> bool {
        self.get(source).is_some()
    }
}

impl<C> Default for HandlerTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicUsize, Ordering};

    struct Counter {
        first: AtomicUsize,
        second: AtomicUsize,
    }

    fn first(ctx: &Counter) {
        ctx.first.fetch_add(1, Ordering::Relaxed);
    }

    fn second(ctx: &Counter) {
        ctx.second.fetch_add(1, Ordering::Relaxed);
    }

    #[test]
    fn test_empty_table() {
        let table = HandlerTable::<Counter>::new();
        for source in EventSource::ALL {
            assert!(!table.is_registered(source));
        }
    }

    #[test]
    fn test_register_replaces() {
        let ctx = Counter {
            first: AtomicUsize::new(0),
            second: AtomicUsize::new(0),
        };
        let table = HandlerTable::<Counter>::new();

        table.register(EventSource::Tick, first);
        table.register(EventSource::Tick, second);
        if let Some(handler) = table.get(EventSource::Tick) {
            handler(&ctx);
        }

        assert_eq!(ctx.first.load(Ordering::Relaxed), 0);
        assert_eq!(ctx.second.load(Ordering::Relaxed), 1);
        assert!(!table.is_registered(EventSource::Button));

        table.unregister(EventSource::Tick);
        assert!(table.get(EventSource::Tick).is_none());
    }
}
