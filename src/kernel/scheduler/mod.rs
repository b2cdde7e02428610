//! Event dispatcher and idle loop.
//!
//! Interrupt handlers [`signal`](Dispatcher::signal) an [`EventSource`]; the
//! single foreground context repeatedly calls
//! [`drain_and_dispatch`](Dispatcher::drain_and_dispatch), which
//!
//! 1. with interrupts masked, reads the whole event set and clears it;
//! 2. if nothing was pending, suspends until the next interrupt;
//! 3. otherwise releases the mask and runs the registered handler of every
//!    pending source, lowest id first.
//!
//! Because the snapshot is taken before any handler runs, an event signalled
//! while handlers execute is never lost: it shows up in the next snapshot.
//! Several signals of one source between two drains coalesce into one
//! handler call.

use crate::hal::ProcessorControl;
use crate::kernel::critical::LockGuard;
use crate::kernel::event::{EventMask, EventSet, EventSource};
use crate::kernel::handler::{Handler, HandlerTable};
use crate::kernel::power::PowerManager;

use critical_section::CriticalSection;

/// Outcome of one foreground cycle
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Cycle {
    /// Sources that were pending; their handlers (if any) have run
    Dispatched(EventMask),
    /// Nothing was pending; the processor waited for an interrupt
    Suspended,
}

pub struct Dispatcher<C> {
    events: EventSet,
    handlers: HandlerTable<C>,
    power: PowerManager,
}

impl<C> Dispatcher<C> {
    pub const fn new() -> Self {
        Self {
            events: EventSet::new(),
            handlers: HandlerTable::new(),
            power: PowerManager::new(),
        }
    }

    pub fn register(&self, source: EventSource, handler: Handler<C>) {
        self.handlers.register(source, handler);
    }

    pub fn handlers(&self) -> &HandlerTable<C> {
        &self.handlers
    }

    pub fn power(&self) -> &PowerManager {
        &self.power
    }

    /// Marks `source` pending and requests that the foreground resume.
    ///
    /// Safe from interrupt context and from the foreground.
    pub fn signal<P: ProcessorControl>(&self, source: EventSource, cpu: &P) {
        let guard = LockGuard::acquire();
        self.events.post(guard.cs(), source);
        guard.release();
        self.power.wake(cpu);
    }

    /// Marks `source` pending inside a critical section the caller already
    /// holds. The caller is responsible for the wake-up.
    pub fn signal_in(&self, cs: CriticalSection<'_>, source: EventSource) {
        self.events.post(cs, source);
    }

    pub fn pending(&self) -> EventMask {
        critical_section::with(|cs| self.events.peek(cs))
    }

    /// One foreground cycle.
    pub fn drain_and_dispatch<P: ProcessorControl>(&self, ctx: &C, cpu: &P) -> Cycle {
        let guard = LockGuard::acquire();
        let pending = self.events.take(guard.cs());

        if pending.is_empty() {
            // wait with interrupts still masked, the wake-up interrupt runs
            // as soon as the guard is released
            self.power.suspend_until_event(cpu);
            guard.release();
            return Cycle::Suspended;
        }
        guard.release();

        for source in pending.iter() {
            if let Some(handler) = self.handlers.get(source) {
                handler(ctx);
            }
        }
        Cycle::Dispatched(pending)
    }

    /// Foreground idle loop. Never returns.
    pub fn run<P: ProcessorControl>(&self, ctx: &C, cpu: &P) -> ! {
        loop {
            self.drain_and_dispatch(ctx, cpu);
        }
    }
}

impl<C> Default for Dispatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}
