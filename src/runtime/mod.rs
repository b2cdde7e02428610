//! # Runtime context
//!
//! [`Runtime`] owns everything the foreground and the interrupt handlers
//! share: the dispatcher, the peripherals, the watchdog and tick state, and
//! the framing collaborator. One instance exists per program; it is
//! installed in a `'static` slot with [`define_runtime!`](crate::define_runtime)
//! so vector-table handlers can reach it.
//!
//! ```text
//!   interrupt vectors                        foreground
//!   ─────────────────                        ──────────
//!   on_uart_rx ───┐                          idle_loop()
//!   on_tx_ack_edge│  signal / wake             └─ drain_and_dispatch()
//!   on_button_edge├─────────────► EventSet ─────► Button   → debounce → app
//!   on_tick_compare                               Tick     → app
//!   on_watchdog_compare                           Dispatch → framing
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! radiolink_rt::define_runtime!(pub link, Exp430, Protocol);
//!
//! fn main() -> ! {
//!     let rt = install_link(Runtime::new(hw, delay, cpu, Protocol::new(), RuntimeConfig::default())?)?;
//!     rt.reset_link()?;
//!     rt.button_enable(on_press)?;
//!     rt.tick_start(1000, on_second)?;
//!     rt.idle_loop()
//! }
//!
//! #[interrupt]
//! fn USCI_A2() {
//!     link_on_uart_rx();
//! }
//! ```

mod board;

pub use board::{Board, Hardware};

use core::cell::{Cell, RefCell};

use critical_section::Mutex;

use crate::config::{BUTTON_ENABLE_SETTLE_MS, LINK_RESET_SETTLE_MS, LINK_SUSPEND_MS, RuntimeConfig};
use crate::drivers::{
    CompareTimer, Device, EdgeInput, GpioPin, InputPin, OutputPin, PinMode, Uart,
};
use crate::error::Result;
use crate::hal::DelayMs;
use crate::input::{button, Debouncer};
use crate::kernel::critical::{self, LockGuard, Token};
use crate::kernel::event::{EventMask, EventSource};
use crate::kernel::handler::Handler;
use crate::kernel::power::PowerState;
use crate::kernel::scheduler::{Cycle, Dispatcher};
use crate::kernel::time::{ms_to_ticks, TickService, Ticks};
use crate::link::{rx, tx, LinkWatchdog, MessageFraming};
use crate::{debug, info, warn};

pub struct Runtime<B: Board, F: MessageFraming> {
    dispatcher: Dispatcher<Self>,
    hw: Mutex<RefCell<Hardware<B>>>,
    delay: B::Delay,
    cpu: B::Cpu,
    framing: F,
    watchdog: LinkWatchdog,
    tick: TickService,
    on_press: Mutex<Cell<Option<Handler<Self>>>>,
    debouncer: Debouncer,
    config: RuntimeConfig,
}

impl<B: Board, F: MessageFraming> Runtime<B, F> {
    /// Brings up the peripherals and the dispatcher.
    ///
    /// On return the counter runs, the watchdog is armed, the UART is
    /// configured, the coprocessor is held suspended (inbound ack
    /// deasserted) and the indicator is off. Call [`reset_link`] to start
    /// the link.
    ///
    /// [`reset_link`]: Runtime::reset_link
    pub fn new(
        hw: Hardware<B>,
        delay: B::Delay,
        cpu: B::Cpu,
        framing: F,
        config: RuntimeConfig,
    ) -> Result<Self> {
        let rt = Self {
            dispatcher: Dispatcher::new(),
            hw: Mutex::new(RefCell::new(hw)),
            delay,
            cpu,
            framing,
            watchdog: LinkWatchdog::new(config.watchdog_period),
            tick: TickService::new(),
            on_press: Mutex::new(Cell::new(None)),
            debouncer: Debouncer::new(config.debounce_ms),
            config,
        };
        rt.bring_up()?;
        rt.dispatcher.register(EventSource::Dispatch, dispatch_unit::<B, F>);

        info!(
            "runtime up: {} baud, watchdog {} ticks",
            config.serial.baudrate, config.watchdog_period
        );
        Ok(rt)
    }

    fn bring_up(&self) -> Result<()> {
        critical_section::with(|cs| -> Result<()> {
            let mut hw = self.hw.borrow_ref_mut(cs);
            let hw = &mut *hw;

            hw.timer.init()?;
            hw.timer.start()?;
            self.watchdog.arm(cs, &mut hw.timer);

            hw.uart.init()?;
            hw.uart.configure(self.config.serial)?;

            hw.rx_ack.configure()?;
            hw.rx_ack.assert()?;
            hw.tx_ack.configure()?;
            // coprocessor stays suspended until reset_link
            hw.rx_ack.deassert()?;

            hw.indicator.init()?;
            hw.indicator.set_mode(PinMode::Output)?;
            hw.indicator.set_low()?;
            Ok(())
        })
    }

    // ------------------------------------------------------------------
    // Foreground
    // ------------------------------------------------------------------

    /// Marks `source` pending and wakes the foreground.
    pub fn signal(&self, source: EventSource) {
        self.dispatcher.signal(source, &self.cpu);
    }

    /// One foreground cycle; see [`Dispatcher::drain_and_dispatch`].
    pub fn drain_and_dispatch(&self) -> Cycle {
        let cycle = self.dispatcher.drain_and_dispatch(self, &self.cpu);
        if let Cycle::Dispatched(mask) = cycle {
            debug!("dispatched {:#05b}", mask.bits());
        }
        cycle
    }

    pub fn idle_loop(&self) -> ! {
        loop {
            self.drain_and_dispatch();
        }
    }

    pub fn pending(&self) -> EventMask {
        self.dispatcher.pending()
    }

    /// Enables the user button; `callback` runs once per debounced press.
    ///
    /// Replaces any previous button callback. The interrupt is only enabled
    /// after a settle delay so power-on glitches are not reported.
    pub fn button_enable(&self, callback: Handler<Self>) -> Result<()> {
        critical_section::with(|cs| self.on_press.borrow(cs).set(Some(callback)));
        self.dispatcher.register(EventSource::Button, debounce_press::<B, F>);

        self.with_hw(|hw| button::configure(&mut hw.button))?;
        self.delay.delay_ms(BUTTON_ENABLE_SETTLE_MS);
        self.with_hw(|hw| hw.button.listen())?;
        Ok(())
    }

    /// Runs `callback` every `period_ms`, replacing any previous tick.
    pub fn tick_start(&self, period_ms: u16, callback: Handler<Self>) -> Result<()> {
        let period = ms_to_ticks(period_ms)?;
        self.dispatcher.register(EventSource::Tick, callback);
        critical_section::with(|cs| {
            let mut hw = self.hw.borrow_ref_mut(cs);
            self.tick.start(cs, &mut hw.timer, period);
        });
        debug!("tick every {} ticks", period);
        Ok(())
    }

    pub fn tick_stop(&self) {
        critical_section::with(|cs| {
            let mut hw = self.hw.borrow_ref_mut(cs);
            self.tick.stop(cs, &mut hw.timer);
        });
        self.dispatcher.handlers().unregister(EventSource::Tick);
    }

    /// Turns the connection indicator on.
    pub fn connected(&self) -> Result<()> {
        self.with_hw(|hw| hw.indicator.set_high())?;
        Ok(())
    }

    pub fn disconnected(&self) -> Result<()> {
        self.with_hw(|hw| hw.indicator.set_low())?;
        Ok(())
    }

    /// Blocking busy-wait. Interrupts keep running.
    pub fn delay_ms(&self, ms: u16) {
        self.delay.delay_ms(ms);
    }

    pub fn watch_on(&self) {
        critical_section::with(|cs| {
            let mut hw = self.hw.borrow_ref_mut(cs);
            self.watchdog.arm(cs, &mut hw.timer);
        });
    }

    pub fn watch_off(&self) {
        critical_section::with(|cs| {
            let mut hw = self.hw.borrow_ref_mut(cs);
            self.watchdog.disarm(cs, &mut hw.timer);
        });
    }

    /// Critical section for the framing layer; see [`critical::lock`].
    pub fn lock(&self) -> Token {
        critical::lock()
    }

    pub fn unlock(&self, token: Token) {
        critical::unlock(token);
    }

    /// Writes the first byte of the pending outbound message. The rest
    /// follows on the peer's ack edges.
    pub fn start_send(&self) -> Result<u8> {
        critical_section::with(|cs| -> Result<u8> {
            let byte = tx::start(
                |byte| self.hw.borrow_ref_mut(cs).uart.write_byte(byte),
                &self.framing,
            )?;
            if self.config.guard_transmit {
                self.watchdog.arm(cs, &mut self.hw.borrow_ref_mut(cs).timer);
            }
            Ok(byte)
        })
    }

    /// Suspend-then-reset sequence for the coprocessor.
    ///
    /// Runs with interrupts masked throughout, delays included. Leaves the
    /// inbound ack asserted, stale UART and ack-edge flags cleared and the
    /// receive interrupt enabled.
    pub fn reset_link(&self) -> Result<()> {
        let guard = LockGuard::acquire();
        {
            let mut hw = self.hw.borrow_ref_mut(guard.cs());

            hw.rx_ack.deassert()?;
            self.delay.delay_ms(LINK_SUSPEND_MS);
            hw.rx_ack.assert()?;
            self.delay.delay_ms(LINK_RESET_SETTLE_MS);

            hw.uart.clear_interrupts();
            hw.tx_ack.clear_edge();
            hw.uart.enable_rx_interrupt();
        }
        guard.release();

        info!("link reset");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Interrupt trampolines
    //
    // Each one acknowledges its peripheral, updates shared state inside one
    // critical section, and wakes the foreground if it produced work.
    // Failures are logged, never propagated.
    //
    // The peripherals are never borrowed across a framing call: the framing
    // layer may call back into watch_on, watch_off or start_send.
    // ------------------------------------------------------------------

    /// Button falling edge.
    pub fn on_button_edge(&self) {
        let pressed = critical_section::with(|cs| {
            let mut hw = self.hw.borrow_ref_mut(cs);
            if !hw.button.edge_pending() {
                return false;
            }
            self.dispatcher.signal_in(cs, EventSource::Button);
            if let Err(e) = hw.button.listen() {
                crate::error!("button re-arm failed: {:?}", e);
            }
            true
        });
        if pressed {
            self.wake();
        }
    }

    /// UART receive.
    pub fn on_uart_rx(&self) {
        let received = critical_section::with(|cs| -> Option<rx::Received> {
            let received = rx::receive(
                || self.hw.borrow_ref_mut(cs).uart.take_rx_byte(),
                || self.hw.borrow_ref_mut(cs).rx_ack.pulse(),
                &self.framing,
            )?;
            if received.unit_complete {
                self.dispatcher.signal_in(cs, EventSource::Dispatch);
            }
            self.watchdog.arm(cs, &mut self.hw.borrow_ref_mut(cs).timer);
            Some(received)
        });
        if received.is_some() {
            self.wake();
        }
    }

    /// Peer ack edge: the coprocessor is ready for the next outbound byte.
    pub fn on_tx_ack_edge(&self) {
        critical_section::with(|cs| {
            let sent = tx::on_ack_edge(
                || self.hw.borrow_ref(cs).tx_ack.edge_pending(),
                |next| {
                    let mut hw = self.hw.borrow_ref_mut(cs);
                    let hw = &mut *hw;
                    tx::complete_edge(&mut hw.uart, &mut hw.tx_ack, next)
                },
                &self.framing,
            );
            match sent {
                Ok(Some(_)) if self.config.guard_transmit => {
                    self.watchdog.arm(cs, &mut self.hw.borrow_ref_mut(cs).timer);
                }
                Ok(_) => {}
                Err(e) => crate::error!("tx write failed: {:?}", e),
            }
        });
        self.wake();
    }

    /// Tick compare match.
    pub fn on_tick_compare(&self) {
        let due = critical_section::with(|cs| {
            let mut hw = self.hw.borrow_ref_mut(cs);
            let due = self.tick.on_compare(cs, &mut hw.timer);
            if due {
                self.dispatcher.signal_in(cs, EventSource::Tick);
            }
            due
        });
        if due {
            self.wake();
        }
    }

    /// Watchdog compare match: abandon the exchange in progress.
    pub fn on_watchdog_compare(&self) {
        let expired = critical_section::with(|cs| {
            let mut hw = self.hw.borrow_ref_mut(cs);
            self.watchdog.expire(cs, &mut hw.timer)
        });
        if !expired {
            return;
        }
        self.framing.restart();
        warn!("link watchdog expired, framing restarted");
        self.wake();
    }

    fn wake(&self) {
        self.dispatcher.power().wake(&self.cpu);
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Runs `f` on the peripherals with interrupts masked.
    pub fn with_hw<R>(&self, f: impl FnOnce(&mut Hardware<B>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.hw.borrow_ref_mut(cs)))
    }

    pub fn framing(&self) -> &F {
        &self.framing
    }

    pub fn dispatcher(&self) -> &Dispatcher<Self> {
        &self.dispatcher
    }

    pub fn delay(&self) -> &B::Delay {
        &self.delay
    }

    pub fn cpu(&self) -> &B::Cpu {
        &self.cpu
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn power_state(&self) -> PowerState {
        self.dispatcher.power().state()
    }

    pub fn watchdog_armed(&self) -> bool {
        critical_section::with(|cs| self.watchdog.is_armed(cs))
    }

    pub fn watchdog_deadline(&self) -> Option<Ticks> {
        critical_section::with(|cs| self.watchdog.deadline(cs))
    }

    pub fn watchdog_expirations(&self) -> u32 {
        critical_section::with(|cs| self.watchdog.expirations(cs))
    }

    /// Current tick deadline, `None` while the tick is stopped.
    pub fn tick_deadline(&self) -> Option<Ticks> {
        critical_section::with(|cs| self.tick.deadline(cs))
    }
}

fn dispatch_unit<B: Board, F: MessageFraming>(rt: &Runtime<B, F>) {
    rt.framing.dispatch_completed_unit();
}

fn debounce_press<B: Board, F: MessageFraming>(rt: &Runtime<B, F>) {
    let held = rt
        .debouncer
        .confirm(&rt.delay, || rt.with_hw(|hw| hw.button.is_low()));
    if !held {
        debug!("button glitch ignored");
        return;
    }

    let callback = critical_section::with(|cs| rt.on_press.borrow(cs).get());
    if let Some(callback) = callback {
        callback(rt);
    }
}

/// Declares the `'static` runtime slot and its interrupt trampolines.
///
/// `define_runtime!(pub link, Exp430, Protocol)` expands to:
///
/// - `install_link(rt) -> Result<&'static Runtime<Exp430, Protocol>>`,
///   failing with `AlreadyInstalled` on a second call
/// - `link() -> Option<&'static Runtime<Exp430, Protocol>>`
/// - `link_on_uart_rx()`, `link_on_tx_ack_edge()`, `link_on_button_edge()`,
///   `link_on_tick_compare()`, `link_on_watchdog_compare()` for the vector
///   table; each is a no-op until the runtime is installed
#[macro_export]
macro_rules! define_runtime {
    (@trampoline $vis:vis $name:ident, $handler:ident) => {
        $crate::paste::paste! {
            #[allow(dead_code)]
            $vis fn [<$name _ $handler>]() {
                if let Some(rt) = $name() {
                    rt.$handler();
                }
            }
        }
    };
    ($vis:vis $name:ident, $board:ty, $framing:ty) => {
        $crate::paste::paste! {
            #[allow(non_upper_case_globals)]
            static [<__RUNTIME_ $name>]: $crate::spin::Once<$crate::runtime::Runtime<$board, $framing>> =
                $crate::spin::Once::new();

            #[allow(dead_code)]
            $vis fn $name() -> Option<&'static $crate::runtime::Runtime<$board, $framing>> {
                [<__RUNTIME_ $name>].get()
            }

            #[allow(dead_code)]
            $vis fn [<install_ $name>](
                rt: $crate::runtime::Runtime<$board, $framing>,
            ) -> $crate::error::Result<&'static $crate::runtime::Runtime<$board, $framing>> {
                let mut fresh = false;
                let installed = [<__RUNTIME_ $name>].call_once(|| {
                    fresh = true;
                    rt
                });
                if fresh {
                    Ok(installed)
                } else {
                    Err($crate::error::LinkError::AlreadyInstalled)
                }
            }

            $crate::define_runtime!(@trampoline $vis $name, on_uart_rx);
            $crate::define_runtime!(@trampoline $vis $name, on_tx_ack_edge);
            $crate::define_runtime!(@trampoline $vis $name, on_button_edge);
            $crate::define_runtime!(@trampoline $vis $name, on_tick_compare);
            $crate::define_runtime!(@trampoline $vis $name, on_watchdog_compare);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::examples::{MockDelay, MockFraming, SimBoard, SimClock};
    use crate::drivers::Channel;
    use crate::hal::host::HostCpu;
    use crate::link::RxState;
    use std::boxed::Box;

    type SimRuntime = Runtime<SimBoard, MockFraming>;

    fn runtime() -> SimRuntime {
        let clock: &'static SimClock = Box::leak(Box::new(SimClock::new()));
        Runtime::new(
            SimBoard::hardware(clock),
            MockDelay::new(clock),
            HostCpu::new(),
            MockFraming::new(3),
            RuntimeConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_bring_up_state() {
        let rt = runtime();
        assert!(rt.watchdog_armed());
        assert_eq!(rt.watchdog_deadline(), Some(8192));
        assert!(rt.dispatcher().handlers().is_registered(EventSource::Dispatch));
        assert!(!rt.dispatcher().handlers().is_registered(EventSource::Button));

        rt.with_hw(|hw| {
            assert_eq!(hw.rx_ack.state(), RxState::Idle);
            assert!(!hw.indicator.mock_get_output());
            assert!(hw.timer.is_running());
            assert!(hw.tx_ack.pin().listening());
            assert!(!hw.uart.rx_interrupt_enabled());
        });
    }

    #[test]
    fn test_reset_link_sequence() {
        let rt = runtime();
        rt.with_hw(|hw| {
            hw.tx_ack.pin_mut().mock_edge();
            hw.rx_ack.assert().unwrap();
        });

        rt.reset_link().unwrap();

        assert_eq!(rt.delay().total_ms(), 600);
        rt.with_hw(|hw| {
            assert_eq!(hw.rx_ack.state(), RxState::AckAsserted);
            // bring-up hold, then the suspend dip
            assert_eq!(hw.rx_ack.pin().low_count(), 2);
            assert!(!hw.tx_ack.edge_pending());
            assert_eq!(hw.uart.interrupt_clears(), 1);
            assert!(hw.uart.rx_interrupt_enabled());
        });
    }

    #[test]
    fn test_indicator() {
        let rt = runtime();
        rt.connected().unwrap();
        assert!(rt.with_hw(|hw| hw.indicator.mock_get_output()));
        rt.disconnected().unwrap();
        assert!(!rt.with_hw(|hw| hw.indicator.mock_get_output()));
    }

    #[test]
    fn test_watch_on_off() {
        let rt = runtime();
        rt.watch_off();
        assert!(!rt.watchdog_armed());
        assert!(!rt.with_hw(|hw| hw.timer.is_compare_enabled(Channel::Watchdog)));

        rt.watch_on();
        assert!(rt.watchdog_armed());
    }

    #[test]
    fn test_tick_period_validated() {
        fn noop(_: &SimRuntime) {}
        let rt = runtime();
        assert_eq!(
            rt.tick_start(0, noop),
            Err(crate::error::LinkError::InvalidTickPeriod)
        );
        assert!(!rt.dispatcher().handlers().is_registered(EventSource::Tick));

        rt.tick_start(10, noop).unwrap();
        // 10 ms at 32768 Hz, rounded down
        assert_eq!(rt.tick_deadline(), Some(327));

        rt.tick_stop();
        assert_eq!(rt.tick_deadline(), None);
    }

    #[test]
    fn test_lock_holds_off_interrupts() {
        use std::time::Duration;

        let rt = runtime();
        rt.with_hw(|hw| hw.uart.mock_receive_byte(0x5A)).unwrap();

        let token = rt.lock();
        std::thread::scope(|s| {
            let isr = s.spawn(|| rt.on_uart_rx());
            std::thread::sleep(Duration::from_millis(20));
            assert_eq!(rt.framing().reception_starts(), 0);

            rt.unlock(token);
            isr.join().unwrap();
        });
        assert_eq!(rt.framing().reception_starts(), 1);
        assert_eq!(rt.framing().pending_rx_len(), 1);
    }
}
