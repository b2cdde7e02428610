#![allow(dead_code)]

use radiolink_rt::drivers::examples::{MockDelay, MockFraming, SimBoard, SimClock};
use radiolink_rt::drivers::{Channel, CompareTimer};
use radiolink_rt::hal::host::HostCpu;
use radiolink_rt::{Runtime, RuntimeConfig};

pub type SimRuntime = Runtime<SimBoard, MockFraming>;

/// 250 ms at 32768 Hz
pub const GRACE: u32 = 8192;

pub fn sim_runtime_with(unit_len: usize, config: RuntimeConfig) -> SimRuntime {
    let clock: &'static SimClock = Box::leak(Box::new(SimClock::new()));
    Runtime::new(
        SimBoard::hardware(clock),
        MockDelay::new(clock),
        HostCpu::new(),
        MockFraming::new(unit_len),
        config,
    )
    .unwrap()
}

/// Runtime after bring-up and a link reset, ready to exchange bytes.
pub fn sim_runtime(unit_len: usize) -> SimRuntime {
    let rt = sim_runtime_with(unit_len, RuntimeConfig::default());
    rt.reset_link().unwrap();
    rt
}

/// Advances the counter one tick at a time, taking compare interrupts as
/// they fire.
pub fn run_ticks(rt: &SimRuntime, ticks: u32) {
    for _ in 0..ticks {
        let fired = rt.with_hw(|hw| hw.timer.mock_step());
        if fired & Channel::Tick.mask() != 0 {
            rt.on_tick_compare();
        }
        if fired & Channel::Watchdog.mask() != 0 {
            rt.on_watchdog_compare();
        }
    }
}

pub fn now(rt: &SimRuntime) -> u16 {
    rt.with_hw(|hw| hw.timer.now())
}

/// One byte from the coprocessor.
pub fn receive(rt: &SimRuntime, byte: u8) {
    rt.with_hw(|hw| hw.uart.mock_receive_byte(byte)).unwrap();
    rt.on_uart_rx();
}

/// The coprocessor acknowledges one outbound byte.
pub fn peer_ack(rt: &SimRuntime) {
    rt.with_hw(|hw| hw.tx_ack.pin_mut().mock_edge());
    rt.on_tx_ack_edge();
}

/// Falling edge on the button.
pub fn press(rt: &SimRuntime) {
    rt.with_hw(|hw| hw.button.mock_edge());
    rt.on_button_edge();
}

pub fn transmitted(rt: &SimRuntime) -> Vec<u8> {
    rt.with_hw(|hw| hw.uart.mock_get_transmitted().to_vec())
}
