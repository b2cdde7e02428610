mod common;

use std::sync::atomic::{AtomicU32, Ordering};

use common::*;
use radiolink_rt::drivers::{EdgeInput, InputPin, PullMode};
use radiolink_rt::{EventMask, EventSource};
use serial_test::serial;

static PRESSES: AtomicU32 = AtomicU32::new(0);

fn on_press(_: &SimRuntime) {
    PRESSES.fetch_add(1, Ordering::SeqCst);
}

fn enabled_runtime() -> SimRuntime {
    PRESSES.store(0, Ordering::SeqCst);
    let rt = sim_runtime(3);
    rt.watch_off();
    rt.button_enable(on_press).unwrap();
    rt
}

#[test]
#[serial]
fn test_enable_waits_before_listening() {
    let rt = enabled_runtime();
    // 600 ms of link reset, then the settle delay
    assert_eq!(rt.delay().total_ms(), 700);
    rt.with_hw(|hw| {
        assert!(hw.button.listening());
        assert_eq!(hw.button.pull(), PullMode::PullUp);
        assert!(hw.button.is_high().unwrap());
    });
}

#[test]
#[serial]
fn test_edge_before_enable_is_ignored() {
    PRESSES.store(0, Ordering::SeqCst);
    let rt = sim_runtime(3);
    press(&rt);
    assert_eq!(rt.pending(), EventMask::EMPTY);
}

#[test]
#[serial]
fn test_held_press_reported_once() {
    let rt = enabled_runtime();
    press(&rt);
    assert_eq!(rt.pending(), EventMask::EMPTY.with(EventSource::Button));
    // edge detection re-armed by the interrupt
    assert!(!rt.with_hw(|hw| hw.button.edge_pending()));

    rt.drain_and_dispatch();
    assert_eq!(PRESSES.load(Ordering::SeqCst), 1);

    rt.drain_and_dispatch();
    assert_eq!(PRESSES.load(Ordering::SeqCst), 1);
}

#[test]
#[serial]
fn test_short_glitch_dropped() {
    let rt = enabled_runtime();
    press(&rt);
    // released 40 ms later, inside the settle window
    rt.with_hw(|hw| hw.button.mock_schedule_input(40, true));

    rt.drain_and_dispatch();
    assert_eq!(PRESSES.load(Ordering::SeqCst), 0);
}

#[test]
#[serial]
fn test_release_after_settle_still_counts() {
    let rt = enabled_runtime();
    press(&rt);
    rt.with_hw(|hw| hw.button.mock_schedule_input(150, true));

    rt.drain_and_dispatch();
    assert_eq!(PRESSES.load(Ordering::SeqCst), 1);
}

#[test]
#[serial]
fn test_repeated_edges_coalesce() {
    let rt = enabled_runtime();
    press(&rt);
    press(&rt);
    press(&rt);

    rt.drain_and_dispatch();
    assert_eq!(PRESSES.load(Ordering::SeqCst), 1);
}
