mod common;

use common::*;
use radiolink_rt::drivers::examples::MockFraming;
use radiolink_rt::link::RxState;
use radiolink_rt::{EventMask, EventSource, RuntimeConfig};

#[test]
fn test_rx_handshake_per_byte() {
    let rt = sim_runtime(3);
    assert_eq!(rt.with_hw(|hw| hw.rx_ack.state()), RxState::AckAsserted);

    receive(&rt, 0x01);
    receive(&rt, 0x02);
    assert_eq!(rt.pending(), EventMask::EMPTY);

    receive(&rt, 0x03);
    assert_eq!(rt.pending(), EventMask::EMPTY.with(EventSource::Dispatch));

    rt.with_hw(|hw| {
        assert_eq!(hw.rx_ack.pulse_count(), 3);
        assert_eq!(hw.rx_ack.state(), RxState::AckAsserted);
    });
    assert_eq!(rt.framing().reception_starts(), 3);
    assert_eq!(rt.framing().completed_units(), 1);
}

#[test]
fn test_spurious_rx_interrupt_ignored() {
    let rt = sim_runtime(3);
    let wakes = rt.cpu().wake_count();

    rt.on_uart_rx();

    assert_eq!(rt.with_hw(|hw| hw.rx_ack.pulse_count()), 0);
    assert_eq!(rt.cpu().wake_count(), wakes);
    assert_eq!(rt.framing().reception_starts(), 0);
}

#[test]
fn test_outbound_message_paced_by_peer() {
    let rt = sim_runtime(3);
    let message = [0x10, 0x11, 0x12, 0x13];
    rt.framing().queue_message(&message).unwrap();

    assert_eq!(rt.start_send(), Ok(0x10));
    assert_eq!(transmitted(&rt), [0x10]);

    for n in 1..message.len() {
        peer_ack(&rt);
        assert_eq!(transmitted(&rt), message[..=n]);
    }

    // one edge past the end sends nothing
    peer_ack(&rt);
    assert_eq!(transmitted(&rt), message);
    assert!(!rt.with_hw(|hw| hw.tx_ack.edge_pending()));
}

#[test]
fn test_peer_ack_wakes_foreground() {
    let rt = sim_runtime(3);
    rt.framing().queue_message(&[1, 2]).unwrap();
    rt.start_send().unwrap();

    let wakes = rt.cpu().wake_count();
    peer_ack(&rt);
    assert_eq!(rt.cpu().wake_count(), wakes + 1);
    assert_eq!(transmitted(&rt), [1, 2]);
}

#[test]
fn test_ack_edge_without_message_is_absorbed() {
    let rt = sim_runtime(3);
    peer_ack(&rt);
    assert!(transmitted(&rt).is_empty());
}

#[test]
fn test_watchdog_quiet_while_bytes_flow() {
    let rt = sim_runtime(4);
    for byte in 0..20 {
        receive(&rt, byte);
        run_ticks(&rt, GRACE - 1);
    }
    assert_eq!(rt.watchdog_expirations(), 0);
    assert_eq!(rt.framing().restarts(), 0);
    assert!(rt.watchdog_armed());
}

#[test]
fn test_watchdog_fires_once_per_silence() {
    let rt = sim_runtime(4);
    // armed at bring-up, counter still at zero
    assert_eq!(rt.watchdog_deadline(), Some(GRACE as u16));

    run_ticks(&rt, GRACE - 1);
    assert_eq!(rt.framing().restarts(), 0);

    run_ticks(&rt, 1);
    assert_eq!(rt.framing().restarts(), 1);
    assert!(!rt.watchdog_armed());

    // silence goes on; one-shot
    run_ticks(&rt, GRACE * 3);
    assert_eq!(rt.framing().restarts(), 1);

    // a byte re-arms, and only a full silent period fires again
    receive(&rt, 0xAA);
    assert!(rt.watchdog_armed());
    run_ticks(&rt, GRACE - 1);
    assert_eq!(rt.framing().restarts(), 1);
    run_ticks(&rt, 1);
    assert_eq!(rt.framing().restarts(), 2);
    assert_eq!(rt.watchdog_expirations(), 2);
}

#[test]
fn test_watchdog_restart_drops_partial_unit() {
    let rt = sim_runtime(4);
    receive(&rt, 1);
    receive(&rt, 2);
    assert_eq!(rt.framing().pending_rx_len(), 2);

    run_ticks(&rt, GRACE);
    assert_eq!(rt.framing().pending_rx_len(), 0);
    assert_eq!(rt.framing().completed_units(), 0);
}

#[test]
fn test_watch_off_suppresses_expiry() {
    let rt = sim_runtime(4);
    rt.watch_off();
    run_ticks(&rt, GRACE * 2);
    assert_eq!(rt.watchdog_expirations(), 0);

    rt.watch_on();
    run_ticks(&rt, GRACE);
    assert_eq!(rt.watchdog_expirations(), 1);
}

#[test]
fn test_guarded_transmit_stall_restarts() {
    let rt = sim_runtime(4);
    rt.watch_off();
    rt.framing().queue_message(&[1, 2, 3]).unwrap();

    rt.start_send().unwrap();
    assert!(rt.watchdog_armed());
    peer_ack(&rt);

    // peer never acknowledges byte 2
    run_ticks(&rt, GRACE);
    assert_eq!(rt.framing().restarts(), 1);
    assert!(rt.framing().tx_done());

    peer_ack(&rt);
    assert_eq!(transmitted(&rt), [1, 2]);
}

#[test]
fn test_unguarded_transmit_leaves_watchdog_alone() {
    let config = RuntimeConfig {
        guard_transmit: false,
        ..RuntimeConfig::default()
    };
    let rt = sim_runtime_with(4, config);
    rt.watch_off();
    rt.framing().queue_message(&[1, 2]).unwrap();

    rt.start_send().unwrap();
    peer_ack(&rt);
    assert!(!rt.watchdog_armed());
}

#[test]
fn test_reset_link_clears_stale_state() {
    let rt = sim_runtime_with(3, RuntimeConfig::default());
    assert_eq!(rt.with_hw(|hw| hw.rx_ack.state()), RxState::Idle);
    rt.with_hw(|hw| hw.tx_ack.pin_mut().mock_edge());

    rt.reset_link().unwrap();

    assert_eq!(rt.delay().total_ms(), 600);
    rt.with_hw(|hw| {
        assert_eq!(hw.rx_ack.state(), RxState::AckAsserted);
        assert!(!hw.tx_ack.edge_pending());
        assert!(hw.uart.rx_interrupt_enabled());
    });
}

#[test]
fn test_framing_is_reachable_through_runtime() {
    let rt = sim_runtime(2);
    let framing: &MockFraming = rt.framing();
    receive(&rt, 5);
    assert_eq!(framing.pending_rx_len(), 1);
}
