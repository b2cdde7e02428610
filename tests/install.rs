mod common;

use common::*;
use radiolink_rt::drivers::examples::{MockFraming, SimBoard};
use radiolink_rt::{Cycle, LinkError};

radiolink_rt::define_runtime!(link, SimBoard, MockFraming);

#[test]
fn test_installed_runtime_reached_by_trampolines() {
    assert!(link().is_none());
    // vectors firing before install are harmless
    link_on_uart_rx();
    link_on_tx_ack_edge();
    link_on_button_edge();
    link_on_tick_compare();
    link_on_watchdog_compare();

    let rt = install_link(sim_runtime(2)).unwrap();
    assert!(link().is_some());
    assert_eq!(
        install_link(sim_runtime(2)).err(),
        Some(LinkError::AlreadyInstalled)
    );

    for byte in [7, 8] {
        rt.with_hw(|hw| hw.uart.mock_receive_byte(byte)).unwrap();
        link_on_uart_rx();
    }
    assert!(matches!(rt.drain_and_dispatch(), Cycle::Dispatched(_)));
    assert_eq!(rt.framing().dispatch_calls(), 1);

    rt.framing().queue_message(&[1, 2]).unwrap();
    rt.start_send().unwrap();
    rt.with_hw(|hw| hw.tx_ack.pin_mut().mock_edge());
    link_on_tx_ack_edge();
    assert_eq!(transmitted(rt), [1, 2]);
}
