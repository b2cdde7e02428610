use crate::drivers::{CompareTimer, EdgeInput, OutputPin, Uart};
use crate::hal::{DelayMs, ProcessorControl};
use crate::link::flow::{AckLine, PeerAckLine};

/// Peripheral types of one board.
///
/// # Example
///
/// ```rust,ignore
/// pub struct Exp430;
///
/// impl Board for Exp430 {
///     type Uart = Uca2;
///     type RxAck = P1_3;
///     type TxAck = P1_2;
///     type Button = P2_6;
///     type Indicator = P1_0;
///     type Timer = TimerA1;
///     type Delay = CycleDelay;
///     type Cpu = Msp430Cpu;
/// }
/// ```
pub trait Board {
    /// Link UART
    type Uart: Uart + Send;
    /// Inbound acknowledge output (to the coprocessor's CTS)
    type RxAck: OutputPin + Send;
    /// Outbound acknowledge input (from the coprocessor's RTS)
    type TxAck: EdgeInput + Send;
    /// Active-low user button
    type Button: EdgeInput + Send;
    /// Connection indicator output
    type Indicator: OutputPin + Send;
    /// Free-running counter with the tick and watchdog compare channels
    type Timer: CompareTimer + Send;
    type Delay: DelayMs + Sync;
    type Cpu: ProcessorControl + Sync;
}

/// Peripherals shared between interrupt handlers and the foreground.
///
/// The runtime keeps this in a `critical_section::Mutex`, so every access
/// happens with interrupts masked.
pub struct Hardware<B: Board> {
    pub uart: B::Uart,
    pub rx_ack: AckLine<B::RxAck>,
    pub tx_ack: PeerAckLine<B::TxAck>,
    pub button: B::Button,
    pub indicator: B::Indicator,
    pub timer: B::Timer,
}

impl<B: Board> Hardware<B> {
    pub fn new(
        uart: B::Uart,
        rx_ack: B::RxAck,
        tx_ack: B::TxAck,
        button: B::Button,
        indicator: B::Indicator,
        timer: B::Timer,
    ) -> Self {
        Self {
            uart,
            rx_ack: AckLine::new(rx_ack),
            tx_ack: PeerAckLine::new(tx_ack),
            button,
            indicator,
            timer,
        }
    }
}
