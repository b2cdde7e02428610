use crate::config::CORE_CYCLES_PER_MS;
use crate::hal::traits::{DelayMs, ProcessorControl};

/// Cortex-M3 core
///
/// `WFI` resumes on any pending interrupt even with PRIMASK set, so the
/// dispatcher may wait inside its critical section.
pub struct CortexM3Cpu;

impl ProcessorControl for CortexM3Cpu {
    #[inline]
    fn wait_for_interrupt(&self) {
        cortex_m::asm::dsb();
        cortex_m::asm::wfi();
    }
}

/// Cycle-counted busy wait
pub struct CycleDelay {
    cycles_per_ms: u32,
}

impl CycleDelay {
    pub const fn new(cycles_per_ms: u32) -> Self {
        Self { cycles_per_ms }
    }
}

impl Default for CycleDelay {
    fn default() -> Self {
        Self::new(CORE_CYCLES_PER_MS)
    }
}

impl DelayMs for CycleDelay {
    fn delay_ms(&self, ms: u16) {
        for _ in 0..ms {
            cortex_m::asm::delay(self.cycles_per_ms);
        }
    }
}

use critical_section::RawRestoreState;
struct CriticalSection;
critical_section::set_impl!(CriticalSection);

unsafe impl critical_section::Impl for CriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        let was_active = cortex_m::register::primask::read().is_active();
        cortex_m::interrupt::disable();
        was_active
    }

    unsafe fn release(was_active: RawRestoreState) {
        // only re-enable if interrupts were enabled before acquire
        if was_active {
            unsafe {
                cortex_m::interrupt::enable();
            }
        }
    }
}
