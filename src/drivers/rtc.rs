//! PL031 Real Time Clock for QEMU virt machine
//!
//! Reference-board clock. Any other `Clock` serves the gate equally.
//!
//! Supplies the wall-clock time used to stamp syscall accounting entries.
//!
//! # Memory Map (QEMU virt)
//! - Base address: 0x0901_0000
//! - RTCDR holds seconds since the Unix epoch

use spin::Mutex;

use crate::time::{Clock, RtcDate};

/// QEMU virt machine PL031 base address
const RTC_BASE: usize = 0x0901_0000;

mod regs {
    /// Data Register - current counter value in seconds
    pub const DR: usize = 0x00;
}

/// PL031 RTC driver
pub struct Pl031 {
    base: usize,
    initialized: bool,
}

impl Pl031 {
    pub const fn new(base: usize) -> Self {
        Self {
            base,
            initialized: false,
        }
    }

    /// Mark the RTC as usable.
    ///
    /// # Safety
    /// `base` must be the address of a mapped PL031 register block.
    pub unsafe fn init(&mut self) {
        // QEMU starts the counter from host time at reset
        self.initialized = true;
    }

    /// Seconds since the epoch, or 0 before `init`.
    pub fn read_seconds(&self) -> u32 {
        if !self.initialized {
            return 0;
        }

        // SAFETY: init() vouched for the register block at `base`;
        // RTCDR is a read-only 32-bit register inside it.
        unsafe { core::ptr::read_volatile((self.base + regs::DR) as *const u32) }
    }
}

/// Global RTC instance protected by spinlock
pub static RTC: Mutex<Pl031> = Mutex::new(Pl031::new(RTC_BASE));

impl Clock for Mutex<Pl031> {
    fn now(&self) -> RtcDate {
        RtcDate::from_unix_seconds(u64::from(self.lock().read_seconds()))
    }
}
