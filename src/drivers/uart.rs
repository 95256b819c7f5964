//! PL011 UART Driver for QEMU virt machine
//!
//! Reference-board console. Any other `DiagnosticSink` serves the gate equally.
//!
//! Serial console used as the kernel's diagnostic sink and `log` backend.
//!
//! # Memory Map (QEMU virt)
//! - Base address: 0x0900_0000
//! - Register size: 0x1000 bytes

use core::fmt::{self, Write};
use spin::Mutex;

use crate::diag::DiagnosticSink;

/// QEMU virt machine PL011 UART base address
const UART_BASE: usize = 0x0900_0000;

/// PL011 Register offsets
mod regs {
    /// Data Register - read/write data
    pub const DR: usize = 0x00;
    /// Flag Register - status flags
    pub const FR: usize = 0x18;
}

/// Flag Register bits
mod flags {
    /// Transmit FIFO full
    pub const TXFF: u32 = 1 << 5;
}

/// PL011 UART driver
pub struct Uart {
    base: usize,
    initialized: bool,
}

impl Uart {
    /// Create a new UART instance (not yet initialized)
    pub const fn new(base: usize) -> Self {
        Self {
            base,
            initialized: false,
        }
    }

    /// Initialize the UART
    ///
    /// # Safety
    /// - Must only be called once
    /// - `base` must be the address of a mapped PL011 register block
    pub unsafe fn init(&mut self) {
        // PL011 is already initialized by QEMU, just mark as ready
        self.initialized = true;
    }

    /// Write a single byte to the UART. Dropped until `init` has run.
    fn write_byte(&self, byte: u8) {
        if !self.initialized {
            return;
        }

        // SAFETY: init() vouched for the register block at `base`.
        // Both registers lie inside it and MMIO needs volatile access.
        unsafe {
            let fr = (self.base + regs::FR) as *const u32;
            let dr = (self.base + regs::DR) as *mut u32;

            while core::ptr::read_volatile(fr) & flags::TXFF != 0 {
                core::hint::spin_loop();
            }

            core::ptr::write_volatile(dr, byte as u32);
        }
    }

    /// Write a string to the UART
    pub fn write_str(&self, s: &str) {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.write_byte(b'\r');
            }
            self.write_byte(byte);
        }
    }
}

impl Write for Uart {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Uart::write_str(self, s);
        Ok(())
    }
}

/// Global UART instance protected by spinlock
pub static UART: Mutex<Uart> = Mutex::new(Uart::new(UART_BASE));

impl DiagnosticSink for Mutex<Uart> {
    fn write_line(&self, line: fmt::Arguments<'_>) {
        let mut uart = self.lock();
        let _ = uart.write_fmt(line);
        uart.write_str("\n");
    }
}

/// `log` backend printing `[LEVEL] target: message` lines on the UART.
struct UartLogger;

impl log::Log for UartLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        UART.write_line(format_args!(
            "[{}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        ));
    }

    fn flush(&self) {}
}

static LOGGER: UartLogger = UartLogger;

/// Route the `log` facade to the console at `level`.
///
/// Fails if another logger was installed first.
pub fn init_logging(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
