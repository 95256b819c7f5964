//! Device drivers
//!
//! Reference-board implementations of the gate's output and clock seams,
//! for the QEMU `virt` machine:
//! - `uart`: PL011 console, the diagnostic sink and `log` backend
//! - `rtc`: PL031 real time clock, the accounting clock
//!
//! The gate itself only sees `DiagnosticSink` and `Clock`; a kernel on
//! another board (including the i386 port whose `TrapFrame` lives in
//! `proc`) supplies its own implementations of those traits.
//!
//! Both drivers stay inert (no MMIO) until their `init` has been called.

pub mod rtc;
pub mod uart;
