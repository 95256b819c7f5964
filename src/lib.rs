//! sysgate - the system call gate of a small Unix-like teaching kernel
//!
//! Everything between "a user process trapped with a syscall number in
//! `eax`" and "the result is back in `eax`".
//!
//! # Responsibilities
//! - Fetch and bounds-check syscall arguments from untrusted user memory
//! - Route syscall numbers to registered handlers
//! - Keep a per-process accounting trail: call counts, timestamps and
//!   argument snapshots for each syscall
//!
//! # Security Features
//! - The only access to user memory is through checked `syscall::args`
//! - Unknown syscall numbers never reach a handler
//! - Accounting memory is bounded per syscall by default and allocation
//!   failure is an explicit error
//!
//! # Usage
//! ```no_run
//! use sysgate::drivers::{rtc::RTC, uart::UART};
//! use sysgate::syscall::{Dispatcher, SyscallId, SyscallTable};
//! # fn sys_getpid(p: &mut sysgate::proc::Process) -> i32 { p.pid }
//! # fn trap(p: &mut sysgate::proc::Process) {
//! let mut table = SyscallTable::new();
//! table.register(SyscallId::Getpid, sys_getpid);
//!
//! let gate = Dispatcher::new(&table, &RTC, &UART);
//! gate.dispatch(p).ok();
//! # }
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

extern crate alloc;

pub mod accounting;
pub mod config;
pub mod diag;
pub mod drivers;
pub mod mm;
pub mod name;
pub mod proc;
pub mod syscall;
pub mod time;

#[cfg(test)]
mod testing;

pub use accounting::{Accounting, SyscallRecord};
pub use config::AccountingConfig;
pub use proc::Process;
pub use syscall::{Dispatcher, Outcome, SyscallId, SyscallTable};
