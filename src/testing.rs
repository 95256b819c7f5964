//! Host-side test fixtures

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicU64, Ordering};

use spin::Mutex;

use crate::config::Retention;
use crate::diag::DiagnosticSink;
use crate::mm::HeapPool;
use crate::proc::{Pid, Process};
use crate::time::{Clock, RtcDate};

/// Size of the user image built by `process_with_args`
pub const USER_SIZE: u32 = 4096;

/// Where `process_with_args` leaves the user stack pointer
pub const USER_SP: u32 = USER_SIZE - 64;

/// Collects diagnostic lines for inspection
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(Vec::new()),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn write_line(&self, line: fmt::Arguments<'_>) {
        self.lines.lock().push(alloc::fmt::format(line));
    }
}

/// A clock that advances one second per reading
pub struct TickClock {
    secs: AtomicU64,
}

impl TickClock {
    pub fn new(start: u64) -> Self {
        Self {
            secs: AtomicU64::new(start),
        }
    }
}

impl Clock for TickClock {
    fn now(&self) -> RtcDate {
        RtcDate::from_unix_seconds(self.secs.fetch_add(1, Ordering::Relaxed))
    }
}

/// A page pool over a leaked region of `size` bytes
pub fn pool(size: usize) -> Arc<HeapPool> {
    let region: &'static mut [MaybeUninit<u8>] =
        Box::leak(vec![MaybeUninit::uninit(); size].into_boxed_slice());
    Arc::new(HeapPool::from_region(region))
}

/// A process over `memory`, with a private 64 KiB pool and unbounded history
pub fn process(pid: Pid, name: &str, memory: Vec<u8>) -> Process {
    Process::new(
        pid,
        name,
        Box::new(memory),
        pool(64 * 1024),
        Retention::Unbounded,
    )
}

/// A zeroed `USER_SIZE` process whose stack holds a return address
/// followed by `args`
pub fn process_with_args(pid: Pid, name: &str, args: &[i32]) -> Process {
    let mut p = process(pid, name, vec![0; USER_SIZE as usize]);
    push_args(&mut p, args);
    p
}

/// A zeroed `USER_SIZE` process drawing accounting memory from `pool`
pub fn process_in(pid: Pid, name: &str, pool: Arc<HeapPool>, retention: Retention) -> Process {
    let mut p = Process::new(
        pid,
        name,
        Box::new(vec![0u8; USER_SIZE as usize]),
        pool,
        retention,
    );
    push_args(&mut p, &[]);
    p
}

fn push_args(p: &mut Process, args: &[i32]) {
    let sp = USER_SP as usize;
    let mem = p.memory_mut();
    // Fake return address
    mem[sp..sp + 4].copy_from_slice(&0xDEADu32.to_ne_bytes());
    for (n, arg) in args.iter().enumerate() {
        let at = sp + 4 + 4 * n;
        mem[at..at + 4].copy_from_slice(&arg.to_ne_bytes());
    }
    p.tf.esp = USER_SP;
}
