//! Syscall Accounting
//!
//! Per-process, per-syscall invocation history kept for introspection.
//!
//! # Layout
//! ```text
//! Process
//!   └─ Accounting
//!        ├─ records[0]  sys_fork    count, dates[], arguments[]
//!        ├─ records[1]  sys_exit    count, dates[], arguments[]
//!        └─ ...         one record per defined syscall
//! ```
//!
//! # Invariants
//! - `count` is the number of recorded calls, ever
//! - `dates` and `arguments` always hold the same number of entries, the
//!   most recent `min(count, limit)` calls, oldest first
//! - History memory comes from the process's page allocator and goes back
//!   to it when the process is dropped

mod entry;
mod history;
mod recorder;

pub use entry::{ArgSlot, ArgumentEntry, DateEntry};
pub use history::History;
pub use recorder::Recorder;

use alloc::sync::Arc;

use crate::config::{Retention, SYSCALL_NAME_MAX};
use crate::diag::DiagnosticSink;
use crate::mm::{AllocError, PageAllocator};
use crate::name::FixedName;
use crate::proc::Pid;
use crate::syscall::{SyscallId, NSYSCALL};

/// History of one syscall within one process
pub struct SyscallRecord {
    name: FixedName<SYSCALL_NAME_MAX>,
    count: u64,
    dates: History<DateEntry>,
    arguments: History<ArgumentEntry>,
}

impl SyscallRecord {
    fn new(retention: Retention) -> Self {
        Self {
            name: FixedName::empty(),
            count: 0,
            dates: History::new(retention),
            arguments: History::new(retention),
        }
    }

    /// Canonical name, copied in on the first recorded call
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Total recorded calls
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Call timestamps, oldest first
    pub fn dates(&self) -> &History<DateEntry> {
        &self.dates
    }

    /// Argument snapshots, oldest first
    pub fn arguments(&self) -> &History<ArgumentEntry> {
        &self.arguments
    }

    /// Retained calls as `(date, arguments)` pairs, oldest first
    pub fn calls(&self) -> impl Iterator<Item = (DateEntry, ArgumentEntry)> + '_ {
        self.dates.iter().zip(self.arguments.iter())
    }
}

/// All syscall records of one process
pub struct Accounting {
    records: [SyscallRecord; NSYSCALL],
    allocator: Arc<dyn PageAllocator>,
}

impl Accounting {
    pub fn new(allocator: Arc<dyn PageAllocator>, retention: Retention) -> Self {
        Self {
            records: core::array::from_fn(|_| SyscallRecord::new(retention)),
            allocator,
        }
    }

    /// The record for `id`
    pub fn record(&self, id: SyscallId) -> &SyscallRecord {
        &self.records[id.index()]
    }

    /// Total recorded calls of `id`
    pub fn count_of(&self, id: SyscallId) -> u64 {
        self.record(id).count
    }

    /// Total recorded calls across all syscalls
    pub fn total_calls(&self) -> u64 {
        self.records.iter().map(|r| r.count).sum()
    }

    /// Syscalls called at least once, in number order
    pub fn invoked(&self) -> impl Iterator<Item = (SyscallId, &SyscallRecord)> {
        SyscallId::ALL
            .iter()
            .zip(self.records.iter())
            .filter(|(_, record)| !record.is_empty())
            .map(|(&id, record)| (id, record))
    }

    /// Append one call to the record for `id`.
    ///
    /// Both histories are reserved before either is written, so on error
    /// the record is unchanged.
    pub(crate) fn append(
        &mut self,
        id: SyscallId,
        date: DateEntry,
        arguments: ArgumentEntry,
    ) -> Result<(), AllocError> {
        let alloc = &*self.allocator;
        let record = &mut self.records[id.index()];

        record.dates.reserve(alloc)?;
        record.arguments.reserve(alloc)?;
        record.dates.push(date, alloc)?;
        record.arguments.push(arguments, alloc)?;

        record.name.set(id.name());
        record.count += 1;
        Ok(())
    }

    /// Write the invoked-syscalls report for process `pid` to `sink`.
    ///
    /// One header line per invoked syscall, then one line per retained call.
    pub fn report(&self, pid: Pid, sink: &dyn DiagnosticSink) {
        sink.write_line(format_args!(
            "pid {}: {} syscalls recorded",
            pid,
            self.total_calls()
        ));

        for (id, record) in self.invoked() {
            sink.write_line(format_args!(
                "{} ({}): {} calls, {} retained",
                record.name(),
                id.number(),
                record.count(),
                record.dates().len()
            ));

            for (date, args) in record.calls() {
                sink.write_line(format_args!("  {} {}", date.date, args));
            }
        }
    }
}

impl Drop for Accounting {
    fn drop(&mut self) {
        let alloc = &*self.allocator;
        for record in self.records.iter_mut() {
            // SAFETY: every history of this process grew through `alloc`
            unsafe {
                record.dates.release(alloc);
                record.arguments.release(alloc);
            }
        }
    }
}
