//! Accounting Recorder
//!
//! Appends one timestamp and one argument snapshot per validated dispatch.
//! Argument fetch failures are reported and recorded as missing values;
//! they never stop the call from being counted.

use super::entry::{ArgSlot, ArgumentEntry, DateEntry};
use crate::diag::DiagnosticSink;
use crate::mm::AllocError;
use crate::proc::Process;
use crate::syscall::args::arg_int;
use crate::syscall::{SlotType, SyscallEntry};
use crate::time::Clock;

/// Records dispatched calls into the calling process's accounting
pub struct Recorder<'a> {
    clock: &'a dyn Clock,
    diag: &'a dyn DiagnosticSink,
}

impl<'a> Recorder<'a> {
    pub fn new(clock: &'a dyn Clock, diag: &'a dyn DiagnosticSink) -> Self {
        Self { clock, diag }
    }

    /// Record one call of `entry` made by `p`.
    ///
    /// Only page pool exhaustion fails; the record is then left unchanged.
    pub fn record(&self, p: &mut Process, entry: &SyscallEntry) -> Result<(), AllocError> {
        let arguments = self.snapshot(p, entry);
        let date = DateEntry::new(self.clock.now());
        p.accounting_mut().append(entry.id, date, arguments)
    }

    /// Capture the arguments named by the entry's signature.
    fn snapshot(&self, p: &Process, entry: &SyscallEntry) -> ArgumentEntry {
        let mut arguments = ArgumentEntry::empty();

        for (n, slot) in entry.signature.slots().iter().enumerate() {
            let value = match slot {
                SlotType::Void => ArgSlot::Void,
                SlotType::Int => match arg_int(p, n) {
                    Ok(v) => ArgSlot::Int(Some(v)),
                    Err(err) => {
                        self.diag.write_line(format_args!(
                            "{} {}: bad int arg {} for {}: {}",
                            p.pid,
                            p.name(),
                            n,
                            entry.name,
                            err
                        ));
                        ArgSlot::Int(None)
                    }
                },
            };
            arguments.set(n, value);
        }

        arguments
    }
}
