//! System Call Dispatcher
//!
//! Entry point for every syscall trap.
//!
//! # Flow
//! 1. Decode: read the syscall number from `eax`
//! 2. Validate: resolve it in the dispatch table
//! 3. Invoke: run the handler, which fetches its own arguments
//! 4. Record: append the call to the process's accounting
//! 5. Return: store the handler's result in `eax`
//!
//! An unresolvable number is reported, answered with `-1`, and neither
//! invokes a handler nor touches accounting.

use core::fmt;

use super::table::SyscallTable;
use crate::accounting::Recorder;
use crate::config::AccountingConfig;
use crate::diag::DiagnosticSink;
use crate::mm::AllocError;
use crate::proc::Process;
use crate::time::Clock;

/// How a trap was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A handler ran and returned this value
    Returned(i32),
    /// The number had no handler; `-1` was returned
    Unknown(i32),
}

/// A dispatch that must not return to user mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// Accounting ran out of memory under `FATAL_ON_ALLOC_FAILURE`
    Accounting(AllocError),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Accounting(err) => write!(f, "syscall accounting failed: {}", err),
        }
    }
}

impl From<AllocError> for DispatchError {
    fn from(err: AllocError) -> Self {
        DispatchError::Accounting(err)
    }
}

/// The syscall gate
pub struct Dispatcher<'k> {
    table: &'k SyscallTable,
    clock: &'k dyn Clock,
    diag: &'k dyn DiagnosticSink,
    config: AccountingConfig,
}

impl<'k> Dispatcher<'k> {
    pub fn new(
        table: &'k SyscallTable,
        clock: &'k dyn Clock,
        diag: &'k dyn DiagnosticSink,
    ) -> Self {
        Self {
            table,
            clock,
            diag,
            config: AccountingConfig::new(),
        }
    }

    pub fn with_config(mut self, config: AccountingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &AccountingConfig {
        &self.config
    }

    /// Handle the syscall trap of process `p`.
    ///
    /// # Returns
    /// The outcome, after the result has been stored in `p.tf`. An error
    /// means accounting failed fatally; `p.tf` is then left untouched.
    pub fn dispatch(&self, p: &mut Process) -> Result<Outcome, DispatchError> {
        let num = p.tf.syscall_number();

        let Some(entry) = self.table.lookup(num).copied() else {
            log::debug!("pid {}: rejected syscall {}", p.pid, num);
            self.diag.write_line(format_args!(
                "{} {}: unknown sys call {}",
                p.pid,
                p.name(),
                num
            ));
            p.tf.set_return(-1);
            return Ok(Outcome::Unknown(num));
        };

        log::trace!("pid {}: {}", p.pid, entry.name);
        let ret = (entry.handler)(p);

        if self.config.recording() {
            let recorder = Recorder::new(self.clock, self.diag);
            if let Err(err) = recorder.record(p, &entry) {
                if self.config.alloc_failure_is_fatal() {
                    return Err(err.into());
                }
                self.diag.write_line(format_args!(
                    "{} {}: {} not recorded: {}",
                    p.pid,
                    p.name(),
                    entry.name,
                    err
                ));
            }
        }

        p.tf.set_return(ret);
        Ok(Outcome::Returned(ret))
    }
}
