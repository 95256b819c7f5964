//! Kernel Configuration
//!
//! Compile-time limits and the runtime accounting policy.
//!
//! # Accounting Policy
//! - `AccountingFlags::ENABLED`: record every validated dispatch
//! - `AccountingFlags::FATAL_ON_ALLOC_FAILURE`: an exhausted page pool aborts
//!   the dispatch instead of dropping the accounting entry
//!
//! # Retention
//! `Retention` is chosen per process at creation (`Process::new`). The
//! default keeps every invocation; a bound must be asked for explicitly.

use core::num::NonZeroUsize;

use bitflags::bitflags;

/// Size of one allocator block; history storage starts at one block.
pub const PAGE_SIZE: usize = 4096;

/// Maximum number of word arguments snapshotted per invocation.
pub const MAXARGS: usize = 2;

/// Capacity of a canonical syscall name, including the terminator.
pub const SYSCALL_NAME_MAX: usize = 24;

/// Capacity of a process display name, including the terminator.
pub const PROC_NAME_MAX: usize = 16;

bitflags! {
    /// Switches controlling the accounting recorder.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AccountingFlags: u32 {
        /// Record validated dispatches.
        const ENABLED = 1 << 0;
        /// Treat page pool exhaustion during accounting as fatal.
        const FATAL_ON_ALLOC_FAILURE = 1 << 1;
    }
}

/// How much history each syscall record keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// Keep every invocation until the process is torn down.
    Unbounded,
    /// Keep the most recent `n` invocations, dropping the oldest.
    Bounded(NonZeroUsize),
}

impl Retention {
    /// Bounded retention, or `None` for a zero limit.
    pub const fn bounded(limit: usize) -> Option<Self> {
        match NonZeroUsize::new(limit) {
            Some(limit) => Some(Retention::Bounded(limit)),
            None => None,
        }
    }

    /// Upper bound on retained entries, if any.
    pub const fn limit(self) -> Option<NonZeroUsize> {
        match self {
            Retention::Unbounded => None,
            Retention::Bounded(limit) => Some(limit),
        }
    }
}

impl Default for Retention {
    fn default() -> Self {
        Retention::Unbounded
    }
}

/// Dispatcher-side accounting policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountingConfig {
    pub flags: AccountingFlags,
}

impl AccountingConfig {
    /// Recording enabled, allocation failures degrade.
    pub const fn new() -> Self {
        Self {
            flags: AccountingFlags::ENABLED,
        }
    }

    /// Replace the flag set.
    pub const fn with_flags(mut self, flags: AccountingFlags) -> Self {
        self.flags = flags;
        self
    }

    #[inline]
    pub fn recording(&self) -> bool {
        self.flags.contains(AccountingFlags::ENABLED)
    }

    #[inline]
    pub fn alloc_failure_is_fatal(&self) -> bool {
        self.flags.contains(AccountingFlags::FATAL_ON_ALLOC_FAILURE)
    }
}

impl Default for AccountingConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let config = AccountingConfig::default();
        assert!(config.recording());
        assert!(!config.alloc_failure_is_fatal());
    }

    #[test]
    fn test_default_retention_keeps_everything() {
        assert_eq!(Retention::default(), Retention::Unbounded);
        assert_eq!(Retention::default().limit(), None);
    }

    #[test]
    fn test_zero_limit_rejected() {
        assert_eq!(Retention::bounded(0), None);
        assert_eq!(Retention::Unbounded.limit(), None);
    }
}
