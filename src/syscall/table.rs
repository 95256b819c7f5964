//! Dispatch Table
//!
//! Maps syscall numbers to handlers. The table is filled at kernel init
//! time by registering handlers against `SyscallId`s; each entry carries
//! the handler together with the syscall's canonical name and argument
//! signature, so the three can never drift apart.

use core::fmt;

use super::signature::ArgSignature;
use crate::proc::Process;

/// Number of defined syscalls
pub const NSYSCALL: usize = 24;

/// A syscall handler. It pulls its own arguments out of the process.
pub type Handler = fn(&mut Process) -> i32;

/// Defined syscalls, numbered from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum SyscallId {
    Fork = 1,
    Exit = 2,
    Wait = 3,
    Pipe = 4,
    Read = 5,
    Kill = 6,
    Exec = 7,
    Fstat = 8,
    Chdir = 9,
    Dup = 10,
    Getpid = 11,
    Sbrk = 12,
    Sleep = 13,
    Uptime = 14,
    Open = 15,
    Write = 16,
    Mknod = 17,
    Unlink = 18,
    Link = 19,
    Mkdir = 20,
    Close = 21,
    /// Increment a counter
    IncNum = 22,
    /// Report the calling process's invoked syscalls
    InvokedSyscalls = 23,
    /// Read a process's invocation count for one syscall
    GetCount = 24,
}

impl SyscallId {
    /// Every syscall, in number order
    pub const ALL: [SyscallId; NSYSCALL] = [
        SyscallId::Fork,
        SyscallId::Exit,
        SyscallId::Wait,
        SyscallId::Pipe,
        SyscallId::Read,
        SyscallId::Kill,
        SyscallId::Exec,
        SyscallId::Fstat,
        SyscallId::Chdir,
        SyscallId::Dup,
        SyscallId::Getpid,
        SyscallId::Sbrk,
        SyscallId::Sleep,
        SyscallId::Uptime,
        SyscallId::Open,
        SyscallId::Write,
        SyscallId::Mknod,
        SyscallId::Unlink,
        SyscallId::Link,
        SyscallId::Mkdir,
        SyscallId::Close,
        SyscallId::IncNum,
        SyscallId::InvokedSyscalls,
        SyscallId::GetCount,
    ];

    /// The number user code places in `eax`
    #[inline]
    pub const fn number(self) -> i32 {
        self as i32
    }

    /// Zero-based slot in per-process record arrays
    #[inline]
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    pub fn from_number(number: i32) -> Option<Self> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        Self::ALL.get(index).copied()
    }

    /// Canonical name
    pub const fn name(self) -> &'static str {
        match self {
            SyscallId::Fork => "sys_fork",
            SyscallId::Exit => "sys_exit",
            SyscallId::Wait => "sys_wait",
            SyscallId::Pipe => "sys_pipe",
            SyscallId::Read => "sys_read",
            SyscallId::Kill => "sys_kill",
            SyscallId::Exec => "sys_exec",
            SyscallId::Fstat => "sys_fstat",
            SyscallId::Chdir => "sys_chdir",
            SyscallId::Dup => "sys_dup",
            SyscallId::Getpid => "sys_getpid",
            SyscallId::Sbrk => "sys_sbrk",
            SyscallId::Sleep => "sys_sleep",
            SyscallId::Uptime => "sys_uptime",
            SyscallId::Open => "sys_open",
            SyscallId::Write => "sys_write",
            SyscallId::Mknod => "sys_mknod",
            SyscallId::Unlink => "sys_unlink",
            SyscallId::Link => "sys_link",
            SyscallId::Mkdir => "sys_mkdir",
            SyscallId::Close => "sys_close",
            SyscallId::IncNum => "sys_inc_num",
            SyscallId::InvokedSyscalls => "sys_invoked_syscalls",
            SyscallId::GetCount => "sys_get_count",
        }
    }

    /// Which word arguments the accounting recorder snapshots
    pub const fn signature(self) -> ArgSignature {
        match self {
            SyscallId::Kill | SyscallId::IncNum | SyscallId::InvokedSyscalls => {
                ArgSignature::SingleInt
            }
            SyscallId::GetCount => ArgSignature::DoubleInt,
            _ => ArgSignature::Void,
        }
    }
}

impl fmt::Display for SyscallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A registered syscall
#[derive(Clone, Copy)]
pub struct SyscallEntry {
    pub id: SyscallId,
    pub handler: Handler,
    pub name: &'static str,
    pub signature: ArgSignature,
}

impl fmt::Debug for SyscallEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyscallEntry")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Syscall number to handler mapping
///
/// Slot 0 is never used; numbers run from 1 to `NSYSCALL`.
pub struct SyscallTable {
    entries: [Option<SyscallEntry>; NSYSCALL + 1],
}

impl SyscallTable {
    /// A table with nothing registered
    pub const fn new() -> Self {
        Self {
            entries: [None; NSYSCALL + 1],
        }
    }

    /// Register (or replace) the handler for `id`.
    pub fn register(&mut self, id: SyscallId, handler: Handler) -> &mut Self {
        self.entries[id as usize] = Some(SyscallEntry {
            id,
            handler,
            name: id.name(),
            signature: id.signature(),
        });
        self
    }

    /// Remove the handler for `id`, if any.
    pub fn unregister(&mut self, id: SyscallId) -> Option<SyscallEntry> {
        self.entries[id as usize].take()
    }

    /// Resolve a raw syscall number.
    ///
    /// Numbers `<= 0`, `>= len()`, or without a handler resolve to nothing.
    pub fn lookup(&self, number: i32) -> Option<&SyscallEntry> {
        let slot = usize::try_from(number).ok().filter(|&n| n > 0)?;
        self.entries.get(slot)?.as_ref()
    }

    /// Table size (one more than the highest syscall number)
    pub const fn len(&self) -> usize {
        NSYSCALL + 1
    }

    /// Registered entries, in number order
    pub fn iter(&self) -> impl Iterator<Item = &SyscallEntry> {
        self.entries.iter().flatten()
    }
}

impl Default for SyscallTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syscall::SlotType;

    fn nop(_: &mut Process) -> i32 {
        0
    }

    #[test]
    fn test_numbering() {
        for (i, id) in SyscallId::ALL.iter().enumerate() {
            assert_eq!(id.number() as usize, i + 1);
            assert_eq!(id.index(), i);
            assert_eq!(SyscallId::from_number(id.number()), Some(*id));
        }
        assert_eq!(SyscallId::from_number(0), None);
        assert_eq!(SyscallId::from_number(-3), None);
        assert_eq!(SyscallId::from_number(NSYSCALL as i32 + 1), None);
    }

    #[test]
    fn test_names_fit_records() {
        for id in SyscallId::ALL {
            assert!(id.name().starts_with("sys_"));
            assert!(id.name().len() < crate::config::SYSCALL_NAME_MAX);
        }
    }

    #[test]
    fn test_signatures() {
        assert_eq!(SyscallId::Getpid.signature().slots(), &[SlotType::Void]);
        assert_eq!(SyscallId::Kill.signature(), ArgSignature::SingleInt);
        assert_eq!(SyscallId::IncNum.signature(), ArgSignature::SingleInt);
        assert_eq!(SyscallId::GetCount.signature().slots(), &[SlotType::Int, SlotType::Int]);
    }

    #[test]
    fn test_lookup_requires_registration() {
        let mut table = SyscallTable::new();
        assert!(table.lookup(SyscallId::Getpid.number()).is_none());

        table.register(SyscallId::Getpid, nop);
        let entry = table.lookup(11).unwrap();
        assert_eq!(entry.id, SyscallId::Getpid);
        assert_eq!(entry.name, "sys_getpid");
        assert_eq!(entry.signature, ArgSignature::Void);

        assert!(table.unregister(SyscallId::Getpid).is_some());
        assert!(table.lookup(11).is_none());
    }

    #[test]
    fn test_lookup_out_of_range() {
        let mut table = SyscallTable::new();
        for id in SyscallId::ALL {
            table.register(id, nop);
        }
        assert_eq!(table.iter().count(), NSYSCALL);

        assert!(table.lookup(0).is_none());
        assert!(table.lookup(-1).is_none());
        assert!(table.lookup(i32::MIN).is_none());
        assert!(table.lookup(table.len() as i32).is_none());
        assert!(table.lookup(i32::MAX).is_none());
        assert!(table.lookup(NSYSCALL as i32).is_some());
    }
}
