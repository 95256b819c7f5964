//! Process state seen by the syscall gate
//!
//! Scheduling and address-space management live elsewhere; the gate only
//! needs a process's identity, its saved registers, a view of its user
//! memory and its accounting records.
//!
//! A `Process` is handed to the gate as `&mut`, which is how the kernel
//! expresses "one trap per process at a time".

mod memory;
mod trapframe;

pub use memory::{AddressSpace, MappedSpace};
pub use trapframe::TrapFrame;

use alloc::boxed::Box;
use alloc::sync::Arc;

use crate::accounting::Accounting;
use crate::config::{Retention, PROC_NAME_MAX};
use crate::mm::PageAllocator;
use crate::name::FixedName;

/// Process identifier
pub type Pid = i32;

/// A user process
pub struct Process {
    pub pid: Pid,
    name: FixedName<PROC_NAME_MAX>,
    /// Registers saved by the current trap
    pub tf: TrapFrame,
    space: Box<dyn AddressSpace>,
    accounting: Accounting,
}

impl Process {
    /// Create a process whose accounting memory comes from `allocator`.
    pub fn new(
        pid: Pid,
        name: &str,
        space: Box<dyn AddressSpace>,
        allocator: Arc<dyn PageAllocator>,
        retention: Retention,
    ) -> Self {
        Self {
            pid,
            name: FixedName::new(name),
            tf: TrapFrame::default(),
            space,
            accounting: Accounting::new(allocator, retention),
        }
    }

    /// Display name
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn set_name(&mut self, name: &str) {
        self.name.set(name);
    }

    /// Address-space size (`sz`) in bytes
    pub fn size(&self) -> u32 {
        self.space.size()
    }

    /// User memory `[0, sz)`
    pub fn memory(&self) -> &[u8] {
        self.space.as_bytes()
    }

    pub fn memory_mut(&mut self) -> &mut [u8] {
        self.space.as_bytes_mut()
    }

    /// Replace the user image (exec, sbrk).
    pub fn replace_space(&mut self, space: Box<dyn AddressSpace>) -> Box<dyn AddressSpace> {
        core::mem::replace(&mut self.space, space)
    }

    /// Per-syscall invocation history
    pub fn accounting(&self) -> &Accounting {
        &self.accounting
    }

    pub(crate) fn accounting_mut(&mut self) -> &mut Accounting {
        &mut self.accounting
    }
}

impl core::fmt::Debug for Process {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Process")
            .field("pid", &self.pid)
            .field("name", &self.name)
            .field("sz", &self.size())
            .field("tf", &self.tf)
            .finish_non_exhaustive()
    }
}
