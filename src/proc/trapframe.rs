//! Saved user register state
//!
//! The trap entry path pushes the user registers into a `TrapFrame` before
//! the syscall gate runs. The gate only touches two of them:
//! - `eax`: syscall number on entry, result on return
//! - `esp`: user stack pointer, where the word arguments live
//!
//! The layout is the i386 syscall ABI that user programs are built against.
//! It is independent of the board drivers in `drivers`, which only back the
//! `Clock` and `DiagnosticSink` seams.

/// Register state saved on entry from user mode (i386 layout)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrapFrame {
    pub edi: u32,
    pub esi: u32,
    pub ebp: u32,
    pub ebx: u32,
    pub edx: u32,
    pub ecx: u32,
    /// Syscall number in, result out
    pub eax: u32,
    /// Trap number
    pub trapno: u32,
    /// User instruction pointer
    pub eip: u32,
    pub eflags: u32,
    /// User stack pointer
    pub esp: u32,
}

impl TrapFrame {
    /// The requested syscall number.
    #[inline]
    pub fn syscall_number(&self) -> i32 {
        self.eax as i32
    }

    /// Store the value returned to user mode.
    #[inline]
    pub fn set_return(&mut self, value: i32) {
        self.eax = value as u32;
    }

    /// The value that will be returned to user mode.
    #[inline]
    pub fn return_value(&self) -> i32 {
        self.eax as i32
    }

    #[inline]
    pub fn stack_pointer(&self) -> u32 {
        self.esp
    }
}
