//! System Call Interface
//!
//! The kernel's only path from user mode into kernel services.
//!
//! # Security Model
//! - Whitelist approach: only registered syscall numbers reach a handler
//! - Every user address is bounds-checked against the address-space size
//! - Invalid inputs return errors, never panic
//!
//! # Components
//! - `args`: fetches word, pointer and string arguments from user memory
//! - `table`: syscall numbers, names, signatures and registered handlers
//! - `dispatch`: the trap-time gate that ties them to accounting

pub mod args;
mod dispatch;
mod signature;
mod table;

pub use args::{
    arg_int, arg_ptr, arg_ptr_mut, arg_str, fetch_int, fetch_str, FetchError, UserBuffer,
    UserBufferMut, UserStr,
};
pub use dispatch::{DispatchError, Dispatcher, Outcome};
pub use signature::{ArgSignature, SlotType};
pub use table::{Handler, SyscallEntry, SyscallId, SyscallTable, NSYSCALL};
