//! Memory management
//!
//! Provides the page pool that backs per-process syscall accounting.
//! Address-space management lives outside this crate; processes expose
//! their user image through `proc::AddressSpace`.

mod pool;

pub use pool::{AllocError, HeapPool, PageAllocator};
