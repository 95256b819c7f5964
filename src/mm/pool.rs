//! Accounting Page Pool
//!
//! Backing store for per-process syscall history, built on
//! `linked_list_allocator::Heap`.
//!
//! # Contract
//! - Allocation never overlaps a live block
//! - Exhaustion is reported as `AllocError`, never a panic
//! - Safe to call from any process's trap context (spinlock protected)

use core::alloc::Layout;
use core::fmt;
use core::mem::MaybeUninit;
use core::ptr::NonNull;

use linked_list_allocator::Heap;
use spin::Mutex;

/// The pool could not satisfy a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError {
    layout: Layout,
}

impl AllocError {
    pub const fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// The request that failed.
    pub const fn layout(&self) -> Layout {
        self.layout
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "page pool exhausted (size={}, align={})",
            self.layout.size(),
            self.layout.align()
        )
    }
}

/// Allocation service for kernel bookkeeping memory.
pub trait PageAllocator: Send + Sync {
    /// Allocate a block satisfying `layout`.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Return a block to the allocator.
    ///
    /// # Safety
    /// `ptr` must come from `allocate` on this allocator with the same
    /// `layout`, and must not be used afterwards.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// A spin-locked first-fit heap over a fixed memory region.
pub struct HeapPool {
    heap: Mutex<Heap>,
}

impl HeapPool {
    /// A pool with no memory; every allocation fails until `init`.
    pub const fn empty() -> Self {
        Self {
            heap: Mutex::new(Heap::empty()),
        }
    }

    /// Build a pool owning `region`.
    pub fn from_region(region: &'static mut [MaybeUninit<u8>]) -> Self {
        Self {
            heap: Mutex::new(Heap::from_slice(region)),
        }
    }

    /// Hand `size` bytes at `start` to an empty pool.
    ///
    /// # Safety
    /// - Must be called at most once, on a pool built with `empty`
    /// - `[start, start + size)` must be valid, writable and otherwise unused
    ///   for the lifetime of the pool
    pub unsafe fn init(&self, start: *mut u8, size: usize) {
        // SAFETY: forwarded from the caller's contract
        unsafe { self.heap.lock().init(start, size) }
    }

    /// Bytes currently handed out.
    pub fn used(&self) -> usize {
        self.heap.lock().used()
    }

    /// Bytes still available (possibly fragmented).
    pub fn free(&self) -> usize {
        self.heap.lock().free()
    }
}

impl PageAllocator for HeapPool {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        self.heap
            .lock()
            .allocate_first_fit(layout)
            .map_err(|()| AllocError::new(layout))
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: the caller guarantees `ptr` came from `allocate` with `layout`
        unsafe { self.heap.lock().deallocate(ptr, layout) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn test_empty_pool_fails() {
        let pool = HeapPool::empty();
        let layout = Layout::new::<u64>();
        assert_eq!(pool.allocate(layout), Err(AllocError::new(layout)));
    }

    #[test]
    fn test_allocate_and_return() {
        let pool = testing::pool(4096);
        let layout = Layout::from_size_align(256, 8).unwrap();

        let block = pool.allocate(layout).unwrap();
        assert!(pool.used() >= 256);

        unsafe { pool.deallocate(block, layout) };
        assert_eq!(pool.used(), 0);
    }

    #[test]
    fn test_exhaustion_is_an_error() {
        let pool = testing::pool(1024);
        let layout = Layout::from_size_align(4096, 8).unwrap();
        let err = pool.allocate(layout).unwrap_err();
        assert_eq!(err.layout().size(), 4096);
    }
}
