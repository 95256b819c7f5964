//! Append-only invocation history
//!
//! A ring buffer whose storage comes from a `PageAllocator`.
//!
//! # Growth
//! - Nothing is allocated until the first push
//! - The first buffer fills one page (clamped to the retention limit)
//! - A full buffer doubles, up to the retention limit
//! - At the limit, a push overwrites the oldest entry
//!
//! # Ownership
//! A `History` does not remember its allocator. The owner must call
//! `release` with the same allocator that served `reserve`/`push`, or the
//! buffer leaks; `Accounting` does this on drop.

use core::alloc::Layout;
use core::mem;
use core::num::NonZeroUsize;
use core::ptr::NonNull;

use crate::config::{Retention, PAGE_SIZE};
use crate::mm::{AllocError, PageAllocator};

pub struct History<T: Copy> {
    buf: NonNull<T>,
    cap: usize,
    /// Ring index of the oldest entry
    head: usize,
    len: usize,
    limit: Option<NonZeroUsize>,
}

// SAFETY: History exclusively owns its buffer, like a Vec<T>.
unsafe impl<T: Copy + Send> Send for History<T> {}
// SAFETY: shared access only reads.
unsafe impl<T: Copy + Sync> Sync for History<T> {}

impl<T: Copy> History<T> {
    pub const fn new(retention: Retention) -> Self {
        Self {
            buf: NonNull::dangling(),
            cap: 0,
            head: 0,
            len: 0,
            limit: retention.limit(),
        }
    }

    /// Retained entries
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slots currently allocated
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Maximum retained entries, if bounded
    #[inline]
    pub fn limit(&self) -> Option<NonZeroUsize> {
        self.limit
    }

    /// Entry `i`, counting from the oldest retained one
    pub fn get(&self, i: usize) -> Option<T> {
        if i >= self.len {
            return None;
        }
        // SAFETY: i < len, so the slot is initialized
        Some(unsafe { self.slot(i).read() })
    }

    pub fn oldest(&self) -> Option<T> {
        self.get(0)
    }

    pub fn newest(&self) -> Option<T> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Retained entries, oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = T> + ExactSizeIterator + '_ {
        // SAFETY: every i < len names an initialized slot
        (0..self.len).map(move |i| unsafe { self.slot(i).read() })
    }

    /// Pointer to the `i`th entry from the oldest.
    ///
    /// # Safety
    /// `cap` must be non-zero.
    #[inline]
    unsafe fn slot(&self, i: usize) -> *mut T {
        // SAFETY: the index is reduced modulo cap, so it stays in the buffer
        unsafe { self.buf.as_ptr().add((self.head + i) % self.cap) }
    }

    /// Capacity the next push needs, if it needs more than `cap`.
    fn grow_target(&self) -> Option<usize> {
        if self.len < self.cap {
            return None;
        }

        let next = if self.cap == 0 {
            (PAGE_SIZE / mem::size_of::<T>().max(1)).max(1)
        } else {
            self.cap.saturating_mul(2)
        };

        match self.limit {
            Some(limit) if self.cap >= limit.get() => None,
            Some(limit) => Some(next.min(limit.get())),
            None => Some(next),
        }
    }

    /// Make sure the next `push` needs no allocation.
    pub fn reserve(&mut self, alloc: &dyn PageAllocator) -> Result<(), AllocError> {
        let Some(new_cap) = self.grow_target() else {
            return Ok(());
        };

        let layout =
            Layout::array::<T>(new_cap).map_err(|_| AllocError::new(Layout::new::<T>()))?;
        let new_buf = alloc.allocate(layout)?.cast::<T>();

        for i in 0..self.len {
            // SAFETY: old slot i is initialized; new_buf has room for
            // new_cap > len entries and does not overlap the old buffer
            unsafe { new_buf.as_ptr().add(i).write(self.slot(i).read()) };
        }

        // SAFETY: the old buffer came from this allocator with this layout
        unsafe { self.free_buffer(alloc) };

        log::debug!("history grew to {} entries", new_cap);
        self.buf = new_buf;
        self.cap = new_cap;
        self.head = 0;
        Ok(())
    }

    /// Append `value`, dropping the oldest entry if the history is full.
    pub fn push(&mut self, value: T, alloc: &dyn PageAllocator) -> Result<(), AllocError> {
        self.reserve(alloc)?;

        if self.len < self.cap {
            // SAFETY: cap > len >= 0; slot len is the first free one
            unsafe { self.slot(self.len).write(value) };
            self.len += 1;
        } else {
            // Full at the retention limit: overwrite the oldest
            // SAFETY: cap == len > 0
            unsafe { self.slot(0).write(value) };
            self.head = (self.head + 1) % self.cap;
        }
        Ok(())
    }

    /// Return the buffer to `alloc` and forget all entries.
    ///
    /// # Safety
    /// `alloc` must be the allocator every `reserve`/`push` used.
    pub unsafe fn release(&mut self, alloc: &dyn PageAllocator) {
        // SAFETY: forwarded from the caller
        unsafe { self.free_buffer(alloc) };
        self.buf = NonNull::dangling();
        self.cap = 0;
        self.head = 0;
        self.len = 0;
    }

    /// # Safety
    /// The buffer must have come from `alloc`.
    unsafe fn free_buffer(&mut self, alloc: &dyn PageAllocator) {
        if self.cap == 0 {
            return;
        }
        // This layout was computed successfully when the buffer was allocated
        if let Ok(layout) = Layout::array::<T>(self.cap) {
            // SAFETY: buf was allocated by `alloc` with exactly this layout
            unsafe { alloc.deallocate(self.buf.cast::<u8>(), layout) };
        }
    }
}
