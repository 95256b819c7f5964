//! User address space view
//!
//! A process's user memory spans `[0, sz)`. The syscall gate never
//! dereferences user addresses directly; it indexes the byte view
//! returned by `AddressSpace` after bounds checking.

use alloc::vec::Vec;
use core::ptr::NonNull;

/// The user image of one process, addressed from 0.
pub trait AddressSpace: Send {
    /// The whole user image; its length is the address-space size.
    fn as_bytes(&self) -> &[u8];

    fn as_bytes_mut(&mut self) -> &mut [u8];

    /// Address-space size (`sz`) in bytes.
    fn size(&self) -> u32 {
        u32::try_from(self.as_bytes().len()).unwrap_or(u32::MAX)
    }
}

/// A user image held in kernel heap memory.
impl AddressSpace for Vec<u8> {
    fn as_bytes(&self) -> &[u8] {
        self
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        self
    }
}

/// A user image already mapped into the kernel's view of memory.
#[derive(Debug)]
pub struct MappedSpace {
    base: NonNull<u8>,
    size: u32,
}

// SAFETY: the mapping is owned by exactly one process, and a process is
// handled by one trap context at a time.
unsafe impl Send for MappedSpace {}

impl MappedSpace {
    /// Wrap `size` bytes of mapped user memory starting at `base`.
    ///
    /// # Safety
    /// - `[base, base + size)` must be mapped, readable and writable
    /// - No other live reference may alias that range while the
    ///   `MappedSpace` exists
    pub unsafe fn new(base: NonNull<u8>, size: u32) -> Self {
        Self { base, size }
    }
}

impl AddressSpace for MappedSpace {
    fn as_bytes(&self) -> &[u8] {
        // SAFETY: range validity and exclusivity are guaranteed by `new`
        unsafe { core::slice::from_raw_parts(self.base.as_ptr(), self.size as usize) }
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: as above; `&mut self` makes this the only view
        unsafe { core::slice::from_raw_parts_mut(self.base.as_ptr(), self.size as usize) }
    }

    fn size(&self) -> u32 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_vec_size() {
        let image = vec![0u8; 4096];
        assert_eq!(image.size(), 4096);
    }

    #[test]
    fn test_mapped_view() {
        let mut backing = vec![7u8; 64];
        let base = NonNull::new(backing.as_mut_ptr()).unwrap();
        let mut space = unsafe { MappedSpace::new(base, 64) };

        assert_eq!(space.size(), 64);
        space.as_bytes_mut()[3] = 9;
        assert_eq!(space.as_bytes()[3], 9);
        drop(space);
        assert_eq!(backing[3], 9);
    }
}
