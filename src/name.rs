//! Bounded Names
//!
//! Fixed-capacity, NUL-terminated names stored inline in kernel structures.
//! Copies never overrun the destination and always leave a terminator.

use core::fmt;

/// Copy `src` into `dst`, truncating to `dst.len() - 1` bytes.
///
/// Copying stops at the first NUL in `src`. The destination is always
/// NUL-terminated (unless empty) and the bytes after the terminator are
/// cleared. Returns the number of bytes copied, not counting the terminator.
pub fn copy_bounded(dst: &mut [u8], src: &[u8]) -> usize {
    let Some(room) = dst.len().checked_sub(1) else {
        return 0;
    };

    let src_len = src.iter().position(|&b| b == 0).unwrap_or(src.len());
    let n = src_len.min(room);

    dst[..n].copy_from_slice(&src[..n]);
    dst[n..].fill(0);
    n
}

/// An inline name of at most `N - 1` bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FixedName<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> FixedName<N> {
    /// The empty name.
    pub const fn empty() -> Self {
        Self { bytes: [0; N] }
    }

    /// Build a name from `s`, truncating if needed.
    pub fn new(s: &str) -> Self {
        let mut name = Self::empty();
        name.set(s);
        name
    }

    /// Overwrite the name with `s`, truncating if needed.
    pub fn set(&mut self, s: &str) {
        copy_bounded(&mut self.bytes, s.as_bytes());
    }

    /// Name bytes up to (not including) the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        let len = self.bytes.iter().position(|&b| b == 0).unwrap_or(N);
        &self.bytes[..len]
    }

    /// The name as text. A multi-byte character split by truncation is cut off.
    pub fn as_str(&self) -> &str {
        let bytes = self.as_bytes();
        match core::str::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.first().map_or(true, |&b| b == 0)
    }
}

impl<const N: usize> Default for FixedName<N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const N: usize> fmt::Display for FixedName<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<const N: usize> fmt::Debug for FixedName<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}
