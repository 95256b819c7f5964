//! System Call Argument Fetching
//!
//! Reads integers, pointers and strings out of a process's user memory.
//!
//! # Calling Convention
//! At syscall entry the saved user `esp` points at the return address
//! pushed by the libc stub; word argument `n` sits at `esp + 4 + 4n`.
//!
//! # Security Principles
//! - Every address is checked against the address-space size before use
//! - All address arithmetic is checked, so wraparound can never pass
//! - Strings are viewed in place, not copied. This is sound only because no
//!   other context can write this process's memory while its trap is being
//!   handled; shared writable memory would require copying instead.

use core::fmt;
use core::ops::Range;

use crate::proc::Process;

/// Size of one argument word
pub const WORD: u32 = 4;

/// Why an argument could not be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchError {
    /// Address (or address + size) lies outside `[0, sz)`
    OutOfBounds,
    /// No NUL terminator before the end of the address space
    Unterminated,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::OutOfBounds => f.write_str("address out of bounds"),
            FetchError::Unterminated => f.write_str("unterminated string"),
        }
    }
}

/// A validated, read-only view of user memory
#[derive(Debug, Clone, Copy)]
pub struct UserBuffer<'a> {
    addr: u32,
    bytes: &'a [u8],
}

impl<'a> UserBuffer<'a> {
    /// User address of the first byte
    pub fn addr(&self) -> u32 {
        self.addr
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A validated, writable view of user memory
#[derive(Debug)]
pub struct UserBufferMut<'a> {
    addr: u32,
    bytes: &'a mut [u8],
}

impl UserBufferMut<'_> {
    pub fn addr(&self) -> u32 {
        self.addr
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A NUL-terminated user string, viewed without the terminator
#[derive(Debug, Clone, Copy)]
pub struct UserStr<'a> {
    addr: u32,
    bytes: &'a [u8],
}

impl<'a> UserStr<'a> {
    pub fn addr(&self) -> u32 {
        self.addr
    }

    /// String bytes, terminator excluded
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Distance from the start to the terminator
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The string as UTF-8, if it is valid.
    pub fn to_str(&self) -> Option<&'a str> {
        core::str::from_utf8(self.bytes).ok()
    }
}

/// Check that `[addr, addr + len)` lies within `[0, sz)`.
///
/// `addr` itself must be below `sz` even for an empty range.
fn check_range(sz: u32, addr: u32, len: u32) -> Result<Range<usize>, FetchError> {
    let end = addr.checked_add(len).ok_or(FetchError::OutOfBounds)?;
    if addr >= sz || end > sz {
        return Err(FetchError::OutOfBounds);
    }
    Ok(addr as usize..end as usize)
}

/// Fetch the 32-bit integer at user address `addr`.
pub fn fetch_int(p: &Process, addr: u32) -> Result<i32, FetchError> {
    let range = check_range(p.size(), addr, WORD)?;
    let bytes = p.memory().get(range).ok_or(FetchError::OutOfBounds)?;
    let word: [u8; 4] = bytes.try_into().map_err(|_| FetchError::OutOfBounds)?;
    Ok(i32::from_ne_bytes(word))
}

/// Fetch the NUL-terminated string starting at user address `addr`.
///
/// The scan never runs past `sz`.
pub fn fetch_str(p: &Process, addr: u32) -> Result<UserStr<'_>, FetchError> {
    let sz = p.size();
    if addr >= sz {
        return Err(FetchError::OutOfBounds);
    }

    let tail = p
        .memory()
        .get(addr as usize..sz as usize)
        .ok_or(FetchError::OutOfBounds)?;
    let len = tail
        .iter()
        .position(|&b| b == 0)
        .ok_or(FetchError::Unterminated)?;

    Ok(UserStr {
        addr,
        bytes: &tail[..len],
    })
}

/// User address of word argument `n`.
fn arg_addr(p: &Process, n: usize) -> Result<u32, FetchError> {
    let n = u32::try_from(n).map_err(|_| FetchError::OutOfBounds)?;
    n.checked_mul(WORD)
        .and_then(|offset| p.tf.stack_pointer().checked_add(WORD)?.checked_add(offset))
        .ok_or(FetchError::OutOfBounds)
}

/// Fetch word argument `n` as an integer.
pub fn arg_int(p: &Process, n: usize) -> Result<i32, FetchError> {
    fetch_int(p, arg_addr(p, n)?)
}

/// Validate word argument `n` as a pointer to `size` bytes.
///
/// A negative `size` is rejected.
fn arg_range(p: &Process, n: usize, size: i32) -> Result<Range<usize>, FetchError> {
    let len = u32::try_from(size).map_err(|_| FetchError::OutOfBounds)?;
    let addr = arg_int(p, n)? as u32;
    check_range(p.size(), addr, len)
}

/// Fetch word argument `n` as a pointer to a `size`-byte block.
pub fn arg_ptr(p: &Process, n: usize, size: i32) -> Result<UserBuffer<'_>, FetchError> {
    let range = arg_range(p, n, size)?;
    let addr = range.start as u32;
    let bytes = p.memory().get(range).ok_or(FetchError::OutOfBounds)?;
    Ok(UserBuffer { addr, bytes })
}

/// Fetch word argument `n` as a pointer to a writable `size`-byte block.
pub fn arg_ptr_mut(
    p: &mut Process,
    n: usize,
    size: i32,
) -> Result<UserBufferMut<'_>, FetchError> {
    let range = arg_range(p, n, size)?;
    let addr = range.start as u32;
    let bytes = p
        .memory_mut()
        .get_mut(range)
        .ok_or(FetchError::OutOfBounds)?;
    Ok(UserBufferMut { addr, bytes })
}

/// Fetch word argument `n` as a pointer to a NUL-terminated string.
pub fn arg_str(p: &Process, n: usize) -> Result<UserStr<'_>, FetchError> {
    let addr = arg_int(p, n)? as u32;
    fetch_str(p, addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use alloc::vec;

    #[test]
    fn test_fetch_int() {
        let mut mem = vec![0u8; 64];
        mem[8..12].copy_from_slice(&(-42i32).to_ne_bytes());
        let p = testing::process(1, "t", mem);

        assert_eq!(fetch_int(&p, 8), Ok(-42));
        assert_eq!(fetch_int(&p, 60), Ok(0));
    }

    #[test]
    fn test_fetch_int_bounds() {
        let p = testing::process(1, "t", vec![0u8; 64]);

        // Straddles the end of the address space
        assert_eq!(fetch_int(&p, 61), Err(FetchError::OutOfBounds));
        assert_eq!(fetch_int(&p, 64), Err(FetchError::OutOfBounds));
        // addr + 4 would wrap
        assert_eq!(fetch_int(&p, u32::MAX - 1), Err(FetchError::OutOfBounds));
    }

    #[test]
    fn test_fetch_str() {
        let mut mem = vec![0xFFu8; 32];
        mem[4..10].copy_from_slice(b"hello\0");
        let p = testing::process(1, "t", mem);

        let s = fetch_str(&p, 4).unwrap();
        assert_eq!(s.as_bytes(), b"hello");
        assert_eq!(s.len(), 5);
        assert_eq!(s.addr(), 4);
        assert_eq!(s.to_str(), Some("hello"));

        // Starting on the terminator gives the empty string
        assert!(fetch_str(&p, 9).unwrap().is_empty());
    }

    #[test]
    fn test_fetch_str_unterminated() {
        let mut mem = vec![b'x'; 32];
        mem[3] = 0;
        let p = testing::process(1, "t", mem);

        assert_eq!(fetch_str(&p, 4).unwrap_err(), FetchError::Unterminated);
        assert_eq!(fetch_str(&p, 32).unwrap_err(), FetchError::OutOfBounds);
    }

    #[test]
    fn test_fetch_str_terminator_on_last_byte() {
        let mut mem = vec![b'x'; 16];
        mem[15] = 0;
        let p = testing::process(1, "t", mem);

        let s = fetch_str(&p, 10).unwrap();
        assert_eq!(s.len(), 5);
        assert!(s.addr() as usize + s.len() < p.size() as usize);
    }

    #[test]
    fn test_arg_int_reads_past_return_address() {
        let p = testing::process_with_args(1, "t", &[7, 9]);

        assert_eq!(arg_int(&p, 0), Ok(7));
        assert_eq!(arg_int(&p, 1), Ok(9));
    }

    #[test]
    fn test_arg_int_stack_out_of_bounds() {
        let mut p = testing::process(1, "t", vec![0u8; 64]);
        p.tf.esp = 60;
        assert_eq!(arg_int(&p, 0), Err(FetchError::OutOfBounds));

        p.tf.esp = u32::MAX - 2;
        assert_eq!(arg_int(&p, 0), Err(FetchError::OutOfBounds));
        assert_eq!(arg_int(&p, usize::MAX), Err(FetchError::OutOfBounds));
    }

    #[test]
    fn test_arg_ptr() {
        let mut p = testing::process_with_args(1, "t", &[0x100, 16]);
        p.memory_mut()[0x100] = 0xAB;

        let buf = arg_ptr(&p, 0, 16).unwrap();
        assert_eq!(buf.addr(), 0x100);
        assert_eq!(buf.len(), 16);
        assert_eq!(buf.as_bytes()[0], 0xAB);
    }

    #[test]
    fn test_arg_ptr_rejects_negative_size() {
        let p = testing::process_with_args(1, "t", &[0x100]);
        assert_eq!(arg_ptr(&p, 0, -1).unwrap_err(), FetchError::OutOfBounds);
        assert_eq!(arg_ptr(&p, 0, i32::MIN).unwrap_err(), FetchError::OutOfBounds);
    }

    #[test]
    fn test_arg_ptr_range_must_fit() {
        let sz = testing::USER_SIZE as i32;
        let p = testing::process_with_args(1, "t", &[sz - 8, -16]);

        assert!(arg_ptr(&p, 0, 8).is_ok());
        assert_eq!(arg_ptr(&p, 0, 9).unwrap_err(), FetchError::OutOfBounds);
        // A negative address is a huge unsigned one, and addr + size wraps
        assert_eq!(arg_ptr(&p, 1, 32).unwrap_err(), FetchError::OutOfBounds);
        assert_eq!(arg_ptr(&p, 1, 0).unwrap_err(), FetchError::OutOfBounds);
    }

    #[test]
    fn test_arg_ptr_mut_writes_user_memory() {
        let mut p = testing::process_with_args(1, "t", &[0x200]);
        {
            let mut buf = arg_ptr_mut(&mut p, 0, 4).unwrap();
            buf.as_bytes_mut().copy_from_slice(b"abcd");
        }
        assert_eq!(&p.memory()[0x200..0x204], b"abcd");
    }

    #[test]
    fn test_arg_str() {
        let mut p = testing::process_with_args(1, "t", &[0x300, 0x3F0]);
        p.memory_mut()[0x300..0x308].copy_from_slice(b"/bin/sh\0");

        assert_eq!(arg_str(&p, 0).unwrap().as_bytes(), b"/bin/sh");
        // The rest of the image is zeroed, so 0x3F0 is an empty string
        assert!(arg_str(&p, 1).unwrap().is_empty());
    }
}
