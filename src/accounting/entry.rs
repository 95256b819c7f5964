//! History entries
//!
//! One `DateEntry` and one `ArgumentEntry` are appended per recorded call.

use core::fmt;

use crate::config::MAXARGS;
use crate::time::RtcDate;

/// When a call was made
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct DateEntry {
    pub date: RtcDate,
}

impl DateEntry {
    pub const fn new(date: RtcDate) -> Self {
        Self { date }
    }
}

/// One snapshotted argument
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArgSlot {
    /// Not part of the call's signature
    #[default]
    Empty,
    /// The call takes no argument
    Void,
    /// An integer argument; `None` if it could not be fetched
    Int(Option<i32>),
}

impl ArgSlot {
    /// `"void"` or `"int"`; `None` for an empty slot
    pub const fn type_tag(&self) -> Option<&'static str> {
        match self {
            ArgSlot::Empty => None,
            ArgSlot::Void => Some("void"),
            ArgSlot::Int(_) => Some("int"),
        }
    }

    /// The fetched integer, if any
    pub const fn value(&self) -> Option<i32> {
        match self {
            ArgSlot::Int(value) => *value,
            _ => None,
        }
    }
}

impl fmt::Display for ArgSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgSlot::Empty => Ok(()),
            ArgSlot::Void => f.write_str("void"),
            ArgSlot::Int(Some(v)) => write!(f, "int {}", v),
            ArgSlot::Int(None) => f.write_str("int ?"),
        }
    }
}

/// The arguments a call was made with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArgumentEntry {
    slots: [ArgSlot; MAXARGS],
}

impl ArgumentEntry {
    pub const fn empty() -> Self {
        Self {
            slots: [ArgSlot::Empty; MAXARGS],
        }
    }

    /// Filled slots, in argument order
    pub fn slots(&self) -> &[ArgSlot] {
        let used = self
            .slots
            .iter()
            .position(|slot| *slot == ArgSlot::Empty)
            .unwrap_or(MAXARGS);
        &self.slots[..used]
    }

    /// Slot `n`, or `Empty` beyond the signature
    pub fn slot(&self, n: usize) -> ArgSlot {
        self.slots.get(n).copied().unwrap_or_default()
    }

    /// Store slot `n`; indexes past `MAXARGS` are ignored.
    pub(crate) fn set(&mut self, n: usize, slot: ArgSlot) {
        if let Some(dst) = self.slots.get_mut(n) {
            *dst = slot;
        }
    }
}

impl fmt::Display for ArgumentEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, slot) in self.slots().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", slot)?;
        }
        f.write_str(")")
    }
}
