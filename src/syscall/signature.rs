//! Argument signatures
//!
//! Each syscall declares which of its word arguments the accounting
//! recorder snapshots. The slot list is the single source of truth for
//! both the type tags and the values recorded.

/// Type of one snapshotted argument slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotType {
    /// The call takes no snapshotted argument
    Void,
    /// A 32-bit integer word
    Int,
}

impl SlotType {
    /// Type tag shown in accounting reports
    pub const fn as_str(self) -> &'static str {
        match self {
            SlotType::Void => "void",
            SlotType::Int => "int",
        }
    }
}

/// Argument-signature class of a syscall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgSignature {
    Void,
    SingleInt,
    DoubleInt,
}

impl ArgSignature {
    /// Slot types, in argument order
    pub const fn slots(self) -> &'static [SlotType] {
        match self {
            ArgSignature::Void => &[SlotType::Void],
            ArgSignature::SingleInt => &[SlotType::Int],
            ArgSignature::DoubleInt => &[SlotType::Int, SlotType::Int],
        }
    }
}
