//! Diagnostic Output
//!
//! Kernel diagnostics ("unknown sys call", "bad int arg") are single
//! formatted lines written to a sink. The console UART is the usual sink.

use core::fmt;

/// A line-oriented diagnostic channel.
///
/// Each call writes exactly one line; the sink supplies the line ending.
pub trait DiagnosticSink: Sync {
    fn write_line(&self, line: fmt::Arguments<'_>);
}

/// Discards every line.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn write_line(&self, _line: fmt::Arguments<'_>) {}
}
