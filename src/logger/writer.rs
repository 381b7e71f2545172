//! Log writer module
//!
//! Writes log lines to stdout/stderr. Write failures (closed pipe, full disk
//! behind a redirect) are dropped so logging can never take the server down.

use std::io::{self, Write};

/// Log output target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Informational and access lines
    Stdout,
    /// Warnings and errors
    Stderr,
}

/// Write one line to the given target
pub fn write_line(target: LogTarget, message: &str) {
    match target {
        LogTarget::Stdout => write_to(&mut io::stdout().lock(), message),
        LogTarget::Stderr => write_to(&mut io::stderr().lock(), message),
    }
}

/// Write one line to any writer, ignoring errors
pub fn write_to<W: Write>(out: &mut W, message: &str) {
    let _ = writeln!(out, "{message}");
    let _ = out.flush();
}
