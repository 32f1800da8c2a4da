//! Error types for report parsing and command encoding.

use thiserror::Error;

/// Raw input report could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("empty input report")]
    Empty,

    #[error("report 0x{id:02X} truncated: expected {expected} payload bytes, got {actual}")]
    Truncated {
        id: u8,
        expected: usize,
        actual: usize,
    },
}

/// Output command could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("memory write payload is {len} bytes, at most {max} allowed")]
    PayloadTooLong { len: usize, max: usize },
}
