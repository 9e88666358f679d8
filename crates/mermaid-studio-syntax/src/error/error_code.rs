//! Error codes for the validator diagnostics.
//!
//! Error codes are organized by rule family:
//! - `E0xx` - Document-level errors
//! - `E1xx` - Header errors
//! - `E2xx` - Per-line balance errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Document Errors (E0xx)
    // =========================================================================
    /// Empty source.
    ///
    /// The source is empty or contains only whitespace.
    E001,

    /// Comments only.
    ///
    /// Every non-blank line is a `%%` comment; there is no header line.
    E002,

    // =========================================================================
    // Header Errors (E1xx)
    // =========================================================================
    /// Unknown diagram type.
    ///
    /// The first token of the header line is not a recognized diagram keyword.
    E100,

    /// Invalid graph direction.
    ///
    /// A `graph` or `flowchart` header carries a direction other than
    /// `TD`, `TB`, `BT`, `RL` or `LR`.
    E101,

    // =========================================================================
    // Balance Errors (E2xx)
    // =========================================================================
    /// Unmatched brackets.
    ///
    /// The line has a different number of `[` and `]`.
    E200,

    /// Unmatched parentheses.
    ///
    /// The line has a different number of `(` and `)`.
    E201,

    /// Unmatched braces.
    ///
    /// The line has a different number of `{` and `}`.
    E202,

    /// Unclosed quote.
    ///
    /// The line has an odd number of `"`.
    E203,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "empty source",
            ErrorCode::E002 => "comments only",
            ErrorCode::E100 => "unknown diagram type",
            ErrorCode::E101 => "invalid graph direction",
            ErrorCode::E200 => "unmatched brackets",
            ErrorCode::E201 => "unmatched parentheses",
            ErrorCode::E202 => "unmatched braces",
            ErrorCode::E203 => "unclosed quote",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
