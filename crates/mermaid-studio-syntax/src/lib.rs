//! Syntax validator for Mermaid diagram source.
//!
//! This crate performs fast, line-oriented structural checks on diagram
//! source without building a syntax tree:
//!
//! 1. The source must not be empty.
//! 2. It must contain a header line (first non-blank, non-`%%` line).
//! 3. The header must start with a recognized diagram keyword, and a
//!    `graph`/`flowchart` header may only carry a known direction.
//! 4. Every non-comment line must have balanced bracket, parenthesis and
//!    brace counts and an even number of double quotes.
//!
//! Findings are reported as [`Diagnostic`](error::Diagnostic)s in line order.
//!
//! # Example
//!
//! ```
//! use mermaid_studio_syntax::{check, validate};
//!
//! let source = "sequenceDiagram\n  Alice->>Bob: Hello";
//! assert!(validate(source).is_empty());
//! assert!(check(source).is_ok());
//!
//! let err = check("mermaid\n").unwrap_err();
//! assert_eq!(err.diagnostics()[0].line(), 1);
//! ```

pub mod error;

mod span;
mod validate;

pub use span::Span;
pub use validate::validate;

use error::{Diagnostic, DiagnosticCollector, SyntaxError};

/// Validate `source` and fail if any error-severity diagnostic was produced.
///
/// On success the (possibly empty) list of warnings is returned.
///
/// # Errors
///
/// Returns a [`SyntaxError`] carrying every diagnostic, warnings included,
/// when at least one error was found.
pub fn check(source: &str) -> Result<Vec<Diagnostic>, SyntaxError> {
    let mut collector = DiagnosticCollector::new();
    for diagnostic in validate(source) {
        collector.emit(diagnostic);
    }
    collector.finish()
}
