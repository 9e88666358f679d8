//! Error and diagnostic system for the syntax validator.
//!
//! This module provides:
//! - Error codes for documentation and searchability
//! - Line-addressed diagnostics with optional help text
//! - Severity levels
//! - Diagnostic collector for accumulating multiple findings
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message attached to a 1-based source line.
//! Multiple diagnostics are wrapped in [`SyntaxError`] when a caller wants a
//! single error value.
//!
//! # Example
//!
//! ```
//! # use mermaid_studio_syntax::error::{Diagnostic, ErrorCode};
//! let diag = Diagnostic::error(3, "unmatched brackets [ ]")
//!     .with_code(ErrorCode::E200)
//!     .with_help("make sure each \"[\" has a matching \"]\"");
//!
//! assert_eq!(diag.line(), 3);
//! assert_eq!(diag.to_string(), "error[E200]: unmatched brackets [ ]");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod severity;
mod syntax_error;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use severity::Severity;
pub use syntax_error::SyntaxError;
