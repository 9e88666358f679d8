//! The core diagnostic type for the validator.
//!
//! A [`Diagnostic`] represents a single error or warning on one source line,
//! with an optional error code and help text.

use std::fmt;

use crate::{
    error::{Severity, error_code::ErrorCode},
    span::Span,
};

/// A diagnostic message attached to a source line.
///
/// # Example
///
/// ```text
/// error[E100]: invalid diagram type "grph"
///   --> diagram.mmd:1:1
///    |
///  1 | grph TD
///    | ^^^^^^^
///    |
///    = help: the first non-comment line must start with a diagram keyword
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    line: usize,
    message: String,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic on a 1-based line.
    ///
    /// A line number of `0` is treated as line `1`.
    pub fn error(line: usize, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, line, message)
    }

    /// Create a warning diagnostic on a 1-based line.
    pub fn warning(line: usize, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, line, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the 1-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Resolve this diagnostic's line to a byte span in `source`.
    ///
    /// The span covers the line's content without its line terminator.
    /// Returns `None` if `source` has fewer lines than [`Self::line`].
    ///
    /// # Example
    ///
    /// ```
    /// # use mermaid_studio_syntax::error::Diagnostic;
    /// let source = "graph TD\n  A[Start\n";
    /// let span = Diagnostic::error(2, "unmatched brackets").span_in(source).unwrap();
    /// assert_eq!(&source[span.range()], "  A[Start");
    /// ```
    pub fn span_in(&self, source: &str) -> Option<Span> {
        let mut start = 0;
        for (index, line) in source.split('\n').enumerate() {
            if index + 1 == self.line {
                let content = line.strip_suffix('\r').unwrap_or(line);
                return Some(Span::new(start..start + content.len()));
            }
            start += line.len() + 1;
        }
        None
    }

    fn new(severity: Severity, line: usize, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            line: line.max(1),
            message: message.into(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E001]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}
