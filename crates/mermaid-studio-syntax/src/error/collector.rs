//! Collector for accumulating diagnostics during validation.
//!
//! The [`DiagnosticCollector`] lets every rule report its findings instead of
//! stopping at the first one.

use crate::error::{Diagnostic, SyntaxError};

/// A collector for accumulating diagnostics, in emission order.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    ///
    /// If the diagnostic is an error, the collector is marked as having errors.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Consume the collector and return every diagnostic in emission order.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Finish collection and return a result.
    ///
    /// - If there are errors, returns `Err(SyntaxError)` with all diagnostics.
    /// - If there are no errors, returns `Ok` with the warnings.
    pub fn finish(self) -> Result<Vec<Diagnostic>, SyntaxError> {
        if self.has_errors {
            Err(SyntaxError::new(self.diagnostics))
        } else {
            Ok(self.diagnostics)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_collector_new_finish_ok() {
        let collector = DiagnosticCollector::new();
        assert_eq!(collector.finish().unwrap(), Vec::new());
    }

    #[test]
    fn test_collector_emit_error_finish_err() {
        let mut collector = DiagnosticCollector::new();

        collector.emit(Diagnostic::error(1, "test error"));

        assert!(collector.finish().is_err());
    }

    #[test]
    fn test_collector_warnings_only_are_returned() {
        let mut collector = DiagnosticCollector::new();

        collector.emit(Diagnostic::warning(1, "warning 1"));
        collector.emit(Diagnostic::warning(2, "warning 2"));

        let warnings = collector.finish().unwrap();
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_collector_keeps_emission_order() {
        let mut collector = DiagnosticCollector::new();

        collector.emit(Diagnostic::error(1, "first").with_code(ErrorCode::E100));
        collector.emit(Diagnostic::warning(2, "second"));
        collector.emit(Diagnostic::error(3, "third"));

        let err = collector.finish().unwrap_err();
        let messages: Vec<_> = err.diagnostics().iter().map(|d| d.message()).collect();
        assert_eq!(messages, ["first", "second", "third"]);
    }
}
