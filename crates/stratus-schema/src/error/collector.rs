//! Collector for accumulating diagnostics during compilation.
//!
//! The [`DiagnosticCollector`] lets every compilation step report all of its
//! problems instead of failing on the first one.

use crate::error::{CompileError, Diagnostic};

/// Accumulates the errors and warnings of one compilation.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports a problem that prevents a schema from being produced.
    pub fn error(&mut self, diagnostic: Diagnostic) {
        self.errors.push(diagnostic);
    }

    /// Reports a problem the compiled schema works around.
    pub fn warn(&mut self, diagnostic: Diagnostic) {
        self.warnings.push(diagnostic);
    }

    /// Returns the warnings, or every diagnostic wrapped in a [`CompileError`]
    /// if any error was reported.
    pub fn finish(self) -> Result<Vec<Diagnostic>, CompileError> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(CompileError::new(self.errors).with_warnings(self.warnings))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorCode, location::SchemaPath};

    fn diag(code: ErrorCode, message: &str) -> Diagnostic {
        Diagnostic::new(code, SchemaPath::root(), message)
    }

    #[test]
    fn test_collector_new_finish_ok() {
        let collector = DiagnosticCollector::new();
        assert_eq!(collector.finish().unwrap(), Vec::new());
    }

    #[test]
    fn test_collector_errors_keep_warnings_apart() {
        let mut collector = DiagnosticCollector::new();

        collector.error(diag(ErrorCode::E100, "error 1"));
        collector.warn(diag(ErrorCode::E105, "warning 1"));
        collector.error(diag(ErrorCode::E102, "error 2"));

        let err = collector.finish().unwrap_err();
        assert_eq!(err.errors().len(), 2);
        assert_eq!(err.errors()[0].message(), "error 1");
        assert_eq!(err.warnings().len(), 1);
        assert_eq!(err.warnings()[0].code(), ErrorCode::E105);
    }

    #[test]
    fn test_collector_finish_warnings_only() {
        let mut collector = DiagnosticCollector::new();

        collector.warn(diag(ErrorCode::E105, "warning 1"));
        collector.warn(diag(ErrorCode::E105, "warning 2"));

        let warnings = collector.finish().unwrap();
        assert_eq!(warnings.len(), 2);
    }
}
