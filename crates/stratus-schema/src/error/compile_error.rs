//! The CompileError type for wrapping compilation diagnostics.

use thiserror::Error;

use crate::error::Diagnostic;

fn summary(errors: &[Diagnostic]) -> String {
    match errors {
        [] => String::new(),
        [first] => first.to_string(),
        [first, rest @ ..] => format!("{} (+{} more)", first, rest.len()),
    }
}

/// Error type for schema compilation.
///
/// Carries every error of a failed compilation in the order they were
/// found, plus the warnings reported along the way.
#[derive(Debug, Clone, Error)]
#[error("{}", summary(.errors))]
pub struct CompileError {
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl CompileError {
    pub fn new(errors: Vec<Diagnostic>) -> Self {
        Self {
            errors,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<Diagnostic>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }
}

impl From<Diagnostic> for CompileError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::new(vec![diagnostic])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorCode, location::SchemaPath};

    fn undefined(name: &str) -> Diagnostic {
        Diagnostic::new(
            ErrorCode::E100,
            SchemaPath::type_entry("Alias"),
            format!("undefined type `{name}`"),
        )
    }

    #[test]
    fn test_compile_error_display_single() {
        let err: CompileError = undefined("Foo").into();

        assert_eq!(err.errors().len(), 1);
        assert_eq!(err.to_string(), "E100: undefined type `Foo` at /Types/Alias");
    }

    #[test]
    fn test_compile_error_display_counts_errors_only() {
        let err = CompileError::new(vec![undefined("Foo"), undefined("Bar")]).with_warnings(vec![
            Diagnostic::new(ErrorCode::E105, SchemaPath::root(), "accessor shadowed"),
        ]);

        assert_eq!(
            err.to_string(),
            "E100: undefined type `Foo` at /Types/Alias (+1 more)"
        );
        assert_eq!(err.warnings().len(), 1);
    }
}
