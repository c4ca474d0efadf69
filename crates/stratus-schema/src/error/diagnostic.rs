//! Problems found in a schema document.

use std::fmt;

use crate::{
    error::{error_code::ErrorCode, label::Label},
    location::SchemaPath,
};

/// One problem found while compiling a schema, anchored at the schema entry
/// that caused it.
///
/// Whether a diagnostic is fatal is decided by the collector it is reported
/// to, not by the diagnostic itself.
///
/// # Example
///
/// ```
/// # use stratus_schema::error::{Diagnostic, ErrorCode};
/// # use stratus_schema::SchemaPath;
/// let diag = Diagnostic::new(
///     ErrorCode::E100,
///     SchemaPath::resource_property("AWS::EC2::Instance", "Tags"),
///     "undefined type `Taag`",
/// )
/// .with_note("property type `Taag` is not defined")
/// .with_help("declare `Taag` under `Types` or fix the property type");
///
/// assert_eq!(
///     diag.to_string(),
///     "E100: undefined type `Taag` at /Resources/AWS::EC2::Instance/Properties/Tags"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    code: ErrorCode,
    message: String,
    location: SchemaPath,
    note: Option<String>,
    related: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    pub fn new(code: ErrorCode, location: SchemaPath, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            location,
            note: None,
            related: Vec::new(),
            help: None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The schema entry the problem was found in.
    pub fn location(&self) -> &SchemaPath {
        &self.location
    }

    /// Explanation attached to [`Diagnostic::location`].
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Other schema entries involved in the problem.
    pub fn related(&self) -> &[Label] {
        &self.related
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_related(mut self, location: SchemaPath, note: impl Into<String>) -> Self {
        self.related.push(Label::new(location, note));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} at {}", self.code, self.message, self.location)
    }
}

impl std::error::Error for Diagnostic {}
