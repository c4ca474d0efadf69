//! Error adapter for converting StratusError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! A [`stratus_schema::CompileError`] carries every diagnostic of a failed
//! schema compilation, and a reference check can fail for several
//! references at once. Each of those is rendered independently.
//!
//! Schema diagnostics point at document paths rather than byte ranges, so
//! the adapter renders the labelled paths as a small listing and attaches
//! the labels to it.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use stratus::{ReferenceViolation, StratusError};
use stratus_schema::Diagnostic;

/// Adapter for a single schema diagnostic.
pub struct DiagnosticAdapter<'a> {
    /// The wrapped diagnostic
    diag: &'a Diagnostic,
    /// Error for diagnostics that failed the compilation, warning otherwise
    severity: miette::Severity,
    /// The diagnostic's location followed by its related entries, one per line
    listing: String,
    /// Span of each line within `listing`
    spans: Vec<SourceSpan>,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a Diagnostic, severity: miette::Severity) -> Self {
        let locations = std::iter::once(diag.location())
            .chain(diag.related().iter().map(|label| label.location()));

        let mut listing = String::new();
        let mut spans = Vec::with_capacity(diag.related().len() + 1);
        for location in locations {
            let line = location.to_string();
            spans.push(SourceSpan::from((listing.len(), line.len())));
            listing.push_str(&line);
            listing.push('\n');
        }
        Self {
            diag,
            severity,
            listing,
            spans,
        }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .field("severity", &self.severity)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.diag.code()))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(self.severity)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.listing as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let (primary, related) = self.spans.split_first()?;
        let primary = LabeledSpan::new_primary_with_span(
            self.diag.note().map(str::to_string),
            *primary,
        );
        let related = self
            .diag
            .related()
            .iter()
            .zip(related)
            .map(|(label, span)| LabeledSpan::new_with_span(Some(label.note().to_string()), *span));

        Some(Box::new(std::iter::once(primary).chain(related)))
    }
}

/// Adapter for one invalid template reference.
pub struct ViolationAdapter<'a>(pub &'a ReferenceViolation);

impl fmt::Debug for ViolationAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ViolationAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ViolationAdapter<'_> {}

impl MietteDiagnostic for ViolationAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("stratus::reference"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!(
            "`{}` must be a parameter, a pseudo-parameter, or a resource that does not refer back to `{}`",
            self.0.reference(),
            self.0.origin()
        )))
    }
}

/// Adapter for non-diagnostic [`StratusError`] variants.
///
/// This adapter handles errors that don't have rich diagnostic information,
/// such as I/O errors, malformed documents and import errors.
pub struct ErrorAdapter<'a>(pub &'a StratusError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            StratusError::Io(_) => "stratus::io",
            StratusError::Compile(_) => "stratus::schema",
            StratusError::Json(_) => "stratus::json",
            StratusError::Yaml(_) => "stratus::yaml",
            StratusError::UnsupportedFormat(_) => "stratus::format",
            StratusError::Template(_) => "stratus::template",
            StratusError::Import { .. } | StratusError::ImportTemplate { .. } => "stratus::import",
            StratusError::InvalidReferences(_) => "stratus::reference",
        };
        Some(Box::new(code))
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps a schema diagnostic, a reference violation, or a
/// non-diagnostic error, providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A schema compiler diagnostic with document locations.
    Diagnostic(DiagnosticAdapter<'a>),
    /// An invalid template reference.
    Violation(ViolationAdapter<'a>),
    /// A simple error without location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Violation(v) => fmt::Display::fmt(v, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) | Reportable::Violation(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Violation(v) => v.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<miette::Severity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Violation(_) | Reportable::Error(_) => None,
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Violation(v) => v.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Violation(_) | Reportable::Error(_) => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Violation(_) | Reportable::Error(_) => None,
        }
    }
}

/// Convert a [`StratusError`] into a list of reportable errors.
///
/// For [`StratusError::Compile`], this returns one [`Reportable`] for each
/// error followed by one for each warning, and for [`StratusError::InvalidReferences`] one for each
/// violation. Other error variants produce a single [`Reportable`].
pub fn to_reportables(err: &StratusError) -> Vec<Reportable<'_>> {
    match err {
        StratusError::Compile(compile_err) => {
            let errors = compile_err
                .errors()
                .iter()
                .map(|d| (d, miette::Severity::Error));
            let warnings = compile_err
                .warnings()
                .iter()
                .map(|d| (d, miette::Severity::Warning));
            errors
                .chain(warnings)
                .map(|(d, severity)| Reportable::Diagnostic(DiagnosticAdapter::new(d, severity)))
                .collect()
        }
        StratusError::InvalidReferences(violations) if !violations.is_empty() => violations
            .iter()
            .map(|v| Reportable::Violation(ViolationAdapter(v)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}
