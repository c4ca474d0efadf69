//! Diagnostics reported by the schema compiler.
//!
//! Every problem is a [`Diagnostic`] anchored at the [`SchemaPath`] of the
//! schema entry it was found in, with an [`ErrorCode`] and optionally a note,
//! related entries and help text. The compiler reports problems as either
//! errors or warnings; any error fails the compilation, and all of them are
//! returned together in a single [`CompileError`].
//!
//! # Example
//!
//! ```
//! # use stratus_schema::error::{Diagnostic, ErrorCode};
//! # use stratus_schema::SchemaPath;
//! let diag = Diagnostic::new(
//!     ErrorCode::E102,
//!     SchemaPath::type_entry("Tag"),
//!     "type `Tag` is defined multiple times",
//! )
//! .with_note("duplicate definition")
//! .with_related(SchemaPath::resource("Tag"), "first defined here")
//! .with_help("remove the duplicate or use a different name");
//!
//! assert_eq!(diag.related()[0].location().to_string(), "/Resources/Tag");
//! ```
//!
//! [`SchemaPath`]: crate::SchemaPath

mod collector;
mod compile_error;
mod diagnostic;
mod error_code;
mod label;

pub(crate) use collector::DiagnosticCollector;

pub use compile_error::CompileError;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
