//! Stratus Schema Compiler
//!
//! This crate turns a declarative type schema into the compiled
//! [`Schema`](stratus_core::Schema) that templates are built against.
//!
//! # Pipeline
//!
//! 1. **Source**: The schema document is deserialized into a [`SchemaSource`]
//! 2. **Compilation**: [`compile`] resolves every type reference, binds the
//!    accessor names of every property and derives the resource type short
//!    forms
//!
//! # Example
//!
//! ```
//! use stratus_schema::{compile, PropertyTypeRef, SchemaSource};
//!
//! let source = SchemaSource::new().with_resource(
//!     "AWS::S3::Bucket",
//!     [("BucketName".to_string(), PropertyTypeRef::name("String"))],
//! );
//! let schema = compile(&source).expect("schema compiles");
//! assert!(schema.resolve_resource_type("Bucket").is_some());
//! ```

pub mod abbreviation;
pub mod builtin_types;
pub mod compiler;
pub mod error;
pub mod naming;

mod location;
mod source;

pub use compiler::{Compiler, compile};
pub use error::{CompileError, Diagnostic, ErrorCode, Label};
pub use location::SchemaPath;
pub use source::{PropertyTypeRef, ResourceSource, SchemaSource, TypeSource};
