//! Error types for Stratus operations.
//!
//! This module provides the main error type [`StratusError`] which wraps
//! the error conditions of schema loading, template import and rendering.

use std::io;

use thiserror::Error;

use stratus_core::{ReferenceViolation, TemplateError};
use stratus_schema::CompileError;

/// The main error type for Stratus operations.
///
/// # Diagnostic Variants
///
/// The `Compile` variant carries every coded diagnostic of a failed schema
/// compilation, which front ends can render in full.
#[derive(Debug, Error)]
pub enum StratusError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Compile(#[from] CompileError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML document. Only produced with the `yaml` feature.
    #[error("YAML error: {0}")]
    Yaml(String),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Import error at {location}: {message}")]
    Import { location: String, message: String },

    #[error("Import error at {location}: {source}")]
    ImportTemplate {
        location: String,
        #[source]
        source: TemplateError,
    },

    #[error("template has {} invalid reference(s)", .0.len())]
    InvalidReferences(Vec<ReferenceViolation>),
}

#[cfg(feature = "yaml")]
impl From<serde_yaml::Error> for StratusError {
    fn from(err: serde_yaml::Error) -> Self {
        StratusError::Yaml(err.to_string())
    }
}

impl StratusError {
    /// Create a structural `Import` error at a document location.
    pub fn import(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Import {
            location: location.into(),
            message: message.into(),
        }
    }
}
