//! Stratus - A schema-driven builder for infrastructure orchestration templates.
//!
//! Schema loading, template construction, import, reference validation and
//! rendering. Resource types and their properties come from a schema
//! document compiled at run time, so the same builder serves any provider
//! whose types can be described that way.

pub mod cache;
pub mod config;
pub mod import;
pub mod loader;

mod error;

pub use stratus_core::{
    Condition, Function, Mapping, Object, OriginKind, Output, Parameter, Properties, PropertyValue,
    ReferenceReport, ReferenceViolation, Resource, Schema, Template, TemplateError, TypeName,
    Value,
};
pub use stratus_schema::{CompileError, Diagnostic, SchemaSource};

pub use error::StratusError;

use std::{fs, path::Path, sync::Arc};

use log::{debug, info, warn};

use config::AppConfig;
use loader::DocumentFormat;

/// Builder for compiling schemas and producing templates.
///
/// This provides an API for processing templates through the schema
/// compilation, construction, validation and rendering stages.
///
/// # Examples
///
/// ```rust,no_run
/// use stratus::{Stratus, config::AppConfig};
///
/// let stratus = Stratus::new(AppConfig::default());
///
/// // Compile the schema document (cached per process)
/// let schema = stratus.load_schema("schema.json")
///     .expect("Failed to load schema");
///
/// // Build a template against it
/// let mut template = stratus.template(schema);
/// template.declare("S3::Bucket", "Logs").expect("Unknown type");
///
/// // Validate references and render to JSON
/// let json = stratus.render(&template).expect("Failed to render");
/// ```
#[derive(Debug, Default)]
pub struct Stratus {
    config: AppConfig,
}

impl Stratus {
    /// Create a new builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including template defaults
    ///   and validation settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Load and compile the schema document at `path`.
    ///
    /// JSON and YAML documents are accepted, chosen by file extension.
    /// Compiled schemas are shared through the process-wide [`cache`].
    ///
    /// # Errors
    ///
    /// Returns `StratusError` for unreadable or malformed documents and for
    /// schemas that fail to compile.
    pub fn load_schema(&self, path: impl AsRef<Path>) -> Result<Arc<Schema>, StratusError> {
        let path = path.as_ref();
        info!(path:% = path.display(); "Loading schema");
        let source = loader::load_schema_source(path)?;
        self.compile_schema(&source)
    }

    /// Compile an in-memory schema document.
    ///
    /// # Errors
    ///
    /// Returns [`StratusError::Compile`] with every diagnostic of the failed
    /// compilation.
    pub fn compile_schema(&self, source: &SchemaSource) -> Result<Arc<Schema>, StratusError> {
        cache::compile_cached(source)
    }

    /// Create an empty template bound to `schema`.
    ///
    /// The configured format version and default description are applied.
    pub fn template(&self, schema: Arc<Schema>) -> Template {
        let mut template = Template::new(schema);
        self.apply_defaults(&mut template, true);
        template
    }

    /// Applies the configured template defaults.
    ///
    /// The description default only fills an unset description.
    fn apply_defaults(&self, template: &mut Template, format_version: bool) {
        let defaults = self.config.template();
        if let (true, Some(version)) = (format_version, defaults.format_version()) {
            template.set_format_version(version);
        }
        if template.description().is_none() {
            if let Some(description) = defaults.description() {
                template.set_description(description);
            }
        }
    }

    /// Import a template document held in memory.
    ///
    /// Values present in the document win over configured defaults.
    ///
    /// # Errors
    ///
    /// Returns `StratusError` if the document cannot be parsed or replayed
    /// against `schema`.
    pub fn import_template(
        &self,
        schema: Arc<Schema>,
        text: &str,
        format: DocumentFormat,
    ) -> Result<Template, StratusError> {
        let document = loader::parse_template_document(text, format)?;
        let mut template = import::import_template(schema, &document)?;
        let has_version = document.get("AWSTemplateFormatVersion").is_some();
        self.apply_defaults(&mut template, !has_version);
        Ok(template)
    }

    /// Read and import the template document at `path`.
    pub fn load_template(
        &self,
        schema: Arc<Schema>,
        path: impl AsRef<Path>,
    ) -> Result<Template, StratusError> {
        let path = path.as_ref();
        info!(path:% = path.display(); "Loading template");
        let format = DocumentFormat::from_path(path)?;
        let text = fs::read_to_string(path)?;
        self.import_template(schema, &text, format)
    }

    /// Run reference validation on `template`.
    pub fn validate(&self, template: &Template) -> ReferenceReport {
        let report = template.reference_report();
        debug!(violations = report.violations().len(); "Validated template references");
        report
    }

    /// Render `template` to its JSON document.
    ///
    /// References are validated first. Depending on
    /// [`config::ValidationConfig::fail_on_invalid_refs`], violations either
    /// abort rendering or are logged as warnings.
    ///
    /// # Errors
    ///
    /// Returns [`StratusError::InvalidReferences`] when violations abort
    /// rendering, or a serialization error.
    pub fn render(&self, template: &Template) -> Result<String, StratusError> {
        let report = self.validate(template);
        if !report.is_clean() {
            if self.config.validation().fail_on_invalid_refs() {
                return Err(StratusError::InvalidReferences(report.violations().to_vec()));
            }
            for violation in report.violations() {
                warn!(violation:%; "Rendering template with invalid reference");
            }
        }

        let json = if self.config.render().pretty() {
            serde_json::to_string_pretty(template)?
        } else {
            serde_json::to_string(template)?
        };
        info!(bytes = json.len(); "Template rendered");
        Ok(json)
    }
}
