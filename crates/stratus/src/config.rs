//! Configuration types for template building and rendering.
//!
//! This module provides configuration structures that control how templates
//! are created, validated and rendered. All types implement
//! [`serde::Deserialize`] for flexible loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`TemplateConfig`] - Defaults applied to every new template.
//! - [`RenderConfig`] - Output formatting.
//! - [`ValidationConfig`] - How reference violations are treated.
//!
//! # Example
//!
//! ```
//! # use stratus::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.render().pretty());
//! assert!(config.validation().fail_on_invalid_refs());
//! ```

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Template defaults section.
    #[serde(default)]
    template: TemplateConfig,

    /// Rendering section.
    #[serde(default)]
    render: RenderConfig,

    /// Validation section.
    #[serde(default)]
    validation: ValidationConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(template: TemplateConfig, render: RenderConfig, validation: ValidationConfig) -> Self {
        Self {
            template,
            render,
            validation,
        }
    }

    /// Returns the template defaults.
    pub fn template(&self) -> &TemplateConfig {
        &self.template
    }

    /// Returns the rendering configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    /// Returns the validation configuration.
    pub fn validation(&self) -> &ValidationConfig {
        &self.validation
    }
}

/// Defaults applied to every template created through [`crate::Stratus`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateConfig {
    /// Format version marker; the library default is used when unset.
    #[serde(default)]
    format_version: Option<String>,

    /// Description given to templates that do not set their own.
    #[serde(default)]
    description: Option<String>,
}

impl TemplateConfig {
    pub fn new(format_version: Option<String>, description: Option<String>) -> Self {
        Self {
            format_version,
            description,
        }
    }

    pub fn format_version(&self) -> Option<&str> {
        self.format_version.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

fn default_true() -> bool {
    true
}

/// Output formatting of rendered templates.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Pretty-print the JSON output.
    #[serde(default = "default_true")]
    pretty: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl RenderConfig {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn pretty(&self) -> bool {
        self.pretty
    }
}

/// Reference validation behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationConfig {
    /// Refuse to render templates with invalid references.
    ///
    /// When disabled, violations are logged as warnings and the template is
    /// rendered anyway.
    #[serde(default = "default_true")]
    fail_on_invalid_refs: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            fail_on_invalid_refs: true,
        }
    }
}

impl ValidationConfig {
    pub fn new(fail_on_invalid_refs: bool) -> Self {
        Self {
            fail_on_invalid_refs,
        }
    }

    pub fn fail_on_invalid_refs(&self) -> bool {
        self.fail_on_invalid_refs
    }
}
