//! Reading schema and template documents from disk.
//!
//! Schema documents may be JSON or YAML (the latter behind the `yaml`
//! feature); the format is chosen from the file extension.

use std::{fs, path::Path};

use log::debug;

use stratus_schema::SchemaSource;

use crate::error::StratusError;

/// Serialization format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Picks the format from the extension of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StratusError::UnsupportedFormat`] for anything other than
    /// `.json`, `.yaml` and `.yml`.
    pub fn from_path(path: &Path) -> Result<Self, StratusError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(StratusError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Parses a schema document held in memory.
pub fn parse_schema_source(
    text: &str,
    format: DocumentFormat,
) -> Result<SchemaSource, StratusError> {
    match format {
        DocumentFormat::Json => Ok(serde_json::from_str(text)?),
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => Ok(serde_yaml::from_str(text)?),
        #[cfg(not(feature = "yaml"))]
        DocumentFormat::Yaml => Err(StratusError::UnsupportedFormat(
            "YAML support is disabled".to_string(),
        )),
    }
}

/// Reads and parses the schema document at `path`.
pub fn load_schema_source(path: impl AsRef<Path>) -> Result<SchemaSource, StratusError> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path)?;
    let text = fs::read_to_string(path)?;
    let source = parse_schema_source(&text, format)?;
    debug!(
        path:% = path.display(),
        resources = source.resources.len(),
        types = source.types.len();
        "Loaded schema document",
    );
    Ok(source)
}

/// Parses a template document held in memory into a JSON tree.
///
/// YAML templates are converted to the same tree, so the importer only has
/// to understand one representation.
pub fn parse_template_document(
    text: &str,
    format: DocumentFormat,
) -> Result<serde_json::Value, StratusError> {
    match format {
        DocumentFormat::Json => Ok(serde_json::from_str(text)?),
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => Ok(serde_yaml::from_str(text)?),
        #[cfg(not(feature = "yaml"))]
        DocumentFormat::Yaml => Err(StratusError::UnsupportedFormat(
            "YAML support is disabled".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("schema.json")).unwrap(),
            DocumentFormat::Json
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("schema.YML")).unwrap(),
            DocumentFormat::Yaml
        );
        assert!(matches!(
            DocumentFormat::from_path(Path::new("schema.toml")),
            Err(StratusError::UnsupportedFormat(_))
        ));
        assert!(DocumentFormat::from_path(Path::new("schema")).is_err());
    }

    #[test]
    fn test_parse_json_schema() {
        let source = parse_schema_source(
            r#"{"Resources": {"AWS::S3::Bucket": {"Properties": {"BucketName": "String"}}}}"#,
            DocumentFormat::Json,
        )
        .unwrap();
        assert!(source.resources.contains_key("AWS::S3::Bucket"));
        assert!(source.types.is_empty());
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_parse_yaml_schema() {
        let text = "\
Resources:
  AWS::EC2::Instance:
    Properties:
      Tags: [Tag]
Types:
  Tag:
    Key: String
    Value: String
";
        let source = parse_schema_source(text, DocumentFormat::Yaml).unwrap();
        assert_eq!(source.resources.len(), 1);
        assert!(source.types.contains_key("Tag"));
    }

    #[test]
    fn test_parse_malformed_json() {
        assert!(matches!(
            parse_schema_source("{", DocumentFormat::Json),
            Err(StratusError::Json(_))
        ));
    }
}
