//! Locations inside a schema document.

use std::fmt;

/// Path from the document root to a schema entry, e.g.
/// `/Resources/AWS::EC2::Instance/Properties/Tags`.
///
/// Type names contain `::` and nested property type names may contain `.`,
/// so segments are separated by `/` and the path renders as a JSON pointer
/// (RFC 6901): `~` and `/` inside a segment are escaped as `~0` and `~1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SchemaPath {
    segments: Vec<String>,
}

impl SchemaPath {
    /// The document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a new path with `segment` appended.
    pub fn join(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// The entry containing this one, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            segments: rest.to_vec(),
        })
    }

    /// The entry named `segment` next to this one, e.g. another property of
    /// the same type.
    pub fn sibling(&self, segment: impl Into<String>) -> Self {
        self.parent().unwrap_or_default().join(segment)
    }

    /// The last segment, unescaped.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Path of the resource type `name`.
    pub fn resource(name: &str) -> Self {
        Self::root().join("Resources").join(name)
    }

    /// Path of the property `property` of resource type `name`.
    pub fn resource_property(name: &str, property: &str) -> Self {
        Self::resource(name).join("Properties").join(property)
    }

    /// Path of the `Types` entry `name`.
    pub fn type_entry(name: &str) -> Self {
        Self::root().join("Types").join(name)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(SchemaPath::root().to_string(), "/");
        assert_eq!(
            SchemaPath::resource_property("AWS::EC2::Instance", "Tags").to_string(),
            "/Resources/AWS::EC2::Instance/Properties/Tags"
        );
        assert_eq!(SchemaPath::type_entry("Tag").to_string(), "/Types/Tag");
    }

    #[test]
    fn test_display_escapes_pointer_characters() {
        let path = SchemaPath::type_entry("a/b~c");
        assert_eq!(path.to_string(), "/Types/a~1b~0c");
        assert_eq!(path.name(), Some("a/b~c"));
    }

    #[test]
    fn test_parent_and_sibling() {
        let tags = SchemaPath::resource_property("AWS::S3::Bucket", "Tags");
        assert_eq!(
            tags.parent().unwrap().to_string(),
            "/Resources/AWS::S3::Bucket/Properties"
        );
        assert_eq!(
            tags.sibling("BucketName").to_string(),
            "/Resources/AWS::S3::Bucket/Properties/BucketName"
        );
        assert!(SchemaPath::root().parent().is_none());
        assert_eq!(SchemaPath::root().sibling("Types").to_string(), "/Types");
    }
}
