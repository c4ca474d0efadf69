//! Related schema entries attached to a diagnostic.

use std::fmt;

use crate::location::SchemaPath;

/// Another schema entry involved in a diagnostic, such as the first
/// definition of a duplicated type or the property that already owns an
/// accessor name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    location: SchemaPath,
    note: String,
}

impl Label {
    pub fn new(location: SchemaPath, note: impl Into<String>) -> Self {
        Self {
            location,
            note: note.into(),
        }
    }

    pub fn location(&self) -> &SchemaPath {
        &self.location
    }

    pub fn note(&self) -> &str {
        &self.note
    }
}

/// Renders as `<pointer>: <note>`.
impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_display() {
        let label = Label::new(SchemaPath::resource("AWS::S3::Bucket"), "first defined here");

        assert_eq!(label.note(), "first defined here");
        assert_eq!(
            label.to_string(),
            "/Resources/AWS::S3::Bucket: first defined here"
        );
    }
}
