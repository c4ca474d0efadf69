//! Errors raised while building a template.
//!
//! These are recoverable caller mistakes (an accessor the type does not
//! have, a list accessor used on a scalar property, ...). Reference problems
//! are not errors: they are reported by the reference validator.

use thiserror::Error;

use crate::property::ShapeKind;

/// Error type for template construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("type `{type_name}` has no property accessor `{accessor}`")]
    UnknownProperty { type_name: String, accessor: String },

    #[error("type `{type_name}` has no list element accessor `{accessor}`")]
    UnknownElement { type_name: String, accessor: String },

    #[error("property `{property}` is a {actual} property, not a {expected} property")]
    ShapeMismatch {
        property: String,
        expected: ShapeKind,
        actual: ShapeKind,
    },

    #[error("list property `{property}` holds an intrinsic function, not literal elements")]
    ListExpression { property: String },

    #[error("property `{property}` does not hold an object value")]
    NotAnObject { property: String },

    #[error("unknown resource type `{0}`")]
    UnknownResourceType(String),

    #[error("resource type `{name}` is ambiguous; use one of: {}", candidates.join(", "))]
    AmbiguousResourceType {
        name: String,
        candidates: Vec<String>,
    },

    #[error(
        "resource `{logical_name}` is already declared as `{existing}` and cannot be redeclared as `{requested}`"
    )]
    TypeMismatch {
        logical_name: String,
        existing: String,
        requested: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = TemplateError::ShapeMismatch {
            property: "Tags".to_string(),
            expected: ShapeKind::Scalar,
            actual: ShapeKind::List,
        };
        assert_eq!(
            err.to_string(),
            "property `Tags` is a list property, not a scalar property"
        );

        let err = TemplateError::AmbiguousResourceType {
            name: "Widget".to_string(),
            candidates: vec!["NS1::Foo::Widget".to_string(), "NS2::Bar::Widget".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "resource type `Widget` is ambiguous; use one of: NS1::Foo::Widget, NS2::Bar::Widget"
        );
    }
}
