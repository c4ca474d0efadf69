//! Built-in primitive type names
//!
//! These names are always part of the type namespace, whether or not the
//! schema document declares them. Several spellings map to the same
//! primitive kind, matching the names found in published resource
//! specifications.

use stratus_core::schema::PrimitiveKind;

pub const STRING: &str = "String";
pub const BOOLEAN: &str = "Boolean";
pub const INTEGER: &str = "Integer";
pub const LONG: &str = "Long";
pub const DOUBLE: &str = "Double";
pub const NUMBER: &str = "Number";
pub const TIMESTAMP: &str = "Timestamp";
pub const JSON: &str = "Json";
/// Upper-case spelling used by some resource specifications.
pub const JSON_UPPER: &str = "JSON";

/// Every built-in name with the primitive kind it denotes.
pub const PRIMITIVES: &[(&str, PrimitiveKind)] = &[
    (STRING, PrimitiveKind::String),
    (BOOLEAN, PrimitiveKind::Boolean),
    (INTEGER, PrimitiveKind::Integer),
    (LONG, PrimitiveKind::Integer),
    (DOUBLE, PrimitiveKind::Number),
    (NUMBER, PrimitiveKind::Number),
    (TIMESTAMP, PrimitiveKind::String),
    (JSON, PrimitiveKind::Json),
    (JSON_UPPER, PrimitiveKind::Json),
];

/// Returns the primitive kind of a built-in name.
pub fn primitive_kind(name: &str) -> Option<PrimitiveKind> {
    PRIMITIVES
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .map(|(_, kind)| *kind)
}
