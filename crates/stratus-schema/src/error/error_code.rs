//! Error codes for the schema compiler diagnostics.
//!
//! All codes belong to the compilation phase and share the `E1xx` range.

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Undefined type reference.
    ///
    /// A property type (or a type alias) names a type that is neither a
    /// built-in primitive nor declared under `Resources` or `Types`.
    E100,

    /// Malformed list property type.
    ///
    /// A list property type must contain exactly one type name.
    E101,

    /// Duplicate type definition.
    ///
    /// A type with this name has already been defined, either as a built-in,
    /// a resource type, or an entry of `Types`.
    E102,

    /// Circular type alias.
    ///
    /// Following the alias chain of a type leads back to the type itself.
    E103,

    /// Invalid type name.
    ///
    /// The name is empty or contains an empty `::`-separated segment.
    E104,

    /// Accessor name collision.
    ///
    /// Two properties of one type produce the same accessor name. The first
    /// property keeps it; the second is reachable through its other names.
    E105,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E100").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E105 => "E105",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "undefined type",
            ErrorCode::E101 => "malformed list type",
            ErrorCode::E102 => "duplicate type definition",
            ErrorCode::E103 => "circular type alias",
            ErrorCode::E104 => "invalid type name",
            ErrorCode::E105 => "accessor name collision",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
