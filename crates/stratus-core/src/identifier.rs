//! Type name management using string interning for cheap copies and comparison
//!
//! This module provides the [`TypeName`] type. Fully-qualified schema type
//! names such as `AWS::EC2::Instance` are referenced from every compiled
//! property descriptor and every typed value, so they are interned once and
//! passed around as a `Copy` symbol.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use serde::{Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Separator between the namespace segments of a type name.
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Global string interner for type names.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner. Compiled
/// schemas are shared across threads, so every [`TypeName`] must resolve from
/// any thread.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock");
    f(&mut interner)
}

/// Interned, fully-qualified schema type name.
///
/// # Examples
///
/// ```
/// use stratus_core::identifier::TypeName;
///
/// let instance = TypeName::new("AWS::EC2::Instance");
/// assert_eq!(instance, "AWS::EC2::Instance");
/// assert_eq!(instance.segments(), vec!["AWS", "EC2", "Instance"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeName(DefaultSymbol);

impl TypeName {
    /// Creates a `TypeName` from &str.
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }

    /// Returns an owned copy of the type name text.
    pub fn as_string(&self) -> String {
        with_interner(|interner| {
            interner
                .resolve(self.0)
                .expect("Symbol should exist in interner")
                .to_string()
        })
    }

    /// Splits the name into its `::`-separated namespace segments.
    pub fn segments(&self) -> Vec<String> {
        self.as_string()
            .split(NAMESPACE_SEPARATOR)
            .map(str::to_string)
            .collect()
    }

    /// Returns every suffix obtained by dropping leading namespace segments.
    ///
    /// The full name comes first and the bare final segment comes last.
    ///
    /// ```
    /// use stratus_core::identifier::TypeName;
    ///
    /// let name = TypeName::new("AWS::EC2::Instance");
    /// assert_eq!(
    ///     name.suffixes(),
    ///     vec!["AWS::EC2::Instance", "EC2::Instance", "Instance"]
    /// );
    /// ```
    pub fn suffixes(&self) -> Vec<String> {
        let segments = self.segments();
        (0..segments.len())
            .map(|start| segments[start..].join(NAMESPACE_SEPARATOR))
            .collect()
    }

    /// Returns `true` if the name has no empty namespace segment.
    pub fn is_well_formed(&self) -> bool {
        self.segments().iter().all(|segment| !segment.is_empty())
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for TypeName {
    /// Allows direct comparison with string slices: `name == "AWS::S3::Bucket"`
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| interner.resolve(self.0) == Some(other))
    }
}

impl PartialEq<&str> for TypeName {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for TypeName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_string())
    }
}
