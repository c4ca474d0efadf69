//! The external schema document format.
//!
//! ```json
//! {
//!   "Resources": {
//!     "AWS::EC2::Instance": {
//!       "Properties": { "ImageId": "String", "Tags": ["Tag"] }
//!     }
//!   },
//!   "Types": {
//!     "Tag": { "Key": "String", "Value": "String" },
//!     "AvailabilityZone": "String"
//!   }
//! }
//! ```
//!
//! A property type is either a type name (scalar or nested object property)
//! or a list holding exactly one type name (list property). A `Types` entry is
//! either an alias for another type name or a property map of its own.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A whole schema document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SchemaSource {
    #[serde(default)]
    pub resources: IndexMap<String, ResourceSource>,
    #[serde(default)]
    pub types: IndexMap<String, TypeSource>,
}

impl SchemaSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource type, replacing any previous declaration of the same name.
    pub fn with_resource(
        mut self,
        name: impl Into<String>,
        properties: impl IntoIterator<Item = (String, PropertyTypeRef)>,
    ) -> Self {
        self.resources.insert(
            name.into(),
            ResourceSource {
                properties: properties.into_iter().collect(),
            },
        );
        self
    }

    /// Adds a `Types` entry, replacing any previous entry of the same name.
    pub fn with_type(mut self, name: impl Into<String>, source: TypeSource) -> Self {
        self.types.insert(name.into(), source);
        self
    }
}

/// One entry of `Resources`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceSource {
    #[serde(default)]
    pub properties: IndexMap<String, PropertyTypeRef>,
}

/// The declared type of one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyTypeRef {
    Name(String),
    List(Vec<String>),
}

impl PropertyTypeRef {
    pub fn name(name: impl Into<String>) -> Self {
        PropertyTypeRef::Name(name.into())
    }

    pub fn list(item: impl Into<String>) -> Self {
        PropertyTypeRef::List(vec![item.into()])
    }
}

/// One entry of `Types`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSource {
    /// Another name for an existing type.
    Alias(String),
    /// An object type with its own properties.
    Object(IndexMap<String, PropertyTypeRef>),
}
