//! Compiled schema descriptors.
//!
//! A [`Schema`] is the immutable output of the schema compiler: one
//! [`TypeDefinition`] per type name, the set of resource types, and the
//! abbreviation table used by the short-form resource constructors. It is
//! built once per type schema and shared (behind an `Arc`) by every template
//! constructed against it.
//!
//! The builder surface of a resource type is not a set of generated methods
//! but the accessor tables of its [`ObjectType`]: every accessor name maps to
//! the canonical schema property it addresses, and each property carries a
//! [`PropertyShape`] tag decided at compile time.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::{identifier::TypeName, value::Value};

/// Leaf types that carry literal values instead of nested properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Boolean,
    Integer,
    Number,
    /// Free-form JSON document (policy documents, metadata, ...).
    Json,
}

impl PrimitiveKind {
    /// Returns the value an accessor creates when called without a value.
    pub fn default_value(&self) -> Value {
        match self {
            PrimitiveKind::String => Value::String(String::new()),
            PrimitiveKind::Boolean => Value::Bool(false),
            PrimitiveKind::Integer => Value::Integer(0),
            PrimitiveKind::Number => Value::Number(0.0),
            PrimitiveKind::Json => Value::Map(IndexMap::new()),
        }
    }
}

/// Whether a property holds one value or an ordered list of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyShape {
    Scalar(TypeName),
    List(TypeName),
}

impl PropertyShape {
    /// The type of the value (or of each list element).
    pub fn item_type(&self) -> TypeName {
        match self {
            PropertyShape::Scalar(item) | PropertyShape::List(item) => *item,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, PropertyShape::List(_))
    }
}

/// A single compiled property of an object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    name: String,
    shape: PropertyShape,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, shape: PropertyShape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }

    /// The property name exactly as declared in the schema.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> PropertyShape {
        self.shape
    }
}

/// Compiled property list and accessor tables of an object or resource type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectType {
    properties: IndexMap<String, PropertyDescriptor>,
    /// Accessor name -> property name, for scalar and plural accessors.
    property_accessors: IndexMap<String, String>,
    /// Accessor name -> property name, for singular list-element accessors.
    element_accessors: IndexMap<String, String>,
}

impl ObjectType {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a property descriptor, replacing any previous one with the same name.
    pub fn add_property(&mut self, descriptor: PropertyDescriptor) {
        self.properties
            .insert(descriptor.name().to_string(), descriptor);
    }

    /// Binds `accessor` to `property`.
    ///
    /// # Errors
    ///
    /// Returns the property that already owns the accessor name if it is
    /// bound to a different property. The existing binding is kept.
    pub fn add_property_accessor(
        &mut self,
        accessor: impl Into<String>,
        property: &str,
    ) -> Result<(), String> {
        Self::bind(&mut self.property_accessors, accessor.into(), property)
    }

    /// Binds the singular `accessor` to the list property `property`.
    ///
    /// # Errors
    ///
    /// Same collision rule as [`ObjectType::add_property_accessor`].
    pub fn add_element_accessor(
        &mut self,
        accessor: impl Into<String>,
        property: &str,
    ) -> Result<(), String> {
        Self::bind(&mut self.element_accessors, accessor.into(), property)
    }

    fn bind(
        table: &mut IndexMap<String, String>,
        accessor: String,
        property: &str,
    ) -> Result<(), String> {
        match table.get(&accessor) {
            Some(existing) if existing != property => Err(existing.clone()),
            Some(_) => Ok(()),
            None => {
                table.insert(accessor, property.to_string());
                Ok(())
            }
        }
    }

    /// Looks up a property by its schema name.
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    /// Iterates the properties in schema declaration order.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.values()
    }

    /// Resolves a scalar or plural accessor name to its property.
    pub fn resolve_property_accessor(&self, accessor: &str) -> Option<&PropertyDescriptor> {
        self.property_accessors
            .get(accessor)
            .and_then(|property| self.properties.get(property))
    }

    /// Resolves a singular element accessor name to its list property.
    pub fn resolve_element_accessor(&self, accessor: &str) -> Option<&PropertyDescriptor> {
        self.element_accessors
            .get(accessor)
            .and_then(|property| self.properties.get(property))
    }

    /// Iterates `(accessor, property)` pairs of the scalar and plural accessors.
    pub fn property_accessors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.property_accessors
            .iter()
            .map(|(accessor, property)| (accessor.as_str(), property.as_str()))
    }

    /// Iterates `(accessor, property)` pairs of the singular element accessors.
    pub fn element_accessors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.element_accessors
            .iter()
            .map(|(accessor, property)| (accessor.as_str(), property.as_str()))
    }
}

/// A compiled type: either a primitive leaf or an object with properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDefinition {
    Primitive(PrimitiveKind),
    Object(ObjectType),
}

/// The immutable result of compiling one type schema.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    types: IndexMap<TypeName, TypeDefinition>,
    resource_types: IndexSet<TypeName>,
    abbreviations: IndexMap<String, TypeName>,
    ambiguous: IndexMap<String, Vec<TypeName>>,
}

impl Schema {
    /// Assembles a compiled schema.
    ///
    /// # Arguments
    ///
    /// * `types` - Every type of the namespace, resources included.
    /// * `resource_types` - The names in `types` that are resource types.
    /// * `abbreviations` - Unambiguous short form -> resource type.
    /// * `ambiguous` - Short forms claimed by more than one resource type.
    pub fn new(
        types: IndexMap<TypeName, TypeDefinition>,
        resource_types: IndexSet<TypeName>,
        abbreviations: IndexMap<String, TypeName>,
        ambiguous: IndexMap<String, Vec<TypeName>>,
    ) -> Self {
        Self {
            types,
            resource_types,
            abbreviations,
            ambiguous,
        }
    }

    pub fn type_definition(&self, name: TypeName) -> Option<&TypeDefinition> {
        self.types.get(&name)
    }

    /// Returns the object type for `name`, or `None` for primitives and unknown names.
    pub fn object_type(&self, name: TypeName) -> Option<&ObjectType> {
        match self.types.get(&name) {
            Some(TypeDefinition::Object(object)) => Some(object),
            _ => None,
        }
    }

    pub fn is_resource_type(&self, name: TypeName) -> bool {
        self.resource_types.contains(&name)
    }

    /// Iterates the resource types in schema declaration order.
    pub fn resource_types(&self) -> impl Iterator<Item = TypeName> + '_ {
        self.resource_types.iter().copied()
    }

    /// Number of types in the namespace, primitives included.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// The unambiguous short forms and the resource type each one denotes.
    pub fn abbreviations(&self) -> &IndexMap<String, TypeName> {
        &self.abbreviations
    }

    /// Short forms of `type_name` that resolve back to it, least abbreviated first.
    pub fn abbreviations_of(&self, type_name: TypeName) -> Vec<&str> {
        self.abbreviations
            .iter()
            .filter(|(_, target)| **target == type_name)
            .map(|(short, _)| short.as_str())
            .collect()
    }

    /// Creates the default instance of `type_name`, see [`Value::default_for`].
    pub fn default_value(schema: &Arc<Self>, type_name: TypeName) -> Value {
        Value::default_for(schema, type_name)
    }

    /// The resource types sharing the short form `name`, if it is ambiguous.
    pub fn ambiguous_candidates(&self, name: &str) -> Option<&[TypeName]> {
        self.ambiguous.get(name).map(Vec::as_slice)
    }

    /// Resolves a resource type from its fully-qualified name or an unambiguous short form.
    ///
    /// The fully-qualified name always wins, even when the same text is also an
    /// ambiguous short form of some other type.
    pub fn resolve_resource_type(&self, name: &str) -> Option<TypeName> {
        let exact = TypeName::new(name);
        if self.resource_types.contains(&exact) {
            return Some(exact);
        }
        self.abbreviations.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> Schema {
        let mut types = IndexMap::new();
        types.insert(
            TypeName::new("String"),
            TypeDefinition::Primitive(PrimitiveKind::String),
        );
        let mut bucket = ObjectType::new();
        bucket.add_property(PropertyDescriptor::new(
            "BucketName",
            PropertyShape::Scalar(TypeName::new("String")),
        ));
        bucket.add_property_accessor("BucketName", "BucketName").unwrap();
        let bucket_name = TypeName::new("AWS::S3::Bucket");
        types.insert(bucket_name, TypeDefinition::Object(bucket));

        let mut abbreviations = IndexMap::new();
        abbreviations.insert("AWS::S3::Bucket".to_string(), bucket_name);
        abbreviations.insert("S3::Bucket".to_string(), bucket_name);

        let mut ambiguous = IndexMap::new();
        ambiguous.insert(
            "Bucket".to_string(),
            vec![bucket_name, TypeName::new("Other::Bucket")],
        );

        Schema::new(types, IndexSet::from([bucket_name]), abbreviations, ambiguous)
    }

    #[test]
    fn test_resolve_resource_type() {
        let schema = sample_schema();
        assert_eq!(
            schema.resolve_resource_type("S3::Bucket"),
            Some(TypeName::new("AWS::S3::Bucket"))
        );
        assert_eq!(
            schema.resolve_resource_type("AWS::S3::Bucket"),
            Some(TypeName::new("AWS::S3::Bucket"))
        );
        assert_eq!(schema.resolve_resource_type("Bucket"), None);
        assert_eq!(schema.ambiguous_candidates("Bucket").map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_object_type_lookup() {
        let schema = sample_schema();
        assert!(schema.object_type(TypeName::new("AWS::S3::Bucket")).is_some());
        assert!(schema.object_type(TypeName::new("String")).is_none());
        assert!(schema.is_resource_type(TypeName::new("AWS::S3::Bucket")));
        assert!(!schema.is_resource_type(TypeName::new("String")));
    }

    #[test]
    fn test_accessor_collision_keeps_first_binding() {
        let mut object = ObjectType::new();
        object.add_property(PropertyDescriptor::new(
            "VpcId",
            PropertyShape::Scalar(TypeName::new("String")),
        ));
        object.add_property(PropertyDescriptor::new(
            "VPCId",
            PropertyShape::Scalar(TypeName::new("String")),
        ));
        assert!(object.add_property_accessor("vpc_id", "VpcId").is_ok());
        assert_eq!(
            object.add_property_accessor("vpc_id", "VPCId"),
            Err("VpcId".to_string())
        );
        assert_eq!(
            object.resolve_property_accessor("vpc_id").map(|d| d.name()),
            Some("VpcId")
        );
    }

    #[test]
    fn test_abbreviations_of() {
        let schema = sample_schema();
        assert_eq!(
            schema.abbreviations_of(TypeName::new("AWS::S3::Bucket")),
            vec!["AWS::S3::Bucket", "S3::Bucket"]
        );
    }

    #[test]
    fn test_primitive_defaults() {
        assert_eq!(
            PrimitiveKind::String.default_value(),
            Value::String(String::new())
        );
        assert_eq!(PrimitiveKind::Boolean.default_value(), Value::Bool(false));
        assert_eq!(PrimitiveKind::Integer.default_value(), Value::Integer(0));
        assert_eq!(
            PrimitiveKind::Json.default_value(),
            Value::Map(IndexMap::new())
        );
    }
}
