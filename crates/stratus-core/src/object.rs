//! Schema-typed property containers and their accessors.
//!
//! An [`Object`] is the body of a resource or of a nested property value.
//! Its accessors are driven by the compiled [`ObjectType`] of its schema type:
//! an accessor name (schema name, snake_case alias, or singularized element
//! name) is resolved to the canonical property it addresses, and the
//! property's compiled shape decides which accessors apply to it.
//!
//! All accessors create the slot on first use and hand back the existing
//! slot afterwards, so repeated calls keep configuring the same value.
//!
//! [`ObjectType`]: crate::schema::ObjectType

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    error::TemplateError,
    function::Function,
    identifier::TypeName,
    property::{PropertyValue, ShapeKind},
    reference::References,
    schema::{PropertyShape, Schema},
    value::Value,
};

/// Which accessor table an accessor name is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccessorKind {
    Property,
    Element,
}

/// A set of configured properties, optionally bound to a schema object type.
///
/// Objects without a type (bodies of resources whose type the schema does
/// not declare) accept any property name; the shape of each property is
/// then decided by the first accessor used on it.
#[derive(Debug, Clone)]
pub struct Object {
    schema: Arc<Schema>,
    type_name: Option<TypeName>,
    properties: IndexMap<String, PropertyValue>,
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.properties == other.properties
    }
}

fn default_item(schema: &Arc<Schema>, shape: Option<PropertyShape>) -> Value {
    match shape {
        Some(shape) => Value::default_for(schema, shape.item_type()),
        None => Value::Object(Object::untyped(Arc::clone(schema))),
    }
}

fn expect_shape(
    property: &str,
    shape: Option<PropertyShape>,
    expected: ShapeKind,
) -> Result<(), TemplateError> {
    let actual = match shape {
        Some(PropertyShape::List(_)) => ShapeKind::List,
        Some(PropertyShape::Scalar(_)) => ShapeKind::Scalar,
        None => return Ok(()),
    };
    if actual == expected {
        Ok(())
    } else {
        Err(TemplateError::ShapeMismatch {
            property: property.to_string(),
            expected,
            actual,
        })
    }
}

fn configure_value<F>(accessor: &str, value: &mut Value, f: F) -> Result<(), TemplateError>
where
    F: FnOnce(&mut Object) -> Result<(), TemplateError>,
{
    match value {
        Value::Object(object) => f(object),
        _ => Err(TemplateError::NotAnObject {
            property: accessor.to_string(),
        }),
    }
}

impl Object {
    /// Creates an empty object of the schema type `type_name`.
    pub fn typed(schema: Arc<Schema>, type_name: TypeName) -> Self {
        Self {
            schema,
            type_name: Some(type_name),
            properties: IndexMap::new(),
        }
    }

    /// Creates an empty free-form object.
    pub fn untyped(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            type_name: None,
            properties: IndexMap::new(),
        }
    }

    pub fn type_name(&self) -> Option<TypeName> {
        self.type_name
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Iterates the configured properties in the order they were first accessed.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Resolves an accessor name to the canonical property name and its shape.
    ///
    /// The shape is `None` for untyped objects.
    fn resolve(
        &self,
        accessor: &str,
        kind: AccessorKind,
    ) -> Result<(String, Option<PropertyShape>), TemplateError> {
        let Some(type_name) = self.type_name else {
            return Ok((accessor.to_string(), None));
        };

        let descriptor = self
            .schema
            .object_type(type_name)
            .and_then(|object_type| match kind {
                AccessorKind::Property => object_type.resolve_property_accessor(accessor),
                AccessorKind::Element => object_type.resolve_element_accessor(accessor),
            });

        match (descriptor, kind) {
            (Some(descriptor), _) => Ok((descriptor.name().to_string(), Some(descriptor.shape()))),
            (None, AccessorKind::Property) => Err(TemplateError::UnknownProperty {
                type_name: type_name.to_string(),
                accessor: accessor.to_string(),
            }),
            (None, AccessorKind::Element) => Err(TemplateError::UnknownElement {
                type_name: type_name.to_string(),
                accessor: accessor.to_string(),
            }),
        }
    }

    fn scalar_slot(
        &mut self,
        accessor: &str,
        initial: Option<Value>,
    ) -> Result<&mut Value, TemplateError> {
        let (property, shape) = self.resolve(accessor, AccessorKind::Property)?;
        expect_shape(&property, shape, ShapeKind::Scalar)?;

        let schema = Arc::clone(&self.schema);
        let slot = self
            .properties
            .entry(property.clone())
            .or_insert_with(|| {
                PropertyValue::Scalar(initial.unwrap_or_else(|| default_item(&schema, shape)))
            });

        match slot {
            PropertyValue::Scalar(value) => Ok(value),
            PropertyValue::List(_) | PropertyValue::Expr(_) => Err(TemplateError::ShapeMismatch {
                property,
                expected: ShapeKind::Scalar,
                actual: ShapeKind::List,
            }),
        }
    }

    fn list_slot(
        &mut self,
        accessor: &str,
        kind: AccessorKind,
        initial: Option<Vec<Value>>,
    ) -> Result<(&mut Vec<Value>, Option<PropertyShape>), TemplateError> {
        let (property, shape) = self.resolve(accessor, kind)?;
        expect_shape(&property, shape, ShapeKind::List)?;

        let slot = self
            .properties
            .entry(property.clone())
            .or_insert_with(|| PropertyValue::List(initial.unwrap_or_default()));

        match slot {
            PropertyValue::List(values) => Ok((values, shape)),
            PropertyValue::Expr(_) => Err(TemplateError::ListExpression { property }),
            PropertyValue::Scalar(_) => Err(TemplateError::ShapeMismatch {
                property,
                expected: ShapeKind::List,
                actual: ShapeKind::Scalar,
            }),
        }
    }

    /// Scalar accessor: returns the property's value, creating a default one on first use.
    ///
    /// # Errors
    ///
    /// Fails if the type has no such accessor or the property is a list.
    pub fn property(&mut self, accessor: &str) -> Result<&mut Value, TemplateError> {
        self.scalar_slot(accessor, None)
    }

    /// Scalar accessor with an explicit value.
    ///
    /// The value is only stored if the slot does not exist yet; an existing
    /// slot is returned unchanged.
    pub fn property_or(
        &mut self,
        accessor: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Value, TemplateError> {
        self.scalar_slot(accessor, Some(value.into()))
    }

    /// Replaces the value of a scalar property.
    pub fn set(
        &mut self,
        accessor: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Value, TemplateError> {
        let value = value.into();
        let slot = self.scalar_slot(accessor, None)?;
        *slot = value;
        Ok(slot)
    }

    /// Scalar accessor with a configuration block applied to the nested object.
    ///
    /// # Errors
    ///
    /// Besides the [`Object::property`] errors, fails with
    /// [`TemplateError::NotAnObject`] if the slot holds a non-object value.
    pub fn configure<F>(&mut self, accessor: &str, f: F) -> Result<&mut Value, TemplateError>
    where
        F: FnOnce(&mut Object) -> Result<(), TemplateError>,
    {
        let value = self.scalar_slot(accessor, None)?;
        configure_value(accessor, value, f)?;
        Ok(value)
    }

    /// Plural accessor: returns the list, creating an empty one on first use.
    pub fn list(&mut self, accessor: &str) -> Result<&mut Vec<Value>, TemplateError> {
        self.list_slot(accessor, AccessorKind::Property, None)
            .map(|(values, _)| values)
    }

    /// Plural accessor with explicit values, stored only if the list does not exist yet.
    pub fn list_or(
        &mut self,
        accessor: &str,
        values: Vec<Value>,
    ) -> Result<&mut Vec<Value>, TemplateError> {
        self.list_slot(accessor, AccessorKind::Property, Some(values))
            .map(|(values, _)| values)
    }

    /// Plural accessor with an intrinsic function in place of the elements.
    ///
    /// Replaces whatever the list held before. Element accessors fail with
    /// [`TemplateError::ListExpression`] until the slot is reset through
    /// this method again.
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use stratus_core::{Function, Object, Schema};
    /// let mut subnets = Object::untyped(Arc::new(Schema::default()));
    /// subnets
    ///     .list_expr("SubnetIds", Function::split(",", Function::reference("Subnets")))
    ///     .unwrap();
    /// assert_eq!(
    ///     serde_json::to_string(&subnets).unwrap(),
    ///     r#"{"SubnetIds":{"Fn::Split":[",",{"Ref":"Subnets"}]}}"#
    /// );
    /// ```
    pub fn list_expr(&mut self, accessor: &str, function: Function) -> Result<(), TemplateError> {
        let (property, shape) = self.resolve(accessor, AccessorKind::Property)?;
        expect_shape(&property, shape, ShapeKind::List)?;
        if let Some(PropertyValue::Scalar(_)) = self.properties.get(&property) {
            return Err(TemplateError::ShapeMismatch {
                property,
                expected: ShapeKind::List,
                actual: ShapeKind::Scalar,
            });
        }
        self.properties
            .insert(property, PropertyValue::Expr(Box::new(function)));
        Ok(())
    }

    /// Singular accessor: appends `value` to the list property and returns it.
    pub fn push(
        &mut self,
        accessor: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Value, TemplateError> {
        let (values, _) = self.list_slot(accessor, AccessorKind::Element, None)?;
        let index = values.len();
        values.push(value.into());
        Ok(&mut values[index])
    }

    /// Singular accessor without a value: appends a default element and returns it.
    pub fn push_default(&mut self, accessor: &str) -> Result<&mut Value, TemplateError> {
        let schema = Arc::clone(&self.schema);
        let (values, shape) = self.list_slot(accessor, AccessorKind::Element, None)?;
        let index = values.len();
        values.push(default_item(&schema, shape));
        Ok(&mut values[index])
    }

    /// Singular accessor with a configuration block applied to the new element.
    pub fn push_with<F>(&mut self, accessor: &str, f: F) -> Result<&mut Value, TemplateError>
    where
        F: FnOnce(&mut Object) -> Result<(), TemplateError>,
    {
        let value = self.push_default(accessor)?;
        configure_value(accessor, value, f)?;
        Ok(value)
    }

    /// Looks up a configured property without creating it.
    pub fn get(&self, accessor: &str) -> Option<&PropertyValue> {
        let (property, _) = self.resolve(accessor, AccessorKind::Property).ok()?;
        self.properties.get(&property)
    }
}

/// The builder surface shared by everything that owns an [`Object`].
///
/// Implemented by [`Object`] itself and by [`Resource`](crate::Resource), so
/// resources and nested values are configured through the same accessors.
pub trait Properties {
    fn body(&self) -> &Object;

    fn body_mut(&mut self) -> &mut Object;

    /// See [`Object::property`].
    fn property(&mut self, accessor: &str) -> Result<&mut Value, TemplateError> {
        self.body_mut().property(accessor)
    }

    /// See [`Object::property_or`].
    fn property_or(
        &mut self,
        accessor: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Value, TemplateError> {
        self.body_mut().property_or(accessor, value)
    }

    /// See [`Object::set`].
    fn set(&mut self, accessor: &str, value: impl Into<Value>) -> Result<&mut Value, TemplateError> {
        self.body_mut().set(accessor, value)
    }

    /// See [`Object::configure`].
    fn configure<F>(&mut self, accessor: &str, f: F) -> Result<&mut Value, TemplateError>
    where
        F: FnOnce(&mut Object) -> Result<(), TemplateError>,
    {
        self.body_mut().configure(accessor, f)
    }

    /// See [`Object::list`].
    fn list(&mut self, accessor: &str) -> Result<&mut Vec<Value>, TemplateError> {
        self.body_mut().list(accessor)
    }

    /// See [`Object::list_or`].
    fn list_or(&mut self, accessor: &str, values: Vec<Value>) -> Result<&mut Vec<Value>, TemplateError> {
        self.body_mut().list_or(accessor, values)
    }

    /// See [`Object::list_expr`].
    fn list_expr(&mut self, accessor: &str, function: Function) -> Result<(), TemplateError> {
        self.body_mut().list_expr(accessor, function)
    }

    /// See [`Object::push`].
    fn push(&mut self, accessor: &str, value: impl Into<Value>) -> Result<&mut Value, TemplateError> {
        self.body_mut().push(accessor, value)
    }

    /// See [`Object::push_default`].
    fn push_default(&mut self, accessor: &str) -> Result<&mut Value, TemplateError> {
        self.body_mut().push_default(accessor)
    }

    /// See [`Object::push_with`].
    fn push_with<F>(&mut self, accessor: &str, f: F) -> Result<&mut Value, TemplateError>
    where
        F: FnOnce(&mut Object) -> Result<(), TemplateError>,
    {
        self.body_mut().push_with(accessor, f)
    }

    /// See [`Object::get`].
    fn get(&self, accessor: &str) -> Option<&PropertyValue> {
        self.body().get(accessor)
    }
}

impl Properties for Object {
    fn body(&self) -> &Object {
        self
    }

    fn body_mut(&mut self) -> &mut Object {
        self
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.properties.len()))?;
        for (name, value) in &self.properties {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl References for Object {
    fn collect_references(&self, refs: &mut IndexSet<String>) {
        for value in self.properties.values() {
            value.collect_references(refs);
        }
    }
}
