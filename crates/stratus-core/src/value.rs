//! Property values.
//!
//! [`Value`] is what a property slot holds: a literal, a free-form map, a
//! schema-typed nested [`Object`], or an intrinsic [`Function`] such as `Ref`.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    function::Function,
    identifier::TypeName,
    object::Object,
    reference::References,
    schema::{Schema, TypeDefinition},
};

/// A single property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Bool(bool),
    Integer(i64),
    Number(f64),
    List(Vec<Value>),
    /// Free-form mapping, emitted verbatim.
    Map(IndexMap<String, Value>),
    /// Nested value of a schema object type, configured through its own accessors.
    Object(Object),
    Function(Box<Function>),
}

impl Value {
    /// Creates the default instance of `type_name` within `schema`.
    ///
    /// Primitive types yield their literal default, object types an empty
    /// typed [`Object`]. A name the schema does not know yields an untyped
    /// object that accepts any property.
    pub fn default_for(schema: &Arc<Schema>, type_name: TypeName) -> Self {
        match schema.type_definition(type_name) {
            Some(TypeDefinition::Primitive(kind)) => kind.default_value(),
            Some(TypeDefinition::Object(_)) => {
                Value::Object(Object::typed(Arc::clone(schema), type_name))
            }
            None => Value::Object(Object::untyped(Arc::clone(schema))),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Value::Function(Box::new(function))
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::List(values) => values.serialize(serializer),
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Object(object) => object.serialize(serializer),
            Value::Function(function) => function.serialize(serializer),
        }
    }
}

impl References for Value {
    fn collect_references(&self, refs: &mut IndexSet<String>) {
        match self {
            Value::String(_) | Value::Bool(_) | Value::Integer(_) | Value::Number(_) => {}
            Value::List(values) => values.iter().for_each(|v| v.collect_references(refs)),
            Value::Map(entries) => entries
                .values()
                .for_each(|v| v.collect_references(refs)),
            Value::Object(object) => object.collect_references(refs),
            Value::Function(function) => function.collect_references(refs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_conversions() {
        assert_eq!(Value::from("x"), Value::String("x".to_string()));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(8080), Value::Integer(8080));
        assert_eq!(
            Value::from(vec!["a", "b"]),
            Value::List(vec![Value::from("a"), Value::from("b")])
        );
    }

    #[test]
    fn test_serialize_literals() {
        let mut entries = IndexMap::new();
        entries.insert("Version".to_string(), Value::from("2012-10-17"));
        entries.insert("Enabled".to_string(), Value::from(true));
        let json = serde_json::to_string(&Value::Map(entries)).unwrap();
        assert_eq!(json, r#"{"Version":"2012-10-17","Enabled":true}"#);
    }

    #[test]
    fn test_nested_references() {
        let value = Value::List(vec![
            Value::from("plain"),
            Function::reference("Bucket").into(),
            Value::Map(IndexMap::from([(
                "Queue".to_string(),
                Function::get_att("Queue", "Arn").into(),
            )])),
        ]);
        let refs = value.references();
        assert_eq!(
            refs.into_iter().collect::<Vec<_>>(),
            vec!["Bucket".to_string(), "Queue".to_string()]
        );
    }

    #[test]
    fn test_default_for_unknown_type_is_untyped_object() {
        let schema = Arc::new(Schema::default());
        let value = Value::default_for(&schema, TypeName::new("Custom::Unknown"));
        let object = value.as_object().expect("object default");
        assert!(object.type_name().is_none());
    }
}
