//! Declared resources.

use std::sync::Arc;

use indexmap::IndexSet;
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    identifier::TypeName,
    object::{Object, Properties},
    reference::References,
    schema::Schema,
    value::Value,
};

/// One resource instance of a template.
///
/// The resource type is fixed at construction. Resources of a type the schema
/// declares get a typed body with the compiled accessors of that type; any
/// other type name (custom resources) gets a free-form body.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    type_name: TypeName,
    body: Object,
    depends_on: Vec<String>,
    condition: Option<String>,
    deletion_policy: Option<String>,
    update_policy: Option<Value>,
    creation_policy: Option<Value>,
    metadata: Option<Value>,
}

impl Resource {
    pub fn new(schema: Arc<Schema>, type_name: TypeName) -> Self {
        let body = if schema.is_resource_type(type_name) {
            Object::typed(schema, type_name)
        } else {
            Object::untyped(schema)
        };
        Self {
            type_name,
            body,
            depends_on: Vec::new(),
            condition: None,
            deletion_policy: None,
            update_policy: None,
            creation_policy: None,
            metadata: None,
        }
    }

    pub fn type_name(&self) -> TypeName {
        self.type_name
    }

    /// Returns `true` if the body is checked against a schema resource type.
    pub fn is_typed(&self) -> bool {
        self.body.type_name().is_some()
    }

    /// Adds a logical name this resource must be created after.
    ///
    /// Dependencies count as references during validation.
    pub fn depends_on(&mut self, logical_name: impl Into<String>) -> &mut Self {
        let logical_name = logical_name.into();
        if !self.depends_on.contains(&logical_name) {
            self.depends_on.push(logical_name);
        }
        self
    }

    pub fn dependencies(&self) -> &[String] {
        &self.depends_on
    }

    /// Names the template condition that gates the creation of this resource.
    pub fn set_condition(&mut self, condition: impl Into<String>) -> &mut Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    pub fn set_deletion_policy(&mut self, policy: impl Into<String>) -> &mut Self {
        self.deletion_policy = Some(policy.into());
        self
    }

    pub fn deletion_policy(&self) -> Option<&str> {
        self.deletion_policy.as_deref()
    }

    pub fn set_update_policy(&mut self, policy: impl Into<Value>) -> &mut Self {
        self.update_policy = Some(policy.into());
        self
    }

    pub fn set_creation_policy(&mut self, policy: impl Into<Value>) -> &mut Self {
        self.creation_policy = Some(policy.into());
        self
    }

    /// Attaches free-form metadata, emitted verbatim.
    pub fn set_metadata(&mut self, metadata: impl Into<Value>) -> &mut Self {
        self.metadata = Some(metadata.into());
        self
    }

    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }
}

impl Properties for Resource {
    fn body(&self) -> &Object {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Object {
        &mut self.body
    }
}

impl References for Resource {
    fn collect_references(&self, refs: &mut IndexSet<String>) {
        for dependency in &self.depends_on {
            refs.insert(dependency.clone());
        }
        self.body.collect_references(refs);
        for value in [&self.update_policy, &self.creation_policy, &self.metadata]
            .into_iter()
            .flatten()
        {
            value.collect_references(refs);
        }
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("Type", &self.type_name)?;
        if !self.body.is_empty() {
            map.serialize_entry("Properties", &self.body)?;
        }
        match self.depends_on.as_slice() {
            [] => {}
            [single] => map.serialize_entry("DependsOn", single)?,
            many => map.serialize_entry("DependsOn", many)?,
        }
        if let Some(condition) = &self.condition {
            map.serialize_entry("Condition", condition)?;
        }
        if let Some(policy) = &self.deletion_policy {
            map.serialize_entry("DeletionPolicy", policy)?;
        }
        if let Some(policy) = &self.update_policy {
            map.serialize_entry("UpdatePolicy", policy)?;
        }
        if let Some(policy) = &self.creation_policy {
            map.serialize_entry("CreationPolicy", policy)?;
        }
        if let Some(metadata) = &self.metadata {
            map.serialize_entry("Metadata", metadata)?;
        }
        map.end()
    }
}
