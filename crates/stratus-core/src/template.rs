//! The template document and its logical-name registries.
//!
//! Every registry follows the same get-or-create contract: the first mention
//! of a logical name creates the entry, later mentions return the stored entry
//! so it can be configured further. Nothing configured earlier is discarded.

use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, trace};
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    definitions::{Condition, Mapping, Output, Parameter},
    error::TemplateError,
    identifier::TypeName,
    reference::{ReferenceReport, ReferenceValidator},
    resource::Resource,
    schema::Schema,
};

/// Format version emitted when none is set.
pub const DEFAULT_FORMAT_VERSION: &str = "2010-09-09";

/// A template under construction.
///
/// A template owns all of its mutable state; the compiled [`Schema`] is shared
/// read-only with every other template built against it.
#[derive(Debug, Clone)]
pub struct Template {
    schema: Arc<Schema>,
    format_version: String,
    description: Option<String>,
    parameters: IndexMap<String, Parameter>,
    mappings: IndexMap<String, Mapping>,
    conditions: IndexMap<String, Condition>,
    resources: IndexMap<String, Resource>,
    outputs: IndexMap<String, Output>,
}

impl Template {
    /// Creates an empty template against a compiled schema.
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            format_version: DEFAULT_FORMAT_VERSION.to_string(),
            description: None,
            parameters: IndexMap::new(),
            mappings: IndexMap::new(),
            conditions: IndexMap::new(),
            resources: IndexMap::new(),
            outputs: IndexMap::new(),
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn format_version(&self) -> &str {
        &self.format_version
    }

    pub fn set_format_version(&mut self, version: impl Into<String>) -> &mut Self {
        self.format_version = version.into();
        self
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the parameter `name`, creating it on first mention.
    pub fn parameter(&mut self, name: impl Into<String>) -> &mut Parameter {
        self.parameters.entry(name.into()).or_default()
    }

    /// Same as [`Template::parameter`], then applies `f` to the parameter.
    pub fn parameter_with<F>(&mut self, name: impl Into<String>, f: F) -> &mut Parameter
    where
        F: FnOnce(&mut Parameter),
    {
        let parameter = self.parameter(name);
        f(parameter);
        parameter
    }

    /// Returns the mapping `name`, creating it on first mention.
    pub fn mapping(&mut self, name: impl Into<String>) -> &mut Mapping {
        self.mappings.entry(name.into()).or_default()
    }

    pub fn mapping_with<F>(&mut self, name: impl Into<String>, f: F) -> &mut Mapping
    where
        F: FnOnce(&mut Mapping),
    {
        let mapping = self.mapping(name);
        f(mapping);
        mapping
    }

    /// Returns the condition `name`, creating it on first mention.
    pub fn condition(&mut self, name: impl Into<String>) -> &mut Condition {
        self.conditions.entry(name.into()).or_default()
    }

    pub fn condition_with<F>(&mut self, name: impl Into<String>, f: F) -> &mut Condition
    where
        F: FnOnce(&mut Condition),
    {
        let condition = self.condition(name);
        f(condition);
        condition
    }

    /// Returns the output `name`, creating it on first mention.
    pub fn output(&mut self, name: impl Into<String>) -> &mut Output {
        self.outputs.entry(name.into()).or_default()
    }

    pub fn output_with<F>(&mut self, name: impl Into<String>, f: F) -> &mut Output
    where
        F: FnOnce(&mut Output),
    {
        let output = self.output(name);
        f(output);
        output
    }

    /// Returns the resource `name` of type `type_name`, creating it on first mention.
    ///
    /// The type name is taken verbatim: types the schema does not know (custom
    /// resources) are accepted and get a free-form property body.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::TypeMismatch`] if `name` is already declared
    /// with a different type.
    pub fn resource(
        &mut self,
        name: impl Into<String>,
        type_name: &str,
    ) -> Result<&mut Resource, TemplateError> {
        self.register(name.into(), TypeName::new(type_name))
    }

    /// Same as [`Template::resource`], then applies `f` to the resource.
    pub fn resource_with<F>(
        &mut self,
        name: impl Into<String>,
        type_name: &str,
        f: F,
    ) -> Result<&mut Resource, TemplateError>
    where
        F: FnOnce(&mut Resource) -> Result<(), TemplateError>,
    {
        let resource = self.resource(name, type_name)?;
        f(resource)?;
        Ok(resource)
    }

    /// Declares the resource `name` through a resource type of the schema.
    ///
    /// `type_ref` is either the fully-qualified type name or any of its
    /// unambiguous short forms (`S3::Bucket`, `Bucket`).
    ///
    /// # Errors
    ///
    /// Fails if `type_ref` names no schema resource type, if it is a short
    /// form shared by several types, or if `name` is already declared with a
    /// different type.
    pub fn declare(
        &mut self,
        type_ref: &str,
        name: impl Into<String>,
    ) -> Result<&mut Resource, TemplateError> {
        let type_name = self.resolve_resource_type(type_ref)?;
        self.register(name.into(), type_name)
    }

    /// Same as [`Template::declare`], then applies `f` to the resource.
    pub fn declare_with<F>(
        &mut self,
        type_ref: &str,
        name: impl Into<String>,
        f: F,
    ) -> Result<&mut Resource, TemplateError>
    where
        F: FnOnce(&mut Resource) -> Result<(), TemplateError>,
    {
        let resource = self.declare(type_ref, name)?;
        f(resource)?;
        Ok(resource)
    }

    fn resolve_resource_type(&self, type_ref: &str) -> Result<TypeName, TemplateError> {
        if let Some(type_name) = self.schema.resolve_resource_type(type_ref) {
            return Ok(type_name);
        }
        match self.schema.ambiguous_candidates(type_ref) {
            Some(candidates) => Err(TemplateError::AmbiguousResourceType {
                name: type_ref.to_string(),
                candidates: candidates.iter().map(TypeName::as_string).collect(),
            }),
            None => Err(TemplateError::UnknownResourceType(type_ref.to_string())),
        }
    }

    fn register(&mut self, name: String, type_name: TypeName) -> Result<&mut Resource, TemplateError> {
        if let Some(existing) = self.resources.get(&name) {
            if existing.type_name() != type_name {
                return Err(TemplateError::TypeMismatch {
                    logical_name: name,
                    existing: existing.type_name().to_string(),
                    requested: type_name.to_string(),
                });
            }
        }

        let schema = &self.schema;
        let resource = self.resources.entry(name).or_insert_with_key(|name| {
            trace!(name = name.as_str(), type_name:%; "Registered resource");
            Resource::new(Arc::clone(schema), type_name)
        });
        Ok(resource)
    }

    pub fn get_parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    pub fn get_mapping(&self, name: &str) -> Option<&Mapping> {
        self.mappings.get(name)
    }

    pub fn get_condition(&self, name: &str) -> Option<&Condition> {
        self.conditions.get(name)
    }

    pub fn get_resource(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    pub fn get_output(&self, name: &str) -> Option<&Output> {
        self.outputs.get(name)
    }

    pub fn parameters(&self) -> impl Iterator<Item = (&str, &Parameter)> {
        self.parameters.iter().map(|(name, p)| (name.as_str(), p))
    }

    pub fn mappings(&self) -> impl Iterator<Item = (&str, &Mapping)> {
        self.mappings.iter().map(|(name, m)| (name.as_str(), m))
    }

    pub fn conditions(&self) -> impl Iterator<Item = (&str, &Condition)> {
        self.conditions.iter().map(|(name, c)| (name.as_str(), c))
    }

    /// Iterates the resources in declaration order.
    pub fn resources(&self) -> impl Iterator<Item = (&str, &Resource)> {
        self.resources.iter().map(|(name, r)| (name.as_str(), r))
    }

    pub fn outputs(&self) -> impl Iterator<Item = (&str, &Output)> {
        self.outputs.iter().map(|(name, o)| (name.as_str(), o))
    }

    /// Validates every reference of the template.
    ///
    /// Returns the violation messages in order, or `None` if every reference
    /// is valid.
    pub fn check_refs(&self) -> Option<Vec<String>> {
        self.reference_report().messages()
    }

    /// Validates every reference and returns the reference tables with the violations.
    pub fn reference_report(&self) -> ReferenceReport {
        debug!(
            resources = self.resources.len(),
            outputs = self.outputs.len();
            "Checking template references"
        );
        ReferenceValidator::new(self).check()
    }
}

impl Serialize for Template {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("AWSTemplateFormatVersion", &self.format_version)?;
        if let Some(description) = &self.description {
            map.serialize_entry("Description", description)?;
        }
        if !self.parameters.is_empty() {
            map.serialize_entry("Parameters", &self.parameters)?;
        }
        if !self.mappings.is_empty() {
            map.serialize_entry("Mappings", &self.mappings)?;
        }
        if !self.conditions.is_empty() {
            map.serialize_entry("Conditions", &self.conditions)?;
        }
        map.serialize_entry("Resources", &self.resources)?;
        if !self.outputs.is_empty() {
            map.serialize_entry("Outputs", &self.outputs)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{function::Function, object::Properties, test_support::sample_schema, value::Value};

    #[test]
    fn test_resource_get_or_create_keeps_configuration() {
        let mut template = Template::new(sample_schema());
        template
            .declare("S3::Bucket", "Logs")
            .unwrap()
            .set("BucketName", "logs")
            .unwrap();
        template
            .declare_with("Bucket", "Logs", |bucket| {
                bucket.set_deletion_policy("Retain");
                Ok(())
            })
            .unwrap();

        let bucket = template.get_resource("Logs").unwrap();
        assert_eq!(bucket.deletion_policy(), Some("Retain"));
        assert_eq!(
            bucket.get("BucketName").and_then(|p| p.as_scalar()),
            Some(&Value::from("logs"))
        );
        assert_eq!(template.resources().count(), 1);
    }

    #[test]
    fn test_declare_resolves_every_unambiguous_form() {
        let mut template = Template::new(sample_schema());
        for (type_ref, name) in [
            ("AWS::EC2::Instance", "A"),
            ("EC2::Instance", "B"),
            ("Instance", "C"),
        ] {
            let resource = template.declare(type_ref, name).unwrap();
            assert_eq!(resource.type_name(), "AWS::EC2::Instance");
        }
    }

    #[test]
    fn test_declare_rejects_ambiguous_and_unknown_types() {
        let mut template = Template::new(sample_schema());
        let err = template.declare("SecurityGroup", "Sg").unwrap_err();
        assert_eq!(
            err,
            TemplateError::AmbiguousResourceType {
                name: "SecurityGroup".to_string(),
                candidates: vec![
                    "AWS::EC2::SecurityGroup".to_string(),
                    "AWS::RDS::SecurityGroup".to_string(),
                ],
            }
        );

        let err = template.declare("Nope", "X").unwrap_err();
        assert_eq!(err, TemplateError::UnknownResourceType("Nope".to_string()));
        assert!(template.get_resource("Sg").is_none());
    }

    #[test]
    fn test_type_mismatch_is_rejected() {
        let mut template = Template::new(sample_schema());
        template.declare("Bucket", "Thing").unwrap();
        let err = template.declare("Instance", "Thing").unwrap_err();
        assert_eq!(
            err,
            TemplateError::TypeMismatch {
                logical_name: "Thing".to_string(),
                existing: "AWS::S3::Bucket".to_string(),
                requested: "AWS::EC2::Instance".to_string(),
            }
        );
        assert_eq!(
            template.get_resource("Thing").unwrap().type_name(),
            "AWS::S3::Bucket"
        );
    }

    #[test]
    fn test_custom_resource_through_generic_path() {
        let mut template = Template::new(sample_schema());
        template
            .resource_with("Seeder", "Custom::Seeder", |seeder| {
                seeder.set("ServiceToken", Function::get_att("SeederFn", "Arn"))?;
                seeder.push("Tables", "users")?;
                Ok(())
            })
            .unwrap();
        let seeder = template.get_resource("Seeder").unwrap();
        assert!(!seeder.is_typed());
    }

    #[test]
    fn test_definition_registries_are_idempotent() {
        let mut template = Template::new(sample_schema());
        template.parameter("Env").set_description("Environment");
        template.parameter_with("Env", |env| {
            env.allow_value("dev").allow_value("prod");
        });
        let env = template.get_parameter("Env").unwrap();
        assert_eq!(env.description(), Some("Environment"));
        assert_eq!(env.allowed_values().len(), 2);

        template.mapping("Amis").set("us-east-1", "Ami", "ami-1");
        template.mapping_with("Amis", |amis| {
            amis.set("eu-west-1", "Ami", "ami-2");
        });
        assert!(template.get_mapping("Amis").unwrap().get("us-east-1", "Ami").is_some());
        assert!(template.get_mapping("Amis").unwrap().get("eu-west-1", "Ami").is_some());

        template
            .condition("IsProd")
            .set_expression(Function::equals(Function::reference("Env"), "prod"));
        template.condition_with("IsProd", |_| {});
        assert!(template.get_condition("IsProd").unwrap().expression().is_some());

        template.output("Out").set_description("first");
        template.output_with("Out", |out| {
            out.set_value("v");
        });
        assert_eq!(template.get_output("Out").unwrap().value(), Some(&Value::from("v")));
        assert_eq!(template.outputs().count(), 1);
    }

    #[test]
    fn test_serialize_minimal_template() {
        let template = Template::new(sample_schema());
        assert_eq!(
            serde_json::to_string(&template).unwrap(),
            r#"{"AWSTemplateFormatVersion":"2010-09-09","Resources":{}}"#
        );
    }

    #[test]
    fn test_serialize_section_order() {
        let mut template = Template::new(sample_schema());
        template.output("Name").set_value(Function::reference("Bucket"));
        template.declare("Bucket", "Bucket").unwrap();
        template.parameter("Env");
        template.set_description("demo");

        let json = serde_json::to_string(&template).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"AWSTemplateFormatVersion":"2010-09-09","Description":"demo","#,
                r#""Parameters":{"Env":{"Type":"String"}},"#,
                r#""Resources":{"Bucket":{"Type":"AWS::S3::Bucket"}},"#,
                r#""Outputs":{"Name":{"Value":{"Ref":"Bucket"}}}}"#
            )
        );
    }

    #[test]
    fn test_list_properties_serialize_with_schema_names() {
        let mut template = Template::new(sample_schema());
        template
            .declare_with("Instance", "Web", |web| {
                web.push("security_group", "sg-1")?;
                web.push_with("tag", |tag| {
                    tag.set("Key", "Name")?;
                    tag.set("Value", "web")?;
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap();

        let json = serde_json::to_value(&template).unwrap();
        assert_eq!(
            json["Resources"]["Web"]["Properties"],
            serde_json::json!({
                "SecurityGroups": ["sg-1"],
                "Tags": [{"Key": "Name", "Value": "web"}],
            })
        );
    }
}
