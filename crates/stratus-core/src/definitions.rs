//! Parameter, output, mapping and condition definitions.
//!
//! These are the non-resource content objects of a template. Like resources
//! they are created on first mention of their logical name and configured
//! further on every later mention.

use indexmap::{IndexMap, IndexSet};
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{reference::References, value::Value};

/// Parameter type used when none is set.
pub const DEFAULT_PARAMETER_TYPE: &str = "String";

/// A template input parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    #[serde(rename = "Type")]
    parameter_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    no_echo: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    allowed_values: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    allowed_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    constraint_description: Option<String>,
}

impl Default for Parameter {
    fn default() -> Self {
        Self {
            parameter_type: DEFAULT_PARAMETER_TYPE.to_string(),
            default: None,
            no_echo: None,
            allowed_values: Vec::new(),
            allowed_pattern: None,
            min_length: None,
            max_length: None,
            min_value: None,
            max_value: None,
            description: None,
            constraint_description: None,
        }
    }
}

impl Parameter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parameter_type(&self) -> &str {
        &self.parameter_type
    }

    pub fn set_type(&mut self, parameter_type: impl Into<String>) -> &mut Self {
        self.parameter_type = parameter_type.into();
        self
    }

    pub fn string(&mut self) -> &mut Self {
        self.set_type("String")
    }

    pub fn number(&mut self) -> &mut Self {
        self.set_type("Number")
    }

    pub fn comma_delimited_list(&mut self) -> &mut Self {
        self.set_type("CommaDelimitedList")
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn set_default(&mut self, value: impl Into<Value>) -> &mut Self {
        self.default = Some(value.into());
        self
    }

    pub fn set_no_echo(&mut self, no_echo: bool) -> &mut Self {
        self.no_echo = Some(no_echo);
        self
    }

    pub fn allow_value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.allowed_values.push(value.into());
        self
    }

    pub fn allowed_values(&self) -> &[Value] {
        &self.allowed_values
    }

    pub fn set_allowed_pattern(&mut self, pattern: impl Into<String>) -> &mut Self {
        self.allowed_pattern = Some(pattern.into());
        self
    }

    pub fn set_length_range(&mut self, min: Option<u64>, max: Option<u64>) -> &mut Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    pub fn set_value_range(&mut self, min: Option<f64>, max: Option<f64>) -> &mut Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_constraint_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.constraint_description = Some(description.into());
        self
    }
}

/// A template output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Output {
    value: Option<Value>,
    description: Option<String>,
    condition: Option<String>,
    export: Option<Value>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.value = Some(value.into());
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn set_condition(&mut self, condition: impl Into<String>) -> &mut Self {
        self.condition = Some(condition.into());
        self
    }

    /// Exports the output under `name` for cross-stack `Fn::ImportValue`.
    pub fn set_export(&mut self, name: impl Into<Value>) -> &mut Self {
        self.export = Some(name.into());
        self
    }
}

impl References for Output {
    fn collect_references(&self, refs: &mut IndexSet<String>) {
        if let Some(value) = &self.value {
            value.collect_references(refs);
        }
        if let Some(export) = &self.export {
            export.collect_references(refs);
        }
    }
}

impl Serialize for Output {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(value) = &self.value {
            map.serialize_entry("Value", value)?;
        }
        if let Some(description) = &self.description {
            map.serialize_entry("Description", description)?;
        }
        if let Some(condition) = &self.condition {
            map.serialize_entry("Condition", condition)?;
        }
        if let Some(export) = &self.export {
            let mut export_map = IndexMap::new();
            export_map.insert("Name", export);
            map.serialize_entry("Export", &export_map)?;
        }
        map.end()
    }
}

/// A two-level lookup table used by `Fn::FindInMap`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Mapping {
    entries: IndexMap<String, IndexMap<String, Value>>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `entries[top_key][second_key]`, keeping earlier keys in place.
    pub fn set(
        &mut self,
        top_key: impl Into<String>,
        second_key: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.entries
            .entry(top_key.into())
            .or_default()
            .insert(second_key.into(), value.into());
        self
    }

    pub fn get(&self, top_key: &str, second_key: &str) -> Option<&Value> {
        self.entries
            .get(top_key)
            .and_then(|second| second.get(second_key))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A named boolean condition built from condition functions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    expression: Option<Value>,
}

impl Condition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_expression(&mut self, expression: impl Into<Value>) -> &mut Self {
        self.expression = Some(expression.into());
        self
    }

    pub fn expression(&self) -> Option<&Value> {
        self.expression.as_ref()
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.expression {
            Some(expression) => expression.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::Function;

    #[test]
    fn test_parameter_serialization() {
        let mut parameter = Parameter::new();
        parameter
            .number()
            .set_default(3)
            .allow_value(1)
            .allow_value(3)
            .set_description("Instance count");
        let json = serde_json::to_string(&parameter).unwrap();
        assert_eq!(
            json,
            r#"{"Type":"Number","Default":3,"AllowedValues":[1,3],"Description":"Instance count"}"#
        );
    }

    #[test]
    fn test_parameter_default_type() {
        let json = serde_json::to_string(&Parameter::new()).unwrap();
        assert_eq!(json, r#"{"Type":"String"}"#);
    }

    #[test]
    fn test_output_references_and_export() {
        let mut output = Output::new();
        output
            .set_value(Function::get_att("Queue", "Arn"))
            .set_export(Function::sub("${AWS::StackName}-queue"));

        let refs: Vec<_> = output.references().into_iter().collect();
        assert_eq!(refs, vec!["Queue", "AWS::StackName"]);

        let json = serde_json::to_string(&output).unwrap();
        assert_eq!(
            json,
            r#"{"Value":{"Fn::GetAtt":["Queue","Arn"]},"Export":{"Name":{"Fn::Sub":"${AWS::StackName}-queue"}}}"#
        );
    }

    #[test]
    fn test_mapping_merges_keys() {
        let mut mapping = Mapping::new();
        mapping
            .set("us-east-1", "Ami", "ami-1")
            .set("us-east-1", "Type", "t3.micro")
            .set("eu-west-1", "Ami", "ami-2");
        assert_eq!(mapping.get("us-east-1", "Type"), Some(&Value::from("t3.micro")));
        assert_eq!(
            serde_json::to_string(&mapping).unwrap(),
            r#"{"us-east-1":{"Ami":"ami-1","Type":"t3.micro"},"eu-west-1":{"Ami":"ami-2"}}"#
        );
    }

    #[test]
    fn test_condition_serializes_expression() {
        let mut condition = Condition::new();
        condition.set_expression(Function::equals(Function::reference("Env"), "prod"));
        assert_eq!(
            serde_json::to_string(&condition).unwrap(),
            r#"{"Fn::Equals":[{"Ref":"Env"},"prod"]}"#
        );
    }
}
