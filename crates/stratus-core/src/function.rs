//! Intrinsic functions.
//!
//! Functions are the only place where a template mentions other logical
//! names, so they are what the reference validator ultimately walks. Each
//! variant serializes to the single-key object form of the document format,
//! e.g. `{"Ref": "Bucket"}` or `{"Fn::GetAtt": ["Queue", "Arn"]}`.

use indexmap::{IndexMap, IndexSet};
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{reference::References, value::Value};

/// An intrinsic function call.
#[derive(Debug, Clone, PartialEq)]
pub enum Function {
    /// `Ref`: the value of a parameter, resource or pseudo-parameter.
    Ref(String),
    /// `Fn::GetAtt`: an attribute of a resource.
    GetAtt { resource: String, attribute: String },
    Join { delimiter: String, values: Vec<Value> },
    Select { index: Value, list: Value },
    Split { delimiter: String, source: Value },
    Base64(Value),
    /// `Fn::FindInMap`: a value from the template's `Mappings` section.
    FindInMap {
        map: String,
        top_key: Value,
        second_key: Value,
    },
    GetAzs(Value),
    /// `Fn::If`: `condition` names an entry of the `Conditions` section.
    If {
        condition: String,
        if_true: Value,
        if_false: Value,
    },
    Equals(Value, Value),
    And(Vec<Value>),
    Or(Vec<Value>),
    Not(Value),
    /// `Fn::Sub`: string substitution of `${Name}` placeholders.
    Sub {
        template: String,
        variables: IndexMap<String, Value>,
    },
    ImportValue(Value),
    /// `Condition`: reference to a named condition inside condition expressions.
    Condition(String),
}

impl Function {
    pub fn reference(name: impl Into<String>) -> Self {
        Function::Ref(name.into())
    }

    pub fn get_att(resource: impl Into<String>, attribute: impl Into<String>) -> Self {
        Function::GetAtt {
            resource: resource.into(),
            attribute: attribute.into(),
        }
    }

    pub fn join(delimiter: impl Into<String>, values: Vec<Value>) -> Self {
        Function::Join {
            delimiter: delimiter.into(),
            values,
        }
    }

    pub fn select(index: impl Into<Value>, list: impl Into<Value>) -> Self {
        Function::Select {
            index: index.into(),
            list: list.into(),
        }
    }

    pub fn split(delimiter: impl Into<String>, source: impl Into<Value>) -> Self {
        Function::Split {
            delimiter: delimiter.into(),
            source: source.into(),
        }
    }

    pub fn base64(value: impl Into<Value>) -> Self {
        Function::Base64(value.into())
    }

    pub fn find_in_map(
        map: impl Into<String>,
        top_key: impl Into<Value>,
        second_key: impl Into<Value>,
    ) -> Self {
        Function::FindInMap {
            map: map.into(),
            top_key: top_key.into(),
            second_key: second_key.into(),
        }
    }

    pub fn get_azs(region: impl Into<Value>) -> Self {
        Function::GetAzs(region.into())
    }

    pub fn if_(
        condition: impl Into<String>,
        if_true: impl Into<Value>,
        if_false: impl Into<Value>,
    ) -> Self {
        Function::If {
            condition: condition.into(),
            if_true: if_true.into(),
            if_false: if_false.into(),
        }
    }

    pub fn equals(left: impl Into<Value>, right: impl Into<Value>) -> Self {
        Function::Equals(left.into(), right.into())
    }

    pub fn and(conditions: Vec<Value>) -> Self {
        Function::And(conditions)
    }

    pub fn or(conditions: Vec<Value>) -> Self {
        Function::Or(conditions)
    }

    pub fn not(condition: impl Into<Value>) -> Self {
        Function::Not(condition.into())
    }

    pub fn sub(template: impl Into<String>) -> Self {
        Function::Sub {
            template: template.into(),
            variables: IndexMap::new(),
        }
    }

    pub fn sub_with(template: impl Into<String>, variables: IndexMap<String, Value>) -> Self {
        Function::Sub {
            template: template.into(),
            variables,
        }
    }

    pub fn import_value(name: impl Into<Value>) -> Self {
        Function::ImportValue(name.into())
    }

    pub fn condition(name: impl Into<String>) -> Self {
        Function::Condition(name.into())
    }

    /// The document key of this function, e.g. `Fn::Join`.
    pub fn key(&self) -> &'static str {
        match self {
            Function::Ref(_) => "Ref",
            Function::GetAtt { .. } => "Fn::GetAtt",
            Function::Join { .. } => "Fn::Join",
            Function::Select { .. } => "Fn::Select",
            Function::Split { .. } => "Fn::Split",
            Function::Base64(_) => "Fn::Base64",
            Function::FindInMap { .. } => "Fn::FindInMap",
            Function::GetAzs(_) => "Fn::GetAZs",
            Function::If { .. } => "Fn::If",
            Function::Equals(..) => "Fn::Equals",
            Function::And(_) => "Fn::And",
            Function::Or(_) => "Fn::Or",
            Function::Not(_) => "Fn::Not",
            Function::Sub { .. } => "Fn::Sub",
            Function::ImportValue(_) => "Fn::ImportValue",
            Function::Condition(_) => "Condition",
        }
    }
}

/// Extracts the logical names mentioned by `${...}` placeholders.
///
/// `${!Literal}` is an escape and `${Name.Attr}` refers to `Name`.
/// `${AWS::...}` names a pseudo parameter, including ones such as
/// `AWS::Partition` that `Ref` validation does not list, and is skipped.
fn sub_placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        let inner = &after[..end];
        if !inner.starts_with('!') && !inner.starts_with("AWS::") && !inner.is_empty() {
            let name = inner.split('.').next().unwrap_or(inner);
            names.push(name);
        }
        rest = &after[end + 1..];
    }
    names
}

impl References for Function {
    fn collect_references(&self, refs: &mut IndexSet<String>) {
        match self {
            Function::Ref(name) => {
                refs.insert(name.clone());
            }
            Function::GetAtt { resource, .. } => {
                refs.insert(resource.clone());
            }
            Function::Join { values, .. } | Function::And(values) | Function::Or(values) => {
                values.iter().for_each(|v| v.collect_references(refs));
            }
            Function::Select { index, list } => {
                index.collect_references(refs);
                list.collect_references(refs);
            }
            Function::Split { source, .. } => source.collect_references(refs),
            Function::Base64(value)
            | Function::GetAzs(value)
            | Function::Not(value)
            | Function::ImportValue(value) => value.collect_references(refs),
            Function::FindInMap {
                top_key,
                second_key,
                ..
            } => {
                top_key.collect_references(refs);
                second_key.collect_references(refs);
            }
            Function::If {
                if_true, if_false, ..
            } => {
                if_true.collect_references(refs);
                if_false.collect_references(refs);
            }
            Function::Equals(left, right) => {
                left.collect_references(refs);
                right.collect_references(refs);
            }
            Function::Sub {
                template,
                variables,
            } => {
                for name in sub_placeholders(template) {
                    if !variables.contains_key(name) {
                        refs.insert(name.to_string());
                    }
                }
                variables.values().for_each(|v| v.collect_references(refs));
            }
            Function::Condition(_) => {}
        }
    }
}

impl Serialize for Function {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        let key = self.key();
        match self {
            Function::Ref(name) | Function::Condition(name) => map.serialize_entry(key, name)?,
            Function::GetAtt {
                resource,
                attribute,
            } => map.serialize_entry(key, &[resource, attribute])?,
            Function::Join { delimiter, values } => {
                map.serialize_entry(key, &(delimiter, values))?
            }
            Function::Select { index, list } => map.serialize_entry(key, &(index, list))?,
            Function::Split { delimiter, source } => {
                map.serialize_entry(key, &(delimiter, source))?
            }
            Function::Base64(value)
            | Function::GetAzs(value)
            | Function::Not(value)
            | Function::ImportValue(value) => {
                // `Fn::Not` takes a one-element list; the others take the bare value.
                if matches!(self, Function::Not(_)) {
                    map.serialize_entry(key, &[value])?
                } else {
                    map.serialize_entry(key, value)?
                }
            }
            Function::FindInMap {
                map: name,
                top_key,
                second_key,
            } => map.serialize_entry(key, &(name, top_key, second_key))?,
            Function::If {
                condition,
                if_true,
                if_false,
            } => map.serialize_entry(key, &(condition, if_true, if_false))?,
            Function::Equals(left, right) => map.serialize_entry(key, &(left, right))?,
            Function::And(values) | Function::Or(values) => map.serialize_entry(key, values)?,
            Function::Sub {
                template,
                variables,
            } => {
                if variables.is_empty() {
                    map.serialize_entry(key, template)?
                } else {
                    map.serialize_entry(key, &(template, variables))?
                }
            }
        }
        map.end()
    }
}
