//! Importing existing template documents.
//!
//! An imported document is replayed through the same builder operations a
//! caller would use: resources are registered with [`Template::resource`],
//! properties go through the accessors of their object type, and intrinsic
//! functions become [`Function`] values. Importing therefore applies the
//! same checks as building by hand, and the resulting template is subject
//! to reference validation like any other.

use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, trace};
use serde_json::{Map, Value as Json};

use stratus_core::{
    Function, Object, Properties, Schema, Template, TemplateError, TypeName, Value,
    schema::PropertyShape,
};

use crate::error::StratusError;

/// JSON-pointer-like location inside the imported document.
#[derive(Debug, Clone)]
struct Location(String);

impl Location {
    fn root() -> Self {
        Self(String::new())
    }

    fn join(&self, segment: &str) -> Self {
        Self(format!("{}/{}", self.0, segment))
    }

    fn index(&self, index: usize) -> Self {
        Self(format!("{}/{}", self.0, index))
    }

    fn as_string(&self) -> String {
        if self.0.is_empty() {
            "/".to_string()
        } else {
            self.0.clone()
        }
    }

    fn error(&self, message: impl Into<String>) -> StratusError {
        StratusError::import(self.as_string(), message)
    }

    fn wrap(&self) -> impl FnOnce(TemplateError) -> StratusError + '_ {
        move |source| StratusError::ImportTemplate {
            location: self.as_string(),
            source,
        }
    }
}

/// Builds a [`Template`] against `schema` from a parsed template document.
///
/// # Errors
///
/// Fails with [`StratusError::Import`] on structural problems (a section
/// that is not an object, a resource without `Type`, a `null` value) and
/// with [`StratusError::ImportTemplate`] when a builder operation rejects
/// the content, e.g. a property the resource type does not declare.
pub fn import_template(schema: Arc<Schema>, document: &Json) -> Result<Template, StratusError> {
    let root = Location::root();
    let sections = as_object(document, &root)?;
    let mut template = Template::new(schema);

    for (key, section) in sections {
        let location = root.join(key);
        match key.as_str() {
            "AWSTemplateFormatVersion" => {
                template.set_format_version(as_str(section, &location)?);
            }
            "Description" => {
                template.set_description(as_str(section, &location)?);
            }
            "Parameters" => import_parameters(&mut template, section, &location)?,
            "Mappings" => import_mappings(&mut template, section, &location)?,
            "Conditions" => import_conditions(&mut template, section, &location)?,
            "Resources" => import_resources(&mut template, section, &location)?,
            "Outputs" => import_outputs(&mut template, section, &location)?,
            _ => return Err(location.error(format!("unknown template section `{key}`"))),
        }
    }

    debug!(
        resources = template.resources().count(),
        outputs = template.outputs().count();
        "Imported template",
    );
    Ok(template)
}

// ============================================================================
// Sections
// ============================================================================

fn import_parameters(
    template: &mut Template,
    section: &Json,
    location: &Location,
) -> Result<(), StratusError> {
    for (name, body) in as_object(section, location)? {
        let location = location.join(name);
        let fields = as_object(body, &location)?;
        let parameter = template.parameter(name.as_str());

        let mut min_length = None;
        let mut max_length = None;
        let mut min_value = None;
        let mut max_value = None;
        for (field, json) in fields {
            let at = location.join(field);
            match field.as_str() {
                "Type" => {
                    parameter.set_type(as_str(json, &at)?);
                }
                "Default" => {
                    parameter.set_default(convert_plain(json, &at)?);
                }
                "NoEcho" => {
                    parameter.set_no_echo(as_bool_like(json, &at)?);
                }
                "AllowedValues" => {
                    for (index, value) in as_array(json, &at)?.iter().enumerate() {
                        parameter.allow_value(convert_plain(value, &at.index(index))?);
                    }
                }
                "AllowedPattern" => {
                    parameter.set_allowed_pattern(as_str(json, &at)?);
                }
                "MinLength" => min_length = Some(as_u64(json, &at)?),
                "MaxLength" => max_length = Some(as_u64(json, &at)?),
                "MinValue" => min_value = Some(as_f64(json, &at)?),
                "MaxValue" => max_value = Some(as_f64(json, &at)?),
                "Description" => {
                    parameter.set_description(as_str(json, &at)?);
                }
                "ConstraintDescription" => {
                    parameter.set_constraint_description(as_str(json, &at)?);
                }
                _ => return Err(at.error(format!("unknown parameter field `{field}`"))),
            }
        }
        if min_length.is_some() || max_length.is_some() {
            parameter.set_length_range(min_length, max_length);
        }
        if min_value.is_some() || max_value.is_some() {
            parameter.set_value_range(min_value, max_value);
        }
    }
    Ok(())
}

fn import_mappings(
    template: &mut Template,
    section: &Json,
    location: &Location,
) -> Result<(), StratusError> {
    for (name, body) in as_object(section, location)? {
        let location = location.join(name);
        let mut entries = Vec::new();
        for (top_key, second) in as_object(body, &location)? {
            let location = location.join(top_key);
            for (second_key, value) in as_object(second, &location)? {
                let value = convert_plain(value, &location.join(second_key))?;
                entries.push((top_key.clone(), second_key.clone(), value));
            }
        }

        let mapping = template.mapping(name.as_str());
        for (top_key, second_key, value) in entries {
            mapping.set(top_key, second_key, value);
        }
    }
    Ok(())
}

fn import_conditions(
    template: &mut Template,
    section: &Json,
    location: &Location,
) -> Result<(), StratusError> {
    for (name, expression) in as_object(section, location)? {
        let expression = convert_plain(expression, &location.join(name))?;
        template.condition(name.as_str()).set_expression(expression);
    }
    Ok(())
}

fn import_resources(
    template: &mut Template,
    section: &Json,
    location: &Location,
) -> Result<(), StratusError> {
    for (name, body) in as_object(section, location)? {
        let location = location.join(name);
        let fields = as_object(body, &location)?;
        let type_name = match fields.get("Type") {
            Some(json) => as_str(json, &location.join("Type"))?,
            None => return Err(location.error("resource has no `Type`")),
        };

        let resource = template
            .resource(name.as_str(), type_name)
            .map_err(location.wrap())?;
        trace!(name = name.as_str(), type_name; "Importing resource");

        for (field, json) in fields {
            let at = location.join(field);
            match field.as_str() {
                "Type" => {}
                "Properties" => apply_properties(resource.body_mut(), json, &at)?,
                "DependsOn" => match json {
                    Json::String(dependency) => {
                        resource.depends_on(dependency.as_str());
                    }
                    _ => {
                        for (index, dependency) in as_array(json, &at)?.iter().enumerate() {
                            resource.depends_on(as_str(dependency, &at.index(index))?);
                        }
                    }
                },
                "Condition" => {
                    resource.set_condition(as_str(json, &at)?);
                }
                "DeletionPolicy" => {
                    resource.set_deletion_policy(as_str(json, &at)?);
                }
                "UpdatePolicy" => {
                    resource.set_update_policy(convert_plain(json, &at)?);
                }
                "CreationPolicy" => {
                    resource.set_creation_policy(convert_plain(json, &at)?);
                }
                "Metadata" => {
                    resource.set_metadata(convert_plain(json, &at)?);
                }
                _ => return Err(at.error(format!("unknown resource field `{field}`"))),
            }
        }
    }
    Ok(())
}

fn import_outputs(
    template: &mut Template,
    section: &Json,
    location: &Location,
) -> Result<(), StratusError> {
    for (name, body) in as_object(section, location)? {
        let location = location.join(name);
        let fields = as_object(body, &location)?;
        let output = template.output(name.as_str());
        for (field, json) in fields {
            let at = location.join(field);
            match field.as_str() {
                "Value" => {
                    output.set_value(convert_plain(json, &at)?);
                }
                "Description" => {
                    output.set_description(as_str(json, &at)?);
                }
                "Condition" => {
                    output.set_condition(as_str(json, &at)?);
                }
                "Export" => {
                    let export = as_object(json, &at)?;
                    match export.get("Name") {
                        Some(name) => {
                            output.set_export(convert_plain(name, &at.join("Name"))?);
                        }
                        None => return Err(at.error("export has no `Name`")),
                    }
                }
                _ => return Err(at.error(format!("unknown output field `{field}`"))),
            }
        }
    }
    Ok(())
}

// ============================================================================
// Properties
// ============================================================================

/// Replays a `Properties` object onto `object` through its accessors.
fn apply_properties(object: &mut Object, json: &Json, location: &Location) -> Result<(), StratusError> {
    for (key, value) in as_object(json, location)? {
        apply_property(object, key, value, &location.join(key))?;
    }
    Ok(())
}

fn apply_property(
    object: &mut Object,
    key: &str,
    json: &Json,
    location: &Location,
) -> Result<(), StratusError> {
    let shape = object.type_name().and_then(|type_name| {
        object
            .schema()
            .object_type(type_name)
            .and_then(|object_type| object_type.resolve_property_accessor(key))
            .map(|descriptor| descriptor.shape())
    });
    let schema = Arc::clone(object.schema());

    match (shape, json) {
        (Some(PropertyShape::List(item)), Json::Array(elements)) => {
            let values = elements
                .iter()
                .enumerate()
                .map(|(index, element)| convert_typed(&schema, item, element, &location.index(index)))
                .collect::<Result<Vec<_>, _>>()?;
            object
                .list(key)
                .map_err(location.wrap())?
                .extend(values);
        }
        (Some(PropertyShape::List(_)), _) => match parse_function(json, location)? {
            Some(function) => object.list_expr(key, function).map_err(location.wrap())?,
            None => return Err(location.error(format!("property `{key}` expects a list"))),
        },
        (Some(PropertyShape::Scalar(item)), _) => {
            let value = convert_typed(&schema, item, json, location)?;
            object.set(key, value).map_err(location.wrap())?;
        }
        (None, Json::Array(elements)) if object.type_name().is_none() => {
            let values = elements
                .iter()
                .enumerate()
                .map(|(index, element)| convert_plain(element, &location.index(index)))
                .collect::<Result<Vec<_>, _>>()?;
            object.list(key).map_err(location.wrap())?.extend(values);
        }
        (None, _) => {
            // Typed objects reject the unknown accessor here.
            let value = convert_plain(json, location)?;
            object.set(key, value).map_err(location.wrap())?;
        }
    }
    Ok(())
}

/// Converts `json` into a value of schema type `type_name`.
///
/// Objects of object types become typed [`Object`]s so that their
/// properties are checked too; everything else is converted as plain data.
/// An object whose keys are all properties of the type is never read as an
/// intrinsic function, so `{"Condition": "..."}` stays a typed value when
/// the type declares `Condition`.
fn convert_typed(
    schema: &Arc<Schema>,
    type_name: TypeName,
    json: &Json,
    location: &Location,
) -> Result<Value, StratusError> {
    let object_type = schema.object_type(type_name);
    let declared = match (object_type, json) {
        (Some(object_type), Json::Object(entries)) => entries
            .keys()
            .all(|key| object_type.resolve_property_accessor(key).is_some()),
        _ => false,
    };
    if !declared {
        if let Some(function) = parse_function(json, location)? {
            return Ok(function.into());
        }
    }
    match json {
        Json::Object(_) if object_type.is_some() => {
            let mut nested = Object::typed(Arc::clone(schema), type_name);
            apply_properties(&mut nested, json, location)?;
            Ok(Value::Object(nested))
        }
        _ => convert_plain(json, location),
    }
}

/// Converts `json` into an untyped value, recognizing intrinsic functions.
fn convert_plain(json: &Json, location: &Location) -> Result<Value, StratusError> {
    if let Some(function) = parse_function(json, location)? {
        return Ok(function.into());
    }
    match json {
        Json::Null => Err(location.error("null values are not supported")),
        Json::Bool(b) => Ok(Value::Bool(*b)),
        Json::Number(number) => match number.as_i64() {
            Some(integer) => Ok(Value::Integer(integer)),
            None => number
                .as_f64()
                .map(Value::Number)
                .ok_or_else(|| location.error(format!("unrepresentable number {number}"))),
        },
        Json::String(s) => Ok(Value::String(s.clone())),
        Json::Array(elements) => elements
            .iter()
            .enumerate()
            .map(|(index, element)| convert_plain(element, &location.index(index)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        Json::Object(entries) => entries
            .iter()
            .map(|(key, value)| -> Result<_, StratusError> {
                Ok((key.clone(), convert_plain(value, &location.join(key))?))
            })
            .collect::<Result<IndexMap<_, _>, _>>()
            .map(Value::Map),
    }
}

// ============================================================================
// Intrinsic functions
// ============================================================================

/// Recognizes the single-key object form of an intrinsic function.
///
/// Returns `Ok(None)` for anything else, including single-key objects whose
/// key merely looks like a function (`Fn::Unknown`); those stay plain maps.
fn parse_function(json: &Json, location: &Location) -> Result<Option<Function>, StratusError> {
    let Json::Object(entries) = json else {
        return Ok(None);
    };
    if entries.len() != 1 {
        return Ok(None);
    }
    let Some((key, args)) = entries.iter().next() else {
        return Ok(None);
    };
    let at = location.join(key);

    let function = match key.as_str() {
        "Ref" => Function::reference(as_str(args, &at)?),
        "Condition" => match args {
            Json::String(name) => Function::condition(name.as_str()),
            _ => return Ok(None),
        },
        "Fn::GetAtt" => match args {
            Json::String(dotted) => match dotted.split_once('.') {
                Some((resource, attribute)) => Function::get_att(resource, attribute),
                None => return Err(at.error("expected `Resource.Attribute`")),
            },
            _ => {
                let [resource, attribute] = fixed_args::<2>(args, &at)?;
                Function::get_att(as_str(resource, &at)?, as_str(attribute, &at)?)
            }
        },
        "Fn::Join" => {
            let [delimiter, values] = fixed_args::<2>(args, &at)?;
            let values = as_array(values, &at)?
                .iter()
                .enumerate()
                .map(|(index, value)| convert_plain(value, &at.index(index)))
                .collect::<Result<Vec<_>, _>>()?;
            Function::join(as_str(delimiter, &at)?, values)
        }
        "Fn::Select" => {
            let [index, list] = fixed_args::<2>(args, &at)?;
            Function::select(convert_plain(index, &at)?, convert_plain(list, &at)?)
        }
        "Fn::Split" => {
            let [delimiter, source] = fixed_args::<2>(args, &at)?;
            Function::split(as_str(delimiter, &at)?, convert_plain(source, &at)?)
        }
        "Fn::Base64" => Function::base64(convert_plain(args, &at)?),
        "Fn::FindInMap" => {
            let [map, top_key, second_key] = fixed_args::<3>(args, &at)?;
            Function::find_in_map(
                as_str(map, &at)?,
                convert_plain(top_key, &at)?,
                convert_plain(second_key, &at)?,
            )
        }
        "Fn::GetAZs" => Function::get_azs(convert_plain(args, &at)?),
        "Fn::If" => {
            let [condition, if_true, if_false] = fixed_args::<3>(args, &at)?;
            Function::if_(
                as_str(condition, &at)?,
                convert_plain(if_true, &at)?,
                convert_plain(if_false, &at)?,
            )
        }
        "Fn::Equals" => {
            let [left, right] = fixed_args::<2>(args, &at)?;
            Function::equals(convert_plain(left, &at)?, convert_plain(right, &at)?)
        }
        "Fn::And" | "Fn::Or" => {
            let conditions = as_array(args, &at)?
                .iter()
                .enumerate()
                .map(|(index, value)| convert_plain(value, &at.index(index)))
                .collect::<Result<Vec<_>, _>>()?;
            if key == "Fn::And" {
                Function::and(conditions)
            } else {
                Function::or(conditions)
            }
        }
        "Fn::Not" => {
            let [condition] = fixed_args::<1>(args, &at)?;
            Function::not(convert_plain(condition, &at)?)
        }
        "Fn::Sub" => match args {
            Json::String(template) => Function::sub(template.as_str()),
            _ => {
                let [template, variables] = fixed_args::<2>(args, &at)?;
                let variables = as_object(variables, &at)?
                    .iter()
                    .map(|(name, value)| -> Result<_, StratusError> {
                        Ok((name.clone(), convert_plain(value, &at.join(name))?))
                    })
                    .collect::<Result<IndexMap<_, _>, _>>()?;
                Function::sub_with(as_str(template, &at)?, variables)
            }
        },
        "Fn::ImportValue" => Function::import_value(convert_plain(args, &at)?),
        _ => return Ok(None),
    };
    Ok(Some(function))
}

/// Destructures a function argument list of exactly `N` elements.
fn fixed_args<'j, const N: usize>(
    args: &'j Json,
    location: &Location,
) -> Result<[&'j Json; N], StratusError> {
    let elements = as_array(args, location)?;
    let refs: Vec<&Json> = elements.iter().collect();
    refs.try_into().map_err(|refs: Vec<&Json>| {
        location.error(format!("expected {N} arguments, found {}", refs.len()))
    })
}

// ============================================================================
// JSON helpers
// ============================================================================

fn as_object<'j>(json: &'j Json, location: &Location) -> Result<&'j Map<String, Json>, StratusError> {
    json.as_object()
        .ok_or_else(|| location.error("expected an object"))
}

fn as_array<'j>(json: &'j Json, location: &Location) -> Result<&'j Vec<Json>, StratusError> {
    json.as_array()
        .ok_or_else(|| location.error("expected a list"))
}

fn as_str<'j>(json: &'j Json, location: &Location) -> Result<&'j str, StratusError> {
    json.as_str()
        .ok_or_else(|| location.error("expected a string"))
}

fn as_u64(json: &Json, location: &Location) -> Result<u64, StratusError> {
    let value = match json {
        Json::String(s) => s.parse().ok(),
        _ => json.as_u64(),
    };
    value.ok_or_else(|| location.error("expected a non-negative integer"))
}

fn as_f64(json: &Json, location: &Location) -> Result<f64, StratusError> {
    let value = match json {
        Json::String(s) => s.parse().ok(),
        _ => json.as_f64(),
    };
    value.ok_or_else(|| location.error("expected a number"))
}

/// Accepts both `true` and `"true"`, as template authors write either.
fn as_bool_like(json: &Json, location: &Location) -> Result<bool, StratusError> {
    match json {
        Json::Bool(b) => Ok(*b),
        Json::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Json::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(location.error("expected a boolean")),
    }
}
