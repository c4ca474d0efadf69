//! The schema compiler.
//!
//! Compilation turns a [`SchemaSource`] into an immutable [`Schema`] in one
//! pass over the document:
//!
//! 1. collect the type namespace (built-in primitives, resource types and
//!    `Types` entries), rejecting duplicates and malformed names,
//! 2. resolve alias chains to their target types,
//! 3. resolve the declared type of every property to a [`PropertyShape`],
//! 4. bind the accessor names of every property,
//! 5. derive the unambiguous short forms of the resource type names.
//!
//! Every problem is collected; compilation fails as a whole with all of them
//! and never produces a partial schema.

use indexmap::{IndexMap, IndexSet};
use log::{debug, info, trace, warn};

use stratus_core::{
    identifier::TypeName,
    schema::{ObjectType, PropertyDescriptor, PropertyShape, Schema, TypeDefinition},
};

use crate::{
    abbreviation::resolve_abbreviations,
    builtin_types,
    error::{CompileError, Diagnostic, DiagnosticCollector, ErrorCode},
    location::SchemaPath,
    naming,
    source::{PropertyTypeRef, SchemaSource, TypeSource},
};

/// Where a name of the type namespace comes from.
#[derive(Debug, Clone)]
enum Entry<'s> {
    Builtin(TypeDefinition),
    Resource(&'s IndexMap<String, PropertyTypeRef>),
    Object(&'s IndexMap<String, PropertyTypeRef>),
    Alias(&'s str),
}

impl Entry<'_> {
    fn location(&self, name: &str) -> SchemaPath {
        match self {
            Entry::Builtin(_) => SchemaPath::root(),
            Entry::Resource(_) => SchemaPath::resource(name),
            Entry::Object(_) | Entry::Alias(_) => SchemaPath::type_entry(name),
        }
    }
}

/// Compiles `source` into a [`Schema`].
///
/// Warnings (accessor name collisions) are logged and do not fail
/// compilation; use [`Compiler::compile`] to receive them.
///
/// # Errors
///
/// Returns a [`CompileError`] holding every error diagnostic found.
pub fn compile(source: &SchemaSource) -> Result<Schema, CompileError> {
    let (schema, warnings) = Compiler::new(source).compile()?;
    for warning in &warnings {
        warn!(warning:% = warning; "Schema compiled with warning");
    }
    Ok(schema)
}

/// A single compilation of one schema document.
pub struct Compiler<'s> {
    source: &'s SchemaSource,
    namespace: IndexMap<String, Entry<'s>>,
    collector: DiagnosticCollector,
}

impl<'s> Compiler<'s> {
    pub fn new(source: &'s SchemaSource) -> Self {
        Self {
            source,
            namespace: IndexMap::new(),
            collector: DiagnosticCollector::new(),
        }
    }

    /// Runs the compilation and returns the schema with its warnings.
    pub fn compile(mut self) -> Result<(Schema, Vec<Diagnostic>), CompileError> {
        info!(
            resources = self.source.resources.len(),
            types = self.source.types.len();
            "Compiling schema",
        );

        self.collect_namespace();
        let canonical = self.resolve_aliases();

        let mut types = IndexMap::new();
        let mut resource_types = IndexSet::new();
        let entries: Vec<(String, Entry<'s>)> = self
            .namespace
            .iter()
            .map(|(name, entry)| (name.clone(), entry.clone()))
            .collect();
        for (name, entry) in entries {
            let type_name = TypeName::new(&name);
            let definition = match entry {
                Entry::Builtin(definition) => definition,
                Entry::Resource(properties) => {
                    resource_types.insert(type_name);
                    TypeDefinition::Object(self.build_object_type(
                        &name,
                        properties,
                        SchemaPath::resource(&name).join("Properties"),
                        &canonical,
                    ))
                }
                Entry::Object(properties) => TypeDefinition::Object(self.build_object_type(
                    &name,
                    properties,
                    SchemaPath::type_entry(&name),
                    &canonical,
                )),
                // Aliases are filled in once their targets are built.
                Entry::Alias(_) => continue,
            };
            types.insert(type_name, definition);
        }

        for (alias, target) in &canonical {
            if let Some(definition) = types.get(target).cloned() {
                trace!(alias = alias.as_str(), target:% = target; "Resolved type alias");
                types.insert(TypeName::new(alias), definition);
            }
        }

        let abbreviations = resolve_abbreviations(resource_types.iter().copied());

        let warnings = self.collector.finish()?;
        info!(
            types = types.len(),
            resource_types = resource_types.len(),
            abbreviations = abbreviations.unique.len();
            "Schema compiled",
        );
        Ok((
            Schema::new(
                types,
                resource_types,
                abbreviations.unique,
                abbreviations.ambiguous,
            ),
            warnings,
        ))
    }

    // ============================================================================
    // Namespace Collection
    // ============================================================================

    fn collect_namespace(&mut self) {
        for (name, kind) in builtin_types::PRIMITIVES {
            self.namespace.insert(
                name.to_string(),
                Entry::Builtin(TypeDefinition::Primitive(*kind)),
            );
        }

        let source = self.source;
        for (name, resource) in &source.resources {
            self.declare(name, Entry::Resource(&resource.properties));
        }

        for (name, type_source) in &source.types {
            match type_source {
                // Schema documents commonly restate the primitives as
                // self-aliases (`"String": "String"`); the built-in wins.
                TypeSource::Alias(_) if builtin_types::primitive_kind(name).is_some() => {
                    trace!(name = name.as_str(); "Skipping alias of a built-in type");
                }
                TypeSource::Alias(target) => self.declare(name, Entry::Alias(target)),
                TypeSource::Object(properties) => self.declare(name, Entry::Object(properties)),
            }
        }
        debug!(names = self.namespace.len(); "Type namespace collected");
    }

    fn declare(&mut self, name: &str, entry: Entry<'s>) {
        let location = entry.location(name);
        if !is_valid_type_name(name) {
            self.collector.error(
                Diagnostic::new(ErrorCode::E104, location, format!("invalid type name `{name}`"))
                    .with_note("invalid name")
                    .with_help("type names must be non-empty and every `::` segment must be non-empty"),
            );
            return;
        }

        if let Some(existing) = self.namespace.get(name) {
            let mut diagnostic = Diagnostic::new(
                ErrorCode::E102,
                location,
                format!("type `{name}` is defined multiple times"),
            )
            .with_note("duplicate definition");
            diagnostic = match existing {
                Entry::Builtin(_) => diagnostic.with_help(format!("`{name}` is a built-in type")),
                _ => diagnostic
                    .with_related(existing.location(name), "first defined here")
                    .with_help("remove the duplicate or use a different name"),
            };
            self.collector.error(diagnostic);
            return;
        }

        self.namespace.insert(name.to_string(), entry);
    }

    // ============================================================================
    // Type Resolution
    // ============================================================================

    /// Follows every alias chain, returning alias name -> target type name.
    ///
    /// Aliases that do not resolve are reported and left out.
    fn resolve_aliases(&mut self) -> IndexMap<String, TypeName> {
        let mut canonical = IndexMap::new();
        let aliases: Vec<(String, String)> = self
            .namespace
            .iter()
            .filter_map(|(name, entry)| match entry {
                Entry::Alias(target) => Some((name.clone(), target.to_string())),
                _ => None,
            })
            .collect();

        for (alias, first_target) in aliases {
            let mut chain = vec![alias.clone()];
            let mut current = first_target;
            loop {
                match self.namespace.get(&current) {
                    Some(Entry::Alias(next)) => {
                        if chain.contains(&current) {
                            chain.push(current);
                            self.collector.error(
                                Diagnostic::new(
                                    ErrorCode::E103,
                                    SchemaPath::type_entry(&alias),
                                    format!("type alias `{alias}` is circular"),
                                )
                                .with_note("alias defined here")
                                    .with_help(format!("alias chain: {}", chain.join(" -> "))),
                            );
                            break;
                        }
                        chain.push(current);
                        current = next.to_string();
                    }
                    Some(_) => {
                        canonical.insert(alias, TypeName::new(&current));
                        break;
                    }
                    None => {
                        self.collector.error(undefined_type(
                            &current,
                            SchemaPath::type_entry(&alias),
                            "alias target",
                        ));
                        break;
                    }
                }
            }
        }
        canonical
    }

    /// Resolves a referenced type name to the name its definition is stored under.
    fn resolve_type(&self, name: &str, canonical: &IndexMap<String, TypeName>) -> Option<TypeName> {
        match self.namespace.get(name)? {
            Entry::Alias(_) => canonical.get(name).copied(),
            _ => Some(TypeName::new(name)),
        }
    }

    fn resolve_shape(
        &mut self,
        type_ref: &PropertyTypeRef,
        location: &SchemaPath,
        canonical: &IndexMap<String, TypeName>,
    ) -> Option<PropertyShape> {
        let (item, is_list) = match type_ref {
            PropertyTypeRef::Name(name) => (name, false),
            PropertyTypeRef::List(items) => match items.as_slice() {
                [item] => (item, true),
                _ => {
                    self.collector.error(
                        Diagnostic::new(
                            ErrorCode::E101,
                            location.clone(),
                            format!(
                                "list property type must name exactly one type, found {}",
                                items.len()
                            ),
                        )
                        .with_note("malformed list type")
                        .with_help("write list properties as `[\"ItemType\"]`"),
                    );
                    return None;
                }
            },
        };

        match self.resolve_type(item, canonical) {
            Some(item_type) if is_list => Some(PropertyShape::List(item_type)),
            Some(item_type) => Some(PropertyShape::Scalar(item_type)),
            None => {
                // Unresolvable aliases are already reported by alias resolution.
                if !matches!(self.namespace.get(item.as_str()), Some(Entry::Alias(_))) {
                    self.collector
                        .error(undefined_type(item, location.clone(), "property type"));
                }
                None
            }
        }
    }

    // ============================================================================
    // Object Types and Accessors
    // ============================================================================

    fn build_object_type(
        &mut self,
        type_name: &str,
        properties: &IndexMap<String, PropertyTypeRef>,
        location: SchemaPath,
        canonical: &IndexMap<String, TypeName>,
    ) -> ObjectType {
        let mut object = ObjectType::new();
        for (property, type_ref) in properties {
            let property_location = location.join(property);
            let Some(shape) = self.resolve_shape(type_ref, &property_location, canonical) else {
                continue;
            };
            object.add_property(PropertyDescriptor::new(property.as_str(), shape));

            for accessor in naming::method_names(property) {
                if let Err(owner) = object.add_property_accessor(accessor.as_str(), property) {
                    self.accessor_collision(type_name, &accessor, &owner, property, &property_location);
                }
            }

            if shape.is_list() {
                for accessor in naming::method_names(&naming::singularize(property)) {
                    if let Err(owner) = object.add_element_accessor(accessor.as_str(), property) {
                        self.accessor_collision(type_name, &accessor, &owner, property, &property_location);
                    }
                }
            }
        }
        trace!(type_name, properties = properties.len(); "Built object type");
        object
    }

    fn accessor_collision(
        &mut self,
        type_name: &str,
        accessor: &str,
        owner: &str,
        property: &str,
        location: &SchemaPath,
    ) {
        self.collector.warn(
            Diagnostic::new(
                ErrorCode::E105,
                location.clone(),
                format!(
                    "accessor `{accessor}` of type `{type_name}` is already bound to property `{owner}`"
                ),
            )
            .with_note(format!("`{property}` also produces `{accessor}`"))
            .with_related(location.sibling(owner), format!("`{owner}` declared here"))
            .with_help(format!(
                "use `{property}` to address this property; `{accessor}` keeps addressing `{owner}`"
            )),
        );
    }
}

fn is_valid_type_name(name: &str) -> bool {
    !name.is_empty() && TypeName::new(name).is_well_formed()
}

/// Creates a standardized error for undefined type references
fn undefined_type(name: &str, location: SchemaPath, role: &str) -> Diagnostic {
    Diagnostic::new(ErrorCode::E100, location, format!("undefined type `{name}`"))
        .with_note(format!("{role} `{name}` is not defined"))
        .with_help(format!(
            "type `{name}` must be a built-in type, a resource type, or declared under `Types`"
        ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use stratus_core::schema::PrimitiveKind;

    use super::*;

    fn source(document: serde_json::Value) -> SchemaSource {
        serde_json::from_value(document).unwrap()
    }

    fn codes(err: &CompileError) -> Vec<ErrorCode> {
        err.errors().iter().map(Diagnostic::code).collect()
    }

    #[test]
    fn test_compile_resource_with_scalar_and_list_properties() {
        let schema = compile(&source(json!({
            "Resources": {
                "AWS::EC2::Instance": {
                    "Properties": {
                        "ImageId": "String",
                        "SecurityGroups": ["String"],
                        "Tags": ["Tag"],
                    }
                }
            },
            "Types": {
                "Tag": { "Key": "String", "Value": "String" }
            }
        })))
        .unwrap();

        let instance = TypeName::new("AWS::EC2::Instance");
        assert!(schema.is_resource_type(instance));
        let object = schema.object_type(instance).unwrap();

        let image_id = object.resolve_property_accessor("image_id").unwrap();
        assert_eq!(image_id.name(), "ImageId");
        assert_eq!(image_id.shape(), PropertyShape::Scalar(TypeName::new("String")));

        let tags = object.resolve_property_accessor("Tags").unwrap();
        assert_eq!(tags.shape(), PropertyShape::List(TypeName::new("Tag")));
        assert_eq!(object.resolve_element_accessor("tag").unwrap().name(), "Tags");
        assert_eq!(
            object.resolve_element_accessor("SecurityGroup").unwrap().name(),
            "SecurityGroups"
        );
        assert!(object.resolve_element_accessor("ImageId").is_none());

        assert!(schema.object_type(TypeName::new("Tag")).is_some());
        assert!(!schema.is_resource_type(TypeName::new("Tag")));
    }

    #[test]
    fn test_builtins_are_always_present() {
        let schema = compile(&SchemaSource::new()).unwrap();
        for (name, kind) in builtin_types::PRIMITIVES {
            assert_eq!(
                schema.type_definition(TypeName::new(name)),
                Some(&TypeDefinition::Primitive(*kind))
            );
        }
        assert_eq!(schema.resource_types().count(), 0);
    }

    #[test]
    fn test_aliases_resolve_to_their_target() {
        let schema = compile(&source(json!({
            "Resources": {
                "AWS::EC2::Subnet": { "Properties": { "AvailabilityZone": "AZ" } }
            },
            "Types": {
                "AZ": "ZoneName",
                "ZoneName": "String",
                "String": "String"
            }
        })))
        .unwrap();

        let subnet = schema.object_type(TypeName::new("AWS::EC2::Subnet")).unwrap();
        assert_eq!(
            subnet.property("AvailabilityZone").unwrap().shape(),
            PropertyShape::Scalar(TypeName::new("String"))
        );
        assert_eq!(
            schema.type_definition(TypeName::new("AZ")),
            Some(&TypeDefinition::Primitive(PrimitiveKind::String))
        );
    }

    #[test]
    fn test_all_errors_are_collected() {
        let err = compile(&source(json!({
            "Resources": {
                "AWS::EC2::Instance": {
                    "Properties": {
                        "ImageId": "Strng",
                        "Tags": ["Tag", "Other"],
                        "Volumes": []
                    }
                },
                "AWS::::Broken": {}
            },
            "Types": {
                "AWS::EC2::Instance": { "Name": "String" },
                "Loop": "Pool",
                "Pool": "Loop"
            }
        })))
        .unwrap_err();

        let codes = codes(&err);
        assert!(codes.contains(&ErrorCode::E100));
        assert_eq!(codes.iter().filter(|c| **c == ErrorCode::E101).count(), 2);
        assert!(codes.contains(&ErrorCode::E102));
        assert!(codes.contains(&ErrorCode::E103));
        assert!(codes.contains(&ErrorCode::E104));
    }

    #[test]
    fn test_undefined_type_reports_location() {
        let err = compile(&source(json!({
            "Resources": {
                "AWS::S3::Bucket": { "Properties": { "Tags": ["Tagg"] } }
            }
        })))
        .unwrap_err();

        assert_eq!(err.errors().len(), 1);
        let diagnostic = &err.errors()[0];
        assert_eq!(
            diagnostic.to_string(),
            "E100: undefined type `Tagg` at /Resources/AWS::S3::Bucket/Properties/Tags"
        );
        assert_eq!(diagnostic.note(), Some("property type `Tagg` is not defined"));
    }

    #[test]
    fn test_duplicate_of_builtin() {
        let err = compile(&source(json!({
            "Types": { "String": { "Value": "String" } }
        })))
        .unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E102]);
    }

    #[test]
    fn test_accessor_collision_is_a_warning() {
        let (schema, warnings) = Compiler::new(&source(json!({
            "Resources": {
                "AWS::EC2::VPCPeering": {
                    "Properties": { "VPCId": "String", "VpcId": "String" }
                }
            }
        })))
        .compile()
        .unwrap();

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code(), ErrorCode::E105);
        assert_eq!(
            warnings[0].location().to_string(),
            "/Resources/AWS::EC2::VPCPeering/Properties/VpcId"
        );
        assert_eq!(
            warnings[0].related()[0].location().to_string(),
            "/Resources/AWS::EC2::VPCPeering/Properties/VPCId"
        );

        let object = schema.object_type(TypeName::new("AWS::EC2::VPCPeering")).unwrap();
        assert_eq!(object.resolve_property_accessor("vpc_id").unwrap().name(), "VPCId");
        assert_eq!(object.resolve_property_accessor("VpcId").unwrap().name(), "VpcId");
    }

    #[test]
    fn test_element_accessors_of_ches_plurals() {
        let schema = compile(&source(json!({
            "Resources": {
                "AWS::Test::Cluster": {
                    "Properties": { "Caches": ["String"], "Branches": ["String"] }
                }
            }
        })))
        .unwrap();

        let object = schema.object_type(TypeName::new("AWS::Test::Cluster")).unwrap();
        assert_eq!(object.resolve_element_accessor("Cache").unwrap().name(), "Caches");
        assert_eq!(object.resolve_element_accessor("cache").unwrap().name(), "Caches");
        assert!(object.resolve_element_accessor("Cach").is_none());
        assert_eq!(object.resolve_element_accessor("Branch").unwrap().name(), "Branches");
    }

    #[test]
    fn test_abbreviations_are_compiled() {
        let schema = compile(&source(json!({
            "Resources": {
                "NS1::Foo::Widget": {},
                "NS2::Bar::Widget": {},
                "AWS::S3::Bucket": {}
            }
        })))
        .unwrap();

        assert_eq!(
            schema.resolve_resource_type("Foo::Widget"),
            Some(TypeName::new("NS1::Foo::Widget"))
        );
        assert_eq!(schema.resolve_resource_type("Widget"), None);
        assert_eq!(schema.ambiguous_candidates("Widget").map(<[_]>::len), Some(2));
        assert_eq!(
            schema.resolve_resource_type("Bucket"),
            Some(TypeName::new("AWS::S3::Bucket"))
        );
    }
}
