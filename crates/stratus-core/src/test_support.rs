//! Hand-assembled schema shared by the unit tests of this crate.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::{
    identifier::TypeName,
    schema::{ObjectType, PrimitiveKind, PropertyDescriptor, PropertyShape, Schema, TypeDefinition},
};

fn scalar(object: &mut ObjectType, name: &str, alias: &str, item: &str) {
    object.add_property(PropertyDescriptor::new(
        name,
        PropertyShape::Scalar(TypeName::new(item)),
    ));
    object.add_property_accessor(name, name).unwrap();
    object.add_property_accessor(alias, name).unwrap();
}

fn list(object: &mut ObjectType, name: &str, aliases: [&str; 3], item: &str) {
    let [plural_alias, singular, singular_alias] = aliases;
    object.add_property(PropertyDescriptor::new(
        name,
        PropertyShape::List(TypeName::new(item)),
    ));
    object.add_property_accessor(name, name).unwrap();
    object.add_property_accessor(plural_alias, name).unwrap();
    object.add_element_accessor(singular, name).unwrap();
    object.add_element_accessor(singular_alias, name).unwrap();
}

/// Builds a small schema with EC2 instances, security groups and buckets.
///
/// `SecurityGroup` is deliberately shared by two resource types, so it has
/// no unambiguous short form.
pub(crate) fn sample_schema() -> Arc<Schema> {
    let mut types = IndexMap::new();
    for (name, kind) in [
        ("String", PrimitiveKind::String),
        ("Boolean", PrimitiveKind::Boolean),
        ("Integer", PrimitiveKind::Integer),
        ("Json", PrimitiveKind::Json),
    ] {
        types.insert(TypeName::new(name), TypeDefinition::Primitive(kind));
    }

    let mut tag = ObjectType::new();
    scalar(&mut tag, "Key", "key", "String");
    scalar(&mut tag, "Value", "value", "String");
    types.insert(TypeName::new("Tag"), TypeDefinition::Object(tag));

    let mut credit = ObjectType::new();
    scalar(&mut credit, "CPUCredits", "cpu_credits", "String");
    types.insert(
        TypeName::new("CreditSpecification"),
        TypeDefinition::Object(credit),
    );

    let mut instance = ObjectType::new();
    scalar(&mut instance, "ImageId", "image_id", "String");
    list(
        &mut instance,
        "SecurityGroups",
        ["security_groups", "SecurityGroup", "security_group"],
        "String",
    );
    list(&mut instance, "Tags", ["tags", "Tag", "tag"], "Tag");
    scalar(
        &mut instance,
        "CreditSpecification",
        "credit_specification",
        "CreditSpecification",
    );

    let mut ec2_group = ObjectType::new();
    scalar(&mut ec2_group, "GroupDescription", "group_description", "String");

    let mut rds_group = ObjectType::new();
    scalar(&mut rds_group, "GroupDescription", "group_description", "String");

    let mut bucket = ObjectType::new();
    scalar(&mut bucket, "BucketName", "bucket_name", "String");

    let mut resource_types = IndexSet::new();
    for (name, object) in [
        ("AWS::EC2::Instance", instance),
        ("AWS::EC2::SecurityGroup", ec2_group),
        ("AWS::RDS::SecurityGroup", rds_group),
        ("AWS::S3::Bucket", bucket),
    ] {
        let type_name = TypeName::new(name);
        types.insert(type_name, TypeDefinition::Object(object));
        resource_types.insert(type_name);
    }

    let mut claims: IndexMap<String, Vec<TypeName>> = IndexMap::new();
    for type_name in &resource_types {
        for suffix in type_name.suffixes() {
            claims.entry(suffix).or_default().push(*type_name);
        }
    }
    let (unique, ambiguous): (IndexMap<_, _>, IndexMap<_, _>) =
        claims.into_iter().partition(|(_, targets)| targets.len() == 1);
    let abbreviations = unique
        .into_iter()
        .map(|(short, targets)| (short, targets[0]))
        .collect();

    Arc::new(Schema::new(types, resource_types, abbreviations, ambiguous))
}
