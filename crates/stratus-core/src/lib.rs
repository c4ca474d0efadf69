//! Stratus Core Types and Definitions
//!
//! This crate provides the object model that templates are built from and the
//! compiled schema descriptors that drive it. It includes:
//!
//! - **Type names**: Interned, fully-qualified schema type names ([`identifier::TypeName`])
//! - **Schema**: Compiled type tables and accessor tables ([`schema::Schema`])
//! - **Values**: Property values and intrinsic functions ([`value`], [`function`])
//! - **Objects**: Schema-typed property containers and their accessors ([`object::Object`])
//! - **Template**: The template document and its registries ([`template::Template`])
//! - **References**: Reference collection and validation ([`reference`] module)

pub mod definitions;
pub mod error;
pub mod function;
pub mod identifier;
pub mod object;
pub mod property;
pub mod reference;
pub mod resource;
pub mod schema;
pub mod template;
pub mod value;

#[cfg(test)]
mod test_support;

pub use definitions::{Condition, Mapping, Output, Parameter};
pub use error::TemplateError;
pub use function::Function;
pub use identifier::TypeName;
pub use object::{Object, Properties};
pub use property::{PropertyValue, ShapeKind};
pub use reference::{
    OriginKind, PSEUDO_PARAMETERS, ReferenceReport, ReferenceValidator, ReferenceViolation,
    References,
};
pub use resource::Resource;
pub use schema::Schema;
pub use template::Template;
pub use value::Value;
