//! Property slots.

use std::fmt;

use indexmap::IndexSet;
use serde::{Serialize, Serializer};

use crate::{function::Function, reference::References, value::Value};

/// The kind of slot a property occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Scalar,
    List,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeKind::Scalar => write!(f, "scalar"),
            ShapeKind::List => write!(f, "list"),
        }
    }
}

/// The content of one property slot: a single value or an ordered list.
///
/// Whether a slot is scalar or list shaped is decided by the property's
/// compiled shape and never changes after the slot is created. A list slot
/// holds either literal elements or one intrinsic function that evaluates to
/// the list at deploy time (`{"Ref": "SubnetIds"}`, `Fn::Split`, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Scalar(Value),
    List(Vec<Value>),
    Expr(Box<Function>),
}

impl PropertyValue {
    pub fn kind(&self) -> ShapeKind {
        match self {
            PropertyValue::Scalar(_) => ShapeKind::Scalar,
            PropertyValue::List(_) | PropertyValue::Expr(_) => ShapeKind::List,
        }
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            PropertyValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// The literal elements of a list slot.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            PropertyValue::List(values) => Some(values),
            _ => None,
        }
    }

    /// The function standing in for the elements of a list slot.
    pub fn as_expr(&self) -> Option<&Function> {
        match self {
            PropertyValue::Expr(function) => Some(function),
            _ => None,
        }
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PropertyValue::Scalar(value) => value.serialize(serializer),
            PropertyValue::List(values) => values.serialize(serializer),
            PropertyValue::Expr(function) => function.serialize(serializer),
        }
    }
}

impl References for PropertyValue {
    fn collect_references(&self, refs: &mut IndexSet<String>) {
        match self {
            PropertyValue::Scalar(value) => value.collect_references(refs),
            PropertyValue::List(values) => values.iter().for_each(|v| v.collect_references(refs)),
            PropertyValue::Expr(function) => function.collect_references(refs),
        }
    }
}
