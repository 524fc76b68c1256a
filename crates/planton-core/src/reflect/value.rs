//! Typed field values

use crate::error::{Result, SchemaError};
use crate::reflect::descriptor::{EnumDescriptor, FieldDescriptor};
use std::fmt;

/// A typed scalar value that can be stored into a message field
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int32(i32),
    Int64(i64),
    Uint32(u32),
    Uint64(u64),
    Bool(bool),
    Float(f32),
    Double(f64),
    /// Enum value by number
    Enum(i32),
}

impl Value {
    /// Protobuf-style kind name of the value
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::Uint32(_) => "uint32",
            Value::Uint64(_) => "uint64",
            Value::Bool(_) => "bool",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Enum(_) => "enum",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_enum_number(&self) -> Option<i32> {
        match self {
            Value::Enum(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::Uint32(v) => write!(f, "{}", v),
            Value::Uint64(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Enum(v) => write!(f, "{}", v),
        }
    }
}

/// Extraction of a native Rust value out of a [`Value`]
pub trait FromValue: Sized {
    fn from_value(value: Value, field: &FieldDescriptor) -> Result<Self>;
}

macro_rules! impl_value_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value, field: &FieldDescriptor) -> Result<Self> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(SchemaError::TypeMismatch {
                            field: field.name.to_string(),
                            expected: field.kind.name(),
                            actual: other.kind_name(),
                        }),
                    }
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_value_conversions! {
    String => String,
    i32 => Int32,
    i64 => Int64,
    u32 => Uint32,
    u64 => Uint64,
    bool => Bool,
    f32 => Float,
    f64 => Double,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

/// A Rust enum generated from a schema enum
///
/// Implemented through [`proto_enum!`](crate::proto_enum).
pub trait ProtoEnum: Sized + Copy + 'static {
    fn enum_descriptor() -> &'static EnumDescriptor;

    fn from_number(number: i32) -> Option<Self>;

    fn number(self) -> i32;

    /// Declared value name
    fn name(self) -> &'static str {
        Self::enum_descriptor()
            .value_by_number(self.number())
            .map(|v| v.name)
            .unwrap_or_default()
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::enum_descriptor()
            .value_by_name(name)
            .and_then(|v| Self::from_number(v.number))
    }
}

/// Extract an enum field value
pub fn enum_from_value<E: ProtoEnum>(value: Value, field: &FieldDescriptor) -> Result<E> {
    match value {
        Value::Enum(number) => E::from_number(number).ok_or_else(|| SchemaError::UnknownEnumNumber {
            number,
            enum_name: E::enum_descriptor().full_name,
            field: field.name.to_string(),
        }),
        other => Err(SchemaError::TypeMismatch {
            field: field.name.to_string(),
            expected: "enum",
            actual: other.kind_name(),
        }),
    }
}
