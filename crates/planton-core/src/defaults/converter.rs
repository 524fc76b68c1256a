//! String-encoded default conversion

use crate::error::{Result, SchemaError};
use crate::reflect::{FieldDescriptor, Kind, Value};

/// Convert a string-encoded default into a typed value for `field`
///
/// Parsing is strict: no surrounding whitespace, base-10 integers with
/// width checks, and only the canonical boolean spellings.
pub fn convert_string_to_field_value(value: &str, field: &FieldDescriptor) -> Result<Value> {
    let kind = field.kind.name();
    let conversion = |reason: String| SchemaError::Conversion {
        value: value.to_string(),
        kind,
        reason,
    };

    match field.kind {
        Kind::String => Ok(Value::String(value.to_string())),
        Kind::Int32 => value
            .parse::<i32>()
            .map(Value::Int32)
            .map_err(|e| conversion(e.to_string())),
        Kind::Int64 => value
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| conversion(e.to_string())),
        Kind::Uint32 => {
            reject_sign(value).map_err(conversion)?;
            value
                .parse::<u32>()
                .map(Value::Uint32)
                .map_err(|e| conversion(e.to_string()))
        }
        Kind::Uint64 => {
            reject_sign(value).map_err(conversion)?;
            value
                .parse::<u64>()
                .map(Value::Uint64)
                .map_err(|e| conversion(e.to_string()))
        }
        Kind::Bool => parse_bool(value)
            .map(Value::Bool)
            .ok_or_else(|| conversion("invalid syntax".to_string())),
        Kind::Float => {
            let parsed = value
                .parse::<f64>()
                .map_err(|e| conversion(e.to_string()))?;
            if parsed.abs() > f64::from(f32::MAX) {
                return Err(conversion("value out of range".to_string()));
            }
            Ok(Value::Float(parsed as f32))
        }
        Kind::Double => {
            let parsed = value
                .parse::<f64>()
                .map_err(|e| conversion(e.to_string()))?;
            if parsed.is_infinite() && !is_infinity_literal(value) {
                return Err(conversion("value out of range".to_string()));
            }
            Ok(Value::Double(parsed))
        }
        Kind::Enum(descriptor) => descriptor
            .value_by_name(value)
            .map(|v| Value::Enum(v.number))
            .ok_or_else(|| SchemaError::UnknownEnumValue {
                value: value.to_string(),
                enum_name: descriptor.full_name,
                field: field.name.to_string(),
            }),
        Kind::Bytes | Kind::Message(_) => Err(SchemaError::UnsupportedKind {
            kind,
            field: field.name.to_string(),
        }),
    }
}

fn reject_sign(value: &str) -> std::result::Result<(), String> {
    if value.starts_with('+') || value.starts_with('-') {
        return Err("invalid syntax".to_string());
    }
    Ok(())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn is_infinity_literal(value: &str) -> bool {
    let unsigned = value.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}
