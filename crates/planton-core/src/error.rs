//! Schema error types

use thiserror::Error;

/// Errors raised while reflecting over a message or applying defaults
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("failed to convert {value:?} to {kind}: {reason}")]
    Conversion {
        value: String,
        kind: &'static str,
        reason: String,
    },

    #[error("enum value {value:?} not found in enum {enum_name} for field {field}")]
    UnknownEnumValue {
        value: String,
        enum_name: &'static str,
        field: String,
    },

    #[error("enum number {number} not declared in enum {enum_name} for field {field}")]
    UnknownEnumNumber {
        number: i32,
        enum_name: &'static str,
        field: String,
    },

    #[error("unsupported field kind {kind} for field {field}")]
    UnsupportedKind { kind: &'static str, field: String },

    #[error("type mismatch for field {field}: expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("field {field} cannot be set on message {message}")]
    UnknownField { message: String, field: String },

    #[error("failed to apply default to field {field}: {source}")]
    Default {
        field: String,
        #[source]
        source: Box<SchemaError>,
    },
}

pub type Result<T> = std::result::Result<T, SchemaError>;
