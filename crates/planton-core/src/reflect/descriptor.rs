//! Static schema descriptors
//!
//! Every spec message carries a `static` [`MessageDescriptor`] describing its
//! fields in declaration order. Descriptors are built with `const fn`
//! constructors so whole schema trees live in read-only data.

use std::fmt;

/// Scalar or composite kind of a field
#[derive(Debug, Clone, Copy)]
pub enum Kind {
    String,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Bool,
    Float,
    Double,
    Enum(&'static EnumDescriptor),
    Message(&'static MessageDescriptor),
    Bytes,
}

impl Kind {
    /// Protobuf-style name of the kind
    pub fn name(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Int32 => "int32",
            Kind::Int64 => "int64",
            Kind::Uint32 => "uint32",
            Kind::Uint64 => "uint64",
            Kind::Bool => "bool",
            Kind::Float => "float",
            Kind::Double => "double",
            Kind::Enum(_) => "enum",
            Kind::Message(_) => "message",
            Kind::Bytes => "bytes",
        }
    }

    pub fn is_message(&self) -> bool {
        matches!(self, Kind::Message(_))
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Enum(e) => write!(f, "enum {}", e.full_name),
            Kind::Message(m) => write!(f, "message {}", m.full_name),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// How many values a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Singular,
    Repeated,
    Map,
}

/// Metadata for a single field
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// Field name as declared in the schema (snake_case)
    pub name: &'static str,

    /// Field number
    pub number: u32,

    /// Value kind
    pub kind: Kind,

    /// Singular, repeated or map
    pub cardinality: Cardinality,

    /// String-encoded default value (the `default` field option)
    pub default: Option<&'static str>,
}

impl FieldDescriptor {
    pub const fn singular(name: &'static str, number: u32, kind: Kind) -> Self {
        Self {
            name,
            number,
            kind,
            cardinality: Cardinality::Singular,
            default: None,
        }
    }

    pub const fn repeated(name: &'static str, number: u32, kind: Kind) -> Self {
        Self {
            name,
            number,
            kind,
            cardinality: Cardinality::Repeated,
            default: None,
        }
    }

    pub const fn map(name: &'static str, number: u32, value_kind: Kind) -> Self {
        Self {
            name,
            number,
            kind: value_kind,
            cardinality: Cardinality::Map,
            default: None,
        }
    }

    /// Attach a string-encoded default
    pub const fn with_default(self, default: &'static str) -> Self {
        Self {
            default: Some(default),
            ..self
        }
    }

    pub fn is_list(&self) -> bool {
        self.cardinality == Cardinality::Repeated
    }

    pub fn is_map(&self) -> bool {
        self.cardinality == Cardinality::Map
    }
}

/// Metadata for a message type
#[derive(Debug)]
pub struct MessageDescriptor {
    /// Fully-qualified name (`package.Message`)
    pub full_name: &'static str,

    /// Fields in declaration order
    pub fields: &'static [FieldDescriptor],
}

impl MessageDescriptor {
    /// Short name without the package
    pub fn name(&self) -> &'static str {
        self.full_name
            .rsplit_once('.')
            .map(|(_, name)| name)
            .unwrap_or(self.full_name)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_by_number(&self, number: u32) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.number == number)
    }

    /// Fully-qualified field name (`package.Message.field`)
    pub fn field_full_name(&self, field: &FieldDescriptor) -> String {
        format!("{}.{}", self.full_name, field.name)
    }
}

/// A declared enum value
#[derive(Debug, Clone, Copy)]
pub struct EnumValueDescriptor {
    pub name: &'static str,
    pub number: i32,
}

/// Metadata for an enum type
#[derive(Debug)]
pub struct EnumDescriptor {
    pub full_name: &'static str,
    pub values: &'static [EnumValueDescriptor],
}

impl EnumDescriptor {
    pub fn value_by_name(&self, name: &str) -> Option<&'static EnumValueDescriptor> {
        self.values.iter().find(|v| v.name == name)
    }

    pub fn value_by_number(&self, number: i32) -> Option<&'static EnumValueDescriptor> {
        self.values.iter().find(|v| v.number == number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static COLOR: EnumDescriptor = EnumDescriptor {
        full_name: "test.v1.Color",
        values: &[
            EnumValueDescriptor {
                name: "color_unspecified",
                number: 0,
            },
            EnumValueDescriptor {
                name: "red",
                number: 1,
            },
        ],
    };

    static PAINT: MessageDescriptor = MessageDescriptor {
        full_name: "test.v1.Paint",
        fields: &[
            FieldDescriptor::singular("brand", 1, Kind::String).with_default("acme"),
            FieldDescriptor::singular("color", 2, Kind::Enum(&COLOR)),
            FieldDescriptor::repeated("layers", 3, Kind::String),
        ],
    };

    #[test]
    fn test_field_lookup() {
        let brand = PAINT.field_by_name("brand").unwrap();
        assert_eq!(brand.number, 1);
        assert_eq!(brand.default, Some("acme"));
        assert!(PAINT.field_by_name("missing").is_none());
        assert_eq!(PAINT.field_by_number(3).unwrap().name, "layers");
        assert!(PAINT.field_by_number(3).unwrap().is_list());
    }

    #[test]
    fn test_full_names() {
        assert_eq!(PAINT.name(), "Paint");
        let color = PAINT.field_by_name("color").unwrap();
        assert_eq!(PAINT.field_full_name(color), "test.v1.Paint.color");
        assert_eq!(color.kind.to_string(), "enum test.v1.Color");
    }

    #[test]
    fn test_enum_lookup() {
        assert_eq!(COLOR.value_by_name("red").unwrap().number, 1);
        assert_eq!(COLOR.value_by_number(0).unwrap().name, "color_unspecified");
        assert!(COLOR.value_by_name("RED").is_none());
    }
}
