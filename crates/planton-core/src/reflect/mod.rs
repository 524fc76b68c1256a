//! Schema reflection
//!
//! Resource specs are plain Rust structs whose scalar fields are `Option<T>`,
//! so an explicitly-set zero value is distinguishable from an unset field.
//! Each struct exposes its static [`MessageDescriptor`] and a small
//! reflective surface through the [`Message`] trait, usually generated with
//! [`impl_message!`](crate::impl_message).

pub mod descriptor;
pub mod value;

pub use descriptor::{
    Cardinality, EnumDescriptor, EnumValueDescriptor, FieldDescriptor, Kind, MessageDescriptor,
};
pub use value::{FromValue, ProtoEnum, Value, enum_from_value};

use crate::error::Result;

/// Reflective access to a spec message
pub trait Message {
    /// Schema of this message
    fn descriptor(&self) -> &'static MessageDescriptor;

    /// Whether a singular field holds a value (scalar `Some`, nested message present)
    fn has_field(&self, field: &FieldDescriptor) -> bool;

    /// Store a scalar value into a singular field
    fn set_field(&mut self, field: &FieldDescriptor, value: Value) -> Result<()>;

    /// Mutable access to a populated nested message field
    fn message_mut(&mut self, field: &FieldDescriptor) -> Option<&mut dyn Message>;
}

/// Implement [`Message`] for a spec struct
///
/// Field groups list the struct fields by their schema name:
/// `scalars` are `Option<T>` of a primitive or `String`, `enums` are
/// `Option<E>` with `E: ProtoEnum`, `messages` are `Option<M>` with
/// `M: Message`. Repeated and map fields are not listed.
///
/// ```ignore
/// impl_message! {
///     DigitalOceanVpcSpec => DIGITAL_OCEAN_VPC_SPEC;
///     scalars: [description, ip_range_cidr, is_default_for_region];
///     enums: [region];
/// }
/// ```
#[macro_export]
macro_rules! impl_message {
    (
        $ty:ty => $descriptor:path;
        $(scalars: [$($scalar:ident),* $(,)?];)?
        $(enums: [$($enum_field:ident),* $(,)?];)?
        $(messages: [$($message:ident),* $(,)?];)?
    ) => {
        impl $crate::reflect::Message for $ty {
            fn descriptor(&self) -> &'static $crate::reflect::MessageDescriptor {
                &$descriptor
            }

            #[allow(unused_variables)]
            fn has_field(&self, field: &$crate::reflect::FieldDescriptor) -> bool {
                $($(
                    if field.name == stringify!($scalar) {
                        return self.$scalar.is_some();
                    }
                )*)?
                $($(
                    if field.name == stringify!($enum_field) {
                        return self.$enum_field.is_some();
                    }
                )*)?
                $($(
                    if field.name == stringify!($message) {
                        return self.$message.is_some();
                    }
                )*)?
                false
            }

            #[allow(unused_variables)]
            fn set_field(
                &mut self,
                field: &$crate::reflect::FieldDescriptor,
                value: $crate::reflect::Value,
            ) -> $crate::Result<()> {
                $($(
                    if field.name == stringify!($scalar) {
                        self.$scalar = Some($crate::reflect::FromValue::from_value(value, field)?);
                        return Ok(());
                    }
                )*)?
                $($(
                    if field.name == stringify!($enum_field) {
                        self.$enum_field = Some($crate::reflect::enum_from_value(value, field)?);
                        return Ok(());
                    }
                )*)?
                Err($crate::SchemaError::UnknownField {
                    message: $descriptor.full_name.to_string(),
                    field: field.name.to_string(),
                })
            }

            #[allow(unused_variables)]
            fn message_mut(
                &mut self,
                field: &$crate::reflect::FieldDescriptor,
            ) -> Option<&mut dyn $crate::reflect::Message> {
                $($(
                    if field.name == stringify!($message) {
                        return self
                            .$message
                            .as_mut()
                            .map(|m| m as &mut dyn $crate::reflect::Message);
                    }
                )*)?
                None
            }
        }
    };
}

/// Declare a schema enum: the Rust enum, its static [`EnumDescriptor`] and
/// the [`ProtoEnum`] implementation
///
/// Values serialize by their declared name.
///
/// ```ignore
/// proto_enum! {
///     pub enum Provisioner as PROVISIONER("org.project_planton.shared.IacProvisioner") {
///         Unspecified = 0 => "iac_provisioner_unspecified",
///         Pulumi = 1 => "pulumi",
///     }
/// }
/// ```
#[macro_export]
macro_rules! proto_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident as $descriptor:ident ($full_name:literal) {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $number:literal => $value_name:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $value_name)]
                $variant = $number,
            )+
        }

        $vis static $descriptor: $crate::reflect::EnumDescriptor = $crate::reflect::EnumDescriptor {
            full_name: $full_name,
            values: &[
                $(
                    $crate::reflect::EnumValueDescriptor {
                        name: $value_name,
                        number: $number,
                    },
                )+
            ],
        };

        impl $crate::reflect::ProtoEnum for $name {
            fn enum_descriptor() -> &'static $crate::reflect::EnumDescriptor {
                &$descriptor
            }

            fn from_number(number: i32) -> Option<Self> {
                match number {
                    $($number => Some($name::$variant),)+
                    _ => None,
                }
            }

            fn number(self) -> i32 {
                self as i32
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::reflect::ProtoEnum::name(*self))
            }
        }
    };
}
