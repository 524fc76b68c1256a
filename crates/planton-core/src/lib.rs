//! Planton Core
//!
//! Schema reflection for resource specs and the default-application walker.
//!
//! ```text
//! manifest (YAML) ──► typed spec ──► apply_defaults ──► provisioning module
//!                         │
//!                         └── MessageDescriptor / FieldDescriptor tables
//! ```

pub mod defaults;
pub mod error;
pub mod reflect;

// Re-exports
pub use defaults::{
    DeclaredDefault, apply_defaults, apply_defaults_optional, convert_string_to_field_value,
    declared_defaults,
};
pub use error::{Result, SchemaError};
pub use reflect::{FieldDescriptor, Kind, Message, MessageDescriptor, ProtoEnum, Value};
