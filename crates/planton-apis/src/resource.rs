//! Top-level resource envelope shared by every kind

use crate::error::{ApiError, Result};
use crate::kind::CloudResourceKind;
use crate::labels::resource_labels;
use crate::shared::ApiResourceMetadata;
use planton_core::Message;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// A typed resource manifest (`apiVersion`, `kind`, `metadata`, `spec`)
pub trait CloudResource: Message + Serialize + DeserializeOwned {
    const KIND: CloudResourceKind;

    type Spec;

    fn metadata(&self) -> Option<&ApiResourceMetadata>;

    fn spec(&self) -> Option<&Self::Spec>;

    fn name(&self) -> &str {
        self.metadata().map(|m| m.name()).unwrap_or_default()
    }

    /// Standard labels derived from metadata
    fn labels(&self) -> BTreeMap<String, String> {
        match self.metadata() {
            Some(metadata) => resource_labels(metadata, Self::KIND),
            None => resource_labels(&ApiResourceMetadata::default(), Self::KIND),
        }
    }

    fn require_spec(&self) -> Result<&Self::Spec> {
        self.spec()
            .ok_or_else(|| ApiError::MissingField("spec".to_string()))
    }
}

/// Declare a resource envelope struct, its descriptor, its
/// [`CloudResource`] implementation and its stack input alias
macro_rules! cloud_resource {
    (
        $(#[$meta:meta])*
        pub struct $name:ident as $descriptor:ident ($full_name:literal) {
            api_version: $api_version:literal,
            kind: $kind:ident,
            spec: $spec:ident => $spec_descriptor:ident,
            stack_input: $stack_input:ident<$credential:ty>,
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(default, rename_all = "camelCase", deny_unknown_fields)]
        pub struct $name {
            #[serde(skip_serializing_if = "Option::is_none")]
            pub api_version: Option<String>,

            #[serde(skip_serializing_if = "Option::is_none")]
            pub kind: Option<String>,

            #[serde(skip_serializing_if = "Option::is_none")]
            pub metadata: Option<$crate::shared::ApiResourceMetadata>,

            #[serde(skip_serializing_if = "Option::is_none")]
            pub spec: Option<$spec>,
        }

        pub static $descriptor: ::planton_core::MessageDescriptor = ::planton_core::MessageDescriptor {
            full_name: $full_name,
            fields: &[
                ::planton_core::FieldDescriptor::singular("api_version", 1, ::planton_core::Kind::String)
                    .with_default($api_version),
                ::planton_core::FieldDescriptor::singular("kind", 2, ::planton_core::Kind::String)
                    .with_default(stringify!($kind)),
                ::planton_core::FieldDescriptor::singular(
                    "metadata",
                    3,
                    ::planton_core::Kind::Message(&$crate::shared::API_RESOURCE_METADATA),
                ),
                ::planton_core::FieldDescriptor::singular(
                    "spec",
                    4,
                    ::planton_core::Kind::Message(&$spec_descriptor),
                ),
            ],
        };

        ::planton_core::impl_message! {
            $name => $descriptor;
            scalars: [api_version, kind];
            messages: [metadata, spec];
        }

        impl $crate::resource::CloudResource for $name {
            const KIND: $crate::kind::CloudResourceKind = $crate::kind::CloudResourceKind::$kind;

            type Spec = $spec;

            fn metadata(&self) -> Option<&$crate::shared::ApiResourceMetadata> {
                self.metadata.as_ref()
            }

            fn spec(&self) -> Option<&$spec> {
                self.spec.as_ref()
            }
        }

        pub type $stack_input = $crate::shared::StackInput<$name, $credential>;
    };
}

pub(crate) use cloud_resource;
