//! Types shared by every resource schema

use crate::error::{ApiError, Result};
use planton_core::reflect::{FieldDescriptor, Kind, MessageDescriptor};
use planton_core::{Message, apply_defaults, apply_defaults_optional, impl_message, proto_enum};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata common to every resource manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ApiResourceMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

pub static API_RESOURCE_METADATA: MessageDescriptor = MessageDescriptor {
    full_name: "org.project_planton.shared.ApiResourceMetadata",
    fields: &[
        FieldDescriptor::singular("name", 1, Kind::String),
        FieldDescriptor::singular("id", 2, Kind::String),
        FieldDescriptor::singular("org", 3, Kind::String),
        FieldDescriptor::singular("env", 4, Kind::String),
        FieldDescriptor::map("labels", 5, Kind::String),
    ],
};

impl_message! {
    ApiResourceMetadata => API_RESOURCE_METADATA;
    scalars: [name, id, org, env];
}

impl ApiResourceMetadata {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    pub fn org(&self) -> &str {
        self.org.as_deref().unwrap_or_default()
    }

    pub fn env(&self) -> &str {
        self.env.as_deref().unwrap_or_default()
    }
}

/// Reference to a field exported by another resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ValueFromRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_path: Option<String>,
}

pub static VALUE_FROM_REF: MessageDescriptor = MessageDescriptor {
    full_name: "org.project_planton.shared.foreignkey.v1.ValueFromRef",
    fields: &[
        FieldDescriptor::singular("kind", 1, Kind::String),
        FieldDescriptor::singular("env", 2, Kind::String),
        FieldDescriptor::singular("name", 3, Kind::String),
        FieldDescriptor::singular("field_path", 4, Kind::String),
    ],
};

impl_message! {
    ValueFromRef => VALUE_FROM_REF;
    scalars: [kind, env, name, field_path];
}

impl std::fmt::Display for ValueFromRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}",
            self.kind.as_deref().unwrap_or("?"),
            self.name.as_deref().unwrap_or("?")
        )?;
        if let Some(path) = &self.field_path {
            write!(f, ".{}", path)?;
        }
        Ok(())
    }
}

/// A literal string, or a reference to another resource's output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct StringValueOrRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_from: Option<ValueFromRef>,
}

pub static STRING_VALUE_OR_REF: MessageDescriptor = MessageDescriptor {
    full_name: "org.project_planton.shared.foreignkey.v1.StringValueOrRef",
    fields: &[
        FieldDescriptor::singular("value", 1, Kind::String),
        FieldDescriptor::singular("value_from", 2, Kind::Message(&VALUE_FROM_REF)),
    ],
};

impl_message! {
    StringValueOrRef => STRING_VALUE_OR_REF;
    scalars: [value];
    messages: [value_from];
}

impl StringValueOrRef {
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            value_from: None,
        }
    }

    /// The literal value; references must be resolved before provisioning
    pub fn resolve(&self, field: &str) -> Result<&str> {
        if let Some(value) = &self.value {
            return Ok(value);
        }
        match &self.value_from {
            Some(reference) => Err(ApiError::UnresolvedReference {
                field: field.to_string(),
                reference: reference.to_string(),
            }),
            None => Err(ApiError::MissingField(field.to_string())),
        }
    }
}

proto_enum! {
    /// IaC engine that drives a stack
    pub enum Provisioner as IAC_PROVISIONER("org.project_planton.shared.IacProvisioner") {
        Unspecified = 0 => "iac_provisioner_unspecified",
        Terraform = 1 => "terraform",
        Pulumi = 2 => "pulumi",
        Tofu = 3 => "tofu",
    }
}

/// Pulumi stack coordinates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PulumiStackInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_name: Option<String>,
}

impl PulumiStackInfo {
    /// Fully-qualified stack name (`org/project/stack`)
    pub fn fqdn(&self) -> Option<String> {
        let stack = self.stack_name.as_deref()?;
        let project = self.project.as_deref()?;
        let org = self.organization.as_deref().unwrap_or("organization");
        Some(format!("{}/{}/{}", org, project, stack))
    }
}

/// Terraform backend coordinates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TerraformStackInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_object: Option<String>,
}

/// Everything a provisioning module receives for one run
///
/// `T` is the target resource, `C` the provider credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackInput<T, C> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioner: Option<Provisioner>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pulumi: Option<PulumiStackInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terraform: Option<TerraformStackInfo>,

    pub target: T,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_config: Option<C>,
}

impl<T, C> StackInput<T, C> {
    pub fn new(target: T) -> Self {
        Self {
            provisioner: None,
            pulumi: None,
            terraform: None,
            target,
            provider_config: None,
        }
    }

    pub fn with_provider_config(mut self, config: C) -> Self {
        self.provider_config = Some(config);
        self
    }

    pub fn with_provisioner(mut self, provisioner: Provisioner) -> Self {
        self.provisioner = Some(provisioner);
        self
    }
}

impl<T: Message, C: Message> StackInput<T, C> {
    /// Apply schema defaults to the target and the provider credential
    pub fn apply_defaults(&mut self) -> Result<()> {
        apply_defaults(&mut self.target)?;
        apply_defaults_optional(self.provider_config.as_mut())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planton_core::ProtoEnum;

    #[test]
    fn test_string_value_or_ref_resolve() {
        let literal = StringValueOrRef::literal("vpc-123");
        assert_eq!(literal.resolve("spec.vpc").unwrap(), "vpc-123");

        let reference = StringValueOrRef {
            value: None,
            value_from: Some(ValueFromRef {
                kind: Some("DigitalOceanVpc".to_string()),
                name: Some("main".to_string()),
                field_path: Some("status.outputs.vpc_id".to_string()),
                ..Default::default()
            }),
        };
        let err = reference.resolve("spec.vpc").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unresolved reference for spec.vpc: DigitalOceanVpc/main.status.outputs.vpc_id"
        );

        assert!(matches!(
            StringValueOrRef::default().resolve("spec.vpc"),
            Err(ApiError::MissingField(_))
        ));
    }

    #[test]
    fn test_provisioner_names() {
        assert_eq!(Provisioner::from_name("tofu"), Some(Provisioner::Tofu));
        assert_eq!(Provisioner::Pulumi.to_string(), "pulumi");
        assert_eq!(Provisioner::Terraform.number(), 1);
        let parsed: Provisioner = serde_yaml::from_str("pulumi").unwrap();
        assert_eq!(parsed, Provisioner::Pulumi);
    }

    #[test]
    fn test_pulumi_fqdn() {
        let info = PulumiStackInfo {
            organization: None,
            project: Some("web".to_string()),
            stack_name: Some("dev".to_string()),
        };
        assert_eq!(info.fqdn().as_deref(), Some("organization/web/dev"));
        assert_eq!(PulumiStackInfo::default().fqdn(), None);
    }

    #[test]
    fn test_metadata_accessors() {
        let metadata: ApiResourceMetadata =
            serde_yaml::from_str("name: main\norg: acme\nlabels:\n  team: core\n").unwrap();
        assert_eq!(metadata.name(), "main");
        assert_eq!(metadata.org(), "acme");
        assert_eq!(metadata.env(), "");
        assert_eq!(metadata.labels.get("team").map(String::as_str), Some("core"));
    }
}
