//! DigitalOceanContainerRegistry

use super::{DIGITAL_OCEAN_REGION, DigitalOceanRegion};
use crate::credentials::DigitalOceanProviderConfig;
use crate::resource::cloud_resource;
use planton_core::reflect::{FieldDescriptor, Kind, MessageDescriptor};
use planton_core::{impl_message, proto_enum};
use serde::{Deserialize, Serialize};

proto_enum! {
    pub enum DigitalOceanContainerRegistryTier as DIGITAL_OCEAN_CONTAINER_REGISTRY_TIER(
        "org.project_planton.provider.digitalocean.digitaloceancontainerregistry.v1.DigitalOceanContainerRegistryTier"
    ) {
        Unspecified = 0 => "digital_ocean_container_registry_tier_unspecified",
        Starter = 1 => "STARTER",
        Basic = 2 => "BASIC",
        Professional = 3 => "PROFESSIONAL",
    }
}

impl DigitalOceanContainerRegistryTier {
    /// Subscription tier slug
    pub fn slug(&self) -> &'static str {
        match self {
            DigitalOceanContainerRegistryTier::Unspecified
            | DigitalOceanContainerRegistryTier::Starter => "starter",
            DigitalOceanContainerRegistryTier::Basic => "basic",
            DigitalOceanContainerRegistryTier::Professional => "professional",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DigitalOceanContainerRegistrySpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_tier: Option<DigitalOceanContainerRegistryTier>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<DigitalOceanRegion>,

    /// Run the nightly garbage collector over untagged manifests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub garbage_collection_enabled: Option<bool>,

    /// Also create read/write docker credentials
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_docker_credentials: Option<bool>,
}

pub static DIGITAL_OCEAN_CONTAINER_REGISTRY_SPEC: MessageDescriptor = MessageDescriptor {
    full_name: "org.project_planton.provider.digitalocean.digitaloceancontainerregistry.v1.DigitalOceanContainerRegistrySpec",
    fields: &[
        FieldDescriptor::singular(
            "subscription_tier",
            1,
            Kind::Enum(&DIGITAL_OCEAN_CONTAINER_REGISTRY_TIER),
        )
        .with_default("STARTER"),
        FieldDescriptor::singular("region", 2, Kind::Enum(&DIGITAL_OCEAN_REGION)),
        FieldDescriptor::singular("garbage_collection_enabled", 3, Kind::Bool),
        FieldDescriptor::singular("create_docker_credentials", 4, Kind::Bool).with_default("true"),
    ],
};

impl_message! {
    DigitalOceanContainerRegistrySpec => DIGITAL_OCEAN_CONTAINER_REGISTRY_SPEC;
    scalars: [garbage_collection_enabled, create_docker_credentials];
    enums: [subscription_tier, region];
}

cloud_resource! {
    pub struct DigitalOceanContainerRegistry as DIGITAL_OCEAN_CONTAINER_REGISTRY(
        "org.project_planton.provider.digitalocean.digitaloceancontainerregistry.v1.DigitalOceanContainerRegistry"
    ) {
        api_version: "digital-ocean.project-planton.org/v1",
        kind: DigitalOceanContainerRegistry,
        spec: DigitalOceanContainerRegistrySpec => DIGITAL_OCEAN_CONTAINER_REGISTRY_SPEC,
        stack_input: DigitalOceanContainerRegistryStackInput<DigitalOceanProviderConfig>,
    }
}
