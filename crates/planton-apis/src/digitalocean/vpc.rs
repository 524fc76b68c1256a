//! DigitalOceanVpc

use super::{DIGITAL_OCEAN_REGION, DigitalOceanRegion};
use crate::credentials::DigitalOceanProviderConfig;
use crate::resource::cloud_resource;
use planton_core::impl_message;
use planton_core::reflect::{FieldDescriptor, Kind, MessageDescriptor};
use serde::{Deserialize, Serialize};

/// Private network in a single region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DigitalOceanVpcSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<DigitalOceanRegion>,

    /// Private IPv4 range; DigitalOcean picks one when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_range_cidr: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default_for_region: Option<bool>,
}

pub static DIGITAL_OCEAN_VPC_SPEC: MessageDescriptor = MessageDescriptor {
    full_name: "org.project_planton.provider.digitalocean.digitaloceanvpc.v1.DigitalOceanVpcSpec",
    fields: &[
        FieldDescriptor::singular("description", 1, Kind::String),
        FieldDescriptor::singular("region", 2, Kind::Enum(&DIGITAL_OCEAN_REGION)),
        FieldDescriptor::singular("ip_range_cidr", 3, Kind::String),
        FieldDescriptor::singular("is_default_for_region", 4, Kind::Bool).with_default("false"),
    ],
};

impl_message! {
    DigitalOceanVpcSpec => DIGITAL_OCEAN_VPC_SPEC;
    scalars: [description, ip_range_cidr, is_default_for_region];
    enums: [region];
}

cloud_resource! {
    pub struct DigitalOceanVpc as DIGITAL_OCEAN_VPC("org.project_planton.provider.digitalocean.digitaloceanvpc.v1.DigitalOceanVpc") {
        api_version: "digital-ocean.project-planton.org/v1",
        kind: DigitalOceanVpc,
        spec: DigitalOceanVpcSpec => DIGITAL_OCEAN_VPC_SPEC,
        stack_input: DigitalOceanVpcStackInput<DigitalOceanProviderConfig>,
    }
}
