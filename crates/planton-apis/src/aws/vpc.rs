//! AwsVpc

use crate::credentials::AwsProviderConfig;
use crate::resource::cloud_resource;
use planton_core::impl_message;
use planton_core::reflect::{FieldDescriptor, Kind, MessageDescriptor};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AwsVpcSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_cidr: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub availability_zones: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnets_per_availability_zone: Option<u32>,

    /// Prefix length of every subnet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_size: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_nat_gateway_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_dns_hostnames_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_dns_support_enabled: Option<bool>,
}

pub static AWS_VPC_SPEC: MessageDescriptor = MessageDescriptor {
    full_name: "org.project_planton.provider.aws.awsvpc.v1.AwsVpcSpec",
    fields: &[
        FieldDescriptor::singular("vpc_cidr", 1, Kind::String).with_default("10.0.0.0/16"),
        FieldDescriptor::repeated("availability_zones", 2, Kind::String),
        FieldDescriptor::singular("subnets_per_availability_zone", 3, Kind::Uint32).with_default("1"),
        FieldDescriptor::singular("subnet_size", 4, Kind::Uint32).with_default("24"),
        FieldDescriptor::singular("is_nat_gateway_enabled", 5, Kind::Bool),
        FieldDescriptor::singular("is_dns_hostnames_enabled", 6, Kind::Bool).with_default("true"),
        FieldDescriptor::singular("is_dns_support_enabled", 7, Kind::Bool).with_default("true"),
    ],
};

impl_message! {
    AwsVpcSpec => AWS_VPC_SPEC;
    scalars: [
        vpc_cidr,
        subnets_per_availability_zone,
        subnet_size,
        is_nat_gateway_enabled,
        is_dns_hostnames_enabled,
        is_dns_support_enabled,
    ];
}

cloud_resource! {
    pub struct AwsVpc as AWS_VPC("org.project_planton.provider.aws.awsvpc.v1.AwsVpc") {
        api_version: "aws.project-planton.org/v1",
        kind: AwsVpc,
        spec: AwsVpcSpec => AWS_VPC_SPEC,
        stack_input: AwsVpcStackInput<AwsProviderConfig>,
    }
}
