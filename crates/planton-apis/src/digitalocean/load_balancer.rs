//! DigitalOceanLoadBalancer

use super::{DIGITAL_OCEAN_REGION, DigitalOceanRegion};
use crate::credentials::DigitalOceanProviderConfig;
use crate::resource::cloud_resource;
use crate::shared::{STRING_VALUE_OR_REF, StringValueOrRef};
use planton_core::reflect::{FieldDescriptor, Kind, MessageDescriptor};
use planton_core::{impl_message, proto_enum};
use serde::{Deserialize, Serialize};

proto_enum! {
    pub enum DigitalOceanLoadBalancerProtocol as DIGITAL_OCEAN_LOAD_BALANCER_PROTOCOL(
        "org.project_planton.provider.digitalocean.digitaloceanloadbalancer.v1.DigitalOceanLoadBalancerProtocol"
    ) {
        Unspecified = 0 => "digital_ocean_load_balancer_protocol_unspecified",
        Http = 1 => "http",
        Https = 2 => "https",
        Http2 = 3 => "http2",
        Tcp = 4 => "tcp",
        Udp = 5 => "udp",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DigitalOceanLoadBalancerForwardingRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_port: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_protocol: Option<DigitalOceanLoadBalancerProtocol>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_port: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_protocol: Option<DigitalOceanLoadBalancerProtocol>,

    /// Name of a DigitalOcean certificate, required for https entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_name: Option<String>,
}

pub static DIGITAL_OCEAN_LOAD_BALANCER_FORWARDING_RULE: MessageDescriptor = MessageDescriptor {
    full_name: "org.project_planton.provider.digitalocean.digitaloceanloadbalancer.v1.DigitalOceanLoadBalancerForwardingRule",
    fields: &[
        FieldDescriptor::singular("entry_port", 1, Kind::Uint32),
        FieldDescriptor::singular("entry_protocol", 2, Kind::Enum(&DIGITAL_OCEAN_LOAD_BALANCER_PROTOCOL)),
        FieldDescriptor::singular("target_port", 3, Kind::Uint32),
        FieldDescriptor::singular("target_protocol", 4, Kind::Enum(&DIGITAL_OCEAN_LOAD_BALANCER_PROTOCOL)),
        FieldDescriptor::singular("certificate_name", 5, Kind::String),
    ],
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DigitalOceanLoadBalancerHealthCheck {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<DigitalOceanLoadBalancerProtocol>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_interval_sec: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_timeout_sec: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthy_threshold: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unhealthy_threshold: Option<u32>,
}

pub static DIGITAL_OCEAN_LOAD_BALANCER_HEALTH_CHECK: MessageDescriptor = MessageDescriptor {
    full_name: "org.project_planton.provider.digitalocean.digitaloceanloadbalancer.v1.DigitalOceanLoadBalancerHealthCheck",
    fields: &[
        FieldDescriptor::singular("port", 1, Kind::Uint32),
        FieldDescriptor::singular("protocol", 2, Kind::Enum(&DIGITAL_OCEAN_LOAD_BALANCER_PROTOCOL))
            .with_default("http"),
        FieldDescriptor::singular("path", 3, Kind::String).with_default("/"),
        FieldDescriptor::singular("check_interval_sec", 4, Kind::Uint32).with_default("10"),
        FieldDescriptor::singular("response_timeout_sec", 5, Kind::Uint32).with_default("5"),
        FieldDescriptor::singular("healthy_threshold", 6, Kind::Uint32).with_default("3"),
        FieldDescriptor::singular("unhealthy_threshold", 7, Kind::Uint32).with_default("3"),
    ],
};

impl_message! {
    DigitalOceanLoadBalancerHealthCheck => DIGITAL_OCEAN_LOAD_BALANCER_HEALTH_CHECK;
    scalars: [port, path, check_interval_sec, response_timeout_sec, healthy_threshold, unhealthy_threshold];
    enums: [protocol];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DigitalOceanLoadBalancerSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_balancer_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<DigitalOceanRegion>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc: Option<StringValueOrRef>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub forwarding_rules: Vec<DigitalOceanLoadBalancerForwardingRule>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check: Option<DigitalOceanLoadBalancerHealthCheck>,

    /// Explicit droplet targets; mutually exclusive with `droplet_tag`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub droplet_ids: Vec<StringValueOrRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub droplet_tag: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_sticky_sessions: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_unit: Option<u32>,
}

pub static DIGITAL_OCEAN_LOAD_BALANCER_SPEC: MessageDescriptor = MessageDescriptor {
    full_name: "org.project_planton.provider.digitalocean.digitaloceanloadbalancer.v1.DigitalOceanLoadBalancerSpec",
    fields: &[
        FieldDescriptor::singular("load_balancer_name", 1, Kind::String),
        FieldDescriptor::singular("region", 2, Kind::Enum(&DIGITAL_OCEAN_REGION)),
        FieldDescriptor::singular("vpc", 3, Kind::Message(&STRING_VALUE_OR_REF)),
        FieldDescriptor::repeated(
            "forwarding_rules",
            4,
            Kind::Message(&DIGITAL_OCEAN_LOAD_BALANCER_FORWARDING_RULE),
        ),
        FieldDescriptor::singular(
            "health_check",
            5,
            Kind::Message(&DIGITAL_OCEAN_LOAD_BALANCER_HEALTH_CHECK),
        ),
        FieldDescriptor::repeated("droplet_ids", 6, Kind::Message(&STRING_VALUE_OR_REF)),
        FieldDescriptor::singular("droplet_tag", 7, Kind::String),
        FieldDescriptor::singular("enable_sticky_sessions", 8, Kind::Bool),
        FieldDescriptor::singular("size_unit", 9, Kind::Uint32).with_default("1"),
    ],
};

impl_message! {
    DigitalOceanLoadBalancerSpec => DIGITAL_OCEAN_LOAD_BALANCER_SPEC;
    scalars: [load_balancer_name, droplet_tag, enable_sticky_sessions, size_unit];
    enums: [region];
    messages: [vpc, health_check];
}

cloud_resource! {
    pub struct DigitalOceanLoadBalancer as DIGITAL_OCEAN_LOAD_BALANCER(
        "org.project_planton.provider.digitalocean.digitaloceanloadbalancer.v1.DigitalOceanLoadBalancer"
    ) {
        api_version: "digital-ocean.project-planton.org/v1",
        kind: DigitalOceanLoadBalancer,
        spec: DigitalOceanLoadBalancerSpec => DIGITAL_OCEAN_LOAD_BALANCER_SPEC,
        stack_input: DigitalOceanLoadBalancerStackInput<DigitalOceanProviderConfig>,
    }
}
