//! DigitalOceanKubernetesCluster

use super::{DIGITAL_OCEAN_REGION, DigitalOceanRegion};
use crate::credentials::DigitalOceanProviderConfig;
use crate::resource::cloud_resource;
use crate::shared::{STRING_VALUE_OR_REF, StringValueOrRef};
use planton_core::impl_message;
use planton_core::reflect::{FieldDescriptor, Kind, MessageDescriptor};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DigitalOceanKubernetesClusterDefaultNodePool {
    /// Droplet size slug for every node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_scale: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_nodes: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_nodes: Option<u32>,
}

pub static DIGITAL_OCEAN_KUBERNETES_CLUSTER_DEFAULT_NODE_POOL: MessageDescriptor = MessageDescriptor {
    full_name: "org.project_planton.provider.digitalocean.digitaloceankubernetescluster.v1.DigitalOceanKubernetesClusterDefaultNodePool",
    fields: &[
        FieldDescriptor::singular("size", 1, Kind::String).with_default("s-2vcpu-4gb"),
        FieldDescriptor::singular("node_count", 2, Kind::Uint32).with_default("3"),
        FieldDescriptor::singular("auto_scale", 3, Kind::Bool),
        FieldDescriptor::singular("min_nodes", 4, Kind::Uint32),
        FieldDescriptor::singular("max_nodes", 5, Kind::Uint32),
    ],
};

impl_message! {
    DigitalOceanKubernetesClusterDefaultNodePool => DIGITAL_OCEAN_KUBERNETES_CLUSTER_DEFAULT_NODE_POOL;
    scalars: [size, node_count, auto_scale, min_nodes, max_nodes];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DigitalOceanKubernetesClusterMaintenancePolicy {
    /// Weekday name or `any`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,

    /// UTC start time (`HH:MM`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
}

pub static DIGITAL_OCEAN_KUBERNETES_CLUSTER_MAINTENANCE_POLICY: MessageDescriptor = MessageDescriptor {
    full_name: "org.project_planton.provider.digitalocean.digitaloceankubernetescluster.v1.DigitalOceanKubernetesClusterMaintenancePolicy",
    fields: &[
        FieldDescriptor::singular("day", 1, Kind::String).with_default("any"),
        FieldDescriptor::singular("start_time", 2, Kind::String).with_default("00:00"),
    ],
};

impl_message! {
    DigitalOceanKubernetesClusterMaintenancePolicy => DIGITAL_OCEAN_KUBERNETES_CLUSTER_MAINTENANCE_POLICY;
    scalars: [day, start_time];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DigitalOceanKubernetesClusterSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<DigitalOceanRegion>,

    /// Version slug, e.g. `1.31.1-do.4`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubernetes_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc: Option<StringValueOrRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub highly_available: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_upgrade: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_surge_upgrade: Option<bool>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_node_pool: Option<DigitalOceanKubernetesClusterDefaultNodePool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_policy: Option<DigitalOceanKubernetesClusterMaintenancePolicy>,

    /// Source CIDRs allowed to reach the control plane; empty leaves it open
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub control_plane_allowed_ips: Vec<String>,
}

pub static DIGITAL_OCEAN_KUBERNETES_CLUSTER_SPEC: MessageDescriptor = MessageDescriptor {
    full_name: "org.project_planton.provider.digitalocean.digitaloceankubernetescluster.v1.DigitalOceanKubernetesClusterSpec",
    fields: &[
        FieldDescriptor::singular("cluster_name", 1, Kind::String),
        FieldDescriptor::singular("region", 2, Kind::Enum(&DIGITAL_OCEAN_REGION)),
        FieldDescriptor::singular("kubernetes_version", 3, Kind::String),
        FieldDescriptor::singular("vpc", 4, Kind::Message(&STRING_VALUE_OR_REF)),
        FieldDescriptor::singular("highly_available", 5, Kind::Bool),
        FieldDescriptor::singular("auto_upgrade", 6, Kind::Bool).with_default("true"),
        FieldDescriptor::singular("disable_surge_upgrade", 7, Kind::Bool),
        FieldDescriptor::repeated("tags", 8, Kind::String),
        FieldDescriptor::singular(
            "default_node_pool",
            9,
            Kind::Message(&DIGITAL_OCEAN_KUBERNETES_CLUSTER_DEFAULT_NODE_POOL),
        ),
        FieldDescriptor::singular(
            "maintenance_policy",
            10,
            Kind::Message(&DIGITAL_OCEAN_KUBERNETES_CLUSTER_MAINTENANCE_POLICY),
        ),
        FieldDescriptor::repeated("control_plane_allowed_ips", 11, Kind::String),
    ],
};

impl_message! {
    DigitalOceanKubernetesClusterSpec => DIGITAL_OCEAN_KUBERNETES_CLUSTER_SPEC;
    scalars: [cluster_name, kubernetes_version, highly_available, auto_upgrade, disable_surge_upgrade];
    enums: [region];
    messages: [vpc, default_node_pool, maintenance_policy];
}

cloud_resource! {
    pub struct DigitalOceanKubernetesCluster as DIGITAL_OCEAN_KUBERNETES_CLUSTER(
        "org.project_planton.provider.digitalocean.digitaloceankubernetescluster.v1.DigitalOceanKubernetesCluster"
    ) {
        api_version: "digital-ocean.project-planton.org/v1",
        kind: DigitalOceanKubernetesCluster,
        spec: DigitalOceanKubernetesClusterSpec => DIGITAL_OCEAN_KUBERNETES_CLUSTER_SPEC,
        stack_input: DigitalOceanKubernetesClusterStackInput<DigitalOceanProviderConfig>,
    }
}
