//! DigitalOceanDatabaseCluster

use super::{DIGITAL_OCEAN_REGION, DigitalOceanRegion};
use crate::credentials::DigitalOceanProviderConfig;
use crate::resource::cloud_resource;
use crate::shared::{STRING_VALUE_OR_REF, StringValueOrRef};
use planton_core::reflect::{FieldDescriptor, Kind, MessageDescriptor};
use planton_core::{impl_message, proto_enum};
use serde::{Deserialize, Serialize};

proto_enum! {
    pub enum DigitalOceanDatabaseEngine as DIGITAL_OCEAN_DATABASE_ENGINE(
        "org.project_planton.provider.digitalocean.digitaloceandatabasecluster.v1.DigitalOceanDatabaseEngine"
    ) {
        Unspecified = 0 => "digital_ocean_database_engine_unspecified",
        Pg = 1 => "pg",
        Mysql = 2 => "mysql",
        Redis = 3 => "redis",
        Mongodb = 4 => "mongodb",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DigitalOceanDatabaseClusterSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<DigitalOceanDatabaseEngine>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<DigitalOceanRegion>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_slug: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc: Option<StringValueOrRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_gib: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_public_connectivity: Option<bool>,
}

pub static DIGITAL_OCEAN_DATABASE_CLUSTER_SPEC: MessageDescriptor = MessageDescriptor {
    full_name: "org.project_planton.provider.digitalocean.digitaloceandatabasecluster.v1.DigitalOceanDatabaseClusterSpec",
    fields: &[
        FieldDescriptor::singular("cluster_name", 1, Kind::String),
        FieldDescriptor::singular("engine", 2, Kind::Enum(&DIGITAL_OCEAN_DATABASE_ENGINE)),
        FieldDescriptor::singular("engine_version", 3, Kind::String),
        FieldDescriptor::singular("region", 4, Kind::Enum(&DIGITAL_OCEAN_REGION)),
        FieldDescriptor::singular("size_slug", 5, Kind::String).with_default("db-s-1vcpu-1gb"),
        FieldDescriptor::singular("node_count", 6, Kind::Uint32).with_default("1"),
        FieldDescriptor::singular("vpc", 7, Kind::Message(&STRING_VALUE_OR_REF)),
        FieldDescriptor::singular("storage_gib", 8, Kind::Uint32),
        FieldDescriptor::singular("enable_public_connectivity", 9, Kind::Bool).with_default("false"),
    ],
};

impl_message! {
    DigitalOceanDatabaseClusterSpec => DIGITAL_OCEAN_DATABASE_CLUSTER_SPEC;
    scalars: [cluster_name, engine_version, size_slug, node_count, storage_gib, enable_public_connectivity];
    enums: [engine, region];
    messages: [vpc];
}

cloud_resource! {
    pub struct DigitalOceanDatabaseCluster as DIGITAL_OCEAN_DATABASE_CLUSTER(
        "org.project_planton.provider.digitalocean.digitaloceandatabasecluster.v1.DigitalOceanDatabaseCluster"
    ) {
        api_version: "digital-ocean.project-planton.org/v1",
        kind: DigitalOceanDatabaseCluster,
        spec: DigitalOceanDatabaseClusterSpec => DIGITAL_OCEAN_DATABASE_CLUSTER_SPEC,
        stack_input: DigitalOceanDatabaseClusterStackInput<DigitalOceanProviderConfig>,
    }
}
