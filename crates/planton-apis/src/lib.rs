//! Planton APIs
//!
//! Typed schemas for every supported cloud resource, the stack input
//! contract handed to provisioning modules, and manifest loading.
//!
//! # Supported kinds
//!
//! - **DigitalOcean**: VPC, container registry, database cluster, load
//!   balancer, Kubernetes cluster, DNS zone
//! - **AWS**: VPC, S3 bucket

pub mod aws;
pub mod credentials;
pub mod digitalocean;
pub mod error;
pub mod kind;
pub mod labels;
pub mod manifest;
pub mod resource;
pub mod shared;

// Re-exports
pub use credentials::{AwsProviderConfig, DigitalOceanProviderConfig};
pub use error::{ApiError, Result};
pub use kind::{CloudProvider, CloudResourceKind};
pub use manifest::{
    Manifest, Override, descriptor_for, fetch_manifest, is_manifest_url, load_manifest,
    parse_manifest, resolve_manifest,
};
pub use resource::CloudResource;
pub use shared::{
    ApiResourceMetadata, Provisioner, PulumiStackInfo, StackInput, StringValueOrRef,
    TerraformStackInfo, ValueFromRef,
};
