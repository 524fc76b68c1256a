//! DigitalOcean provisioning modules for Planton
//!
//! Each module turns one DigitalOcean kind into engine registrations
//! through a [`StackContext`] and exports the kind's stack outputs.
//!
//! | Kind | Resources | Outputs |
//! |------|-----------|---------|
//! | `DigitalOceanVpc` | vpc | `vpc_id`, `urn` |
//! | `DigitalOceanContainerRegistry` | registry, docker credentials | `registry_name`, `server_url` |
//! | `DigitalOceanDatabaseCluster` | cluster, firewall | `cluster_id`, `host`, `port`, `uri` |
//! | `DigitalOceanLoadBalancer` | load balancer | `load_balancer_id`, `ip`, `dns_name` |
//! | `DigitalOceanKubernetesCluster` | cluster | `cluster_id`, `kubeconfig`, `api_server_endpoint` |
//! | `DigitalOceanDnsZone` | domain, records | `zone_name`, `zone_id`, `name_servers` |
//!
//! # Example
//!
//! ```ignore
//! use planton_iac::{PreviewEngine, StackContext};
//!
//! let engine = PreviewEngine::new();
//! let mut ctx = StackContext::new(&engine, "network", "dev");
//! planton_provider_digitalocean::provision(&mut ctx, manifest, None).await?;
//! let run = ctx.finish();
//! ```

pub mod container_registry;
pub mod database_cluster;
pub mod dns_zone;
pub mod error;
pub mod kubernetes_cluster;
pub mod load_balancer;
pub mod locals;
pub mod provider;
pub mod vpc;

pub use error::{DigitalOceanError, Result};

use planton_apis::{DigitalOceanProviderConfig, Manifest, StackInput};
use planton_iac::StackContext;
use tracing::info;

/// Run the module matching the manifest's kind
///
/// The manifest is expected to have defaults applied already.
pub async fn provision(
    ctx: &mut StackContext<'_>,
    manifest: Manifest,
    config: Option<DigitalOceanProviderConfig>,
) -> Result<()> {
    info!(kind = %manifest.kind(), name = manifest.name(), "Provisioning DigitalOcean resource");

    macro_rules! input {
        ($target:expr) => {{
            let input = StackInput::new($target);
            match config {
                Some(config) => input.with_provider_config(config),
                None => input,
            }
        }};
    }

    match manifest {
        Manifest::DigitalOceanVpc(target) => vpc::resources(ctx, &input!(target)).await,
        Manifest::DigitalOceanContainerRegistry(target) => {
            container_registry::resources(ctx, &input!(target)).await
        }
        Manifest::DigitalOceanDatabaseCluster(target) => {
            database_cluster::resources(ctx, &input!(target)).await
        }
        Manifest::DigitalOceanLoadBalancer(target) => {
            load_balancer::resources(ctx, &input!(target)).await
        }
        Manifest::DigitalOceanKubernetesCluster(target) => {
            kubernetes_cluster::resources(ctx, &input!(target)).await
        }
        Manifest::DigitalOceanDnsZone(target) => dns_zone::resources(ctx, &input!(target)).await,
        other => Err(DigitalOceanError::UnsupportedKind(other.kind().to_string())),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use planton_apis::ApiResourceMetadata;

    pub fn metadata(name: &str) -> ApiResourceMetadata {
        ApiResourceMetadata {
            name: Some(name.to_string()),
            id: Some(format!("{}-id", name)),
            org: Some("acme".to_string()),
            env: Some("dev".to_string()),
            ..Default::default()
        }
    }
}
