//! Dispatch a manifest to its cloud provider's provisioning module

use crate::StackArgs;
use anyhow::bail;
use planton_apis::{CloudProvider, Manifest};
use planton_iac::StackContext;
use tracing::debug;

pub async fn provision(
    ctx: &mut StackContext<'_>,
    manifest: Manifest,
    args: &StackArgs,
) -> anyhow::Result<()> {
    let kind = manifest.kind();
    match kind.provider() {
        Some(CloudProvider::DigitalOcean) => {
            let config =
                planton_config::resolve_digitalocean(args.digitalocean_credential.as_deref())?;
            debug!(credentials = config.is_some(), "DigitalOcean provider");
            planton_provider_digitalocean::provision(ctx, manifest, config).await?;
        }
        Some(CloudProvider::Aws) => {
            let config = planton_config::resolve_aws(args.aws_credential.as_deref())?;
            debug!(credentials = config.is_some(), "AWS provider");
            planton_provider_aws::provision(ctx, manifest, config).await?;
        }
        None => bail!("No provisioning module for resource kind {}", kind),
    }
    Ok(())
}
