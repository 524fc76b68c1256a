//! DigitalOcean provider construction

use crate::error::{Context, Result};
use planton_apis::DigitalOceanProviderConfig;
use planton_iac::{Inputs, ResourceOptions, StackContext};
use tracing::debug;

pub const PACKAGE: &str = "digitalocean";

/// Register an explicit provider from injected credentials
///
/// Without credentials the engine's default provider is used, which reads
/// `DIGITALOCEAN_TOKEN` from the environment.
pub async fn setup(
    ctx: &mut StackContext<'_>,
    config: Option<&DigitalOceanProviderConfig>,
) -> Result<ResourceOptions> {
    let Some(config) = config else {
        debug!("No DigitalOcean credentials given, using the default provider");
        return Ok(ResourceOptions::new());
    };

    let inputs = Inputs::new()
        .set_secret("token", config.api_token.as_deref())
        .set_opt("spacesAccessId", config.spaces_access_id.as_deref())
        .set_secret("spacesSecretKey", config.spaces_secret_key.as_deref());

    let provider = ctx
        .provider(PACKAGE, "digitalocean", inputs)
        .await
        .context("failed to set up digitalocean provider")?;
    Ok(ResourceOptions::new().provider(&provider))
}
