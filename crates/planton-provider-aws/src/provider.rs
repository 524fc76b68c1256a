//! AWS provider construction

use crate::error::{Context, Result};
use planton_apis::AwsProviderConfig;
use planton_iac::{Inputs, ResourceOptions, StackContext};
use tracing::debug;

pub const PACKAGE: &str = "aws";

/// Register an explicit provider from injected credentials
///
/// `region` overrides the region of the credentials when the resource
/// carries its own. Without credentials the engine's default provider is
/// used and reads the standard `AWS_*` environment.
pub async fn setup(
    ctx: &mut StackContext<'_>,
    config: Option<&AwsProviderConfig>,
    region: Option<&str>,
) -> Result<ResourceOptions> {
    let Some(config) = config else {
        debug!("No AWS credentials given, using the default provider");
        return Ok(ResourceOptions::new());
    };

    let region = region
        .filter(|r| !r.is_empty())
        .or(config.region.as_deref());

    let inputs = Inputs::new()
        .set_opt("region", region)
        .set_secret("accessKey", config.access_key_id.as_deref())
        .set_secret("secretKey", config.secret_access_key.as_deref())
        .set_secret("token", config.session_token.as_deref())
        .set_opt(
            "allowedAccountIds",
            config
                .account_id
                .as_ref()
                .filter(|id| !id.is_empty())
                .map(|id| vec![id.clone()]),
        );

    let provider = ctx
        .provider(PACKAGE, "aws", inputs)
        .await
        .context("failed to set up aws provider")?;
    Ok(ResourceOptions::new().provider(&provider))
}
