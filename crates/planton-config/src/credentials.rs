//! Provider credential discovery
//!
//! An explicit credential file wins over the environment. Files are YAML in
//! the provider config's camelCase shape, for example:
//!
//! ```yaml
//! accessKeyId: AKIA...
//! secretAccessKey: ...
//! region: eu-west-1
//! ```

use crate::error::{ConfigError, Result};
use planton_apis::{AwsProviderConfig, DigitalOceanProviderConfig};
use planton_core::{Message, apply_defaults};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

fn env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Read a credential file and apply schema defaults
pub fn load_credentials<C>(path: &Path) -> Result<C>
where
    C: Message + DeserializeOwned,
{
    let content = std::fs::read_to_string(path)?;
    let mut config: C = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    apply_defaults(&mut config).map_err(|source| ConfigError::Credentials {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(config)
}

/// `DIGITALOCEAN_TOKEN` (or `DIGITALOCEAN_ACCESS_TOKEN`) plus optional
/// Spaces keys
pub fn digitalocean_from_env() -> Option<DigitalOceanProviderConfig> {
    let api_token = env("DIGITALOCEAN_TOKEN").or_else(|| env("DIGITALOCEAN_ACCESS_TOKEN"))?;
    Some(DigitalOceanProviderConfig {
        api_token: Some(api_token),
        spaces_access_id: env("SPACES_ACCESS_KEY_ID"),
        spaces_secret_key: env("SPACES_SECRET_ACCESS_KEY"),
    })
}

/// AWS access keys from the standard `AWS_*` variables
///
/// The region falls back to `AWS_DEFAULT_REGION`, then to the schema default.
pub fn aws_from_env() -> Option<AwsProviderConfig> {
    let access_key_id = env("AWS_ACCESS_KEY_ID")?;
    let secret_access_key = env("AWS_SECRET_ACCESS_KEY")?;
    let mut config = AwsProviderConfig {
        account_id: env("AWS_ACCOUNT_ID"),
        access_key_id: Some(access_key_id),
        secret_access_key: Some(secret_access_key),
        region: env("AWS_REGION").or_else(|| env("AWS_DEFAULT_REGION")),
        session_token: env("AWS_SESSION_TOKEN"),
    };
    if config.region.is_none() {
        // The region default is a literal and always converts
        apply_defaults(&mut config).ok()?;
    }
    Some(config)
}

pub fn resolve_digitalocean(file: Option<&Path>) -> Result<Option<DigitalOceanProviderConfig>> {
    match file {
        Some(path) => {
            debug!(path = %path.display(), "Loading DigitalOcean credentials");
            load_credentials(path).map(Some)
        }
        None => Ok(digitalocean_from_env()),
    }
}

pub fn resolve_aws(file: Option<&Path>) -> Result<Option<AwsProviderConfig>> {
    match file {
        Some(path) => {
            debug!(path = %path.display(), "Loading AWS credentials");
            load_credentials(path).map(Some)
        }
        None => Ok(aws_from_env()),
    }
}
