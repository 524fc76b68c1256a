//! Provider credentials handed to provisioning modules

use planton_core::impl_message;
use planton_core::reflect::{FieldDescriptor, Kind, MessageDescriptor};
use serde::{Deserialize, Serialize};

/// DigitalOcean API token and optional Spaces keys
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DigitalOceanProviderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub spaces_access_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub spaces_secret_key: Option<String>,
}

pub static DIGITAL_OCEAN_PROVIDER_CONFIG: MessageDescriptor = MessageDescriptor {
    full_name: "org.project_planton.provider.digitalocean.DigitalOceanProviderConfig",
    fields: &[
        FieldDescriptor::singular("api_token", 1, Kind::String),
        FieldDescriptor::singular("spaces_access_id", 2, Kind::String),
        FieldDescriptor::singular("spaces_secret_key", 3, Kind::String),
    ],
};

impl_message! {
    DigitalOceanProviderConfig => DIGITAL_OCEAN_PROVIDER_CONFIG;
    scalars: [api_token, spaces_access_id, spaces_secret_key];
}

impl std::fmt::Debug for DigitalOceanProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigitalOceanProviderConfig")
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("spaces_access_id", &self.spaces_access_id)
            .field(
                "spaces_secret_key",
                &self.spaces_secret_key.as_ref().map(|_| "***"),
            )
            .finish()
    }
}

/// AWS access keys and region
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AwsProviderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_access_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

pub static AWS_PROVIDER_CONFIG: MessageDescriptor = MessageDescriptor {
    full_name: "org.project_planton.provider.aws.AwsProviderConfig",
    fields: &[
        FieldDescriptor::singular("account_id", 1, Kind::String),
        FieldDescriptor::singular("access_key_id", 2, Kind::String),
        FieldDescriptor::singular("secret_access_key", 3, Kind::String),
        FieldDescriptor::singular("region", 4, Kind::String).with_default("us-east-1"),
        FieldDescriptor::singular("session_token", 5, Kind::String),
    ],
};

impl_message! {
    AwsProviderConfig => AWS_PROVIDER_CONFIG;
    scalars: [account_id, access_key_id, secret_access_key, region, session_token];
}

impl std::fmt::Debug for AwsProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsProviderConfig")
            .field("account_id", &self.account_id)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "***"),
            )
            .field("region", &self.region)
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}
