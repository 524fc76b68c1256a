//! Cloud resource kinds

use planton_core::{ProtoEnum, proto_enum};
use std::str::FromStr;

use crate::error::ApiError;

proto_enum! {
    /// Every resource kind a manifest can declare
    pub enum CloudResourceKind as CLOUD_RESOURCE_KIND("org.project_planton.shared.cloudresourcekind.CloudResourceKind") {
        Unspecified = 0 => "unspecified",
        AwsS3Bucket = 213 => "AwsS3Bucket",
        AwsVpc = 217 => "AwsVpc",
        DigitalOceanContainerRegistry = 1201 => "DigitalOceanContainerRegistry",
        DigitalOceanDatabaseCluster = 1202 => "DigitalOceanDatabaseCluster",
        DigitalOceanDnsZone = 1203 => "DigitalOceanDnsZone",
        DigitalOceanKubernetesCluster = 1205 => "DigitalOceanKubernetesCluster",
        DigitalOceanLoadBalancer = 1206 => "DigitalOceanLoadBalancer",
        DigitalOceanVpc = 1210 => "DigitalOceanVpc",
    }
}

/// Cloud a resource kind is provisioned on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudProvider {
    Aws,
    DigitalOcean,
}

impl CloudProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "aws",
            CloudProvider::DigitalOcean => "digitalocean",
        }
    }
}

impl std::fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CloudResourceKind {
    /// All provisionable kinds
    pub fn all() -> &'static [CloudResourceKind] {
        &[
            CloudResourceKind::AwsS3Bucket,
            CloudResourceKind::AwsVpc,
            CloudResourceKind::DigitalOceanContainerRegistry,
            CloudResourceKind::DigitalOceanDatabaseCluster,
            CloudResourceKind::DigitalOceanDnsZone,
            CloudResourceKind::DigitalOceanKubernetesCluster,
            CloudResourceKind::DigitalOceanLoadBalancer,
            CloudResourceKind::DigitalOceanVpc,
        ]
    }

    pub fn provider(&self) -> Option<CloudProvider> {
        match self.number() {
            200..=399 => Some(CloudProvider::Aws),
            1200..=1399 => Some(CloudProvider::DigitalOcean),
            _ => None,
        }
    }

    /// Expected `apiVersion` of a manifest of this kind
    pub fn api_version(&self) -> Option<&'static str> {
        self.provider().map(|p| match p {
            CloudProvider::Aws => "aws.project-planton.org/v1",
            CloudProvider::DigitalOcean => "digital-ocean.project-planton.org/v1",
        })
    }
}

impl FromStr for CloudResourceKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CloudResourceKind::from_name(s)
            .filter(|k| *k != CloudResourceKind::Unspecified)
            .ok_or_else(|| ApiError::UnknownKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(
            "AwsVpc".parse::<CloudResourceKind>().unwrap(),
            CloudResourceKind::AwsVpc
        );
        assert!("awsvpc".parse::<CloudResourceKind>().is_err());
        assert!("unspecified".parse::<CloudResourceKind>().is_err());
    }

    #[test]
    fn test_provider_ranges() {
        for kind in CloudResourceKind::all() {
            assert!(kind.provider().is_some(), "{kind} has no provider");
        }
        assert_eq!(
            CloudResourceKind::DigitalOceanVpc.provider(),
            Some(CloudProvider::DigitalOcean)
        );
        assert_eq!(
            CloudResourceKind::AwsS3Bucket.api_version(),
            Some("aws.project-planton.org/v1")
        );
        assert_eq!(CloudResourceKind::Unspecified.provider(), None);
    }
}
