//! AWS provisioning modules for Planton
//!
//! - **AwsVpc**: VPC, internet gateway, public and private subnets per
//!   availability zone, optional NAT gateways
//! - **AwsS3Bucket**: bucket with versioning, encryption, public access
//!   block, ownership controls, lifecycle rules, logging and CORS
//!
//! Tags on every resource are the resource's labels merged with user tags.

pub mod error;
pub mod locals;
pub mod provider;
pub mod s3_bucket;
pub mod vpc;

pub use error::{AwsError, Result};
pub use vpc::{Ipv4Cidr, SubnetPlan, plan_subnets};

use planton_apis::{AwsProviderConfig, Manifest, StackInput};
use planton_iac::StackContext;
use tracing::info;

/// Run the module matching the manifest's kind
pub async fn provision(
    ctx: &mut StackContext<'_>,
    manifest: Manifest,
    config: Option<AwsProviderConfig>,
) -> Result<()> {
    info!(kind = %manifest.kind(), name = manifest.name(), "Provisioning AWS resource");

    match manifest {
        Manifest::AwsVpc(target) => {
            let mut input = StackInput::new(target);
            input.provider_config = config;
            vpc::resources(ctx, &input).await
        }
        Manifest::AwsS3Bucket(target) => {
            let mut input = StackInput::new(target);
            input.provider_config = config;
            s3_bucket::resources(ctx, &input).await
        }
        other => Err(AwsError::UnsupportedKind(other.kind().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planton_apis::parse_manifest;
    use planton_iac::PreviewEngine;

    #[tokio::test]
    async fn test_provision_vpc_manifest() {
        let yaml = r#"
apiVersion: aws.project-planton.org/v1
kind: AwsVpc
metadata:
  name: main
spec:
  availabilityZones: [us-west-2a]
"#;
        let mut manifest = parse_manifest(yaml, &[]).unwrap();
        manifest.apply_defaults().unwrap();

        let engine = PreviewEngine::new();
        let mut ctx = StackContext::new(&engine, "network", "dev");
        provision(&mut ctx, manifest, None).await.unwrap();

        let run = ctx.finish();
        assert_eq!(run.resources_of_type(vpc::TYPE_SUBNET).count(), 2);
        assert!(run.outputs.contains_key("public-subnet-us-west-2a-0.id"));
    }

    #[tokio::test]
    async fn test_provision_rejects_digitalocean_kind() {
        let yaml = r#"
apiVersion: digital-ocean.project-planton.org/v1
kind: DigitalOceanVpc
metadata:
  name: main
spec:
  region: nyc3
"#;
        let manifest = parse_manifest(yaml, &[]).unwrap();
        let engine = PreviewEngine::new();
        let mut ctx = StackContext::new(&engine, "network", "dev");
        assert!(matches!(
            provision(&mut ctx, manifest, None).await,
            Err(AwsError::UnsupportedKind(_))
        ));
    }
}
