//! DigitalOceanVpc module

use crate::error::{Context, Result};
use crate::locals::{Locals, require_region};
use crate::provider;
use planton_apis::digitalocean::{DigitalOceanVpc, DigitalOceanVpcStackInput};
use planton_iac::{Inputs, RegisteredResource, ResourceOptions, StackContext};
use tracing::warn;

pub const TYPE_VPC: &str = "digitalocean:index/vpc:Vpc";

pub const OP_VPC_ID: &str = "vpc_id";
pub const OP_URN: &str = "urn";

pub async fn resources(ctx: &mut StackContext<'_>, input: &DigitalOceanVpcStackInput) -> Result<()> {
    let locals = Locals::new(&input.target)?;
    let options = provider::setup(ctx, input.provider_config.as_ref()).await?;

    let vpc = vpc(ctx, &locals, options).await?;

    ctx.export(OP_VPC_ID, vpc.id())?;
    ctx.export(OP_URN, vpc.output("urn"))?;
    Ok(())
}

async fn vpc(
    ctx: &mut StackContext<'_>,
    locals: &Locals<'_, DigitalOceanVpc>,
    options: ResourceOptions,
) -> Result<RegisteredResource> {
    let spec = locals.spec;
    let region = require_region(spec.region, "spec.region")?;

    if spec.is_default_for_region == Some(true) {
        warn!(
            vpc = locals.name(),
            "DigitalOcean picks the default VPC of {}; is_default_for_region is ignored", region
        );
    }

    let inputs = Inputs::new()
        .set("name", locals.name())
        .set("region", region)
        .set_opt("description", spec.description.as_deref())
        .set_opt(
            "ipRange",
            spec.ip_range_cidr.as_deref().filter(|cidr| !cidr.is_empty()),
        );

    ctx.register(TYPE_VPC, "vpc", inputs, options)
        .await
        .context("failed to create vpc")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::metadata;
    use planton_apis::StackInput;
    use planton_apis::digitalocean::{DigitalOceanRegion, DigitalOceanVpcSpec};
    use planton_iac::{Output, PreviewEngine};

    fn input(spec: DigitalOceanVpcSpec) -> DigitalOceanVpcStackInput {
        StackInput::new(DigitalOceanVpc {
            metadata: Some(metadata("main")),
            spec: Some(spec),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_vpc_resources() {
        let engine = PreviewEngine::new();
        let mut ctx = StackContext::new(&engine, "web", "dev");
        let input = input(DigitalOceanVpcSpec {
            region: Some(DigitalOceanRegion::Nyc3),
            ip_range_cidr: Some("10.10.0.0/16".to_string()),
            ..Default::default()
        });

        resources(&mut ctx, &input).await.unwrap();
        let run = ctx.finish();

        assert_eq!(run.resources.len(), 1);
        let vpc = &run.resources[0];
        assert_eq!(vpc.type_token, TYPE_VPC);
        assert_eq!(vpc.inputs.get("name"), Some(&Output::from("main")));
        assert_eq!(vpc.inputs.get("region"), Some(&Output::from("nyc3")));
        assert_eq!(vpc.inputs.get("ipRange"), Some(&Output::from("10.10.0.0/16")));
        assert!(!vpc.inputs.contains_key("description"));
        assert!(run.outputs.contains_key(OP_VPC_ID));
        assert!(run.outputs.contains_key(OP_URN));
    }

    #[tokio::test]
    async fn test_vpc_requires_region() {
        let engine = PreviewEngine::new();
        let mut ctx = StackContext::new(&engine, "web", "dev");
        let err = resources(&mut ctx, &input(DigitalOceanVpcSpec::default()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid spec: spec.region is required");
    }
}
