//! DigitalOceanContainerRegistry module

use crate::error::{Context, Result};
use crate::locals::Locals;
use crate::provider;
use planton_apis::digitalocean::{
    DigitalOceanContainerRegistry, DigitalOceanContainerRegistryStackInput,
    DigitalOceanContainerRegistryTier,
};
use planton_iac::{Inputs, RegisteredResource, ResourceOptions, StackContext};
use tracing::warn;

pub const TYPE_REGISTRY: &str = "digitalocean:index/containerRegistry:ContainerRegistry";
pub const TYPE_DOCKER_CREDENTIALS: &str =
    "digitalocean:index/containerRegistryDockerCredentials:ContainerRegistryDockerCredentials";

pub const OP_REGISTRY_NAME: &str = "registry_name";
pub const OP_SERVER_URL: &str = "server_url";

pub async fn resources(
    ctx: &mut StackContext<'_>,
    input: &DigitalOceanContainerRegistryStackInput,
) -> Result<()> {
    let locals = Locals::new(&input.target)?;
    let options = provider::setup(ctx, input.provider_config.as_ref()).await?;

    let registry = registry(ctx, &locals, options.clone()).await?;

    if locals.spec.create_docker_credentials.unwrap_or(false) {
        let inputs = Inputs::new()
            .set("registryName", registry.output("name"))
            .set("write", true);
        ctx.register(
            TYPE_DOCKER_CREDENTIALS,
            "docker-credentials",
            inputs,
            options.depends_on(&registry),
        )
        .await
        .context("failed to create registry docker credentials")?;
    }

    ctx.export(OP_REGISTRY_NAME, registry.output("name"))?;
    ctx.export(OP_SERVER_URL, registry.output("serverUrl"))?;
    Ok(())
}

async fn registry(
    ctx: &mut StackContext<'_>,
    locals: &Locals<'_, DigitalOceanContainerRegistry>,
    options: ResourceOptions,
) -> Result<RegisteredResource> {
    let spec = locals.spec;
    let tier = spec
        .subscription_tier
        .unwrap_or(DigitalOceanContainerRegistryTier::Starter);

    if spec.garbage_collection_enabled == Some(true) {
        warn!(
            registry = locals.name(),
            "Registry garbage collection has to be scheduled outside of this stack"
        );
    }

    let inputs = Inputs::new()
        .set("name", locals.name())
        .set("subscriptionTierSlug", tier.slug())
        .set_opt("region", spec.region.and_then(|r| r.slug()));

    ctx.register(TYPE_REGISTRY, "registry", inputs, options)
        .await
        .context("failed to create container registry")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::metadata;
    use planton_apis::StackInput;
    use planton_apis::digitalocean::DigitalOceanContainerRegistrySpec;
    use planton_iac::{Output, PreviewEngine};

    fn input(spec: DigitalOceanContainerRegistrySpec) -> DigitalOceanContainerRegistryStackInput {
        StackInput::new(DigitalOceanContainerRegistry {
            metadata: Some(metadata("images")),
            spec: Some(spec),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_registry_with_credentials() {
        let engine = PreviewEngine::new();
        let mut ctx = StackContext::new(&engine, "web", "dev");
        let mut input = input(DigitalOceanContainerRegistrySpec::default());
        input.apply_defaults().unwrap();

        resources(&mut ctx, &input).await.unwrap();
        let run = ctx.finish();

        assert_eq!(run.resources.len(), 2);
        let registry = &run.resources[0];
        assert_eq!(
            registry.inputs.get("subscriptionTierSlug"),
            Some(&Output::from("starter"))
        );
        let credentials = &run.resources[1];
        assert_eq!(credentials.type_token, TYPE_DOCKER_CREDENTIALS);
        assert_eq!(credentials.inputs.get("registryName"), Some(&Output::from("images")));
        assert_eq!(credentials.options.depends_on, vec![registry.urn.clone()]);

        assert_eq!(run.outputs[OP_REGISTRY_NAME], Output::from("images"));
        assert!(!run.outputs[OP_SERVER_URL].is_known());
    }

    #[tokio::test]
    async fn test_registry_without_credentials() {
        let engine = PreviewEngine::new();
        let mut ctx = StackContext::new(&engine, "web", "dev");
        let input = input(DigitalOceanContainerRegistrySpec {
            subscription_tier: Some(DigitalOceanContainerRegistryTier::Professional),
            create_docker_credentials: Some(false),
            ..Default::default()
        });

        resources(&mut ctx, &input).await.unwrap();
        let run = ctx.finish();

        assert_eq!(run.resources.len(), 1);
        assert_eq!(
            run.resources[0].inputs.get("subscriptionTierSlug"),
            Some(&Output::from("professional"))
        );
    }
}
