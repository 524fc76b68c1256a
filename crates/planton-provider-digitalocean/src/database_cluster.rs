//! DigitalOceanDatabaseCluster module

use crate::error::{Context, DigitalOceanError, Result};
use crate::locals::{Locals, require_region, sanitize_tag};
use crate::provider;
use planton_apis::digitalocean::{
    DigitalOceanDatabaseCluster, DigitalOceanDatabaseClusterStackInput, DigitalOceanDatabaseEngine,
};
use planton_iac::{Inputs, RegisteredResource, ResourceOptions, StackContext};
use serde_json::json;

pub const TYPE_DATABASE_CLUSTER: &str = "digitalocean:index/databaseCluster:DatabaseCluster";
pub const TYPE_DATABASE_FIREWALL: &str = "digitalocean:index/databaseFirewall:DatabaseFirewall";

pub const OP_CLUSTER_ID: &str = "cluster_id";
pub const OP_HOST: &str = "host";
pub const OP_PORT: &str = "port";
pub const OP_URI: &str = "uri";

pub async fn resources(
    ctx: &mut StackContext<'_>,
    input: &DigitalOceanDatabaseClusterStackInput,
) -> Result<()> {
    let locals = Locals::new(&input.target)?;
    let options = provider::setup(ctx, input.provider_config.as_ref()).await?;

    let cluster = database_cluster(ctx, &locals, options.clone()).await?;

    let spec = locals.spec;
    if !spec.enable_public_connectivity.unwrap_or(false) && spec.vpc.is_some() {
        firewall(ctx, &locals, &cluster, options).await?;
    }

    ctx.export(OP_CLUSTER_ID, cluster.id())?;
    ctx.export(OP_HOST, cluster.output("host"))?;
    ctx.export(OP_PORT, cluster.output("port"))?;
    ctx.export(OP_URI, cluster.output("uri"))?;
    Ok(())
}

fn cluster_name<'a>(locals: &'a Locals<'_, DigitalOceanDatabaseCluster>) -> &'a str {
    locals
        .spec
        .cluster_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| locals.name())
}

async fn database_cluster(
    ctx: &mut StackContext<'_>,
    locals: &Locals<'_, DigitalOceanDatabaseCluster>,
    options: ResourceOptions,
) -> Result<RegisteredResource> {
    let spec = locals.spec;
    let region = require_region(spec.region, "spec.region")?;
    let engine = match spec.engine {
        None | Some(DigitalOceanDatabaseEngine::Unspecified) => {
            return Err(DigitalOceanError::InvalidSpec(
                "spec.engine is required".to_string(),
            ));
        }
        Some(engine) => engine,
    };
    let vpc_uuid = spec
        .vpc
        .as_ref()
        .map(|vpc| vpc.resolve("spec.vpc"))
        .transpose()?;

    let inputs = Inputs::new()
        .set("name", cluster_name(locals))
        .set("engine", engine.to_string())
        .set_opt("version", spec.engine_version.as_deref())
        .set("region", region)
        .set_opt("size", spec.size_slug.as_deref())
        .set_opt("nodeCount", spec.node_count)
        .set_opt("privateNetworkUuid", vpc_uuid)
        .set_opt(
            "storageSizeMib",
            spec.storage_gib.map(|gib| (gib as u64 * 1024).to_string()),
        )
        .set("tags", locals.tags.clone());

    ctx.register(TYPE_DATABASE_CLUSTER, "database-cluster", inputs, options)
        .await
        .context("failed to create database cluster")
}

/// Restrict access to workloads carrying the cluster's name as a tag
async fn firewall(
    ctx: &mut StackContext<'_>,
    locals: &Locals<'_, DigitalOceanDatabaseCluster>,
    cluster: &RegisteredResource,
    options: ResourceOptions,
) -> Result<RegisteredResource> {
    let inputs = Inputs::new().set("clusterId", cluster.id()).set(
        "rules",
        json!([{ "type": "tag", "value": sanitize_tag(cluster_name(locals)) }]),
    );

    ctx.register(
        TYPE_DATABASE_FIREWALL,
        "database-firewall",
        inputs,
        options.parent(cluster),
    )
    .await
    .context("failed to create database firewall")
}
