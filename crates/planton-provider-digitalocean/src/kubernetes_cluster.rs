//! DigitalOceanKubernetesCluster module

use crate::error::{Context, DigitalOceanError, Result};
use crate::locals::{Locals, require_region};
use crate::provider;
use planton_apis::digitalocean::{
    DigitalOceanKubernetesCluster, DigitalOceanKubernetesClusterDefaultNodePool,
    DigitalOceanKubernetesClusterMaintenancePolicy, DigitalOceanKubernetesClusterStackInput,
};
use planton_iac::{Inputs, RegisteredResource, ResourceOptions, StackContext};
use serde_json::{Map, Value, json};

pub const TYPE_KUBERNETES_CLUSTER: &str = "digitalocean:index/kubernetesCluster:KubernetesCluster";

pub const OP_CLUSTER_ID: &str = "cluster_id";
pub const OP_KUBECONFIG: &str = "kubeconfig";
pub const OP_API_SERVER_ENDPOINT: &str = "api_server_endpoint";

const MAINTENANCE_DAYS: &[&str] = &[
    "any",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

pub async fn resources(
    ctx: &mut StackContext<'_>,
    input: &DigitalOceanKubernetesClusterStackInput,
) -> Result<()> {
    let locals = Locals::new(&input.target)?;
    let options = provider::setup(ctx, input.provider_config.as_ref()).await?;

    let cluster = kubernetes_cluster(ctx, &locals, options).await?;

    ctx.export(OP_CLUSTER_ID, cluster.id())?;
    ctx.export(OP_KUBECONFIG, cluster.output("kubeConfigs"))?;
    ctx.export(OP_API_SERVER_ENDPOINT, cluster.output("endpoint"))?;
    Ok(())
}

async fn kubernetes_cluster(
    ctx: &mut StackContext<'_>,
    locals: &Locals<'_, DigitalOceanKubernetesCluster>,
    options: ResourceOptions,
) -> Result<RegisteredResource> {
    let spec = locals.spec;
    let region = require_region(spec.region, "spec.region")?;
    let version = spec
        .kubernetes_version
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            DigitalOceanError::InvalidSpec("spec.kubernetes_version is required".to_string())
        })?;
    let node_pool = spec.default_node_pool.as_ref().ok_or_else(|| {
        DigitalOceanError::InvalidSpec("spec.default_node_pool is required".to_string())
    })?;
    let vpc_uuid = spec
        .vpc
        .as_ref()
        .map(|vpc| vpc.resolve("spec.vpc"))
        .transpose()?;

    let name = spec
        .cluster_name
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| locals.name());

    let mut tags = locals.tags.clone();
    tags.extend(spec.tags.iter().cloned());

    let mut inputs = Inputs::new()
        .set("name", name)
        .set("region", region)
        .set("version", version)
        .set_opt("vpcUuid", vpc_uuid)
        .set("ha", spec.highly_available.unwrap_or(false))
        .set("autoUpgrade", spec.auto_upgrade.unwrap_or(false))
        .set("surgeUpgrade", !spec.disable_surge_upgrade.unwrap_or(false))
        .set("tags", tags)
        .set("nodePool", node_pool_args(node_pool)?);

    if let Some(policy) = &spec.maintenance_policy {
        inputs = inputs.set("maintenancePolicy", maintenance_policy_args(policy)?);
    }

    if !spec.control_plane_allowed_ips.is_empty() {
        inputs = inputs.set(
            "controlPlaneFirewall",
            json!({
                "enabled": true,
                "allowedAddresses": spec.control_plane_allowed_ips,
            }),
        );
    }

    ctx.register(TYPE_KUBERNETES_CLUSTER, "kubernetes-cluster", inputs, options)
        .await
        .context("failed to create kubernetes cluster")
}

fn node_pool_args(pool: &DigitalOceanKubernetesClusterDefaultNodePool) -> Result<Value> {
    let mut args = Map::new();
    args.insert("name".into(), json!("default"));
    if let Some(size) = &pool.size {
        args.insert("size".into(), json!(size));
    }

    if pool.auto_scale.unwrap_or(false) {
        let (min, max) = match (pool.min_nodes, pool.max_nodes) {
            (Some(min), Some(max)) if min >= 1 && min <= max => (min, max),
            _ => {
                return Err(DigitalOceanError::InvalidSpec(
                    "spec.default_node_pool needs 1 <= min_nodes <= max_nodes when auto_scale is enabled"
                        .to_string(),
                ));
            }
        };
        args.insert("autoScale".into(), json!(true));
        args.insert("minNodes".into(), json!(min));
        args.insert("maxNodes".into(), json!(max));
    } else if let Some(count) = pool.node_count {
        args.insert("nodeCount".into(), json!(count));
    }

    Ok(Value::Object(args))
}

fn maintenance_policy_args(policy: &DigitalOceanKubernetesClusterMaintenancePolicy) -> Result<Value> {
    let day = policy.day.as_deref().unwrap_or("any").to_ascii_lowercase();
    if !MAINTENANCE_DAYS.contains(&day.as_str()) {
        return Err(DigitalOceanError::InvalidSpec(format!(
            "spec.maintenance_policy.day must be one of {}",
            MAINTENANCE_DAYS.join(", ")
        )));
    }
    let start_time = policy.start_time.as_deref().unwrap_or("00:00");
    Ok(json!({ "day": day, "startTime": start_time }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::metadata;
    use planton_apis::StackInput;
    use planton_apis::digitalocean::{DigitalOceanKubernetesClusterSpec, DigitalOceanRegion};
    use planton_iac::{Output, PreviewEngine};

    fn input(spec: DigitalOceanKubernetesClusterSpec) -> DigitalOceanKubernetesClusterStackInput {
        let mut input = StackInput::new(DigitalOceanKubernetesCluster {
            metadata: Some(metadata("apps")),
            spec: Some(spec),
            ..Default::default()
        });
        input.apply_defaults().unwrap();
        input
    }

    fn base() -> DigitalOceanKubernetesClusterSpec {
        DigitalOceanKubernetesClusterSpec {
            region: Some(DigitalOceanRegion::Ams3),
            kubernetes_version: Some("1.31.1-do.0".to_string()),
            default_node_pool: Some(Default::default()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_cluster_inputs() {
        let engine = PreviewEngine::new();
        let mut ctx = StackContext::new(&engine, "web", "dev");
        let input = input(DigitalOceanKubernetesClusterSpec {
            tags: vec!["team-a".to_string()],
            maintenance_policy: Some(DigitalOceanKubernetesClusterMaintenancePolicy {
                day: Some("Sunday".to_string()),
                ..Default::default()
            }),
            control_plane_allowed_ips: vec!["203.0.113.0/24".to_string()],
            ..base()
        });

        resources(&mut ctx, &input).await.unwrap();
        let run = ctx.finish();
        let cluster = &run.resources[0];

        assert_eq!(cluster.inputs.get("name"), Some(&Output::from("apps")));
        assert_eq!(cluster.inputs.get("autoUpgrade"), Some(&Output::from(true)));
        assert_eq!(cluster.inputs.get("surgeUpgrade"), Some(&Output::from(true)));
        assert_eq!(
            cluster.inputs.get("nodePool").and_then(Output::as_known),
            Some(&json!({ "name": "default", "size": "s-2vcpu-4gb", "nodeCount": 3 }))
        );
        assert_eq!(
            cluster.inputs.get("maintenancePolicy").and_then(Output::as_known),
            Some(&json!({ "day": "sunday", "startTime": "00:00" }))
        );
        assert_eq!(
            cluster.inputs.get("controlPlaneFirewall").and_then(Output::as_known),
            Some(&json!({ "enabled": true, "allowedAddresses": ["203.0.113.0/24"] }))
        );
        let tags = cluster.inputs.get("tags").and_then(Output::as_known).unwrap();
        assert!(tags.as_array().unwrap().contains(&json!("team-a")));

        assert!(run.outputs.contains_key(OP_KUBECONFIG));
        assert!(run.outputs.contains_key(OP_API_SERVER_ENDPOINT));
    }

    #[tokio::test]
    async fn test_autoscale_pool() {
        let engine = PreviewEngine::new();
        let mut ctx = StackContext::new(&engine, "web", "dev");
        let input = input(DigitalOceanKubernetesClusterSpec {
            default_node_pool: Some(DigitalOceanKubernetesClusterDefaultNodePool {
                auto_scale: Some(true),
                min_nodes: Some(2),
                max_nodes: Some(5),
                ..Default::default()
            }),
            ..base()
        });

        resources(&mut ctx, &input).await.unwrap();
        let run = ctx.finish();
        let pool = run.resources[0].inputs.get("nodePool").and_then(Output::as_known).unwrap();
        assert_eq!(pool["minNodes"], json!(2));
        assert_eq!(pool["maxNodes"], json!(5));
        assert!(pool.get("nodeCount").is_none());
    }

    #[tokio::test]
    async fn test_invalid_autoscale_bounds() {
        let engine = PreviewEngine::new();
        let mut ctx = StackContext::new(&engine, "web", "dev");
        let input = input(DigitalOceanKubernetesClusterSpec {
            default_node_pool: Some(DigitalOceanKubernetesClusterDefaultNodePool {
                auto_scale: Some(true),
                min_nodes: Some(4),
                max_nodes: Some(2),
                ..Default::default()
            }),
            ..base()
        });
        assert!(matches!(
            resources(&mut ctx, &input).await,
            Err(DigitalOceanError::InvalidSpec(_))
        ));
    }

    #[tokio::test]
    async fn test_node_pool_required() {
        let engine = PreviewEngine::new();
        let mut ctx = StackContext::new(&engine, "web", "dev");
        let input = input(DigitalOceanKubernetesClusterSpec {
            default_node_pool: None,
            ..base()
        });
        let err = resources(&mut ctx, &input).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid spec: spec.default_node_pool is required");
    }

    #[test]
    fn test_maintenance_day_validation() {
        let policy = DigitalOceanKubernetesClusterMaintenancePolicy {
            day: Some("someday".to_string()),
            start_time: None,
        };
        assert!(maintenance_policy_args(&policy).is_err());
    }
}
