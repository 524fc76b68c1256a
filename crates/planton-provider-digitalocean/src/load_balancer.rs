//! DigitalOceanLoadBalancer module

use crate::error::{Context, DigitalOceanError, Result};
use crate::locals::{Locals, require_region};
use crate::provider;
use planton_apis::digitalocean::{
    DigitalOceanLoadBalancer, DigitalOceanLoadBalancerForwardingRule,
    DigitalOceanLoadBalancerHealthCheck, DigitalOceanLoadBalancerProtocol,
    DigitalOceanLoadBalancerStackInput,
};
use planton_iac::{Inputs, RegisteredResource, ResourceOptions, StackContext};
use serde_json::{Map, Value, json};

pub const TYPE_LOAD_BALANCER: &str = "digitalocean:index/loadBalancer:LoadBalancer";

pub const OP_LOAD_BALANCER_ID: &str = "load_balancer_id";
pub const OP_IP: &str = "ip";
pub const OP_DNS_NAME: &str = "dns_name";

pub async fn resources(
    ctx: &mut StackContext<'_>,
    input: &DigitalOceanLoadBalancerStackInput,
) -> Result<()> {
    let locals = Locals::new(&input.target)?;
    let options = provider::setup(ctx, input.provider_config.as_ref()).await?;

    let lb = load_balancer(ctx, &locals, options).await?;

    ctx.export(OP_LOAD_BALANCER_ID, lb.id())?;
    ctx.export(OP_IP, lb.output("ip"))?;
    ctx.export(OP_DNS_NAME, lb.output("dnsName"))?;
    Ok(())
}

async fn load_balancer(
    ctx: &mut StackContext<'_>,
    locals: &Locals<'_, DigitalOceanLoadBalancer>,
    options: ResourceOptions,
) -> Result<RegisteredResource> {
    let spec = locals.spec;
    let region = require_region(spec.region, "spec.region")?;

    if spec.forwarding_rules.is_empty() {
        return Err(DigitalOceanError::InvalidSpec(
            "spec.forwarding_rules must contain at least one rule".to_string(),
        ));
    }
    let droplet_tag = spec.droplet_tag.as_deref().filter(|t| !t.is_empty());
    if droplet_tag.is_some() && !spec.droplet_ids.is_empty() {
        return Err(DigitalOceanError::InvalidSpec(
            "spec.droplet_ids and spec.droplet_tag are mutually exclusive".to_string(),
        ));
    }

    let forwarding_rules = spec
        .forwarding_rules
        .iter()
        .enumerate()
        .map(|(i, rule)| forwarding_rule(i, rule))
        .collect::<Result<Vec<_>>>()?;

    let droplet_ids = spec
        .droplet_ids
        .iter()
        .enumerate()
        .map(|(i, id)| id.resolve(&format!("spec.droplet_ids[{}]", i)).map(str::to_string))
        .collect::<planton_apis::Result<Vec<_>>>()?;

    let vpc_uuid = spec
        .vpc
        .as_ref()
        .map(|vpc| vpc.resolve("spec.vpc"))
        .transpose()?;

    let name = spec
        .load_balancer_name
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| locals.name());

    let sticky_sessions = if spec.enable_sticky_sessions.unwrap_or(false) {
        json!({ "type": "cookies", "cookieName": "lb", "cookieTtlSeconds": 300 })
    } else {
        json!({ "type": "none" })
    };

    let inputs = Inputs::new()
        .set("name", name)
        .set("region", region)
        .set_opt("sizeUnit", spec.size_unit)
        .set_opt("vpcUuid", vpc_uuid)
        .set("forwardingRules", Value::Array(forwarding_rules))
        .set_opt("healthcheck", spec.health_check.as_ref().map(health_check))
        .set("stickySessions", sticky_sessions)
        .set_opt(
            "dropletIds",
            (!droplet_ids.is_empty()).then_some(droplet_ids),
        )
        .set_opt("dropletTag", droplet_tag);

    ctx.register(TYPE_LOAD_BALANCER, "load-balancer", inputs, options)
        .await
        .context("failed to create load balancer")
}

fn protocol(
    value: Option<DigitalOceanLoadBalancerProtocol>,
    field: &str,
) -> Result<DigitalOceanLoadBalancerProtocol> {
    match value {
        None | Some(DigitalOceanLoadBalancerProtocol::Unspecified) => Err(
            DigitalOceanError::InvalidSpec(format!("{} is required", field)),
        ),
        Some(protocol) => Ok(protocol),
    }
}

fn forwarding_rule(index: usize, rule: &DigitalOceanLoadBalancerForwardingRule) -> Result<Value> {
    let field = |name: &str| format!("spec.forwarding_rules[{}].{}", index, name);

    let entry_protocol = protocol(rule.entry_protocol, &field("entry_protocol"))?;
    let target_protocol = protocol(rule.target_protocol, &field("target_protocol"))?;
    let entry_port = rule
        .entry_port
        .ok_or_else(|| DigitalOceanError::InvalidSpec(format!("{} is required", field("entry_port"))))?;
    let target_port = rule
        .target_port
        .ok_or_else(|| DigitalOceanError::InvalidSpec(format!("{} is required", field("target_port"))))?;

    let certificate = rule.certificate_name.as_deref().filter(|c| !c.is_empty());
    if matches!(
        entry_protocol,
        DigitalOceanLoadBalancerProtocol::Https | DigitalOceanLoadBalancerProtocol::Http2
    ) && certificate.is_none()
    {
        return Err(DigitalOceanError::InvalidSpec(format!(
            "{} is required for {} entry protocol",
            field("certificate_name"),
            entry_protocol
        )));
    }

    let mut value = Map::new();
    value.insert("entryPort".into(), json!(entry_port));
    value.insert("entryProtocol".into(), json!(entry_protocol.to_string()));
    value.insert("targetPort".into(), json!(target_port));
    value.insert("targetProtocol".into(), json!(target_protocol.to_string()));
    if let Some(certificate) = certificate {
        value.insert("certificateName".into(), json!(certificate));
    }
    Ok(Value::Object(value))
}

fn health_check(check: &DigitalOceanLoadBalancerHealthCheck) -> Value {
    let mut value = Map::new();
    let entries = [
        ("port", check.port.map(Value::from)),
        ("protocol", check.protocol.map(|p| Value::from(p.to_string()))),
        ("path", check.path.clone().map(Value::from)),
        ("checkIntervalSeconds", check.check_interval_sec.map(Value::from)),
        ("responseTimeoutSeconds", check.response_timeout_sec.map(Value::from)),
        ("healthyThreshold", check.healthy_threshold.map(Value::from)),
        ("unhealthyThreshold", check.unhealthy_threshold.map(Value::from)),
    ];
    for (key, entry) in entries
        .into_iter()
        .filter_map(|(key, entry)| entry.map(|e| (key, e)))
    {
        value.insert(key.to_string(), entry);
    }
    Value::Object(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::metadata;
    use planton_apis::digitalocean::{DigitalOceanLoadBalancerSpec, DigitalOceanRegion};
    use planton_apis::{StackInput, StringValueOrRef};
    use planton_iac::{Output, PreviewEngine};

    fn http_rule() -> DigitalOceanLoadBalancerForwardingRule {
        DigitalOceanLoadBalancerForwardingRule {
            entry_port: Some(80),
            entry_protocol: Some(DigitalOceanLoadBalancerProtocol::Http),
            target_port: Some(8080),
            target_protocol: Some(DigitalOceanLoadBalancerProtocol::Http),
            certificate_name: None,
        }
    }

    fn input(spec: DigitalOceanLoadBalancerSpec) -> DigitalOceanLoadBalancerStackInput {
        let mut input = StackInput::new(DigitalOceanLoadBalancer {
            metadata: Some(metadata("web-lb")),
            spec: Some(spec),
            ..Default::default()
        });
        input.apply_defaults().unwrap();
        input
    }

    fn base() -> DigitalOceanLoadBalancerSpec {
        DigitalOceanLoadBalancerSpec {
            region: Some(DigitalOceanRegion::Sfo3),
            forwarding_rules: vec![http_rule()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_load_balancer_inputs() {
        let engine = PreviewEngine::new();
        let mut ctx = StackContext::new(&engine, "web", "dev");
        let input = input(DigitalOceanLoadBalancerSpec {
            health_check: Some(DigitalOceanLoadBalancerHealthCheck {
                port: Some(8080),
                ..Default::default()
            }),
            droplet_ids: vec![StringValueOrRef::literal("101"), StringValueOrRef::literal("102")],
            enable_sticky_sessions: Some(true),
            ..base()
        });

        resources(&mut ctx, &input).await.unwrap();
        let run = ctx.finish();
        let lb = &run.resources[0];

        assert_eq!(lb.inputs.get("sizeUnit"), Some(&Output::from(1u32)));
        assert_eq!(
            lb.inputs.get("forwardingRules"),
            Some(&Output::from(json!([{
                "entryPort": 80,
                "entryProtocol": "http",
                "targetPort": 8080,
                "targetProtocol": "http",
            }])))
        );
        assert_eq!(
            lb.inputs.get("healthcheck"),
            Some(&Output::from(json!({
                "port": 8080,
                "protocol": "http",
                "path": "/",
                "checkIntervalSeconds": 10,
                "responseTimeoutSeconds": 5,
                "healthyThreshold": 3,
                "unhealthyThreshold": 3,
            })))
        );
        assert_eq!(
            lb.inputs.get("dropletIds"),
            Some(&Output::from(vec!["101".to_string(), "102".to_string()]))
        );
        assert_eq!(
            lb.inputs.get("stickySessions").and_then(Output::as_known),
            Some(&json!({ "type": "cookies", "cookieName": "lb", "cookieTtlSeconds": 300 }))
        );
        assert!(!lb.inputs.contains_key("dropletTag"));
        assert_eq!(run.outputs.len(), 3);
    }

    #[tokio::test]
    async fn test_rules_required() {
        let engine = PreviewEngine::new();
        let mut ctx = StackContext::new(&engine, "web", "dev");
        let input = input(DigitalOceanLoadBalancerSpec {
            forwarding_rules: vec![],
            ..base()
        });
        assert!(matches!(
            resources(&mut ctx, &input).await,
            Err(DigitalOceanError::InvalidSpec(_))
        ));
    }

    #[tokio::test]
    async fn test_https_requires_certificate() {
        let engine = PreviewEngine::new();
        let mut ctx = StackContext::new(&engine, "web", "dev");
        let input = input(DigitalOceanLoadBalancerSpec {
            forwarding_rules: vec![DigitalOceanLoadBalancerForwardingRule {
                entry_port: Some(443),
                entry_protocol: Some(DigitalOceanLoadBalancerProtocol::Https),
                ..http_rule()
            }],
            ..base()
        });
        let err = resources(&mut ctx, &input).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid spec: spec.forwarding_rules[0].certificate_name is required for https entry protocol"
        );
    }

    #[tokio::test]
    async fn test_droplet_ids_and_tag_exclusive() {
        let engine = PreviewEngine::new();
        let mut ctx = StackContext::new(&engine, "web", "dev");
        let input = input(DigitalOceanLoadBalancerSpec {
            droplet_ids: vec![StringValueOrRef::literal("101")],
            droplet_tag: Some("web".to_string()),
            ..base()
        });
        assert!(matches!(
            resources(&mut ctx, &input).await,
            Err(DigitalOceanError::InvalidSpec(_))
        ));
    }
}
