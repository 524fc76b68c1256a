//! DigitalOceanDnsZone module

use crate::error::{Context, DigitalOceanError, Result};
use crate::locals::Locals;
use crate::provider;
use planton_apis::digitalocean::{
    DigitalOceanDnsZone, DigitalOceanDnsZoneRecord, DigitalOceanDnsZoneStackInput, DnsRecordType,
};
use planton_iac::{Inputs, RegisteredResource, ResourceOptions, StackContext};
use std::collections::BTreeMap;
use tracing::debug;

pub const TYPE_DOMAIN: &str = "digitalocean:index/domain:Domain";
pub const TYPE_DNS_RECORD: &str = "digitalocean:index/dnsRecord:DnsRecord";

pub const OP_ZONE_NAME: &str = "zone_name";
pub const OP_ZONE_ID: &str = "zone_id";
pub const OP_NAME_SERVERS: &str = "name_servers";

/// Name servers DigitalOcean assigns to every hosted zone
pub const NAME_SERVERS: [&str; 3] = [
    "ns1.digitalocean.com",
    "ns2.digitalocean.com",
    "ns3.digitalocean.com",
];

pub async fn resources(
    ctx: &mut StackContext<'_>,
    input: &DigitalOceanDnsZoneStackInput,
) -> Result<()> {
    let locals = Locals::new(&input.target)?;
    let options = provider::setup(ctx, input.provider_config.as_ref()).await?;

    let domain = domain(ctx, &locals, options.clone()).await?;
    records(ctx, &locals, &domain, options).await?;

    ctx.export(OP_ZONE_NAME, domain.output("name"))?;
    ctx.export(OP_ZONE_ID, domain.id())?;
    ctx.export(
        OP_NAME_SERVERS,
        NAME_SERVERS.iter().map(|ns| ns.to_string()).collect::<Vec<_>>(),
    )?;
    Ok(())
}

fn domain_name<'a>(locals: &'a Locals<'_, DigitalOceanDnsZone>) -> Result<&'a str> {
    locals
        .spec
        .domain_name
        .as_deref()
        .filter(|d| !d.is_empty())
        .ok_or_else(|| DigitalOceanError::InvalidSpec("spec.domain_name is required".to_string()))
}

async fn domain(
    ctx: &mut StackContext<'_>,
    locals: &Locals<'_, DigitalOceanDnsZone>,
    options: ResourceOptions,
) -> Result<RegisteredResource> {
    let inputs = Inputs::new().set("name", domain_name(locals)?);

    ctx.register(TYPE_DOMAIN, "domain", inputs, options)
        .await
        .context("failed to create domain")
}

/// One DNS record per value of every record entry
async fn records(
    ctx: &mut StackContext<'_>,
    locals: &Locals<'_, DigitalOceanDnsZone>,
    domain: &RegisteredResource,
    options: ResourceOptions,
) -> Result<()> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();

    for (i, record) in locals.spec.records.iter().enumerate() {
        let record_type = validate_record(i, record)?;
        let name = record.name.as_deref().filter(|n| !n.is_empty()).unwrap_or("@");

        for (j, value) in record.values.iter().enumerate() {
            let value = value.resolve(&format!("spec.records[{}].values[{}]", i, j))?;

            let base = format!(
                "{}-{}",
                record_type.to_string().to_lowercase(),
                if name == "@" { "apex" } else { name }
            );
            let count = seen.entry(base.clone()).or_insert(0);
            let resource_name = format!("{}-{}", base, count);
            *count += 1;

            let inputs = Inputs::new()
                .set("domain", domain.output("name"))
                .set("type", record_type.to_string())
                .set("name", name)
                .set("value", value)
                .set("ttl", record.ttl())
                .set_opt("priority", record.priority)
                .set_opt("weight", record.weight)
                .set_opt("port", record.port)
                .set_opt("flags", record.flags)
                .set_opt("tag", record.tag.as_deref());

            debug!(record = %resource_name, "Registering DNS record");
            ctx.register(
                TYPE_DNS_RECORD,
                &resource_name,
                inputs,
                options.clone().parent(domain),
            )
            .await
            .context(&format!("failed to create dns record {}", resource_name))?;
        }
    }
    Ok(())
}

fn validate_record(index: usize, record: &DigitalOceanDnsZoneRecord) -> Result<DnsRecordType> {
    let field = |name: &str| format!("spec.records[{}].{}", index, name);
    let invalid = |msg: String| Err(DigitalOceanError::InvalidSpec(msg));

    let record_type = match record.record_type {
        None | Some(DnsRecordType::Unspecified) => {
            return invalid(format!("{} is required", field("type")));
        }
        Some(t) => t,
    };
    if record.values.is_empty() {
        return invalid(format!("{} must contain at least one value", field("values")));
    }

    match record_type {
        DnsRecordType::Mx if record.priority.is_none() => {
            invalid(format!("{} is required for MX records", field("priority")))
        }
        DnsRecordType::Srv
            if record.priority.is_none() || record.port.is_none() || record.weight.is_none() =>
        {
            invalid(format!(
                "spec.records[{}] needs priority, weight and port for SRV records",
                index
            ))
        }
        DnsRecordType::Caa if record.flags.is_none() || record.tag.is_none() => {
            invalid(format!(
                "spec.records[{}] needs flags and tag for CAA records",
                index
            ))
        }
        _ => Ok(record_type),
    }
}
