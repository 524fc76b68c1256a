//! AwsVpc module
//!
//! Lays out one public and one private subnet group per availability zone.
//! Subnet CIDRs are carved sequentially out of the VPC block: every public
//! subnet first (zone by zone, in declared order), then every private subnet.
//! With NAT enabled each zone gets an elastic IP, a NAT gateway in its first
//! public subnet and a private route table pointing at it.

use crate::error::{AwsError, Context, Result};
use crate::locals::Locals;
use crate::provider;
use planton_apis::aws::{AwsVpc, AwsVpcStackInput};
use planton_iac::{Inputs, RegisteredResource, ResourceOptions, StackContext};
use std::fmt;
use std::net::Ipv4Addr;
use tracing::debug;

pub const TYPE_VPC: &str = "aws:ec2/vpc:Vpc";
pub const TYPE_INTERNET_GATEWAY: &str = "aws:ec2/internetGateway:InternetGateway";
pub const TYPE_SUBNET: &str = "aws:ec2/subnet:Subnet";
pub const TYPE_ROUTE_TABLE: &str = "aws:ec2/routeTable:RouteTable";
pub const TYPE_ROUTE: &str = "aws:ec2/route:Route";
pub const TYPE_ROUTE_TABLE_ASSOCIATION: &str = "aws:ec2/routeTableAssociation:RouteTableAssociation";
pub const TYPE_EIP: &str = "aws:ec2/eip:Eip";
pub const TYPE_NAT_GATEWAY: &str = "aws:ec2/natGateway:NatGateway";

pub const OP_VPC_ID: &str = "vpc_id";
pub const OP_INTERNET_GATEWAY_ID: &str = "internet_gateway_id";
pub const OP_VPC_CIDR: &str = "vpc_cidr";

const ANYWHERE: &str = "0.0.0.0/0";

/// An IPv4 network in CIDR notation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Cidr {
    network: Ipv4Addr,
    prefix: u8,
}

impl Ipv4Cidr {
    /// Parse `a.b.c.d/n`; host bits are cleared
    pub fn parse(cidr: &str) -> Result<Self> {
        let invalid = |reason: &str| AwsError::InvalidCidr {
            cidr: cidr.to_string(),
            reason: reason.to_string(),
        };

        let (addr, prefix) = cidr
            .split_once('/')
            .ok_or_else(|| invalid("missing prefix length"))?;
        let addr: Ipv4Addr = addr
            .parse()
            .map_err(|_| invalid("not an IPv4 address"))?;
        let prefix: u8 = prefix
            .parse()
            .ok()
            .filter(|p| *p <= 32)
            .ok_or_else(|| invalid("prefix length must be between 0 and 32"))?;

        Ok(Self {
            network: Ipv4Addr::from(u32::from(addr) & mask(prefix)),
            prefix,
        })
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// The `index`-th subnet of length `prefix` inside this network
    pub fn subnet(&self, prefix: u8, index: u32) -> Option<Ipv4Cidr> {
        if prefix < self.prefix || prefix > 32 {
            return None;
        }
        let size = 1u64 << (32 - prefix);
        let offset = u64::from(index) * size;
        if offset + size > 1u64 << (32 - self.prefix) {
            return None;
        }
        let network = u64::from(u32::from(self.network)) + offset;
        Some(Self {
            network: Ipv4Addr::from(network as u32),
            prefix,
        })
    }
}

fn mask(prefix: u8) -> u32 {
    if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - prefix)
    }
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubnetPlan {
    pub name: String,
    pub availability_zone: String,
    pub cidr: Ipv4Cidr,
    pub public: bool,
}

/// Compute every subnet of the VPC, public subnets first
pub fn plan_subnets(
    vpc_cidr: &str,
    availability_zones: &[String],
    per_zone: u32,
    subnet_size: u32,
) -> Result<Vec<SubnetPlan>> {
    let vpc = Ipv4Cidr::parse(vpc_cidr)?;
    let subnet_prefix = u8::try_from(subnet_size)
        .ok()
        .filter(|p| *p <= 32)
        .ok_or_else(|| AwsError::InvalidSpec(format!("spec.subnet_size /{} is not a valid prefix", subnet_size)))?;
    if subnet_prefix < vpc.prefix() {
        return Err(AwsError::InvalidSpec(format!(
            "spec.subnet_size /{} cannot be bigger than the VPC /{}",
            subnet_prefix,
            vpc.prefix()
        )));
    }

    let capacity = 1u64 << (subnet_prefix - vpc.prefix());
    let total = (availability_zones.len() as u64)
        .checked_mul(u64::from(per_zone))
        .and_then(|n| n.checked_mul(2))
        .filter(|n| *n <= capacity)
        .ok_or_else(|| {
            AwsError::InvalidSpec(format!(
                "{} availability zones with {} subnets each do not fit /{} subnets in {}",
                availability_zones.len(),
                per_zone,
                subnet_prefix,
                vpc
            ))
        })?;
    // Bounded by capacity, so the indices below fit in u32
    let public_count = (total / 2) as u32;
    let mut subnets = Vec::with_capacity(total as usize);

    for (public, kind, base) in [(true, "public", 0), (false, "private", public_count)] {
        for (zone_index, zone) in availability_zones.iter().enumerate() {
            for i in 0..per_zone {
                let index = base + zone_index as u32 * per_zone + i;
                let cidr = vpc.subnet(subnet_prefix, index).ok_or_else(|| {
                    AwsError::InvalidSpec(format!(
                        "{} subnets of /{} do not fit in {}",
                        total, subnet_prefix, vpc
                    ))
                })?;
                subnets.push(SubnetPlan {
                    name: format!("{}-subnet-{}-{}", kind, zone, i),
                    availability_zone: zone.clone(),
                    cidr,
                    public,
                });
            }
        }
    }
    Ok(subnets)
}

pub async fn resources(ctx: &mut StackContext<'_>, input: &AwsVpcStackInput) -> Result<()> {
    let locals = Locals::new(&input.target)?;
    let spec = locals.spec;
    let options = provider::setup(ctx, input.provider_config.as_ref(), None).await?;

    let vpc_cidr = spec.vpc_cidr.as_deref().unwrap_or_default();
    let subnets = plan_subnets(
        vpc_cidr,
        &spec.availability_zones,
        spec.subnets_per_availability_zone.unwrap_or(1),
        spec.subnet_size.unwrap_or(24),
    )?;

    let vpc = vpc(ctx, &locals, vpc_cidr, options.clone()).await?;
    ctx.export(OP_VPC_ID, vpc.id())?;
    ctx.export(OP_VPC_CIDR, vpc_cidr)?;

    let igw = ctx
        .register(
            TYPE_INTERNET_GATEWAY,
            "internet-gateway",
            Inputs::new()
                .set("vpcId", vpc.id())
                .set("tags", locals.named_tags(&format!("{}-igw", locals.name()))),
            options.clone().parent(&vpc),
        )
        .await
        .context("failed to create internet gateway")?;
    ctx.export(OP_INTERNET_GATEWAY_ID, igw.id())?;

    let public_table = route_table(
        ctx,
        &locals,
        &vpc,
        "public-route-table",
        ("gatewayId", &igw),
        options.clone(),
    )
    .await?;

    let nat_enabled = spec.is_nat_gateway_enabled.unwrap_or(false);
    let mut public_subnets = Vec::new();

    for plan in subnets.iter().filter(|s| s.public) {
        let subnet = subnet(ctx, &locals, &vpc, plan, options.clone()).await?;
        associate(ctx, plan, &subnet, &public_table, options.clone()).await?;
        public_subnets.push((plan, subnet));
    }

    for zone in &spec.availability_zones {
        let private_table = if nat_enabled {
            let first_public = public_subnets
                .iter()
                .find(|(plan, _)| &plan.availability_zone == zone)
                .map(|(_, subnet)| subnet);
            match first_public {
                Some(public_subnet) => Some(
                    nat_route_table(ctx, &locals, &vpc, &igw, zone, public_subnet, options.clone())
                        .await?,
                ),
                None => None,
            }
        } else {
            None
        };

        for plan in subnets
            .iter()
            .filter(|s| !s.public && &s.availability_zone == zone)
        {
            let subnet = subnet(ctx, &locals, &vpc, plan, options.clone()).await?;
            if let Some(table) = &private_table {
                associate(ctx, plan, &subnet, table, options.clone()).await?;
            }
        }
    }

    Ok(())
}

async fn vpc(
    ctx: &mut StackContext<'_>,
    locals: &Locals<'_, AwsVpc>,
    cidr: &str,
    options: ResourceOptions,
) -> Result<RegisteredResource> {
    let spec = locals.spec;
    let inputs = Inputs::new()
        .set("cidrBlock", cidr)
        .set("enableDnsSupport", spec.is_dns_support_enabled.unwrap_or(true))
        .set("enableDnsHostnames", spec.is_dns_hostnames_enabled.unwrap_or(true))
        .set("tags", locals.named_tags(locals.name()));

    ctx.register(TYPE_VPC, "vpc", inputs, options)
        .await
        .context("failed to create vpc")
}

async fn subnet(
    ctx: &mut StackContext<'_>,
    locals: &Locals<'_, AwsVpc>,
    vpc: &RegisteredResource,
    plan: &SubnetPlan,
    options: ResourceOptions,
) -> Result<RegisteredResource> {
    debug!(subnet = %plan.name, cidr = %plan.cidr, "Registering subnet");
    let inputs = Inputs::new()
        .set("vpcId", vpc.id())
        .set("cidrBlock", plan.cidr.to_string())
        .set("availabilityZone", plan.availability_zone.as_str())
        .set("mapPublicIpOnLaunch", plan.public)
        .set("tags", locals.named_tags(&plan.name));

    let subnet = ctx
        .register(TYPE_SUBNET, &plan.name, inputs, options.parent(vpc))
        .await
        .context(&format!("failed to create subnet {}", plan.name))?;

    ctx.export(&format!("{}.id", plan.name), subnet.id())?;
    ctx.export(&format!("{}.cidr", plan.name), plan.cidr.to_string())?;
    Ok(subnet)
}

/// Route table with a default route through `target`
async fn route_table(
    ctx: &mut StackContext<'_>,
    locals: &Locals<'_, AwsVpc>,
    vpc: &RegisteredResource,
    name: &str,
    (target_key, target): (&str, &RegisteredResource),
    options: ResourceOptions,
) -> Result<RegisteredResource> {
    let table = ctx
        .register(
            TYPE_ROUTE_TABLE,
            name,
            Inputs::new()
                .set("vpcId", vpc.id())
                .set("tags", locals.named_tags(name)),
            options.clone().parent(vpc),
        )
        .await
        .context(&format!("failed to create route table {}", name))?;

    ctx.register(
        TYPE_ROUTE,
        &format!("{}-default", name),
        Inputs::new()
            .set("routeTableId", table.id())
            .set("destinationCidrBlock", ANYWHERE)
            .set(target_key, target.id()),
        options.parent(&table),
    )
    .await
    .context(&format!("failed to create default route of {}", name))?;

    Ok(table)
}

async fn nat_route_table(
    ctx: &mut StackContext<'_>,
    locals: &Locals<'_, AwsVpc>,
    vpc: &RegisteredResource,
    igw: &RegisteredResource,
    zone: &str,
    public_subnet: &RegisteredResource,
    options: ResourceOptions,
) -> Result<RegisteredResource> {
    let eip_name = format!("nat-eip-{}", zone);
    let eip = ctx
        .register(
            TYPE_EIP,
            &eip_name,
            Inputs::new()
                .set("domain", "vpc")
                .set("tags", locals.named_tags(&eip_name)),
            options.clone().depends_on(igw),
        )
        .await
        .context(&format!("failed to create elastic ip {}", eip_name))?;

    let nat_name = format!("nat-gateway-{}", zone);
    let nat = ctx
        .register(
            TYPE_NAT_GATEWAY,
            &nat_name,
            Inputs::new()
                .set("allocationId", eip.id())
                .set("subnetId", public_subnet.id())
                .set("tags", locals.named_tags(&nat_name)),
            options.clone().parent(public_subnet).depends_on(igw),
        )
        .await
        .context(&format!("failed to create nat gateway {}", nat_name))?;

    route_table(
        ctx,
        locals,
        vpc,
        &format!("private-route-table-{}", zone),
        ("natGatewayId", &nat),
        options,
    )
    .await
}

async fn associate(
    ctx: &mut StackContext<'_>,
    plan: &SubnetPlan,
    subnet: &RegisteredResource,
    table: &RegisteredResource,
    options: ResourceOptions,
) -> Result<RegisteredResource> {
    ctx.register(
        TYPE_ROUTE_TABLE_ASSOCIATION,
        &format!("{}-rta", plan.name),
        Inputs::new()
            .set("subnetId", subnet.id())
            .set("routeTableId", table.id()),
        options.parent(subnet),
    )
    .await
    .context(&format!("failed to associate route table with {}", plan.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use planton_apis::aws::AwsVpcSpec;
    use planton_apis::{ApiResourceMetadata, StackInput};
    use planton_iac::{Output, PreviewEngine};

    fn zones(names: &[&str]) -> Vec<String> {
        names.iter().map(|z| z.to_string()).collect()
    }

    fn cidrs(plans: &[SubnetPlan]) -> Vec<String> {
        plans.iter().map(|p| p.cidr.to_string()).collect()
    }

    #[test]
    fn test_parse_cidr_clears_host_bits() {
        let cidr = Ipv4Cidr::parse("10.1.2.3/16").unwrap();
        assert_eq!(cidr.to_string(), "10.1.0.0/16");
        assert!(Ipv4Cidr::parse("10.0.0.0").is_err());
        assert!(Ipv4Cidr::parse("10.0.0.0/33").is_err());
        assert!(Ipv4Cidr::parse("fd00::/8").is_err());
    }

    #[test]
    fn test_public_subnets_first() {
        let plans = plan_subnets("10.0.0.0/16", &zones(&["us-east-1a", "us-east-1b"]), 1, 24).unwrap();
        assert_eq!(
            cidrs(&plans),
            vec!["10.0.0.0/24", "10.0.1.0/24", "10.0.2.0/24", "10.0.3.0/24"]
        );
        assert_eq!(plans[0].name, "public-subnet-us-east-1a-0");
        assert_eq!(plans[1].name, "public-subnet-us-east-1b-0");
        assert_eq!(plans[2].name, "private-subnet-us-east-1a-0");
        assert!(plans[1].public);
        assert!(!plans[2].public);
    }

    #[test]
    fn test_multiple_subnets_per_zone() {
        let plans = plan_subnets("172.16.0.0/20", &zones(&["a", "b"]), 2, 26).unwrap();
        assert_eq!(
            cidrs(&plans),
            vec![
                "172.16.0.0/26",
                "172.16.0.64/26",
                "172.16.0.128/26",
                "172.16.0.192/26",
                "172.16.1.0/26",
                "172.16.1.64/26",
                "172.16.1.128/26",
                "172.16.1.192/26",
            ]
        );
        assert_eq!(plans[5].name, "private-subnet-a-1");
    }

    #[test]
    fn test_subnet_larger_than_vpc_rejected() {
        let err = plan_subnets("10.0.0.0/24", &zones(&["a"]), 1, 16).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid spec: spec.subnet_size /16 cannot be bigger than the VPC /24"
        );
    }

    #[test]
    fn test_subnets_must_fit() {
        assert!(plan_subnets("10.0.0.0/24", &zones(&["a", "b", "c"]), 1, 26).is_err());
        assert!(plan_subnets("10.0.0.0/24", &zones(&["a", "b"]), 1, 26).is_ok());
    }

    #[test]
    fn test_huge_subnet_count_rejected() {
        let zones = zones(&["us-east-1a", "us-east-1b"]);
        let err = plan_subnets("10.0.0.0/16", &zones, 3_000_000_000, 24).unwrap_err();
        assert!(matches!(err, AwsError::InvalidSpec(_)));
        assert!(err.to_string().contains("do not fit /24 subnets in 10.0.0.0/16"));

        assert!(matches!(
            plan_subnets("0.0.0.0/0", &zones, u32::MAX, 32),
            Err(AwsError::InvalidSpec(_))
        ));
    }

    fn input(nat: bool) -> AwsVpcStackInput {
        let mut input = StackInput::new(AwsVpc {
            metadata: Some(ApiResourceMetadata {
                name: Some("main".to_string()),
                env: Some("dev".to_string()),
                ..Default::default()
            }),
            spec: Some(AwsVpcSpec {
                availability_zones: zones(&["us-east-1a", "us-east-1b"]),
                is_nat_gateway_enabled: Some(nat),
                ..Default::default()
            }),
            ..Default::default()
        });
        input.apply_defaults().unwrap();
        input
    }

    #[tokio::test]
    async fn test_vpc_without_nat() {
        let engine = PreviewEngine::new();
        let mut ctx = StackContext::new(&engine, "network", "dev");
        resources(&mut ctx, &input(false)).await.unwrap();
        let run = ctx.finish();

        assert_eq!(run.resources_of_type(TYPE_SUBNET).count(), 4);
        assert_eq!(run.resources_of_type(TYPE_NAT_GATEWAY).count(), 0);
        assert_eq!(run.resources_of_type(TYPE_ROUTE_TABLE).count(), 1);
        assert_eq!(run.resources_of_type(TYPE_ROUTE_TABLE_ASSOCIATION).count(), 2);

        let vpc = run.resources_of_type(TYPE_VPC).next().unwrap();
        assert_eq!(vpc.inputs.get("cidrBlock"), Some(&Output::from("10.0.0.0/16")));
        assert_eq!(vpc.inputs.get("enableDnsHostnames"), Some(&Output::from(true)));

        assert_eq!(run.outputs[OP_VPC_CIDR], Output::from("10.0.0.0/16"));
        assert_eq!(
            run.outputs["private-subnet-us-east-1b-0.cidr"],
            Output::from("10.0.3.0/24")
        );
        assert!(run.outputs.contains_key(OP_INTERNET_GATEWAY_ID));
    }

    #[tokio::test]
    async fn test_vpc_with_nat_per_zone() {
        let engine = PreviewEngine::new();
        let mut ctx = StackContext::new(&engine, "network", "dev");
        resources(&mut ctx, &input(true)).await.unwrap();
        let run = ctx.finish();

        assert_eq!(run.resources_of_type(TYPE_EIP).count(), 2);
        assert_eq!(run.resources_of_type(TYPE_NAT_GATEWAY).count(), 2);
        assert_eq!(run.resources_of_type(TYPE_ROUTE_TABLE).count(), 3);
        assert_eq!(run.resources_of_type(TYPE_ROUTE_TABLE_ASSOCIATION).count(), 4);

        let nat = run
            .resources_of_type(TYPE_NAT_GATEWAY)
            .find(|r| r.name == "nat-gateway-us-east-1a")
            .unwrap();
        let public_subnet = run
            .resources_of_type(TYPE_SUBNET)
            .find(|r| r.name == "public-subnet-us-east-1a-0")
            .unwrap();
        assert_eq!(nat.options.parent.as_ref(), Some(&public_subnet.urn));

        let route = run
            .resources_of_type(TYPE_ROUTE)
            .find(|r| r.name == "private-route-table-us-east-1a-default")
            .unwrap();
        assert!(route.inputs.contains_key("natGatewayId"));
    }
}
