//! DigitalOcean resource schemas

pub mod container_registry;
pub mod database_cluster;
pub mod dns_zone;
pub mod kubernetes_cluster;
pub mod load_balancer;
pub mod vpc;

use planton_core::proto_enum;

pub use container_registry::*;
pub use database_cluster::*;
pub use dns_zone::*;
pub use kubernetes_cluster::*;
pub use load_balancer::*;
pub use vpc::*;

proto_enum! {
    /// DigitalOcean datacenter region slugs
    pub enum DigitalOceanRegion as DIGITAL_OCEAN_REGION("org.project_planton.provider.digitalocean.DigitalOceanRegion") {
        Unspecified = 0 => "digital_ocean_region_unspecified",
        Nyc1 = 1 => "nyc1",
        Nyc3 = 2 => "nyc3",
        Sfo2 = 3 => "sfo2",
        Sfo3 = 4 => "sfo3",
        Ams3 = 5 => "ams3",
        Sgp1 = 6 => "sgp1",
        Lon1 = 7 => "lon1",
        Fra1 = 8 => "fra1",
        Tor1 = 9 => "tor1",
        Blr1 = 10 => "blr1",
        Syd1 = 11 => "syd1",
    }
}

impl DigitalOceanRegion {
    /// Region slug as the DigitalOcean API expects it
    pub fn slug(&self) -> Option<&'static str> {
        match self {
            DigitalOceanRegion::Unspecified => None,
            other => Some(planton_core::ProtoEnum::name(*other)),
        }
    }
}
