//! DigitalOceanDnsZone

use crate::credentials::DigitalOceanProviderConfig;
use crate::resource::cloud_resource;
use crate::shared::{STRING_VALUE_OR_REF, StringValueOrRef};
use planton_core::reflect::{FieldDescriptor, Kind, MessageDescriptor};
use planton_core::{impl_message, proto_enum};
use serde::{Deserialize, Serialize};

/// TTL applied to records that leave `ttl_seconds` unset
pub const DEFAULT_RECORD_TTL_SECONDS: u32 = 3600;

proto_enum! {
    pub enum DnsRecordType as DNS_RECORD_TYPE("org.project_planton.shared.networking.enums.dnsrecordtype.DnsRecordType") {
        Unspecified = 0 => "unspecified",
        A = 1 => "A",
        Aaaa = 2 => "AAAA",
        Cname = 3 => "CNAME",
        Mx = 4 => "MX",
        Txt = 5 => "TXT",
        Srv = 6 => "SRV",
        Caa = 7 => "CAA",
        Ns = 8 => "NS",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DigitalOceanDnsZoneRecord {
    /// Record name relative to the zone, `@` for the apex
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub record_type: Option<DnsRecordType>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<StringValueOrRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_seconds: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

pub static DIGITAL_OCEAN_DNS_ZONE_RECORD: MessageDescriptor = MessageDescriptor {
    full_name: "org.project_planton.provider.digitalocean.digitaloceandnszone.v1.DigitalOceanDnsZoneRecord",
    fields: &[
        FieldDescriptor::singular("name", 1, Kind::String),
        FieldDescriptor::singular("record_type", 2, Kind::Enum(&DNS_RECORD_TYPE)),
        FieldDescriptor::repeated("values", 3, Kind::Message(&STRING_VALUE_OR_REF)),
        FieldDescriptor::singular("ttl_seconds", 4, Kind::Uint32).with_default("3600"),
        FieldDescriptor::singular("priority", 5, Kind::Uint32),
        FieldDescriptor::singular("weight", 6, Kind::Uint32),
        FieldDescriptor::singular("port", 7, Kind::Uint32),
        FieldDescriptor::singular("flags", 8, Kind::Uint32),
        FieldDescriptor::singular("tag", 9, Kind::String),
    ],
};

impl_message! {
    DigitalOceanDnsZoneRecord => DIGITAL_OCEAN_DNS_ZONE_RECORD;
    scalars: [name, ttl_seconds, priority, weight, port, flags, tag];
    enums: [record_type];
}

impl DigitalOceanDnsZoneRecord {
    pub fn ttl(&self) -> u32 {
        self.ttl_seconds.unwrap_or(DEFAULT_RECORD_TTL_SECONDS)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DigitalOceanDnsZoneSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<DigitalOceanDnsZoneRecord>,
}

pub static DIGITAL_OCEAN_DNS_ZONE_SPEC: MessageDescriptor = MessageDescriptor {
    full_name: "org.project_planton.provider.digitalocean.digitaloceandnszone.v1.DigitalOceanDnsZoneSpec",
    fields: &[
        FieldDescriptor::singular("domain_name", 1, Kind::String),
        FieldDescriptor::repeated("records", 2, Kind::Message(&DIGITAL_OCEAN_DNS_ZONE_RECORD)),
    ],
};

impl_message! {
    DigitalOceanDnsZoneSpec => DIGITAL_OCEAN_DNS_ZONE_SPEC;
    scalars: [domain_name];
}

cloud_resource! {
    pub struct DigitalOceanDnsZone as DIGITAL_OCEAN_DNS_ZONE(
        "org.project_planton.provider.digitalocean.digitaloceandnszone.v1.DigitalOceanDnsZone"
    ) {
        api_version: "digital-ocean.project-planton.org/v1",
        kind: DigitalOceanDnsZone,
        spec: DigitalOceanDnsZoneSpec => DIGITAL_OCEAN_DNS_ZONE_SPEC,
        stack_input: DigitalOceanDnsZoneStackInput<DigitalOceanProviderConfig>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planton_core::apply_defaults;

    #[test]
    fn test_record_ttl_not_defaulted_inside_list() {
        let mut zone = DigitalOceanDnsZone {
            spec: Some(DigitalOceanDnsZoneSpec {
                domain_name: Some("example.com".to_string()),
                records: vec![DigitalOceanDnsZoneRecord {
                    name: Some("@".to_string()),
                    record_type: Some(DnsRecordType::A),
                    values: vec![StringValueOrRef::literal("1.2.3.4")],
                    ..Default::default()
                }],
            }),
            ..Default::default()
        };
        apply_defaults(&mut zone).unwrap();

        let record = &zone.spec.as_ref().unwrap().records[0];
        assert_eq!(record.ttl_seconds, None);
        assert_eq!(record.ttl(), 3600);
    }

    #[test]
    fn test_record_type_yaml_key() {
        let record: DigitalOceanDnsZoneRecord =
            serde_yaml::from_str("name: www\ntype: CNAME\nvalues:\n  - value: example.com.\n")
                .unwrap();
        assert_eq!(record.record_type, Some(DnsRecordType::Cname));
    }
}
