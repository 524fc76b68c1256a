//! Values derived once per run and shared by every resource of a module

use crate::error::{DigitalOceanError, Result};
use planton_apis::CloudResource;
use planton_apis::digitalocean::DigitalOceanRegion;
use std::collections::BTreeMap;

pub struct Locals<'a, R: CloudResource> {
    pub resource: &'a R,
    pub spec: &'a R::Spec,
    pub labels: BTreeMap<String, String>,
    /// Labels rendered as DigitalOcean tags
    pub tags: Vec<String>,
}

impl<'a, R: CloudResource> Locals<'a, R> {
    pub fn new(resource: &'a R) -> Result<Self> {
        if resource.name().is_empty() {
            return Err(DigitalOceanError::InvalidSpec(
                "metadata.name is required".to_string(),
            ));
        }
        let spec = resource.require_spec()?;
        let labels = resource.labels();
        let tags = to_tags(&labels);
        Ok(Self {
            resource,
            spec,
            labels,
            tags,
        })
    }

    pub fn name(&self) -> &str {
        self.resource.name()
    }
}

/// Render labels as `key:value` tags
///
/// DigitalOcean tags only allow letters, digits, `:`, `-` and `_`; every
/// other character becomes `-`.
pub fn to_tags(labels: &BTreeMap<String, String>) -> Vec<String> {
    labels
        .iter()
        .map(|(key, value)| sanitize_tag(&format!("{}:{}", key, value)))
        .collect()
}

pub fn sanitize_tag(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ':' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Region slug of a required region field
pub fn require_region(region: Option<DigitalOceanRegion>, field: &str) -> Result<&'static str> {
    region
        .and_then(|r| r.slug())
        .ok_or_else(|| DigitalOceanError::InvalidSpec(format!("{} is required", field)))
}
