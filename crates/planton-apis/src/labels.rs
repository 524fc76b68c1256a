//! Standard resource labels

use crate::kind::CloudResourceKind;
use crate::shared::ApiResourceMetadata;
use std::collections::BTreeMap;

pub const RESOURCE: &str = "planton.org/resource";
pub const ORGANIZATION: &str = "planton.org/organization";
pub const ENVIRONMENT: &str = "planton.org/environment";
pub const RESOURCE_KIND: &str = "planton.org/resource-kind";
pub const RESOURCE_ID: &str = "planton.org/resource-id";

/// Labels stamped on every provisioned resource; empty values are omitted
pub fn resource_labels(
    metadata: &ApiResourceMetadata,
    kind: CloudResourceKind,
) -> BTreeMap<String, String> {
    let candidates = [
        (RESOURCE, "true"),
        (ORGANIZATION, metadata.org()),
        (ENVIRONMENT, metadata.env()),
        (RESOURCE_KIND, planton_core::ProtoEnum::name(kind)),
        (RESOURCE_ID, metadata.id()),
    ];

    candidates
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}
