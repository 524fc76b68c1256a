//! Resource engine abstraction

use crate::error::Result;
use crate::output::{Inputs, Output};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Unique resource name within a stack
///
/// Format: `urn:pulumi:{stack}::{project}::{type}::{name}`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Urn(String);

impl Urn {
    pub fn new(stack: &str, project: &str, type_token: &str, name: &str) -> Self {
        Self(format!(
            "urn:pulumi:{}::{}::{}::{}",
            stack, project, type_token, name
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resource type token
    pub fn type_token(&self) -> &str {
        self.0.split("::").nth(2).unwrap_or_default()
    }

    /// Logical resource name
    pub fn name(&self) -> &str {
        self.0.rsplit("::").next().unwrap_or_default()
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Options attached to a resource registration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceOptions {
    /// Explicit provider resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Urn>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Urn>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<Urn>,
}

impl ResourceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(mut self, provider: &RegisteredResource) -> Self {
        self.provider = Some(provider.urn.clone());
        self
    }

    pub fn parent(mut self, parent: &RegisteredResource) -> Self {
        self.parent = Some(parent.urn.clone());
        self
    }

    pub fn depends_on(mut self, resource: &RegisteredResource) -> Self {
        self.depends_on.push(resource.urn.clone());
        self
    }
}

/// A resource registration sent to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterResourceRequest {
    pub urn: Urn,
    pub type_token: String,
    pub name: String,
    pub inputs: Inputs,
    pub options: ResourceOptions,
}

/// Engine response for a registered resource
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredResource {
    pub urn: Urn,
    pub id: Output,
    pub outputs: BTreeMap<String, Output>,
}

impl RegisteredResource {
    /// Output property, computed when the engine has not resolved it
    pub fn output(&self, property: &str) -> Output {
        self.outputs
            .get(property)
            .cloned()
            .unwrap_or_else(|| Output::computed(&self.urn, property))
    }

    pub fn id(&self) -> Output {
        self.id.clone()
    }
}

/// An infrastructure-as-code engine that accepts resource registrations
///
/// Registrations arrive sequentially in program order.
#[async_trait]
pub trait ResourceEngine: Send + Sync {
    /// Engine name (e.g. "preview")
    fn name(&self) -> &str;

    /// Register a resource and return its (possibly computed) outputs
    async fn register_resource(&self, request: RegisterResourceRequest)
    -> Result<RegisteredResource>;
}
