//! Stack run context handed to provisioning modules

use crate::engine::{RegisterResourceRequest, RegisteredResource, ResourceEngine, ResourceOptions, Urn};
use crate::error::{IacError, Result};
use crate::output::{Inputs, Output};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// A resource registered during a stack run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub urn: Urn,
    pub type_token: String,
    pub name: String,
    pub inputs: Inputs,
    #[serde(default)]
    pub options: ResourceOptions,
}

/// Everything a module registered and exported in one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StackRun {
    pub stack: String,
    pub project: String,
    pub resources: Vec<ResourceRecord>,
    pub outputs: BTreeMap<String, Output>,
}

impl StackRun {
    pub fn resource(&self, urn: &Urn) -> Option<&ResourceRecord> {
        self.resources.iter().find(|r| &r.urn == urn)
    }

    /// Records of the given type token, in registration order
    pub fn resources_of_type<'a, 'b>(
        &'a self,
        type_token: &'b str,
    ) -> impl Iterator<Item = &'a ResourceRecord> + use<'a, 'b> {
        self.resources
            .iter()
            .filter(move |r| r.type_token == type_token)
    }
}

/// Registration context for a single stack
///
/// Modules register resources through the context in program order; each
/// registration is forwarded to the engine immediately.
pub struct StackContext<'a> {
    engine: &'a dyn ResourceEngine,
    stack: String,
    project: String,
    seen: HashSet<Urn>,
    resources: Vec<ResourceRecord>,
    outputs: BTreeMap<String, Output>,
}

impl<'a> StackContext<'a> {
    pub fn new(
        engine: &'a dyn ResourceEngine,
        project: impl Into<String>,
        stack: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            stack: stack.into(),
            project: project.into(),
            seen: HashSet::new(),
            resources: Vec::new(),
            outputs: BTreeMap::new(),
        }
    }

    pub fn stack(&self) -> &str {
        &self.stack
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    /// Register a resource
    ///
    /// A second registration with the same type token and name fails.
    pub async fn register(
        &mut self,
        type_token: &str,
        name: &str,
        inputs: Inputs,
        options: ResourceOptions,
    ) -> Result<RegisteredResource> {
        if name.is_empty() {
            return Err(IacError::InvalidResource {
                name: type_token.to_string(),
                reason: "resource name must not be empty".to_string(),
            });
        }

        let urn = Urn::new(&self.stack, &self.project, type_token, name);
        if !self.seen.insert(urn.clone()) {
            return Err(IacError::DuplicateResource(urn.to_string()));
        }

        debug!(urn = %urn, engine = self.engine.name(), "Registering resource");

        let request = RegisterResourceRequest {
            urn: urn.clone(),
            type_token: type_token.to_string(),
            name: name.to_string(),
            inputs: inputs.clone(),
            options: options.clone(),
        };
        let registered = self.engine.register_resource(request).await?;

        self.resources.push(ResourceRecord {
            urn,
            type_token: type_token.to_string(),
            name: name.to_string(),
            inputs,
            options,
        });
        Ok(registered)
    }

    /// Register an explicit provider resource for `package`
    pub async fn provider(
        &mut self,
        package: &str,
        name: &str,
        inputs: Inputs,
    ) -> Result<RegisteredResource> {
        let type_token = format!("pulumi:providers:{}", package);
        self.register(&type_token, name, inputs, ResourceOptions::new())
            .await
    }

    /// Export a named stack output
    pub fn export(&mut self, name: &str, value: impl Into<Output>) -> Result<()> {
        if self.outputs.contains_key(name) {
            return Err(IacError::DuplicateOutput(name.to_string()));
        }
        self.outputs.insert(name.to_string(), value.into());
        Ok(())
    }

    pub fn outputs(&self) -> &BTreeMap<String, Output> {
        &self.outputs
    }

    /// Finish the run
    pub fn finish(self) -> StackRun {
        debug!(
            stack = %self.stack,
            resources = self.resources.len(),
            outputs = self.outputs.len(),
            "Stack run finished"
        );
        StackRun {
            stack: self.stack,
            project: self.project,
            resources: self.resources,
            outputs: self.outputs,
        }
    }
}
