//! In-process preview engine
//!
//! Accepts every registration, echoes known inputs back as outputs and
//! leaves provider-assigned properties (`id`, `urn`-derived values)
//! computed. Nothing is created.

use crate::engine::{RegisterResourceRequest, RegisteredResource, ResourceEngine};
use crate::error::{IacError, Result};
use crate::output::Output;
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct PreviewEngine {
    registrations: Mutex<Vec<RegisterResourceRequest>>,
}

impl PreviewEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests received so far, in order
    pub fn registrations(&self) -> Vec<RegisterResourceRequest> {
        match self.registrations.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl ResourceEngine for PreviewEngine {
    fn name(&self) -> &str {
        "preview"
    }

    async fn register_resource(
        &self,
        request: RegisterResourceRequest,
    ) -> Result<RegisteredResource> {
        let outputs = request
            .inputs
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let registered = RegisteredResource {
            id: Output::computed(&request.urn, "id"),
            urn: request.urn.clone(),
            outputs,
        };

        self.registrations
            .lock()
            .map_err(|e| IacError::Engine(format!("preview engine lock poisoned: {}", e)))?
            .push(request);

        Ok(registered)
    }
}
