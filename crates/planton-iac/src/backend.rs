//! Local state backend

use crate::action::{ActionType, ApplyResult, Plan};
use crate::context::StackRun;
use crate::error::Result;
use crate::output::Output;
use crate::state::{ResourceState, StateManager};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;
use tracing::{info, instrument};

/// Records stack runs in local state files
pub struct LocalBackend {
    state: StateManager,
}

impl LocalBackend {
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            state: StateManager::new(state_dir),
        }
    }

    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Plan a run against the recorded state of its stack
    pub async fn plan(&self, run: &StackRun) -> Result<Plan> {
        let current = self.state.load(&run.stack, &run.project).await?;
        Ok(Plan::diff(run, &current))
    }

    /// Record a run: resources that are no longer registered are dropped and
    /// outputs are replaced
    #[instrument(skip_all, fields(stack = %run.stack))]
    pub async fn apply(&self, run: &StackRun) -> Result<(Plan, ApplyResult)> {
        let started = Instant::now();
        let lock = self.state.acquire_lock(&run.stack).await?;

        let mut current = self.state.load(&run.stack, &run.project).await?;
        let plan = Plan::diff(run, &current);
        let mut result = ApplyResult::new();

        for action in &plan.actions {
            match action.action_type {
                ActionType::Delete => {
                    current.remove_resource(&action.id);
                }
                ActionType::Create | ActionType::Update | ActionType::NoOp => {
                    if let Some(record) = run.resources.iter().find(|r| r.urn.as_str() == action.id) {
                        current.set_resource(ResourceState::from_record(record));
                    }
                }
            }
            result.add_success(action.id.clone(), action.description.clone());
        }

        current.project = run.project.clone();
        current.outputs = run.outputs.clone();
        self.state.save(&current).await?;
        lock.release().await?;

        result.duration_ms = started.elapsed().as_millis() as u64;
        info!(summary = %plan.summary(), "Recorded stack run");
        Ok((plan, result))
    }

    /// Outputs recorded by the last apply
    pub async fn outputs(&self, stack: &str) -> Result<BTreeMap<String, Output>> {
        Ok(self.state.load(stack, "").await?.outputs)
    }
}
