//! Planned actions for a stack run

use crate::context::StackRun;
use crate::state::StackState;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A planned action for one resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    /// Resource URN
    pub id: String,

    /// Type of action to perform
    pub action_type: ActionType,

    /// Resource type token (e.g. "digitalocean:index/vpc:Vpc")
    pub resource_type: String,

    /// Logical resource name
    pub resource_name: String,

    pub description: String,

    /// Changed input keys for updates
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, serde_json::Value>,
}

/// Type of action to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Create a new resource
    Create,
    /// Update an existing resource
    Update,
    /// Delete a resource
    Delete,
    /// No changes needed
    NoOp,
}

impl ActionType {
    /// Marker printed in front of the resource in plan output
    pub fn symbol(&self) -> &'static str {
        match self {
            ActionType::Create => "+",
            ActionType::Update => "~",
            ActionType::Delete => "-",
            ActionType::NoOp => " ",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Create => write!(f, "create"),
            ActionType::Update => write!(f, "update"),
            ActionType::Delete => write!(f, "delete"),
            ActionType::NoOp => write!(f, "no-op"),
        }
    }
}

/// Result of applying a plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyResult {
    /// Successfully applied actions
    pub succeeded: Vec<ActionResult>,

    /// Failed actions
    pub failed: Vec<ActionResult>,

    /// Total execution time in milliseconds
    pub duration_ms: u64,
}

impl ApplyResult {
    pub fn new() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn add_success(&mut self, action_id: String, message: String) {
        self.succeeded.push(ActionResult {
            action_id,
            success: true,
            message,
            error: None,
        });
    }

    pub fn add_failure(&mut self, action_id: String, error: String) {
        self.failed.push(ActionResult {
            action_id,
            success: false,
            message: String::new(),
            error: Some(error),
        });
    }
}

impl Default for ApplyResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a single action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub action_id: String,
    pub success: bool,
    pub message: String,
    pub error: Option<String>,
}

/// Actions needed to move the recorded state to a stack run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub actions: Vec<Action>,

    /// Whether the plan has any changes
    pub has_changes: bool,
}

impl Plan {
    pub fn new(actions: Vec<Action>) -> Self {
        let has_changes = actions.iter().any(|a| a.action_type != ActionType::NoOp);
        Self {
            actions,
            has_changes,
        }
    }

    pub fn empty() -> Self {
        Self {
            actions: Vec::new(),
            has_changes: false,
        }
    }

    /// Diff a stack run against recorded state
    ///
    /// Resources of the run come first in registration order, followed by
    /// recorded resources the run no longer registers.
    pub fn diff(run: &StackRun, state: &StackState) -> Self {
        let mut actions = Vec::with_capacity(run.resources.len());
        let mut desired = HashSet::new();

        for record in &run.resources {
            desired.insert(record.urn.as_str());
            let (action_type, details) = match state.resources.get(record.urn.as_str()) {
                None => (ActionType::Create, BTreeMap::new()),
                Some(current) => {
                    let changed = current.inputs.changed_keys(&record.inputs);
                    if changed.is_empty() {
                        (ActionType::NoOp, BTreeMap::new())
                    } else {
                        (
                            ActionType::Update,
                            BTreeMap::from([("changed".to_string(), serde_json::json!(changed))]),
                        )
                    }
                }
            };
            actions.push(Action {
                id: record.urn.to_string(),
                action_type,
                resource_type: record.type_token.clone(),
                resource_name: record.name.clone(),
                description: format!("{} {} ({})", action_type, record.name, record.type_token),
                details,
            });
        }

        for (urn, current) in &state.resources {
            if desired.contains(urn.as_str()) {
                continue;
            }
            actions.push(Action {
                id: urn.clone(),
                action_type: ActionType::Delete,
                resource_type: current.type_token.clone(),
                resource_name: current.name.clone(),
                description: format!("delete {} ({})", current.name, current.type_token),
                details: BTreeMap::new(),
            });
        }

        Self::new(actions)
    }

    /// Get actions by type
    pub fn actions_by_type(&self, action_type: ActionType) -> Vec<&Action> {
        self.actions
            .iter()
            .filter(|a| a.action_type == action_type)
            .collect()
    }

    /// Summary of the plan
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            create: self.actions_by_type(ActionType::Create).len(),
            update: self.actions_by_type(ActionType::Update).len(),
            delete: self.actions_by_type(ActionType::Delete).len(),
            no_change: self.actions_by_type(ActionType::NoOp).len(),
        }
    }
}

/// Summary of planned actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSummary {
    pub create: usize,
    pub update: usize,
    pub delete: usize,
    pub no_change: usize,
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to create, {} to update, {} to delete, {} unchanged",
            self.create, self.update, self.delete, self.no_change
        )
    }
}
