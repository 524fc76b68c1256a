//! Local stack state
//!
//! Each stack is tracked in `.planton/stacks/<stack>.json` holding the
//! resources recorded by the last `up` and the exported outputs.

use crate::context::ResourceRecord;
use crate::error::{IacError, Result};
use crate::output::{Inputs, Output};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

const STATE_VERSION: u32 = 1;
pub const STATE_DIR: &str = ".planton";
const STACKS_DIR: &str = "stacks";

/// Recorded state of one stack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackState {
    /// State file version
    pub version: u32,

    pub stack: String,

    pub project: String,

    /// Last modified timestamp
    pub updated_at: DateTime<Utc>,

    /// Resources indexed by URN
    pub resources: BTreeMap<String, ResourceState>,

    #[serde(default)]
    pub outputs: BTreeMap<String, Output>,
}

impl StackState {
    pub fn new(stack: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            version: STATE_VERSION,
            stack: stack.into(),
            project: project.into(),
            updated_at: Utc::now(),
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    /// Add or update a resource
    pub fn set_resource(&mut self, state: ResourceState) {
        let now = Utc::now();
        let state = match self.resources.get(&state.urn) {
            Some(existing) => ResourceState {
                created_at: existing.created_at,
                updated_at: now,
                ..state
            },
            None => state,
        };
        self.resources.insert(state.urn.clone(), state);
        self.updated_at = now;
    }

    /// Remove a resource
    pub fn remove_resource(&mut self, urn: &str) -> Option<ResourceState> {
        let result = self.resources.remove(urn);
        if result.is_some() {
            self.updated_at = Utc::now();
        }
        result
    }

    pub fn get_resource(&self, urn: &str) -> Option<&ResourceState> {
        self.resources.get(urn)
    }
}

/// State of a single resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceState {
    pub urn: String,

    pub type_token: String,

    pub name: String,

    pub status: ResourceStatus,

    /// Inputs at the time of the last apply
    pub inputs: Inputs,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl ResourceState {
    pub fn from_record(record: &ResourceRecord) -> Self {
        let now = Utc::now();
        Self {
            urn: record.urn.to_string(),
            type_token: record.type_token.clone(),
            name: record.name.clone(),
            status: ResourceStatus::Recorded,
            inputs: record.inputs.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_status(mut self, status: ResourceStatus) -> Self {
        self.status = status;
        self
    }
}

/// Status of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    /// Registered by a run and recorded locally
    Recorded,
    /// Last apply failed for this resource
    Error,
    /// Status is unknown
    Unknown,
}

impl std::fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceStatus::Recorded => write!(f, "recorded"),
            ResourceStatus::Error => write!(f, "error"),
            ResourceStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Reads and writes stack state files
pub struct StateManager {
    /// Backend directory (usually `<project>/.planton`)
    state_dir: PathBuf,
}

impl StateManager {
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            state_dir: state_dir.as_ref().to_path_buf(),
        }
    }

    /// State manager rooted at `<project_root>/.planton`
    pub fn for_project(project_root: impl AsRef<Path>) -> Self {
        Self::new(project_root.as_ref().join(STATE_DIR))
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    fn stacks_dir(&self) -> PathBuf {
        self.state_dir.join(STACKS_DIR)
    }

    fn state_path(&self, stack: &str) -> PathBuf {
        self.stacks_dir().join(format!("{}.json", stack))
    }

    fn backup_path(&self, stack: &str) -> PathBuf {
        self.stacks_dir().join(format!("{}.json.backup", stack))
    }

    fn lock_path(&self, stack: &str) -> PathBuf {
        self.stacks_dir().join(format!("{}.lock", stack))
    }

    fn check_stack_name(stack: &str) -> Result<()> {
        let valid = !stack.is_empty()
            && stack
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !stack.starts_with('.');
        if valid {
            Ok(())
        } else {
            Err(IacError::StateError(format!("Invalid stack name: {:?}", stack)))
        }
    }

    async fn ensure_stacks_dir(&self) -> Result<()> {
        let dir = self.stacks_dir();
        if !dir.exists() {
            fs::create_dir_all(&dir).await?;
            tracing::debug!("Created state directory: {}", dir.display());
        }
        Ok(())
    }

    /// Load a stack's state, empty when nothing was recorded yet
    pub async fn load(&self, stack: &str, project: &str) -> Result<StackState> {
        Self::check_stack_name(stack)?;
        let path = self.state_path(stack);
        if !path.exists() {
            tracing::debug!(stack, "State file not found, returning empty state");
            return Ok(StackState::new(stack, project));
        }

        let content = fs::read_to_string(&path).await?;
        let state: StackState = serde_json::from_str(&content)?;

        if state.version > STATE_VERSION {
            return Err(IacError::StateError(format!(
                "State file version {} is newer than supported version {}",
                state.version, STATE_VERSION
            )));
        }

        tracing::debug!(stack, "Loaded state with {} resources", state.resources.len());
        Ok(state)
    }

    /// Save a stack's state, keeping the previous file as a backup
    pub async fn save(&self, state: &StackState) -> Result<()> {
        Self::check_stack_name(&state.stack)?;
        self.ensure_stacks_dir().await?;

        let path = self.state_path(&state.stack);
        let backup = self.backup_path(&state.stack);

        if path.exists() {
            if backup.exists() {
                fs::remove_file(&backup).await?;
            }
            fs::rename(&path, &backup).await?;
            tracing::debug!("Created state backup");
        }

        let content = serde_json::to_string_pretty(state)?;
        fs::write(&path, content).await?;

        tracing::debug!(
            stack = %state.stack,
            "Saved state with {} resources",
            state.resources.len()
        );
        Ok(())
    }

    /// Names of stacks with a state file
    pub async fn list_stacks(&self) -> Result<Vec<String>> {
        let dir = self.stacks_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut stacks = Vec::new();
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            if let Some(stack) = file_name.to_str().and_then(|n| n.strip_suffix(".json")) {
                stacks.push(stack.to_string());
            }
        }
        stacks.sort();
        Ok(stacks)
    }

    /// Acquire a lock for exclusive access to a stack
    pub async fn acquire_lock(&self, stack: &str) -> Result<StateLock> {
        Self::check_stack_name(stack)?;
        self.ensure_stacks_dir().await?;

        let lock_path = self.lock_path(stack);

        if lock_path.exists() {
            let content = fs::read_to_string(&lock_path).await?;
            let lock_info: LockInfo = serde_json::from_str(&content)?;

            // Locks older than an hour are stale
            let age = Utc::now().signed_duration_since(lock_info.acquired_at);
            if age.num_hours() < 1 {
                return Err(IacError::LockError(format!(
                    "Stack {} is locked by {} since {}",
                    stack, lock_info.holder, lock_info.acquired_at
                )));
            }

            tracing::warn!("Removing stale lock from {}", lock_info.holder);
        }

        let lock_info = LockInfo {
            holder: std::env::var("HOSTNAME")
                .or_else(|_| std::env::var("HOST"))
                .unwrap_or_else(|_| "unknown".to_string()),
            acquired_at: Utc::now(),
        };

        let content = serde_json::to_string_pretty(&lock_info)?;
        fs::write(&lock_path, content).await?;

        tracing::debug!(stack, "Acquired state lock");
        Ok(StateLock {
            lock_path,
            released: false,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LockInfo {
    holder: String,
    acquired_at: DateTime<Utc>,
}

/// RAII guard for a stack lock
pub struct StateLock {
    lock_path: PathBuf,
    released: bool,
}

impl StateLock {
    /// Release the lock
    pub async fn release(mut self) -> Result<()> {
        if !self.released {
            if self.lock_path.exists() {
                fs::remove_file(&self.lock_path).await?;
                tracing::debug!("Released state lock");
            }
            self.released = true;
        }
        Ok(())
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        if !self.released && self.lock_path.exists() {
            let _ = std::fs::remove_file(&self.lock_path);
        }
    }
}
