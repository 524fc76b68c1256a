//! Planton IaC engine abstraction
//!
//! Provisioning modules register resources through a [`StackContext`], which
//! forwards each registration to a [`ResourceEngine`]. The in-process
//! [`PreviewEngine`] accepts registrations without creating anything; the
//! [`LocalBackend`] diffs runs against local state and records them.
//!
//! ```text
//!   module ──register──▶ StackContext ──▶ ResourceEngine (preview, ...)
//!                              │
//!                           finish
//!                              ▼
//!                          StackRun ──plan/apply──▶ LocalBackend ──▶ .planton/stacks/<stack>.json
//! ```

pub mod action;
pub mod backend;
pub mod context;
pub mod engine;
pub mod error;
pub mod output;
pub mod preview;
pub mod state;

// Re-exports
pub use action::{Action, ActionResult, ActionType, ApplyResult, Plan, PlanSummary};
pub use backend::LocalBackend;
pub use context::{ResourceRecord, StackContext, StackRun};
pub use engine::{RegisterResourceRequest, RegisteredResource, ResourceEngine, ResourceOptions, Urn};
pub use error::{IacError, Result};
pub use output::{Inputs, Output};
pub use preview::PreviewEngine;
pub use state::{ResourceState, ResourceStatus, StackState, StateLock, StateManager};
