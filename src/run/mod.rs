//! The asynchronous run-lifecycle contract.
//!
//! A run is submitted, immediately yields an identifier and executes
//! out-of-process; callers observe it by polling. Status transitions are
//! `queued → running → {succeeded | failed}` and monotonic; no transition
//! ever leaves a terminal state. Logs across polls form a prefix-growing
//! sequence, so callers replace their displayed state wholesale from each
//! snapshot instead of patching it incrementally.
//!
//! Cancellation is client-side only: halting the poll loop stops
//! observation, not the remote run. The contract has no cancel operation.

mod local;
mod poll;

pub use local::LocalRunner;
pub use poll::{PollConfig, submit_and_wait, wait_for_terminal};

use crate::error::RunError;
use crate::workflow::{ExecutionLog, NodeKind};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Lifecycle status of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Succeeded | RunStatus::Failed)
    }

    /// Position in the lifecycle, used to reject regressing snapshots.
    pub(crate) fn rank(self) -> u8 {
        match self {
            RunStatus::Queued => 0,
            RunStatus::Running => 1,
            RunStatus::Succeeded | RunStatus::Failed => 2,
        }
    }
}

/// One execution attempt of a workflow graph, sealed on reaching a
/// terminal status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    pub id: String,
    pub workflow_id: String,
    pub status: RunStatus,
    pub started_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<u64>,
    pub logs: Vec<ExecutionLog>,
}

/// Per-node progress as reported by the external runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSnapshot {
    pub node_id: String,
    pub node_kind: NodeKind,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One full status snapshot from a poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSnapshot {
    pub status: RunStatus,
    pub started_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<u64>,
    #[serde(default)]
    pub tasks: Vec<TaskSnapshot>,
    #[serde(default)]
    pub logs: Vec<ExecutionLog>,
}

/// The remote execution collaborator: request/response-shaped, tolerant of
/// arbitrary latency and transient failure.
pub trait RunnerBackend {
    /// Submits a run and returns its identifier without blocking on
    /// execution.
    fn start_run(&self, workflow_id: &str, input: &JsonValue) -> Result<String, RunError>;

    /// Fetches the current status snapshot for a run.
    fn run_status(&self, workflow_id: &str, run_id: &str) -> Result<RunSnapshot, RunError>;
}
