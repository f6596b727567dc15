use super::{RunRecord, RunSnapshot, RunStatus, RunnerBackend};
use crate::error::RunError;
use std::time::Duration;
use tracing::{debug, warn};

/// Caller-driven polling parameters: a fixed interval and a bounded
/// attempt count.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            interval: Duration::from_secs(1),
            max_attempts: 60,
        }
    }
}

/// Polls a run until a terminal status is observed or the attempt budget
/// runs out.
///
/// Each successful poll replaces the observed record wholesale from the
/// snapshot; re-delivered log entries are tolerated by construction. A
/// snapshot whose status ranks below the last observed one is ignored, so
/// an observed status never moves backwards. A transport failure consumes
/// an attempt and polling continues.
///
/// Exhausting the budget returns [`RunError::PollBudgetExhausted`]: a
/// client-side timeout, not a run failure. The run may still be executing
/// remotely; there is no cancel operation in the contract.
pub fn wait_for_terminal(
    backend: &dyn RunnerBackend,
    workflow_id: &str,
    run_id: &str,
    config: PollConfig,
) -> Result<RunRecord, RunError> {
    let mut observed: Option<RunSnapshot> = None;

    for attempt in 0..config.max_attempts {
        if attempt > 0 && !config.interval.is_zero() {
            std::thread::sleep(config.interval);
        }

        let snapshot = match backend.run_status(workflow_id, run_id) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(run = run_id, attempt, error = %e, "poll failed, continuing");
                continue;
            }
        };

        let last_rank = observed.as_ref().map(|s| s.status.rank()).unwrap_or(0);
        if snapshot.status.rank() < last_rank {
            debug!(run = run_id, status = ?snapshot.status, "ignoring regressing snapshot");
            continue;
        }
        if snapshot.status.is_terminal() {
            debug!(run = run_id, status = ?snapshot.status, "run reached terminal status");
            return Ok(RunRecord {
                id: run_id.to_string(),
                workflow_id: workflow_id.to_string(),
                status: snapshot.status,
                started_at: snapshot.started_at,
                finished_at: snapshot.finished_at,
                logs: snapshot.logs,
            });
        }
        observed = Some(snapshot);
    }

    Err(RunError::PollBudgetExhausted {
        attempts: config.max_attempts,
    })
}

/// Submits a run and polls it to completion in one call.
pub fn submit_and_wait(
    backend: &dyn RunnerBackend,
    workflow_id: &str,
    input: &serde_json::Value,
    config: PollConfig,
) -> Result<RunRecord, RunError> {
    let run_id = backend.start_run(workflow_id, input)?;
    wait_for_terminal(backend, workflow_id, &run_id, config)
}
