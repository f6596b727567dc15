//! Tests for the run lifecycle protocol: submission, polling, monotonicity.
mod common;
use seqflow::error::RunError;
use seqflow::prelude::*;
use serde_json::{Value as JsonValue, json};
use std::sync::Mutex;
use std::time::Duration;

/// A backend that replays a fixed sequence of poll results.
struct ScriptedBackend {
    script: Mutex<Vec<Result<RunSnapshot, RunError>>>,
}

impl ScriptedBackend {
    fn new(script: Vec<Result<RunSnapshot, RunError>>) -> Self {
        ScriptedBackend {
            script: Mutex::new(script),
        }
    }
}

impl RunnerBackend for ScriptedBackend {
    fn start_run(&self, _workflow_id: &str, _input: &JsonValue) -> Result<String, RunError> {
        Ok("run-1".to_string())
    }

    fn run_status(&self, _workflow_id: &str, run_id: &str) -> Result<RunSnapshot, RunError> {
        let mut script = self.script.lock().expect("script lock");
        if script.is_empty() {
            return Err(RunError::RunNotFound(run_id.to_string()));
        }
        script.remove(0)
    }
}

fn snapshot(status: RunStatus) -> RunSnapshot {
    RunSnapshot {
        status,
        started_at: 1_000,
        finished_at: status.is_terminal().then_some(2_000),
        tasks: Vec::new(),
        logs: Vec::new(),
    }
}

fn fast_poll(max_attempts: u32) -> PollConfig {
    PollConfig {
        interval: Duration::ZERO,
        max_attempts,
    }
}

#[test]
fn polling_stops_at_the_first_terminal_status() {
    let backend = ScriptedBackend::new(vec![
        Ok(snapshot(RunStatus::Queued)),
        Ok(snapshot(RunStatus::Running)),
        Ok(snapshot(RunStatus::Succeeded)),
        // Never requested: polling must not continue past a terminal state.
        Ok(snapshot(RunStatus::Queued)),
    ]);

    let record = wait_for_terminal(&backend, "wf", "run-1", fast_poll(10)).expect("terminal");
    assert_eq!(record.status, RunStatus::Succeeded);
    assert_eq!(record.finished_at, Some(2_000));
    assert_eq!(backend.script.lock().expect("script lock").len(), 1);
}

#[test]
fn regressing_snapshots_are_ignored() {
    let backend = ScriptedBackend::new(vec![
        Ok(snapshot(RunStatus::Running)),
        Ok(snapshot(RunStatus::Queued)),
        Ok(snapshot(RunStatus::Succeeded)),
    ]);

    let record = wait_for_terminal(&backend, "wf", "run-1", fast_poll(10)).expect("terminal");
    assert_eq!(record.status, RunStatus::Succeeded);
}

#[test]
fn transport_failures_consume_attempts_but_do_not_abort() {
    let backend = ScriptedBackend::new(vec![
        Err(RunError::Backend("connection reset".to_string())),
        Err(RunError::Backend("connection reset".to_string())),
        Ok(snapshot(RunStatus::Failed)),
    ]);

    let record = wait_for_terminal(&backend, "wf", "run-1", fast_poll(10)).expect("terminal");
    assert_eq!(record.status, RunStatus::Failed);
}

#[test]
fn exhausted_budget_is_a_client_timeout_not_a_run_failure() {
    let backend = ScriptedBackend::new(vec![
        Ok(snapshot(RunStatus::Queued)),
        Ok(snapshot(RunStatus::Queued)),
        Ok(snapshot(RunStatus::Running)),
    ]);

    let err = wait_for_terminal(&backend, "wf", "run-1", fast_poll(3)).expect_err("times out");
    assert!(matches!(
        err,
        RunError::PollBudgetExhausted { attempts: 3 }
    ));
}

#[test]
fn local_runner_replays_the_canonical_lifecycle() {
    let runner = LocalRunner::new();
    runner.register(common::city_scenario_graph());

    let run_id = runner
        .start_run("wf-city", &json!({ "city": "NYC" }))
        .expect("submits");

    let first = runner.run_status("wf-city", &run_id).expect("poll 1");
    assert_eq!(first.status, RunStatus::Queued);
    assert!(first.logs.is_empty());

    let second = runner.run_status("wf-city", &run_id).expect("poll 2");
    assert_eq!(second.status, RunStatus::Running);

    let third = runner.run_status("wf-city", &run_id).expect("poll 3");
    assert_eq!(third.status, RunStatus::Succeeded);
    assert!(third.finished_at.is_some());
    assert!(!third.logs.is_empty());
    assert!(!third.tasks.is_empty());
    assert!(third.tasks.iter().all(|t| t.status == RunStatus::Succeeded));

    // Terminal state is sticky across further polls.
    let fourth = runner.run_status("wf-city", &run_id).expect("poll 4");
    assert_eq!(fourth.status, RunStatus::Succeeded);
    assert_eq!(fourth.logs.len(), third.logs.len());
}

#[test]
fn submit_and_wait_drives_a_local_run_to_completion() {
    let runner = LocalRunner::new();
    runner.register(common::city_scenario_graph());

    let record =
        submit_and_wait(&runner, "wf-city", &json!({ "city": "NYC" }), fast_poll(10))
            .expect("completes");
    assert_eq!(record.status, RunStatus::Succeeded);
    assert_eq!(record.workflow_id, "wf-city");
    assert!(
        record
            .logs
            .iter()
            .any(|l| l.kind == LogKind::Notification && l.message == "Welcome NYC")
    );
}

#[test]
fn unknown_workflows_are_refused_at_submit() {
    let runner = LocalRunner::new();
    let err = runner
        .start_run("missing", &json!({}))
        .expect_err("refused");
    assert!(matches!(err, RunError::WorkflowNotFound(_)));
}

#[test]
fn invalid_graphs_are_refused_at_submit_with_enumerated_errors() {
    let runner = LocalRunner::new();
    let graph = WorkflowGraph {
        id: "wf-bad".to_string(),
        name: "bad".to_string(),
        nodes: vec![common::notification_node("n", "hi")],
        edges: vec![],
    };
    runner.register(graph);

    let err = runner.start_run("wf-bad", &json!({})).expect_err("refused");
    match err {
        RunError::Refused { errors } => {
            assert!(!errors.is_empty());
        }
        other => panic!("expected Refused, got {other:?}"),
    }
}
