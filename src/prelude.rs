//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types from the seqflow crate. Import
//! this module to get access to the core functionality without having to
//! import each type individually.

// Graph model and node registry
pub use crate::workflow::{
    ApiCallConfig, DecisionConfig, DelayConfig, DelayUnit, Edge, ExecutionLog, HttpMethod,
    IfElseConfig, InputCaptureConfig, InputField, LogKind, NodeConfig, NodeInstance, NodeKind,
    NodeOutcome, NotificationConfig, Outcome, Position, Predicate, ResponseEnvelope,
    WorkflowGraph, propagate_schemas, validate_graph,
};

// Rules and compiled logic
pub use crate::logic::{CompareOp, Logic, Validation, Value, evaluate};
pub use crate::rules::{Combiner, DateRule, NumberRule, RuleConfig, TextRule, compile};

// Schemas and templating
pub use crate::schema::{FieldKind, Schema, derive_schema, example_value};
pub use crate::template::{get_by_path, interpolate};

// Run lifecycle
pub use crate::run::{
    LocalRunner, PollConfig, RunRecord, RunSnapshot, RunStatus, RunnerBackend, TaskSnapshot,
    submit_and_wait, wait_for_terminal,
};

// Persistence
pub use crate::store::{MemoryStore, StoredWorkflow, WorkflowStore, WorkflowSummary};

// Error types
pub use crate::error::{EvalError, RunError, StoreError, WorkflowError};
