use crate::logic::Value;
use thiserror::Error;

/// Errors raised while a compiled logic tree is being evaluated.
///
/// These never escape `logic::evaluate`: the evaluator catches them and
/// reports a generic "Validation error" outcome instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error(
        "Type mismatch during operation '{operation}': expected {expected}, but found value '{found}'"
    )]
    TypeMismatch {
        operation: String,
        expected: String,
        found: Value,
    },

    #[error("Operation '{operation}' cannot be applied to a non-scalar value")]
    NonScalarSubject { operation: String },
}

/// Errors that refuse a workflow graph before any execution starts.
#[derive(Error, Debug, Clone)]
pub enum WorkflowError {
    #[error("Workflow graph is invalid: {}", errors.join("; "))]
    InvalidGraph { errors: Vec<String> },
}

/// Errors surfaced by the run lifecycle protocol.
#[derive(Error, Debug, Clone)]
pub enum RunError {
    #[error("Workflow '{0}' is not registered with this runner")]
    WorkflowNotFound(String),

    #[error("Run '{0}' was not found")]
    RunNotFound(String),

    #[error("Run refused, workflow graph is invalid: {}", errors.join("; "))]
    Refused { errors: Vec<String> },

    /// A transport-level failure talking to the remote runner. One failed
    /// poll consumes an attempt but does not terminate the poll loop.
    #[error("Runner backend failure: {0}")]
    Backend(String),

    /// The caller-side polling budget ran out. This is a client timeout,
    /// not a run failure; the run may still be executing remotely.
    #[error("Polling budget exhausted after {attempts} attempt(s)")]
    PollBudgetExhausted { attempts: u32 },
}

/// Errors raised by a workflow store.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("Workflow '{0}' was not found")]
    NotFound(String),

    #[error("Workflow cannot be saved: {}", errors.join("; "))]
    InvalidWorkflow { errors: Vec<String> },
}

/// Errors raised while saving or loading a compiled workflow artifact.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Serialization failed: {0}")]
    Encode(String),

    #[error("Deserialization failed: {0}")]
    Decode(String),

    #[error("Could not access artifact file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
