//! The workflow graph data model, the closed registry of node kinds and
//! the authoring-time validation pass.

pub mod artifact;
pub mod definition;
pub mod registry;
pub mod validate;

pub use artifact::{CompiledPredicate, CompiledWorkflow};
pub use definition::*;
pub use registry::{NodeOutcome, ResponseEnvelope, propagate_schemas};
pub use validate::validate_graph;
