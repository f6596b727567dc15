//! # Seqflow - Workflow Graph Compilation and Execution Engine
//!
//! **Seqflow** is the execution core for workflows authored as directed
//! graphs of typed steps: capture input, branch on rules, call an external
//! endpoint, wait, or emit a notification. The crate owns everything a
//! graphical authoring surface delegates: the typed node model with schema
//! propagation across connections, a small interpreter that walks the graph
//! applying per-kind branching semantics, and a declarative validation
//! subsystem that compiles user-authored predicates into a portable
//! boolean-logic form.
//!
//! ## Core Workflow
//!
//! 1. **Author a graph**: build a [`workflow::WorkflowGraph`] out of
//!    [`workflow::NodeInstance`]s (one per step) and [`workflow::Edge`]s.
//!    Per-field predicates are [`rules::RuleConfig`]s compiled into portable
//!    [`logic::Logic`] trees.
//! 2. **Validate**: [`workflow::validate_graph`] reports every authoring
//!    error; invalid graphs are refused by the store and the engine alike.
//! 3. **Execute**: [`engine::execute`] walks the graph synchronously for
//!    local preview, or a [`run::RunnerBackend`] submits it to an external
//!    runner observed through [`run::wait_for_terminal`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use seqflow::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // One input step capturing a text field, wired to a notification.
//!     let mut input = NodeInstance::create_default(NodeKind::InputCapture);
//!     if let NodeConfig::InputCapture(cfg) = &mut input.config {
//!         cfg.fields.push(InputField::new("city", "City", FieldKind::Text));
//!     }
//!     let mut notify = NodeInstance::create_default(NodeKind::Notification);
//!     if let NodeConfig::Notification(cfg) = &mut notify.config {
//!         cfg.template = "Welcome {{ city }}".to_string();
//!     }
//!
//!     let graph = WorkflowGraph {
//!         id: "wf-1".to_string(),
//!         name: "Greeter".to_string(),
//!         edges: vec![Edge {
//!             id: "e1".to_string(),
//!             source: input.id.clone(),
//!             target: notify.id.clone(),
//!             source_handle: None,
//!             target_handle: None,
//!         }],
//!         nodes: vec![input, notify],
//!     };
//!
//!     let logs = seqflow::engine::execute(&graph, json!({ "city": "NYC" }))?;
//!     for log in &logs {
//!         println!("[{:?}] {}: {}", log.kind, log.name, log.message);
//!     }
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod logic;
pub mod prelude;
pub mod rules;
pub mod run;
pub mod schema;
pub mod store;
pub mod template;
pub mod workflow;
