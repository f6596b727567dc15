//! Per-kind node behavior: default configurations, schema propagation and
//! the `execute` extension point the engine dispatches into.
//!
//! The registry is a closed set: each behavior is one match arm over
//! [`NodeConfig`], and adding a node kind means adding a variant arm.

use super::definition::*;
use crate::logic::evaluate;
use crate::schema::{Schema, derive_schema};
use crate::template::{get_by_path, interpolate};
use ahash::AHashSet;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue, json};
use std::collections::BTreeMap;
use uuid::Uuid;

/// What a node's `execute` hands back to the engine.
#[derive(Debug, Default)]
pub struct NodeOutcome {
    pub logs: Vec<ExecutionLog>,
    /// When set, only outgoing edges whose `source_handle` is a member (or
    /// unset) are followed. When `None`, every outgoing edge is followed.
    pub allowed_out_handles: Option<AHashSet<String>>,
    /// A replacement payload for followed successors.
    pub payload: Option<JsonValue>,
}

/// The fixed response envelope an api-call step emits, identical whether
/// the request ran on a real transport or was simulated in-process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status: u16,
    pub status_text: String,
    pub data: JsonValue,
    pub headers: Map<String, JsonValue>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseEnvelope {
    /// The simulated response used for offline/local execution.
    pub fn simulated(input: &JsonValue) -> Self {
        ResponseEnvelope {
            status: 200,
            status_text: "OK".to_string(),
            data: json!({ "simulated": true, "input": input }),
            headers: Map::new(),
            success: true,
            error: None,
        }
    }

    /// The envelope reported when the external transport failed.
    pub fn failed(status: u16, status_text: &str, error: &str) -> Self {
        ResponseEnvelope {
            status,
            status_text: status_text.to_string(),
            data: json!({}),
            headers: Map::new(),
            success: false,
            error: Some(error.to_string()),
        }
    }

    pub fn into_payload(self) -> JsonValue {
        let mut obj = Map::new();
        obj.insert("status".to_string(), json!(self.status));
        obj.insert("statusText".to_string(), json!(self.status_text));
        obj.insert("data".to_string(), self.data);
        obj.insert("headers".to_string(), JsonValue::Object(self.headers));
        obj.insert("success".to_string(), json!(self.success));
        if let Some(error) = self.error {
            obj.insert("error".to_string(), json!(error));
        }
        JsonValue::Object(obj)
    }
}

impl NodeInstance {
    /// A fresh node with the kind-appropriate default configuration.
    pub fn create_default(kind: NodeKind) -> NodeInstance {
        let (name, config) = match kind {
            NodeKind::InputCapture => (
                "Input Node",
                NodeConfig::InputCapture(InputCaptureConfig { fields: Vec::new() }),
            ),
            NodeKind::Decision => (
                "Decision",
                NodeConfig::Decision(DecisionConfig {
                    outcomes: Vec::new(),
                }),
            ),
            NodeKind::IfElse => (
                "If-Else",
                NodeConfig::IfElse(IfElseConfig {
                    condition: Outcome::new("Condition", Default::default(), Vec::new()),
                    true_label: "True".to_string(),
                    false_label: "False".to_string(),
                }),
            ),
            NodeKind::Notification => (
                "Notification",
                NodeConfig::Notification(NotificationConfig {
                    template: String::new(),
                }),
            ),
            NodeKind::ApiCall => (
                "API Call",
                NodeConfig::ApiCall(ApiCallConfig {
                    method: HttpMethod::Get,
                    url: "https://api.example.com/endpoint".to_string(),
                    headers: Vec::new(),
                    body_template: None,
                    timeout_ms: Some(10_000),
                    expected_status_codes: vec![200, 201, 202, 204],
                }),
            ),
            NodeKind::Delay => (
                "Delay",
                NodeConfig::Delay(DelayConfig {
                    value: 5,
                    unit: DelayUnit::Seconds,
                }),
            ),
        };
        let output_schema = match &config {
            NodeConfig::ApiCall(_) => envelope_schema(),
            _ => Schema::Unknown,
        };
        NodeInstance {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            input_schema: Schema::Unknown,
            output_schema,
            config,
            position: Position::default(),
        }
    }

    /// The schema this node publishes to its successors.
    ///
    /// An input-capture node derives an object schema from its configured
    /// fields; an api-call node publishes its fixed envelope shape; every
    /// other kind forwards the schema it received.
    pub fn published_schema(&self) -> Schema {
        match &self.config {
            NodeConfig::InputCapture(cfg) => {
                derive_schema(cfg.fields.iter().map(|f| (f.key.as_str(), f.kind)))
            }
            NodeConfig::ApiCall(_) => envelope_schema(),
            _ => {
                if self.output_schema != Schema::Unknown {
                    self.output_schema.clone()
                } else {
                    self.input_schema.clone()
                }
            }
        }
    }

    /// Executes this node against the current payload. The engine is
    /// kind-agnostic; this is the only extension point.
    pub fn execute(&self, payload: &JsonValue) -> NodeOutcome {
        match &self.config {
            NodeConfig::InputCapture(_) => NodeOutcome {
                logs: vec![ExecutionLog::new(
                    LogKind::Input,
                    self,
                    format!("Input: {}", payload),
                )],
                ..Default::default()
            },
            NodeConfig::Decision(cfg) => self.execute_decision(cfg, payload),
            NodeConfig::IfElse(cfg) => self.execute_if_else(cfg, payload),
            NodeConfig::Notification(cfg) => NodeOutcome {
                logs: vec![ExecutionLog::new(
                    LogKind::Notification,
                    self,
                    interpolate(&cfg.template, payload),
                )],
                ..Default::default()
            },
            NodeConfig::ApiCall(cfg) => self.execute_api_call(cfg, payload),
            NodeConfig::Delay(cfg) => NodeOutcome {
                logs: vec![ExecutionLog::new(
                    LogKind::Delay,
                    self,
                    format!("Delay scheduled: {}", cfg.describe()),
                )],
                allowed_out_handles: None,
                payload: Some(payload.clone()),
            },
        }
    }

    fn execute_decision(&self, cfg: &DecisionConfig, payload: &JsonValue) -> NodeOutcome {
        let matched: Vec<&Outcome> = cfg
            .outcomes
            .iter()
            .filter(|outcome| outcome_matches(outcome, payload))
            .collect();

        let summary = if matched.is_empty() {
            "none".to_string()
        } else {
            matched.iter().map(|o| o.name.as_str()).join(", ")
        };
        let logs = vec![ExecutionLog::new(
            LogKind::Decision,
            self,
            format!("Matched {} outcome(s): {}", matched.len(), summary),
        )];

        // Branching is non-exclusive: every matched outcome opens its port.
        let allowed: AHashSet<String> = matched
            .iter()
            .map(|outcome| format!("out-{}", outcome.id))
            .collect();
        NodeOutcome {
            logs,
            allowed_out_handles: Some(allowed),
            payload: None,
        }
    }

    fn execute_if_else(&self, cfg: &IfElseConfig, payload: &JsonValue) -> NodeOutcome {
        // An empty predicate list never fires the true branch.
        let met = !cfg.condition.predicates.is_empty() && outcome_matches(&cfg.condition, payload);
        let label = if met { &cfg.true_label } else { &cfg.false_label };
        let handle = if met { "out-true" } else { "out-false" };

        let mut allowed = AHashSet::with_capacity(1);
        allowed.insert(handle.to_string());
        NodeOutcome {
            logs: vec![ExecutionLog::new(
                LogKind::Decision,
                self,
                format!("Condition evaluated to: {}", label),
            )],
            allowed_out_handles: Some(allowed),
            payload: None,
        }
    }

    fn execute_api_call(&self, cfg: &ApiCallConfig, payload: &JsonValue) -> NodeOutcome {
        // Real network I/O belongs to the external transport; in-process
        // execution only renders the templates and simulates the response.
        let url = interpolate(&cfg.url, payload);
        let mut envelope = ResponseEnvelope::simulated(payload);
        if let Some(body) = &cfg.body_template {
            envelope.data["requestBody"] = json!(interpolate(body, payload));
        }
        NodeOutcome {
            logs: vec![ExecutionLog::new(
                LogKind::Api,
                self,
                format!("API Call: {} {} (simulated)", cfg.method, url),
            )],
            allowed_out_handles: None,
            payload: Some(envelope.into_payload()),
        }
    }
}

/// Whether a named predicate set matches the payload under its combiner.
fn outcome_matches(outcome: &Outcome, payload: &JsonValue) -> bool {
    if outcome.predicates.is_empty() {
        // No predicates means nothing can fail; evaluating an absent logic
        // tree is always valid.
        return true;
    }
    let mut checks = outcome.predicates.iter().map(|predicate| {
        let subject = match &predicate.target_field {
            Some(path) => get_by_path(payload, path).cloned().unwrap_or(JsonValue::Null),
            None => payload.clone(),
        };
        evaluate(predicate.effective_logic().as_ref(), &subject).is_valid
    });
    match outcome.combiner {
        crate::rules::Combiner::All => checks.all(|v| v),
        crate::rules::Combiner::Any => checks.any(|v| v),
    }
}

/// The structural shape of the api-call response envelope.
pub(crate) fn envelope_schema() -> Schema {
    let mut properties = BTreeMap::new();
    properties.insert("status".to_string(), Schema::Number);
    properties.insert("statusText".to_string(), Schema::Text);
    properties.insert(
        "data".to_string(),
        Schema::Object {
            properties: BTreeMap::new(),
            required: Vec::new(),
        },
    );
    properties.insert(
        "headers".to_string(),
        Schema::Object {
            properties: BTreeMap::new(),
            required: Vec::new(),
        },
    );
    properties.insert("success".to_string(), Schema::Bool);
    properties.insert("error".to_string(), Schema::Text);
    Schema::Object {
        properties,
        required: vec![
            "status".to_string(),
            "statusText".to_string(),
            "data".to_string(),
            "headers".to_string(),
            "success".to_string(),
        ],
    }
}

/// Recomputes input schemas across the whole graph from current node
/// configurations. A pure on-demand pass over the edge list, run whenever an
/// edge is created or an upstream output-affecting configuration changes.
///
/// Delay is the pass-through kind: it forwards the propagated schema as its
/// own output as well, so shape information crosses it transparently.
pub fn propagate_schemas(graph: &mut WorkflowGraph) {
    // Fixpoint over at most `nodes` rounds; enough for any acyclic graph.
    for _ in 0..graph.nodes.len() {
        let mut changed = false;
        for i in 0..graph.edges.len() {
            let (source_id, target_id) =
                (graph.edges[i].source.clone(), graph.edges[i].target.clone());
            let Some(source) = graph.node(&source_id) else {
                continue;
            };
            let published = source.published_schema();
            let Some(target) = graph.nodes.iter_mut().find(|n| n.id == target_id) else {
                continue;
            };
            if target.input_schema != published {
                target.input_schema = published.clone();
                changed = true;
            }
            if target.kind() == NodeKind::Delay && target.output_schema != published {
                target.output_schema = published;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
}

/// Convenience used by authoring surfaces: an input node's output schema
/// recomputed from its field list.
pub fn input_capture_schema(fields: &[InputField]) -> Schema {
    derive_schema(fields.iter().map(|f| (f.key.as_str(), f.kind)))
}

impl InputCaptureConfig {
    /// An example payload matching the configured fields, used to seed
    /// previews and simulated runs.
    pub fn example_payload(&self) -> JsonValue {
        crate::schema::example_value(&input_capture_schema(&self.fields))
    }
}
