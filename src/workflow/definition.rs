use crate::logic::Logic;
use crate::rules::{Combiner, RuleConfig, compile};
use crate::schema::{FieldKind, Schema};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// A complete, authored workflow graph, immutable during one execution.
///
/// Invariants: node ids are unique and every edge references existing node
/// ids. Both are enforced by [`validate_graph`](super::validate_graph)
/// before a run starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowGraph {
    pub id: String,
    pub name: String,
    pub nodes: Vec<NodeInstance>,
    pub edges: Vec<Edge>,
}

impl WorkflowGraph {
    pub fn node(&self, id: &str) -> Option<&NodeInstance> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Recompiles every predicate's stored logic from its rule
    /// configuration. Pure and idempotent; meant to run whenever a rule
    /// configuration changes.
    pub fn recompile_predicates(&mut self) {
        for node in &mut self.nodes {
            match &mut node.config {
                NodeConfig::Decision(cfg) => {
                    for outcome in &mut cfg.outcomes {
                        outcome.recompile();
                    }
                }
                NodeConfig::IfElse(cfg) => cfg.condition.recompile(),
                NodeConfig::InputCapture(cfg) => {
                    for field in &mut cfg.fields {
                        field.logic = field.validation.as_ref().and_then(compile);
                    }
                }
                _ => {}
            }
        }
    }
}

/// A directed connection between two nodes.
///
/// `source_handle` disambiguates multiple outgoing branches, for example
/// the per-outcome ports of a decision node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

/// Canvas coordinates of a node; carried for the external authoring surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// The closed set of step behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    InputCapture,
    Decision,
    IfElse,
    Notification,
    ApiCall,
    Delay,
}

/// One step in a workflow graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInstance {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub input_schema: Schema,
    #[serde(default)]
    pub output_schema: Schema,
    #[serde(flatten)]
    pub config: NodeConfig,
    #[serde(default)]
    pub position: Position,
}

impl NodeInstance {
    pub fn kind(&self) -> NodeKind {
        self.config.kind()
    }
}

/// Kind-specific configuration. New kinds add a variant arm here, never a
/// subclass; dispatch is by pattern match throughout the crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "config", rename_all = "camelCase")]
pub enum NodeConfig {
    InputCapture(InputCaptureConfig),
    Decision(DecisionConfig),
    IfElse(IfElseConfig),
    Notification(NotificationConfig),
    ApiCall(ApiCallConfig),
    Delay(DelayConfig),
}

impl NodeConfig {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeConfig::InputCapture(_) => NodeKind::InputCapture,
            NodeConfig::Decision(_) => NodeKind::Decision,
            NodeConfig::IfElse(_) => NodeKind::IfElse,
            NodeConfig::Notification(_) => NodeKind::Notification,
            NodeConfig::ApiCall(_) => NodeKind::ApiCall,
            NodeConfig::Delay(_) => NodeKind::Delay,
        }
    }
}

/// One field captured by an input node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputField {
    pub id: String,
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<RuleConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<Logic>,
}

impl InputField {
    pub fn new(key: &str, label: &str, kind: FieldKind) -> Self {
        InputField {
            id: Uuid::new_v4().to_string(),
            key: key.to_string(),
            label: label.to_string(),
            kind,
            placeholder: None,
            default_value: None,
            validation: None,
            logic: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputCaptureConfig {
    pub fields: Vec<InputField>,
}

/// A predicate bound to a field path of the payload. An absent
/// `target_field` binds the predicate to the whole payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Predicate {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<RuleConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<Logic>,
}

impl Predicate {
    pub fn new(target_field: Option<&str>, rules: RuleConfig) -> Self {
        let logic = compile(&rules);
        Predicate {
            id: Uuid::new_v4().to_string(),
            target_field: target_field.map(str::to_string),
            rules: Some(rules),
            logic,
        }
    }

    /// The logic to evaluate: the stored compiled form when present,
    /// otherwise compiled on the fly from the rule configuration.
    pub fn effective_logic(&self) -> Option<Logic> {
        self.logic
            .clone()
            .or_else(|| self.rules.as_ref().and_then(compile))
    }
}

/// A named set of predicates combined by ALL/ANY; one outgoing branch of a
/// decision node, or the single condition of an if-else node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub combiner: Combiner,
    #[serde(default)]
    pub predicates: Vec<Predicate>,
}

impl Outcome {
    pub fn new(name: &str, combiner: Combiner, predicates: Vec<Predicate>) -> Self {
        Outcome {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            combiner,
            predicates,
        }
    }

    pub(crate) fn recompile(&mut self) {
        for predicate in &mut self.predicates {
            predicate.logic = predicate.rules.as_ref().and_then(compile);
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionConfig {
    pub outcomes: Vec<Outcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IfElseConfig {
    pub condition: Outcome,
    pub true_label: String,
    pub false_label: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub template: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    #[serde(rename = "GET")]
    Get,
    #[serde(rename = "POST")]
    Post,
    #[serde(rename = "PUT")]
    Put,
    #[serde(rename = "PATCH")]
    Patch,
    #[serde(rename = "DELETE")]
    Delete,
    #[serde(rename = "HEAD")]
    Head,
    #[serde(rename = "OPTIONS")]
    Options,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpHeader {
    pub id: String,
    pub key: String,
    pub value: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCallConfig {
    pub method: HttpMethod,
    pub url: String,
    #[serde(default)]
    pub headers: Vec<HttpHeader>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub expected_status_codes: Vec<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelayUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl DelayUnit {
    fn plural(self) -> &'static str {
        match self {
            DelayUnit::Seconds => "seconds",
            DelayUnit::Minutes => "minutes",
            DelayUnit::Hours => "hours",
            DelayUnit::Days => "days",
        }
    }

    fn singular(self) -> &'static str {
        match self {
            DelayUnit::Seconds => "second",
            DelayUnit::Minutes => "minute",
            DelayUnit::Hours => "hour",
            DelayUnit::Days => "day",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayConfig {
    pub value: u64,
    pub unit: DelayUnit,
}

impl DelayConfig {
    /// Human form of the requested duration: `1 second`, `5 minutes`.
    pub fn describe(&self) -> String {
        if self.value == 1 {
            format!("1 {}", self.unit.singular())
        } else {
            format!("{} {}", self.value, self.unit.plural())
        }
    }
}

/// The category of an execution log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogKind {
    Input,
    Decision,
    Notification,
    Api,
    ApiError,
    Delay,
}

/// One entry appended while a node executes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLog {
    pub id: String,
    pub kind: LogKind,
    pub node_id: String,
    pub name: String,
    pub message: String,
    pub timestamp: u64,
}

impl ExecutionLog {
    pub fn new(kind: LogKind, node: &NodeInstance, message: impl Into<String>) -> Self {
        ExecutionLog {
            id: Uuid::new_v4().to_string(),
            kind,
            node_id: node.id.clone(),
            name: node.name.clone(),
            message: message.into(),
            timestamp: now_millis(),
        }
    }
}

/// Milliseconds since the Unix epoch; the timestamp unit used throughout.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
