//! Common test utilities for building workflow graphs and rule configs.
use seqflow::prelude::*;

/// An input node capturing a single text field named `city`.
#[allow(dead_code)]
pub fn city_input_node(id: &str) -> NodeInstance {
    let mut node = NodeInstance::create_default(NodeKind::InputCapture);
    node.id = id.to_string();
    if let NodeConfig::InputCapture(cfg) = &mut node.config {
        cfg.fields.push(InputField::new("city", "City", FieldKind::Text));
    }
    node
}

/// A text rule set matching one exact option.
#[allow(dead_code)]
pub fn text_in_rules(options: &[&str]) -> RuleConfig {
    RuleConfig::Text {
        combiner: Combiner::All,
        rules: vec![TextRule::In {
            options: options.iter().map(|o| o.to_string()).collect(),
            message: None,
        }],
    }
}

/// A decision node with one outcome that matches when `city` is "NYC".
#[allow(dead_code)]
pub fn nyc_decision_node(id: &str, outcome_name: &str) -> (NodeInstance, String) {
    let mut node = NodeInstance::create_default(NodeKind::Decision);
    node.id = id.to_string();
    let outcome = Outcome::new(
        outcome_name,
        Combiner::All,
        vec![Predicate::new(Some("city"), text_in_rules(&["NYC"]))],
    );
    let outcome_id = outcome.id.clone();
    if let NodeConfig::Decision(cfg) = &mut node.config {
        cfg.outcomes.push(outcome);
    }
    (node, outcome_id)
}

/// A notification node rendering the given template.
#[allow(dead_code)]
pub fn notification_node(id: &str, template: &str) -> NodeInstance {
    let mut node = NodeInstance::create_default(NodeKind::Notification);
    node.id = id.to_string();
    if let NodeConfig::Notification(cfg) = &mut node.config {
        cfg.template = template.to_string();
    }
    node
}

#[allow(dead_code)]
pub fn delay_node(id: &str, value: u64, unit: DelayUnit) -> NodeInstance {
    let mut node = NodeInstance::create_default(NodeKind::Delay);
    node.id = id.to_string();
    if let NodeConfig::Delay(cfg) = &mut node.config {
        cfg.value = value;
        cfg.unit = unit;
    }
    node
}

#[allow(dead_code)]
pub fn edge(id: &str, source: &str, target: &str, source_handle: Option<&str>) -> Edge {
    Edge {
        id: id.to_string(),
        source: source.to_string(),
        target: target.to_string(),
        source_handle: source_handle.map(str::to_string),
        target_handle: None,
    }
}

/// The scenario graph: input(city) -> decision(city == "NYC") ->
/// notification("Welcome {{ city }}").
#[allow(dead_code)]
pub fn city_scenario_graph() -> WorkflowGraph {
    let input = city_input_node("input");
    let (decision, outcome_id) = nyc_decision_node("decision", "Is NYC");
    let notify = notification_node("notify", "Welcome {{ city }}");
    WorkflowGraph {
        id: "wf-city".to_string(),
        name: "City greeter".to_string(),
        nodes: vec![input, decision, notify],
        edges: vec![
            edge("e1", "input", "decision", None),
            edge(
                "e2",
                "decision",
                "notify",
                Some(&format!("out-{}", outcome_id)),
            ),
        ],
    }
}
