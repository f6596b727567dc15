use crate::logic::{CompareOp, Logic, Value};
use serde::{Deserialize, Serialize};

/// A rule applied to a text field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TextRule {
    /// Degrades to a containment test: the pattern must occur inside the
    /// value. Kept as documented upstream behavior rather than upgraded to
    /// real pattern matching.
    Match {
        pattern: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        flags: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    In {
        options: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    NotEquals {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

pub(super) fn compile_rule(rule: &TextRule) -> Logic {
    match rule {
        TextRule::Match { pattern, .. } => Logic::ContainsText(pattern.clone()),
        TextRule::In { options, .. } => Logic::MemberOf(
            options
                .iter()
                .map(|o| Value::String(o.clone()))
                .collect(),
        ),
        TextRule::NotEquals { value, .. } => Logic::Compare {
            op: CompareOp::Ne,
            operand: Value::String(value.clone()),
        },
    }
}
