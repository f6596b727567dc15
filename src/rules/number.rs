use crate::logic::{CompareOp, Logic, Value};
use serde::{Deserialize, Serialize};

/// A rule applied to a numeric field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NumberRule {
    Equals {
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    NotEquals {
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Lt {
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Lte {
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Gt {
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Gte {
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    In {
        options: Vec<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Between {
        min: f64,
        max: f64,
        #[serde(default)]
        inclusive: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

pub(super) fn compile_rule(rule: &NumberRule) -> Logic {
    let compare = |op: CompareOp, value: f64| Logic::Compare {
        op,
        operand: Value::Number(value),
    };
    match rule {
        NumberRule::Equals { value, .. } => compare(CompareOp::Eq, *value),
        NumberRule::NotEquals { value, .. } => compare(CompareOp::Ne, *value),
        NumberRule::Lt { value, .. } => compare(CompareOp::Lt, *value),
        NumberRule::Lte { value, .. } => compare(CompareOp::Le, *value),
        NumberRule::Gt { value, .. } => compare(CompareOp::Gt, *value),
        NumberRule::Gte { value, .. } => compare(CompareOp::Ge, *value),
        NumberRule::In { options, .. } => {
            Logic::MemberOf(options.iter().map(|v| Value::Number(*v)).collect())
        }
        NumberRule::Between {
            min,
            max,
            inclusive,
            ..
        } => {
            let (lower, upper) = if *inclusive {
                (CompareOp::Ge, CompareOp::Le)
            } else {
                (CompareOp::Gt, CompareOp::Lt)
            };
            Logic::All(vec![compare(lower, *min), compare(upper, *max)])
        }
    }
}
