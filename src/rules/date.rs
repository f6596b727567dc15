use crate::logic::{CompareOp, Logic, Value};
use serde::{Deserialize, Serialize};

/// A rule applied to a date field.
///
/// Dates are zero-padded ISO-8601 strings and compare lexicographically,
/// which is chronologically correct. No calendar parsing is involved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DateRule {
    Before {
        date: String,
        #[serde(default)]
        inclusive: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    After {
        date: String,
        #[serde(default)]
        inclusive: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Between {
        start: String,
        end: String,
        #[serde(default)]
        inclusive: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

pub(super) fn compile_rule(rule: &DateRule) -> Logic {
    let compare = |op: CompareOp, date: &str| Logic::Compare {
        op,
        operand: Value::String(date.to_string()),
    };
    match rule {
        DateRule::Before {
            date, inclusive, ..
        } => compare(if *inclusive { CompareOp::Le } else { CompareOp::Lt }, date),
        DateRule::After {
            date, inclusive, ..
        } => compare(if *inclusive { CompareOp::Ge } else { CompareOp::Gt }, date),
        DateRule::Between {
            start,
            end,
            inclusive,
            ..
        } => {
            let (lower, upper) = if *inclusive {
                (CompareOp::Ge, CompareOp::Le)
            } else {
                (CompareOp::Gt, CompareOp::Lt)
            };
            Logic::All(vec![compare(lower, start), compare(upper, end)])
        }
    }
}
