use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Scalar values handled by the logic evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl Value {
    /// Converts a JSON value into a scalar, or `None` for objects/arrays.
    pub fn from_scalar(json: &JsonValue) -> Option<Value> {
        match json {
            JsonValue::Null => Some(Value::Null),
            JsonValue::Bool(b) => Some(Value::Bool(*b)),
            JsonValue::Number(n) => n.as_f64().map(Value::Number),
            JsonValue::String(s) => Some(Value::String(s.clone())),
            JsonValue::Object(_) | JsonValue::Array(_) => None,
        }
    }

    /// Truthiness in the evaluator's host-language sense: `false`, `0`,
    /// the empty string and `null` are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Bool(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "{}", s),
            Value::Null => write!(f, "null"),
        }
    }
}

/// Comparison operators applied between the bound value and an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub(crate) fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

/// A compiled, portable boolean-logic expression tree.
///
/// Every node is evaluated against one bound variable, the *value* the
/// enclosing predicate resolved from the payload. The tree is fully
/// serializable so compiled predicates can be cached or shipped elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Logic {
    /// Conjunction. Short-circuits on the first falsy operand and yields
    /// that operand's raw result.
    All(Vec<Logic>),
    /// Disjunction. Short-circuits on the first truthy operand and yields
    /// that operand's raw result.
    Any(Vec<Logic>),
    /// `value <op> operand`.
    Compare { op: CompareOp, operand: Value },
    /// `value` is a member of the listed options.
    MemberOf(Vec<Value>),
    /// The given fragment occurs within the bound string value. This is the
    /// degraded form of the text "match" rule (containment, not patterns).
    ContainsText(String),
    /// A constant result. A string literal doubles as a rule-supplied
    /// failure message by the evaluator's string-result convention.
    Literal(Value),
}
