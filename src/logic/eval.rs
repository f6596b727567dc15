use super::{CompareOp, Logic, Value};
use crate::error::EvalError;
use serde_json::Value as JsonValue;

/// The outcome of applying a logic tree to a value.
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    pub is_valid: bool,
    pub message: Option<String>,
}

impl Validation {
    pub fn valid() -> Self {
        Validation {
            is_valid: true,
            message: None,
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Validation {
            is_valid: false,
            message: Some(message.into()),
        }
    }
}

/// Evaluates a compiled logic tree against a single bound value.
///
/// An absent tree means "always valid". Internal evaluation errors are
/// caught here and reported as a generic `"Validation error"`; they never
/// propagate to the caller. A raw string result is treated as invalid with
/// that string as the message, a convention some predicates use to carry a
/// custom failure message.
pub fn evaluate(logic: Option<&Logic>, value: &JsonValue) -> Validation {
    let Some(logic) = logic else {
        return Validation::valid();
    };
    match eval_tree(logic, value) {
        Ok(Value::String(message)) => Validation::invalid(message),
        Ok(result) if result.is_truthy() => Validation::valid(),
        Ok(_) => Validation::invalid("Invalid value"),
        Err(_) => Validation::invalid("Validation error"),
    }
}

fn eval_tree(logic: &Logic, value: &JsonValue) -> Result<Value, EvalError> {
    match logic {
        Logic::All(items) => {
            let mut last = Value::Bool(true);
            for item in items {
                last = eval_tree(item, value)?;
                if !last.is_truthy() {
                    return Ok(last);
                }
            }
            Ok(last)
        }
        Logic::Any(items) => {
            let mut last = Value::Bool(false);
            for item in items {
                last = eval_tree(item, value)?;
                if last.is_truthy() {
                    return Ok(last);
                }
            }
            Ok(last)
        }
        Logic::Compare { op, operand } => eval_compare(*op, operand, value),
        Logic::MemberOf(options) => {
            let subject = Value::from_scalar(value).ok_or(EvalError::NonScalarSubject {
                operation: "in".to_string(),
            })?;
            Ok(Value::Bool(options.iter().any(|o| *o == subject)))
        }
        Logic::ContainsText(fragment) => match value {
            JsonValue::String(s) => Ok(Value::Bool(s.contains(fragment.as_str()))),
            other => Err(type_mismatch("contains", "String", other)),
        },
        Logic::Literal(v) => Ok(v.clone()),
    }
}

fn eval_compare(op: CompareOp, operand: &Value, value: &JsonValue) -> Result<Value, EvalError> {
    let subject = Value::from_scalar(value).ok_or(EvalError::NonScalarSubject {
        operation: op.symbol().to_string(),
    })?;

    // Equality is defined across all scalar types; values of different
    // types are simply unequal.
    match op {
        CompareOp::Eq => return Ok(Value::Bool(subject == *operand)),
        CompareOp::Ne => return Ok(Value::Bool(subject != *operand)),
        _ => {}
    }

    // Ordering requires both sides to agree on a type. Numbers compare
    // numerically; strings compare lexicographically, which is
    // chronologically correct for zero-padded ISO-8601 dates.
    let outcome = match (&subject, operand) {
        (Value::Number(a), Value::Number(b)) => compare_ord(op, a.partial_cmp(b)),
        (Value::String(a), Value::String(b)) => compare_ord(op, Some(a.as_str().cmp(b.as_str()))),
        _ => None,
    };
    match outcome {
        Some(result) => Ok(Value::Bool(result)),
        None => Err(type_mismatch(op.symbol(), "comparable values", value)),
    }
}

fn compare_ord(op: CompareOp, ordering: Option<std::cmp::Ordering>) -> Option<bool> {
    let ord = ordering?;
    Some(match op {
        CompareOp::Lt => ord.is_lt(),
        CompareOp::Le => ord.is_le(),
        CompareOp::Gt => ord.is_gt(),
        CompareOp::Ge => ord.is_ge(),
        CompareOp::Eq | CompareOp::Ne => unreachable!("handled before ordering"),
    })
}

fn type_mismatch(operation: &str, expected: &str, found: &JsonValue) -> EvalError {
    EvalError::TypeMismatch {
        operation: operation.to_string(),
        expected: expected.to_string(),
        found: Value::from_scalar(found).unwrap_or(Value::Null),
    }
}
