//! Dotted-path lookup and `{{ path }}` template interpolation.
//!
//! The same interpolator drives api-call request templating and
//! notification-message templating. Missing path segments resolve to the
//! empty string; interpolation never fails.

use regex::Regex;
use serde_json::Value as JsonValue;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([^}]+?)\s*\}\}").expect("placeholder pattern is valid"));

/// Resolves a dotted path like `a.b.c` inside a JSON object.
///
/// Returns `None` as soon as any segment is missing or the current value is
/// not an object.
pub fn get_by_path<'a>(data: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    if path.is_empty() {
        return None;
    }
    let mut current = data;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Replaces every `{{ path }}` occurrence with the string form of the
/// dotted-path lookup in `data`. Missing or null values render as `""`.
pub fn interpolate(template: &str, data: &JsonValue) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures<'_>| {
            let path = caps[1].trim();
            get_by_path(data, path).map(render_value).unwrap_or_default()
        })
        .into_owned()
}

/// The string form of a JSON value used inside rendered templates.
fn render_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        JsonValue::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
