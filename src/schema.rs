//! Structural type descriptions for node inputs and outputs.
//!
//! A [`Schema`] describes the *shape* of the payload flowing through a node,
//! not a runtime value. Input-capture nodes derive their output schema from
//! their configured fields; every other node kind forwards the schema it
//! receives, so shape information flows transparently through
//! non-transforming steps.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue, json};
use std::collections::BTreeMap;

/// The example value substituted for a date-typed field.
pub const EXAMPLE_DATE: &str = "2025-01-01";

/// The primitive kind of a captured input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Date,
}

/// A structural type description.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Schema {
    /// No shape information is available (yet).
    #[default]
    Unknown,
    Text,
    Number,
    Date,
    Bool,
    Object {
        properties: BTreeMap<String, Schema>,
        required: Vec<String>,
    },
}

impl From<FieldKind> for Schema {
    fn from(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text => Schema::Text,
            FieldKind::Number => Schema::Number,
            FieldKind::Date => Schema::Date,
        }
    }
}

/// Derives an object schema from named fields. Every key is required.
pub fn derive_schema<'a, I>(fields: I) -> Schema
where
    I: IntoIterator<Item = (&'a str, FieldKind)>,
{
    let mut properties = BTreeMap::new();
    let mut required = Vec::new();
    for (key, kind) in fields {
        properties.insert(key.to_string(), Schema::from(kind));
        required.push(key.to_string());
    }
    Schema::Object {
        properties,
        required,
    }
}

/// Produces an example value matching the shape of a schema.
///
/// Objects recurse, numbers become `0`, dates become a fixed sentinel date,
/// text becomes an empty string and unknown shapes become an empty object.
pub fn example_value(schema: &Schema) -> JsonValue {
    match schema {
        Schema::Object { properties, .. } => {
            let mut obj = Map::new();
            for (key, prop) in properties {
                obj.insert(key.clone(), example_value(prop));
            }
            JsonValue::Object(obj)
        }
        Schema::Number => json!(0),
        Schema::Date => json!(EXAMPLE_DATE),
        Schema::Text => json!(""),
        Schema::Bool => json!(false),
        Schema::Unknown => json!({}),
    }
}
