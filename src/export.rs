//! Export to standard JSON Schema (draft 2020-12).
//!
//! The native document form (see [`Schema`]'s serde mapping) uses keywords
//! such as `optional` and `isStrict` that standard tooling does not know. This
//! module rewrites a schema into plain JSON Schema keywords:
//!
//! | Native | JSON Schema |
//! |--------|-------------|
//! | property with `optional` | left out of `required` |
//! | strict object | `additionalProperties: false` |
//! | dictionary | `additionalProperties: <schema>` |
//! | array (strict or not) | `items` |
//! | union / intersection | `anyOf` / `allOf` |
//!
//! Loose arrays only sample their first element here, while a standard
//! validator checks every element; the exported form is the stricter one.

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::ExportError;
use crate::schema::{Schema, Shape};
use crate::types::finite_number;

const DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Convert `schema` into a standard JSON Schema document.
pub fn to_json_schema(schema: &Schema) -> Value {
    let mut root = export_node(schema);
    if let Value::Object(map) = &mut root {
        map.insert("$schema".to_string(), Value::String(DIALECT.to_string()));
    }
    root
}

/// Convert `schema` and make sure a JSON Schema compiler accepts the result.
///
/// # Errors
///
/// Returns `ExportError::Rejected` when `jsonschema` refuses the document,
/// for instance because a `pattern` is not a valid regular expression.
pub fn export_checked(schema: &Schema) -> Result<Value, ExportError> {
    let document = to_json_schema(schema);
    jsonschema::validator_for(&document).map_err(|e| ExportError::Rejected {
        message: e.to_string(),
    })?;
    debug!("exported document compiled");
    Ok(document)
}

fn export_node(schema: &Schema) -> Value {
    match schema.shape() {
        Shape::Any => json!({}),
        Shape::Null => json!({ "type": "null" }),
        Shape::Primitive(p) => {
            let mut map = Map::new();
            map.insert("type".into(), Value::String(p.kind.as_str().into()));
            if let Some(allowed) = &p.allowed {
                map.insert(
                    "enum".into(),
                    Value::Array(allowed.iter().map(|lit| lit.to_value()).collect()),
                );
            }
            if let Some(pattern) = &p.pattern {
                map.insert("pattern".into(), Value::String(pattern.clone()));
            }
            if let Some(min) = p.minimum {
                map.insert("minimum".into(), bound(min));
            }
            if let Some(max) = p.maximum {
                map.insert("maximum".into(), bound(max));
            }
            Value::Object(map)
        }
        Shape::Object(o) => {
            let mut map = Map::new();
            map.insert("type".into(), json!("object"));

            let properties: Map<String, Value> = o
                .properties
                .iter()
                .map(|(name, child)| (name.clone(), export_node(child)))
                .collect();
            let required: Vec<Value> = o
                .properties
                .iter()
                .filter(|(_, child)| !accepts_absent(child))
                .map(|(name, _)| Value::String(name.clone()))
                .collect();

            map.insert("properties".into(), Value::Object(properties));
            if !required.is_empty() {
                map.insert("required".into(), Value::Array(required));
            }
            match &o.additional {
                Some(additional) => {
                    map.insert("additionalProperties".into(), export_node(additional));
                }
                None if o.strict => {
                    map.insert("additionalProperties".into(), Value::Bool(false));
                }
                None => {}
            }
            Value::Object(map)
        }
        Shape::Dictionary(values) => json!({
            "type": "object",
            "additionalProperties": export_node(values),
        }),
        Shape::Array(a) => json!({
            "type": "array",
            "items": export_node(&a.items),
        }),
        Shape::Union(members) => json!({
            "anyOf": members.iter().map(export_node).collect::<Vec<_>>(),
        }),
        Shape::Intersection(members) => json!({
            "allOf": members.iter().map(export_node).collect::<Vec<_>>(),
        }),
    }
}

// Bounds are finite by construction.
fn bound(n: f64) -> Value {
    finite_number(n).map_or(Value::Null, Value::Number)
}

/// Whether a missing property would pass validation.
fn accepts_absent(schema: &Schema) -> bool {
    if schema.is_optional() {
        return true;
    }
    match schema.shape() {
        Shape::Any => true,
        Shape::Union(members) => members.iter().any(accepts_absent),
        Shape::Intersection(members) => members.iter().all(accepts_absent),
        _ => false,
    }
}
