//! Value validation against schema trees.
//!
//! Validation walks the value and the schema together, depth first, and stops
//! at the first failure. On success the caller gets back the very reference it
//! passed in; nothing is copied or coerced.

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{ErrorKind, ValidationError};
use crate::schema::{ArrayShape, ObjectShape, PrimitiveShape, Schema, Shape};
use crate::types::{Literal, PrimitiveKind, ValidateOptions};

/// Validate `value` against `schema` with default options.
///
/// # Errors
///
/// Returns the first `ValidationError` encountered.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use typeshape::builder::{number, object, string};
/// use typeshape::validate;
///
/// let schema = object([("key1", string()), ("key2", number())]);
///
/// let input = json!({ "key1": "1", "key2": 2 });
/// assert!(std::ptr::eq(validate(&input, &schema).unwrap(), &input));
///
/// let err = validate(&json!({}), &schema).unwrap_err();
/// assert_eq!(err.message, "must be string");
/// assert_eq!(err.path, "key1");
/// ```
pub fn validate<'v>(value: &'v Value, schema: &Schema) -> Result<&'v Value, ValidationError> {
    validate_with(value, schema, &ValidateOptions::default())
}

/// Validate `value` against `schema` with explicit options.
pub fn validate_with<'v>(
    value: &'v Value,
    schema: &Schema,
    options: &ValidateOptions,
) -> Result<&'v Value, ValidationError> {
    Validator { options }.check(Some(value), schema, "", 0)?;
    Ok(value)
}

/// Validate a possibly absent value at a given path.
///
/// `None` stands for a missing value (an absent key); it is accepted only by
/// optional schemas and by schemas without a structural check such as
/// [`any`](crate::builder::any). The returned value is the input, unchanged.
pub fn validate_at<'v>(
    value: Option<&'v Value>,
    schema: &Schema,
    path: &str,
) -> Result<Option<&'v Value>, ValidationError> {
    validate_at_with(value, schema, path, &ValidateOptions::default())
}

/// [`validate_at`] with explicit options.
pub fn validate_at_with<'v>(
    value: Option<&'v Value>,
    schema: &Schema,
    path: &str,
    options: &ValidateOptions,
) -> Result<Option<&'v Value>, ValidationError> {
    Validator { options }.check(value, schema, path, 0)?;
    Ok(value)
}

/// Returns true if `result` is a validation failure.
pub fn is_error<T>(result: &Result<T, ValidationError>) -> bool {
    result.is_err()
}

struct Validator<'o> {
    options: &'o ValidateOptions,
}

impl Validator<'_> {
    fn check(
        &self,
        value: Option<&Value>,
        schema: &Schema,
        path: &str,
        depth: usize,
    ) -> Result<(), ValidationError> {
        if value.is_none() && schema.is_optional() {
            return Ok(());
        }

        if depth > self.options.max_depth {
            return Err(ValidationError::new(
                ErrorKind::DepthExceeded,
                format!("maximum nesting depth of {} exceeded", self.options.max_depth),
                path,
            ));
        }

        match schema.shape() {
            Shape::Any => Ok(()),
            Shape::Null => match value {
                Some(Value::Null) => Ok(()),
                _ => Err(type_mismatch("null", path)),
            },
            Shape::Primitive(primitive) => self.check_primitive(value, primitive, path),
            Shape::Array(array) => match value {
                Some(Value::Array(items)) => self.check_array(items, array, path, depth),
                _ => Err(type_mismatch("array", path)),
            },
            Shape::Object(object) => match value {
                Some(Value::Object(map)) => self.check_object(map, object, path, depth),
                _ => Err(type_mismatch("object", path)),
            },
            Shape::Dictionary(values) => match value {
                Some(Value::Object(map)) => {
                    for (key, child) in map {
                        self.check(Some(child), values, &child_path(path, key), depth + 1)?;
                    }
                    Ok(())
                }
                _ => Err(type_mismatch("object", path)),
            },
            Shape::Union(members) => {
                // Branch errors are discarded; only the union-level error surfaces.
                if members
                    .iter()
                    .any(|member| self.check(value, member, path, depth + 1).is_ok())
                {
                    Ok(())
                } else {
                    Err(ValidationError::new(
                        ErrorKind::NoUnionMatch,
                        "must match any of given schema",
                        path,
                    ))
                }
            }
            Shape::Intersection(members) => {
                for member in members {
                    self.check(value, member, path, depth + 1)?;
                }
                Ok(())
            }
        }
    }

    fn check_primitive(
        &self,
        value: Option<&Value>,
        primitive: &PrimitiveShape,
        path: &str,
    ) -> Result<(), ValidationError> {
        let value = match value {
            Some(v) if primitive.kind.accepts(v) => v,
            _ => return Err(type_mismatch(primitive.kind.as_str(), path)),
        };

        if self.options.enforce_refinements {
            check_refinements(value, primitive, path)?;
        }

        if let Some(allowed) = &primitive.allowed {
            if !allowed.iter().any(|lit| lit.matches(value)) {
                return Err(ValidationError::new(
                    ErrorKind::NotAllowed,
                    format!("must be one of: {}", join_literals(allowed)),
                    path,
                ));
            }
        }

        Ok(())
    }

    fn check_array(
        &self,
        items: &[Value],
        array: &ArrayShape,
        path: &str,
        depth: usize,
    ) -> Result<(), ValidationError> {
        // Loose arrays sample only the first element.
        let checked = if array.strict {
            items
        } else {
            &items[..items.len().min(1)]
        };

        for (index, item) in checked.iter().enumerate() {
            self.check(
                Some(item),
                &array.items,
                &child_path(path, &index.to_string()),
                depth + 1,
            )?;
        }
        Ok(())
    }

    fn check_object(
        &self,
        map: &Map<String, Value>,
        object: &ObjectShape,
        path: &str,
        depth: usize,
    ) -> Result<(), ValidationError> {
        for (key, child) in &object.properties {
            self.check(map.get(key), child, &child_path(path, key), depth + 1)?;
        }

        for (key, value) in map {
            if object.properties.contains_key(key) {
                continue;
            }
            match &object.additional {
                Some(additional) => {
                    self.check(Some(value), additional, &child_path(path, key), depth + 1)?;
                }
                None if object.strict => {
                    return Err(ValidationError::new(
                        ErrorKind::UnexpectedKey,
                        "object has unexpected key",
                        child_path(path, key),
                    ));
                }
                None => {}
            }
        }

        Ok(())
    }
}

fn check_refinements(
    value: &Value,
    primitive: &PrimitiveShape,
    path: &str,
) -> Result<(), ValidationError> {
    let refinement = |message: String| ValidationError::new(ErrorKind::Refinement, message, path);

    match (primitive.kind, value) {
        (PrimitiveKind::String, Value::String(s)) => {
            if let Some(pattern) = &primitive.pattern {
                let re = Regex::new(pattern)
                    .map_err(|e| refinement(format!("invalid pattern {}: {}", pattern, e)))?;
                if !re.is_match(s) {
                    return Err(refinement(format!("must match pattern {}", pattern)));
                }
            }
        }
        (PrimitiveKind::Number, Value::Number(n)) => {
            let n = n.as_f64().unwrap_or(f64::NAN);
            if let Some(min) = primitive.minimum {
                if n.is_nan() || n < min {
                    return Err(refinement(format!("must be >= {}", min)));
                }
            }
            if let Some(max) = primitive.maximum {
                if n.is_nan() || n > max {
                    return Err(refinement(format!("must be <= {}", max)));
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn type_mismatch(expected: &str, path: &str) -> ValidationError {
    ValidationError::new(
        ErrorKind::TypeMismatch,
        format!("must be {}", expected),
        path,
    )
}

fn child_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", parent, segment)
    }
}

fn join_literals(allowed: &[Literal]) -> String {
    allowed
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::*;
    use serde_json::json;

    #[test]
    fn child_path_joins_with_dots() {
        assert_eq!(child_path("", "a"), "a");
        assert_eq!(child_path("a", "b"), "a.b");
        assert_eq!(child_path("a.b", "0"), "a.b.0");
    }

    #[test]
    fn returns_input_reference() {
        let value = json!({"a": [1, 2]});
        let out = validate(&value, &any()).unwrap();
        assert!(std::ptr::eq(out, &value));
    }

    #[test]
    fn absent_value_fails_typed_schema() {
        let err = validate_at(None, &string(), "").unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert_eq!(err.message, "must be string");

        assert_eq!(validate_at(None, &any(), ""), Ok(None));
        assert_eq!(validate_at(None, &optional(&string()), ""), Ok(None));
    }

    #[test]
    fn caller_path_prefixes_errors() {
        let schema = object([("name", string())]);
        let err = validate_at(Some(&json!({})), &schema, "user").unwrap_err();
        assert_eq!(err.path, "user.name");
    }

    #[test]
    fn enum_message_lists_allowed_values() {
        let schema = enum_of(["red", "green"]).unwrap();
        let err = validate(&json!("blue"), &schema).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotAllowed);
        assert_eq!(err.message, "must be one of: red, green");
    }

    #[test]
    fn type_check_precedes_enum() {
        let schema = enum_of([1, 2, 3]).unwrap();
        let err = validate(&json!("1"), &schema).unwrap_err();
        assert_eq!(err.message, "must be number");
    }

    #[test]
    fn refinements_ignored_by_default() {
        assert!(validate(&json!(99), &range(1.0, 5.0).unwrap()).is_ok());
        let re = Regex::new("^a+$").unwrap();
        assert!(validate(&json!("bbb"), &matches(&re)).is_ok());
    }

    #[test]
    fn refinements_enforced_on_request() {
        let opts = ValidateOptions::new().enforce_refinements(true);

        let r = range(1.0, 5.0).unwrap();
        assert!(validate_with(&json!(1), &r, &opts).is_ok());
        assert!(validate_with(&json!(5), &r, &opts).is_ok());
        let err = validate_with(&json!(0), &r, &opts).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Refinement);
        assert_eq!(err.message, "must be >= 1");
        let err = validate_with(&json!(5.5), &r, &opts).unwrap_err();
        assert_eq!(err.message, "must be <= 5");

        let re = Regex::new("^a+$").unwrap();
        let m = matches(&re);
        assert!(validate_with(&json!("aaa"), &m, &opts).is_ok());
        let err = validate_with(&json!("bbb"), &m, &opts).unwrap_err();
        assert_eq!(err.message, "must match pattern ^a+$");
    }

    #[test]
    fn invalid_pattern_is_a_refinement_error() {
        let schema: Schema =
            serde_json::from_value(json!({"type": "string", "pattern": "("})).unwrap();
        let opts = ValidateOptions::new().enforce_refinements(true);
        let err = validate_with(&json!("x"), &schema, &opts).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Refinement);
        assert!(err.message.starts_with("invalid pattern ("));
    }

    #[test]
    fn depth_guard_stops_deep_values() {
        let mut schema = any();
        for _ in 0..10 {
            schema = strict_array(schema);
        }
        let mut value = json!(1);
        for _ in 0..10 {
            value = json!([value]);
        }
        let opts = ValidateOptions::new().max_depth(3);
        let err = validate_with(&value, &schema, &opts).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DepthExceeded);
        assert_eq!(err.path, "0.0.0.0");

        assert!(validate(&value, &schema).is_ok());
    }

    #[test]
    fn is_error_discriminates() {
        assert!(!is_error(&validate(&json!(1), &number())));
        assert!(is_error(&validate(&json!("1"), &number())));
    }
}
