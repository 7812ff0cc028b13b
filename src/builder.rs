//! Fluent schema construction.
//!
//! Every function returns a fresh immutable [`Schema`]. Constructors that can
//! be handed a nonsensical definition (empty unions, mixed-type enums,
//! non-scalar literals, NaN or infinite numbers) return a [`BuildError`]
//! instead.
//!
//! ```
//! use typeshape::builder::{any_of, number, object, optional, string};
//!
//! let user = object([
//!     ("name", string()),
//!     ("age", optional(&number())),
//!     ("id", any_of([string(), number()]).unwrap()),
//! ]);
//! # let _ = user;
//! ```

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use crate::error::BuildError;
use crate::schema::{ArrayShape, ObjectShape, PrimitiveShape, Schema, Shape};
use crate::types::{Literal, PrimitiveKind};

/// Schema matching every value.
pub fn any() -> Schema {
    Schema::from_shape(Shape::Any)
}

/// Schema for JSON null.
pub fn null() -> Schema {
    Schema::from_shape(Shape::Null)
}

pub fn string() -> Schema {
    primitive(PrimitiveShape::new(PrimitiveKind::String))
}

pub fn number() -> Schema {
    primitive(PrimitiveShape::new(PrimitiveKind::Number))
}

pub fn boolean() -> Schema {
    primitive(PrimitiveShape::new(PrimitiveKind::Boolean))
}

/// String schema accepting exactly `value`.
pub fn string_literal(value: impl Into<String>) -> Schema {
    literal(Literal::String(value.into()))
}

/// Number schema accepting exactly `value`.
///
/// # Errors
///
/// Returns `BuildError::NonFiniteNumber` for NaN and infinities.
pub fn number_literal(value: f64) -> Result<Schema, BuildError> {
    Literal::try_from(value).map(literal)
}

/// Boolean schema accepting exactly `value`.
pub fn boolean_literal(value: bool) -> Schema {
    literal(Literal::Boolean(value))
}

/// Schema of the literal's own type whose only allowed value is the literal.
pub fn literal(value: impl Into<Literal>) -> Schema {
    let value = value.into();
    let mut shape = PrimitiveShape::new(value.kind());
    shape.allowed = Some(vec![value]);
    primitive(shape)
}

/// Literal schema from a dynamic value.
///
/// # Errors
///
/// Returns `BuildError::NonScalarLiteral` unless `value` is a string, number
/// or boolean.
pub fn literal_value(value: &Value) -> Result<Schema, BuildError> {
    Literal::from_value(value).map(literal)
}

/// Copy of `schema` that also accepts an absent value.
pub fn optional(schema: &Schema) -> Schema {
    schema.with_optional(true)
}

/// Object schema; keys not listed in `properties` are accepted unchecked.
pub fn object<K, I>(properties: I) -> Schema
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Schema)>,
{
    object_shape(properties, false)
}

/// Object schema that rejects keys not listed in `properties`.
pub fn strict_object<K, I>(properties: I) -> Schema
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Schema)>,
{
    object_shape(properties, true)
}

/// Object schema where every key's value must match `values`.
pub fn dictionary(values: Schema) -> Schema {
    Schema::from_shape(Shape::Dictionary(values))
}

/// Array schema that checks only the first element against `items`.
///
/// `None` means any item is accepted.
pub fn array(items: impl Into<Option<Schema>>) -> Schema {
    array_shape(items.into(), false)
}

/// Array schema that checks every element against `items`.
pub fn strict_array(items: impl Into<Option<Schema>>) -> Schema {
    array_shape(items.into(), true)
}

/// Number schema declaring inclusive bounds.
///
/// Bounds are checked only when refinement enforcement is enabled.
///
/// # Errors
///
/// Returns `BuildError::NonFiniteNumber` when either bound is NaN or infinite.
pub fn range(minimum: f64, maximum: f64) -> Result<Schema, BuildError> {
    if !minimum.is_finite() || !maximum.is_finite() {
        return Err(BuildError::NonFiniteNumber);
    }
    let mut shape = PrimitiveShape::new(PrimitiveKind::Number);
    shape.minimum = Some(minimum);
    shape.maximum = Some(maximum);
    Ok(primitive(shape))
}

/// String schema declaring `regex` as its pattern.
///
/// The pattern is checked only when refinement enforcement is enabled.
pub fn matches(regex: &Regex) -> Schema {
    let mut shape = PrimitiveShape::new(PrimitiveKind::String);
    shape.pattern = Some(regex.as_str().to_string());
    primitive(shape)
}

/// Union: the value must match at least one of `schemas`, tried in order.
///
/// # Errors
///
/// Returns `BuildError::EmptyUnion` when `schemas` is empty.
pub fn any_of(schemas: impl IntoIterator<Item = Schema>) -> Result<Schema, BuildError> {
    let members: Vec<Schema> = schemas.into_iter().collect();
    if members.is_empty() {
        return Err(BuildError::EmptyUnion);
    }
    Ok(Schema::from_shape(Shape::Union(members)))
}

/// Intersection: the value must match every one of `schemas`, in order.
///
/// # Errors
///
/// Returns `BuildError::EmptyIntersection` when `schemas` is empty.
pub fn all_of(schemas: impl IntoIterator<Item = Schema>) -> Result<Schema, BuildError> {
    let members: Vec<Schema> = schemas.into_iter().collect();
    if members.is_empty() {
        return Err(BuildError::EmptyIntersection);
    }
    Ok(Schema::from_shape(Shape::Intersection(members)))
}

/// Enum: the value must equal one of `values`, which share a single type.
///
/// # Errors
///
/// Returns `BuildError::EmptyEnum` for no values and `BuildError::MixedEnum`
/// when the values are not all strings, all numbers, or all booleans.
pub fn enum_of<L>(values: impl IntoIterator<Item = L>) -> Result<Schema, BuildError>
where
    L: Into<Literal>,
{
    let allowed: Vec<Literal> = values.into_iter().map(Into::into).collect();
    let kind = allowed.first().ok_or(BuildError::EmptyEnum)?.kind();
    if let Some(other) = allowed.iter().find(|lit| lit.kind() != kind) {
        return Err(BuildError::MixedEnum {
            expected: kind.as_str(),
            found: other.kind().as_str(),
        });
    }

    let mut shape = PrimitiveShape::new(kind);
    shape.allowed = Some(allowed);
    Ok(primitive(shape))
}

fn primitive(shape: PrimitiveShape) -> Schema {
    Schema::from_shape(Shape::Primitive(shape))
}

fn object_shape<K, I>(properties: I, strict: bool) -> Schema
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Schema)>,
{
    let properties: IndexMap<String, Schema> = properties
        .into_iter()
        .map(|(name, schema)| (name.into(), schema))
        .collect();
    Schema::from_shape(Shape::Object(ObjectShape {
        properties,
        additional: None,
        strict,
    }))
}

fn array_shape(items: Option<Schema>, strict: bool) -> Schema {
    Schema::from_shape(Shape::Array(ArrayShape {
        items: items.unwrap_or_else(any),
        strict,
    }))
}
