//! Schema node model.
//!
//! A [`Schema`] is a cheap, shareable handle to an immutable node. Every node
//! carries an `optional` flag plus exactly one [`Shape`]; the shape is fixed at
//! construction time, so a node can never be both a union and a typed value.
//!
//! Schemas serialize to (and deserialize from) a JSON document using the
//! familiar field names:
//!
//! ```json
//! {
//!   "type": "object",
//!   "properties": {
//!     "id": { "type": "string" },
//!     "tags": { "type": "array", "items": { "type": "string" }, "isStrict": true },
//!     "kind": { "type": "string", "enum": ["a", "b"], "optional": true }
//!   },
//!   "isStrict": true
//! }
//! ```
//!
//! Annotation keywords (`$schema`, `$id`, `$comment`, `title`, `description`,
//! `examples`) are accepted and dropped. Any other unknown keyword is an error.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::error::BuildError;
use crate::types::{Literal, PrimitiveKind};

/// Immutable, shareable schema node.
///
/// Cloning is a reference-count bump; the same node can sit under any number
/// of parents. Children always exist before their parents, so a schema graph
/// built through this API is acyclic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SchemaDocument", into = "SchemaDocument")]
pub struct Schema(Arc<Node>);

#[derive(Debug, Clone, PartialEq)]
struct Node {
    optional: bool,
    shape: Shape,
}

/// The structural form of a schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Matches every value.
    Any,
    /// Value must be JSON null.
    Null,
    Primitive(PrimitiveShape),
    Object(ObjectShape),
    /// Object whose every value must match the inner schema.
    Dictionary(Schema),
    Array(ArrayShape),
    /// Value must match at least one member (`anyOf`). Never empty.
    Union(Vec<Schema>),
    /// Value must match every member (`allOf`). Never empty.
    Intersection(Vec<Schema>),
}

/// String, number or boolean node with optional literal set and refinements.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveShape {
    pub kind: PrimitiveKind,
    /// Allowed literals (`enum`), in declaration order.
    pub allowed: Option<Vec<Literal>>,
    /// Regex source text, string nodes only.
    pub pattern: Option<String>,
    /// Inclusive lower bound, number nodes only.
    pub minimum: Option<f64>,
    /// Inclusive upper bound, number nodes only.
    pub maximum: Option<f64>,
}

impl PrimitiveShape {
    pub fn new(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            allowed: None,
            pattern: None,
            minimum: None,
            maximum: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectShape {
    /// Declared properties, in declaration order.
    pub properties: IndexMap<String, Schema>,
    /// Schema for keys not named in `properties`.
    pub additional: Option<Schema>,
    /// Reject keys covered by neither `properties` nor `additional`.
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayShape {
    pub items: Schema,
    /// Validate every element rather than only the first.
    pub strict: bool,
}

impl Schema {
    pub(crate) fn from_shape(shape: Shape) -> Self {
        Schema(Arc::new(Node {
            optional: false,
            shape,
        }))
    }

    pub fn shape(&self) -> &Shape {
        &self.0.shape
    }

    /// Whether an absent value is accepted at this position.
    pub fn is_optional(&self) -> bool {
        self.0.optional
    }

    /// Shallow copy with the `optional` flag set. Children stay shared.
    pub fn with_optional(&self, optional: bool) -> Schema {
        Schema(Arc::new(Node {
            optional,
            shape: self.0.shape.clone(),
        }))
    }

    /// Whether two handles point at the same node.
    pub fn ptr_eq(a: &Schema, b: &Schema) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

/// `type` values accepted in schema documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TypeName {
    Null,
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl From<PrimitiveKind> for TypeName {
    fn from(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::String => TypeName::String,
            PrimitiveKind::Number => TypeName::Number,
            PrimitiveKind::Boolean => TypeName::Boolean,
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Flat document form of a node, one optional field per keyword.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SchemaDocument {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    type_name: Option<TypeName>,
    #[serde(default, skip_serializing_if = "is_false")]
    optional: bool,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    allowed: Option<Vec<Literal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<IndexMap<String, Schema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    additional_properties: Option<Schema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    items: Option<Schema>,
    #[serde(default, skip_serializing_if = "is_false")]
    is_strict: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    any_of: Option<Vec<Schema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    all_of: Option<Vec<Schema>>,

    // Annotations: read, never kept.
    #[serde(rename = "$schema", default, skip_serializing)]
    dialect: Option<IgnoredAny>,
    #[serde(rename = "$id", default, skip_serializing)]
    id: Option<IgnoredAny>,
    #[serde(rename = "$comment", default, skip_serializing)]
    comment: Option<IgnoredAny>,
    #[serde(default, skip_serializing)]
    title: Option<IgnoredAny>,
    #[serde(default, skip_serializing)]
    description: Option<IgnoredAny>,
    #[serde(default, skip_serializing)]
    examples: Option<IgnoredAny>,
}

impl SchemaDocument {
    /// Names of the keywords present, excluding `type` and `optional`.
    fn present_keywords(&self) -> Vec<&'static str> {
        let mut present = Vec::new();
        if self.allowed.is_some() {
            present.push("enum");
        }
        if self.pattern.is_some() {
            present.push("pattern");
        }
        if self.minimum.is_some() {
            present.push("minimum");
        }
        if self.maximum.is_some() {
            present.push("maximum");
        }
        if self.properties.is_some() {
            present.push("properties");
        }
        if self.additional_properties.is_some() {
            present.push("additionalProperties");
        }
        if self.items.is_some() {
            present.push("items");
        }
        if self.is_strict {
            present.push("isStrict");
        }
        if self.any_of.is_some() {
            present.push("anyOf");
        }
        if self.all_of.is_some() {
            present.push("allOf");
        }
        present
    }

    /// Fail if any keyword outside `allowed` is present.
    fn only(&self, context: &str, allowed: &[&str]) -> Result<(), String> {
        match self
            .present_keywords()
            .into_iter()
            .find(|k| !allowed.contains(k))
        {
            Some(keyword) => Err(format!("`{}` is not allowed on {}", keyword, context)),
            None => Ok(()),
        }
    }
}

impl TryFrom<SchemaDocument> for Schema {
    type Error = String;

    fn try_from(doc: SchemaDocument) -> Result<Self, Self::Error> {
        let shape = match doc.type_name {
            None => match (&doc.any_of, &doc.all_of) {
                (Some(_), Some(_)) => {
                    return Err("`anyOf` and `allOf` cannot be combined on one node".into())
                }
                (Some(members), None) => {
                    doc.only("a union node", &["anyOf"])?;
                    if members.is_empty() {
                        return Err(BuildError::EmptyUnion.to_string());
                    }
                    Shape::Union(members.clone())
                }
                (None, Some(members)) => {
                    doc.only("an intersection node", &["allOf"])?;
                    if members.is_empty() {
                        return Err(BuildError::EmptyIntersection.to_string());
                    }
                    Shape::Intersection(members.clone())
                }
                (None, None) => {
                    doc.only("a node without `type`", &[])?;
                    Shape::Any
                }
            },
            Some(TypeName::Null) => {
                doc.only("null nodes", &[])?;
                Shape::Null
            }
            Some(TypeName::String) => {
                doc.only("string nodes", &["enum", "pattern"])?;
                primitive_shape(PrimitiveKind::String, &doc)?
            }
            Some(TypeName::Number) => {
                doc.only("number nodes", &["enum", "minimum", "maximum"])?;
                primitive_shape(PrimitiveKind::Number, &doc)?
            }
            Some(TypeName::Boolean) => {
                doc.only("boolean nodes", &["enum"])?;
                primitive_shape(PrimitiveKind::Boolean, &doc)?
            }
            Some(TypeName::Array) => {
                doc.only("array nodes", &["items", "isStrict"])?;
                Shape::Array(ArrayShape {
                    items: doc
                        .items
                        .clone()
                        .unwrap_or_else(|| Schema::from_shape(Shape::Any)),
                    strict: doc.is_strict,
                })
            }
            Some(TypeName::Object) => {
                doc.only(
                    "object nodes",
                    &["properties", "additionalProperties", "isStrict"],
                )?;
                match (&doc.properties, &doc.additional_properties) {
                    (None, Some(values)) if !doc.is_strict => Shape::Dictionary(values.clone()),
                    (properties, additional) => Shape::Object(ObjectShape {
                        properties: properties.clone().unwrap_or_default(),
                        additional: additional.clone(),
                        strict: doc.is_strict,
                    }),
                }
            }
        };

        Ok(Schema(Arc::new(Node {
            optional: doc.optional,
            shape,
        })))
    }
}

fn primitive_shape(kind: PrimitiveKind, doc: &SchemaDocument) -> Result<Shape, String> {
    if let Some(allowed) = &doc.allowed {
        if allowed.is_empty() {
            return Err(BuildError::EmptyEnum.to_string());
        }
        if let Some(wrong) = allowed.iter().find(|lit| lit.kind() != kind) {
            return Err(BuildError::MixedEnum {
                expected: kind.as_str(),
                found: wrong.kind().as_str(),
            }
            .to_string());
        }
    }
    Ok(Shape::Primitive(PrimitiveShape {
        kind,
        allowed: doc.allowed.clone(),
        pattern: doc.pattern.clone(),
        minimum: doc.minimum,
        maximum: doc.maximum,
    }))
}

impl From<Schema> for SchemaDocument {
    fn from(schema: Schema) -> Self {
        let mut doc = SchemaDocument {
            optional: schema.is_optional(),
            ..Default::default()
        };
        match schema.shape() {
            Shape::Any => {}
            Shape::Null => doc.type_name = Some(TypeName::Null),
            Shape::Primitive(p) => {
                doc.type_name = Some(p.kind.into());
                doc.allowed = p.allowed.clone();
                doc.pattern = p.pattern.clone();
                doc.minimum = p.minimum;
                doc.maximum = p.maximum;
            }
            Shape::Object(o) => {
                doc.type_name = Some(TypeName::Object);
                doc.properties = Some(o.properties.clone());
                doc.additional_properties = o.additional.clone();
                doc.is_strict = o.strict;
            }
            Shape::Dictionary(values) => {
                doc.type_name = Some(TypeName::Object);
                doc.additional_properties = Some(values.clone());
            }
            Shape::Array(a) => {
                doc.type_name = Some(TypeName::Array);
                doc.items = Some(a.items.clone());
                doc.is_strict = a.strict;
            }
            Shape::Union(members) => doc.any_of = Some(members.clone()),
            Shape::Intersection(members) => doc.all_of = Some(members.clone()),
        }
        doc
    }
}
