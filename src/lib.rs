//! typeshape
//!
//! Runtime validation of dynamically-typed values (`serde_json::Value`)
//! against schema trees built with a small fluent API.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use typeshape::builder::{array, enum_of, number, optional, strict_object, string};
//! use typeshape::{is_error, validate};
//!
//! let schema = strict_object([
//!     ("name", string()),
//!     ("age", optional(&number())),
//!     ("role", enum_of(["admin", "user"]).unwrap()),
//!     ("tags", array(string())),
//! ]);
//!
//! let ok = json!({ "name": "ada", "role": "admin", "tags": ["x"] });
//! assert!(!is_error(&validate(&ok, &schema)));
//!
//! let err = validate(&json!({ "name": "ada", "role": "root" }), &schema).unwrap_err();
//! assert_eq!(err.path, "role");
//! assert_eq!(err.message, "must be one of: admin, user");
//! ```
//!
//! # Validation Rules
//!
//! | Schema | Accepts |
//! |--------|---------|
//! | `any()` | everything, including an absent value |
//! | `null()`, `string()`, `number()`, `boolean()` | that exact JSON type, no coercion |
//! | `object(..)` | objects; declared keys checked, other keys ignored |
//! | `strict_object(..)` | objects; undeclared keys rejected |
//! | `dictionary(s)` | objects whose every value matches `s` |
//! | `array(s)` | arrays whose first element (if any) matches `s` |
//! | `strict_array(s)` | arrays whose every element matches `s` |
//! | `enum_of(..)`, `literal(..)` | one of the listed scalars |
//! | `any_of(..)` | the first matching member wins |
//! | `all_of(..)` | every member, first failure reported verbatim |
//! | `optional(&s)` | an absent value, or whatever `s` accepts |
//!
//! Validation stops at the first failure and reports a [`ValidationError`]
//! with a dot-joined path (`"items.0.name"`).

pub mod builder;
mod error;
mod export;
mod loader;
mod schema;
mod types;
mod validator;

pub use error::{BuildError, ErrorKind, ExportError, LoadError, ValidationError};
pub use export::{export_checked, to_json_schema};
pub use loader::{
    is_url, load_document, load_document_auto, load_document_str, load_schema, load_schema_auto,
    load_schema_str, parse_schema,
};
pub use schema::{ArrayShape, ObjectShape, PrimitiveShape, Schema, Shape};
pub use types::{json_type_name, Literal, PrimitiveKind, ValidateOptions, DEFAULT_MAX_DEPTH};
pub use validator::{is_error, validate, validate_at, validate_at_with, validate_with};

#[cfg(feature = "remote")]
pub use loader::load_document_url;
