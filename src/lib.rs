//! # Reqschema
//!
//! Schema validation for API request bodies and query parameters that
//! accumulates ALL violations in one pass, rather than short-circuiting on
//! the first failure.
//!
//! ## Overview
//!
//! Schemas arrive as already-parsed JSON documents (objects with keyword
//! fields: `type`, `required`, `properties`, `items`, `enum`, `allOf`, named
//! `$ref`, ...). Registration compiles them into an immutable arena form;
//! validation walks schema and data in lockstep, reporting every violation
//! with a machine-readable code and the path to the offending value.
//!
//! Two modes exist, as two independent registries behind the
//! [`RequestValidator`] facade:
//!
//! - **body** (strict): type mismatches are always errors, the data is
//!   never touched;
//! - **query** (coercive): scalar strings are upgraded to the declared type
//!   where the conversion is unambiguous (`"42"` → `42`), and the data is
//!   **mutated in place** so callers get the coerced values back.
//!
//! ## Core Types
//!
//! - [`RequestValidator`]: the facade; register schemas, validate bodies
//!   and queries, receive `{ code, path, message }` errors
//! - [`SchemaRegistry`]: named schema storage with lazy `$ref` resolution
//! - [`DataPath`]: path to a value in the nested data tree
//! - [`SchemaError`] / [`SchemaErrors`]: raw accumulated violations
//! - [`ExternalError`]: the formatted external error shape
//!
//! ## Example
//!
//! ```rust
//! use reqschema::RequestValidator;
//! use serde_json::json;
//!
//! let validator = RequestValidator::new();
//! validator.add_body_schema("user", &json!({
//!     "type": "object",
//!     "required": ["name", "age"],
//!     "properties": {
//!         "name": { "type": "string", "minLength": 1 },
//!         "age": { "type": "integer", "minimum": 0 }
//!     }
//! })).unwrap();
//!
//! // Valid data returns None
//! let ok = validator.validate_body("user", &json!({"name": "Ada", "age": 36})).unwrap();
//! assert!(ok.is_none());
//!
//! // Every violation is reported, with code and path
//! let errors = validator.validate_body("user", &json!({"name": ""})).unwrap().unwrap();
//! assert_eq!(errors.len(), 2);
//! assert_eq!(errors[0].code, "required");
//! assert_eq!(errors[0].path, "/age");
//! assert_eq!(errors[1].code, "min_length");
//! assert_eq!(errors[1].path, "/name");
//! ```

pub mod coerce;
pub mod error;
pub mod eval;
pub mod format;
pub mod formatter;
pub mod path;
pub mod registry;
pub mod request;
pub mod schema;

pub use coerce::{coerce, CoercionMode};
pub use error::{SchemaError, SchemaErrors};
pub use eval::{Coercion, EvalContext, Evaluation, SchemaSource};
pub use format::{FormatCheck, FormatRegistry};
pub use formatter::{format_errors, ExternalError, PathStyle};
pub use path::{DataPath, PathSegment};
pub use registry::{RegistryError, SchemaRegistry};
pub use request::RequestValidator;
pub use schema::{DataKind, SchemaDocument, SchemaNode};

/// Type alias for validation results using SchemaErrors
pub type ValidationResult = stillwater::Validation<(), SchemaErrors>;
