//! The request validation facade.
//!
//! [`RequestValidator`] wires the pieces together: a strict registry for
//! request bodies, a coercive registry for query parameters, and the shared
//! format set. The two registries are deliberately independent instances:
//! coercion is a registry-wide policy, and registering a schema for body use
//! never affects query validation of the same name.

use serde_json::Value;
use stillwater::Validation;

use crate::coerce::CoercionMode;
use crate::format::FormatRegistry;
use crate::formatter::{format_errors, ExternalError, PathStyle};
use crate::registry::{RegistryError, SchemaRegistry};

/// Validates request bodies and query parameters against named schemas.
///
/// Register schemas (and any extra formats) during initialization, then
/// share the validator across request handlers; validation only ever reads.
///
/// # Example
///
/// ```rust
/// use reqschema::RequestValidator;
/// use serde_json::json;
///
/// let validator = RequestValidator::new();
/// validator.add_query_schema("list", &json!({
///     "type": "object",
///     "properties": { "count": { "type": "integer" } }
/// })).unwrap();
///
/// let mut query = json!({"count": "42"});
/// let result = validator.validate_query("list", &mut query).unwrap();
/// assert!(result.is_none());
/// assert_eq!(query, json!({"count": 42})); // coerced in place
/// ```
pub struct RequestValidator {
    body: SchemaRegistry,
    query: SchemaRegistry,
    formats: FormatRegistry,
}

impl RequestValidator {
    /// Creates a validator with empty registries and the built-in formats.
    pub fn new() -> Self {
        Self {
            body: SchemaRegistry::new(CoercionMode::Strict),
            query: SchemaRegistry::new(CoercionMode::Coerce),
            formats: FormatRegistry::new(),
        }
    }

    /// Sets the maximum `$ref` chain depth on both registries.
    pub fn with_max_depth(self, depth: usize) -> Self {
        Self {
            body: self.body.with_max_depth(depth),
            query: self.query.with_max_depth(depth),
            formats: self.formats,
        }
    }

    /// Registers a schema for body validation. Re-registration under an
    /// existing name replaces the schema (last write wins).
    pub fn add_body_schema(
        &self,
        name: impl Into<String>,
        schema: &Value,
    ) -> Result<(), RegistryError> {
        self.body.register(name, schema)
    }

    /// Registers a schema for query validation. Re-registration under an
    /// existing name replaces the schema (last write wins).
    pub fn add_query_schema(
        &self,
        name: impl Into<String>,
        schema: &Value,
    ) -> Result<(), RegistryError> {
        self.query.register(name, schema)
    }

    /// Registers a named format predicate, available to both body and query
    /// schemas.
    ///
    /// Takes `&mut self`: formats are registered during initialization, and
    /// the active set cannot change while validation calls hold the
    /// validator by shared reference.
    pub fn add_format<F>(&mut self, name: impl Into<String>, check: F)
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.formats.register(name, check);
    }

    /// Returns the `$ref` names that do not resolve in either registry.
    /// Useful as a startup integrity check, since a dangling reference is
    /// fatal when hit during validation.
    pub fn unresolved_refs(&self) -> Vec<String> {
        let mut refs = self.body.unresolved_refs();
        refs.extend(self.query.unresolved_refs());
        refs.sort();
        refs.dedup();
        refs
    }

    /// Validates a request body against a named schema.
    ///
    /// Returns `Ok(None)` when the data is valid, or `Ok(Some(errors))`
    /// listing every violation in evaluation order. The data is never
    /// modified; body validation does not coerce.
    ///
    /// # Errors
    ///
    /// [`RegistryError`] for an unregistered schema name or a dangling
    /// `$ref`: a configuration mistake, kept apart from validation output.
    pub fn validate_body(
        &self,
        name: &str,
        data: &Value,
    ) -> Result<Option<Vec<ExternalError>>, RegistryError> {
        let outcome = self.body.validate(name, data, &self.formats)?;
        Ok(finish(outcome.into_validation(), PathStyle::Body))
    }

    /// Validates query parameters against a named schema, coercing scalar
    /// types.
    ///
    /// **Mutates `data` in place**: when a string parameter coerces to the
    /// schema's declared scalar type, the original container is updated with
    /// the converted value, because callers expect the coerced values back. This
    /// side effect is part of the contract, not an implementation detail.
    ///
    /// Returns `Ok(None)` when valid, `Ok(Some(errors))` otherwise; error
    /// paths render with the query-style `?` prefix.
    pub fn validate_query(
        &self,
        name: &str,
        data: &mut Value,
    ) -> Result<Option<Vec<ExternalError>>, RegistryError> {
        let outcome = self.query.validate_in_place(name, data, &self.formats)?;
        Ok(finish(outcome.into_validation(), PathStyle::Query))
    }
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn finish(
    result: Validation<(), crate::error::SchemaErrors>,
    style: PathStyle,
) -> Option<Vec<ExternalError>> {
    match result {
        Validation::Success(()) => None,
        Validation::Failure(errors) => Some(format_errors(&errors, style)),
    }
}
