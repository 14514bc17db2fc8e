//! Schema registry for named schema storage and reference resolution.
//!
//! This module provides [`SchemaRegistry`]: an in-memory store of compiled
//! schema documents, keyed by name, that also serves as the lookup source
//! for `$ref` resolution during evaluation.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::coerce::CoercionMode;
use crate::eval::{eval_node, EvalContext, Evaluation, SchemaSource};
use crate::format::FormatRegistry;
use crate::path::DataPath;
use crate::schema::SchemaDocument;

/// Default bound on `$ref` chain length.
const DEFAULT_MAX_DEPTH: usize = 100;

/// A thread-safe store of named, compiled schemas.
///
/// The coercion mode is a property of the registry, not of individual
/// validation calls: a strict registry and a coercive registry of the same
/// schema name are different things, and keeping them as separate instances
/// prevents accidental cross-contamination between the two semantics.
///
/// # Thread Safety
///
/// Schemas live behind a `parking_lot::RwLock`: any number of validations
/// read concurrently, while registration takes the write lock. Registration
/// is expected to happen during an initialization phase before concurrent
/// traffic begins.
///
/// # Example
///
/// ```rust
/// use reqschema::{CoercionMode, FormatRegistry, SchemaRegistry};
/// use serde_json::json;
///
/// let registry = SchemaRegistry::new(CoercionMode::Strict);
/// registry.register("User", &json!({
///     "type": "object",
///     "required": ["name"],
///     "properties": { "name": { "type": "string", "minLength": 1 } }
/// })).unwrap();
///
/// let formats = FormatRegistry::new();
/// let outcome = registry
///     .validate("User", &json!({"name": "Alice"}), &formats)
///     .unwrap();
/// assert!(outcome.is_valid());
/// ```
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<String, Arc<SchemaDocument>>>,
    mode: CoercionMode,
    max_depth: usize,
}

impl SchemaRegistry {
    /// Creates an empty registry with the given coercion policy and the
    /// default reference depth limit (100).
    pub fn new(mode: CoercionMode) -> Self {
        Self {
            schemas: RwLock::new(HashMap::new()),
            mode,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum `$ref` chain depth.
    ///
    /// Recursive schemas resolve references lazily; a chain longer than this
    /// limit is treated as an unresolvable cyclic reference and fails with
    /// [`RegistryError::InvalidSchema`].
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Compiles and stores a schema under `name`.
    ///
    /// Re-registering an existing name **replaces** the previous schema
    /// (last write wins); subsequent validations see only the new
    /// definition. This is deliberate: deployments re-register on reload
    /// rather than tearing the registry down.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidSchema`] if the document is
    /// structurally malformed.
    pub fn register(&self, name: impl Into<String>, schema: &Value) -> Result<(), RegistryError> {
        let compiled = SchemaDocument::compile(schema)?;
        self.schemas.write().insert(name.into(), Arc::new(compiled));
        Ok(())
    }

    /// Retrieves the compiled schema registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownSchema`] if no schema is registered
    /// under that name.
    pub fn resolve(&self, name: &str) -> Result<Arc<SchemaDocument>, RegistryError> {
        self.schemas
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownSchema(name.to_string()))
    }

    /// Returns true if a schema is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.read().contains_key(name)
    }

    /// Returns the `$ref` names used by registered schemas that do not
    /// resolve within this registry, sorted and deduplicated.
    ///
    /// References resolve lazily at evaluation time, where a dangling name
    /// is fatal; call this after registration to catch them at startup
    /// instead.
    pub fn unresolved_refs(&self) -> Vec<String> {
        let schemas = self.schemas.read();

        let mut unresolved: Vec<String> = schemas
            .values()
            .flat_map(|doc| doc.references())
            .filter(|name| !schemas.contains_key(name))
            .collect();

        unresolved.sort();
        unresolved.dedup();
        unresolved
    }

    /// Validates a value against a named schema without touching it.
    ///
    /// All keyword violations are accumulated into the returned
    /// [`Evaluation`]; in coercive mode the coercion decisions are recorded
    /// there too, but `data` itself is not modified; use
    /// [`validate_in_place`](Self::validate_in_place) for that.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownSchema`] for an unregistered name and
    /// [`RegistryError::InvalidSchema`] for a dangling `$ref` or an
    /// unresolvable cyclic reference chain. These indicate a registration
    /// bug and are never folded into the validation output.
    pub fn validate(
        &self,
        name: &str,
        data: &Value,
        formats: &FormatRegistry,
    ) -> Result<Evaluation, RegistryError> {
        let doc = self.resolve(name)?;
        let ctx = EvalContext::new(self, formats, self.mode, self.max_depth);
        let mut out = Evaluation::new();
        eval_node(&doc, doc.root(), data, &DataPath::root(), &ctx, &mut out)?;
        Ok(out)
    }

    /// Validates a value against a named schema, applying coercions to
    /// `data` in place.
    ///
    /// Every successful leaf coercion is applied, even when other keywords
    /// failed: each replaced scalar is valid on its own, and callers expect
    /// the coerced values back.
    pub fn validate_in_place(
        &self,
        name: &str,
        data: &mut Value,
        formats: &FormatRegistry,
    ) -> Result<Evaluation, RegistryError> {
        let outcome = self.validate(name, data, formats)?;
        outcome.apply_coercions(data);
        Ok(outcome)
    }
}

impl SchemaSource for SchemaRegistry {
    fn lookup(&self, name: &str) -> Option<Arc<SchemaDocument>> {
        self.schemas.read().get(name).cloned()
    }
}

/// The fatal configuration error class.
///
/// These indicate a programming or deployment mistake, not bad input data,
/// and propagate to the caller immediately instead of appearing in the
/// validation error list.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Validation was requested for a name with no registered schema.
    #[error("schema '{0}' is not registered")]
    UnknownSchema(String),

    /// A schema document is structurally malformed, references an undefined
    /// name, or forms an unresolvable reference cycle.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
}
