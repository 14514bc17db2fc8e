//! The keyword evaluator: recursive descent over a compiled schema and a
//! data value in lockstep.
//!
//! Evaluation never mutates the data value. In coercive mode, successful
//! type coercions are recorded as [`Coercion`] patches against the value's
//! path and applied afterwards by the in-place registry entry point; within
//! the evaluation itself the remaining keywords on a node see the converted
//! value through a local `Cow`. This keeps trial branches (`anyOf`, `oneOf`,
//! `not`) side-effect free until they are committed, and means a leaf is
//! always either replaced in full or left untouched.
//!
//! Keyword order is a fixed code-level sequence, independent of document
//! iteration order, so repeated validation of the same schema/data pair
//! yields errors in the same order: `$ref` (exclusive) → `type` → `enum` →
//! numeric bounds → string constraints → array constraints → object
//! constraints → `allOf` → `anyOf` → `oneOf` → `not`.

mod array;
mod combinators;
mod object;
mod scalar;

use std::borrow::Cow;
use std::sync::Arc;

use serde_json::Value;
use stillwater::Validation;

use crate::coerce::{coerce, CoercionMode};
use crate::error::{SchemaError, SchemaErrors};
use crate::format::FormatRegistry;
use crate::path::{DataPath, PathSegment};
use crate::registry::RegistryError;
use crate::schema::{value_kind_name, NodeId, SchemaDocument, SchemaNode};

/// Lookup of named schemas for `$ref` resolution.
///
/// This trait abstracts registry access so the evaluator does not depend on
/// the concrete registry type.
pub trait SchemaSource: Send + Sync {
    /// Gets a compiled schema document by name.
    fn lookup(&self, name: &str) -> Option<Arc<SchemaDocument>>;
}

/// Evaluation context: schema source, format set, coercion policy, and
/// reference-depth tracking.
///
/// Contexts are cheap to copy; following a `$ref` produces a new context
/// with incremented depth so unresolvable cyclic reference chains are cut
/// off instead of looping.
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    source: &'a dyn SchemaSource,
    formats: &'a FormatRegistry,
    mode: CoercionMode,
    depth: usize,
    max_depth: usize,
}

impl<'a> EvalContext<'a> {
    /// Creates a root context.
    pub fn new(
        source: &'a dyn SchemaSource,
        formats: &'a FormatRegistry,
        mode: CoercionMode,
        max_depth: usize,
    ) -> Self {
        Self {
            source,
            formats,
            mode,
            depth: 0,
            max_depth,
        }
    }

    pub(crate) fn formats(&self) -> &FormatRegistry {
        self.formats
    }

    /// Returns a context for one `$ref` hop deeper, or fails once the chain
    /// length shows the reference cannot be resolved lazily.
    fn descend(&self, path: &DataPath) -> Result<Self, RegistryError> {
        if self.depth >= self.max_depth {
            return Err(RegistryError::InvalidSchema(format!(
                "reference chain exceeded max depth {} at '{}': cyclic reference cannot be resolved",
                self.max_depth, path
            )));
        }
        Ok(Self {
            depth: self.depth + 1,
            ..*self
        })
    }
}

/// A recorded coercion decision: the value at `path` should become `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Coercion {
    /// Path of the leaf scalar within the root data value.
    pub path: DataPath,
    /// The converted replacement value.
    pub value: Value,
}

/// The outcome of evaluating a schema against a data value: the ordered
/// error list plus the coercion decisions made along the way.
#[derive(Debug, Default)]
pub struct Evaluation {
    errors: Vec<SchemaError>,
    coercions: Vec<Coercion>,
}

impl Evaluation {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// True when no keyword was violated.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The violations, in evaluation order.
    pub fn errors(&self) -> &[SchemaError] {
        &self.errors
    }

    /// The coercion decisions, in evaluation order. Empty in strict mode.
    pub fn coercions(&self) -> &[Coercion] {
        &self.coercions
    }

    /// Converts into the accumulated-validation result shape.
    pub fn into_validation(self) -> Validation<(), SchemaErrors> {
        if self.errors.is_empty() {
            Validation::Success(())
        } else {
            Validation::Failure(SchemaErrors::from_vec(self.errors))
        }
    }

    /// Applies every recorded coercion to `data`.
    ///
    /// Each patch replaces one leaf scalar in full. Paths were recorded
    /// against this same tree, so lookups always resolve.
    pub fn apply_coercions(&self, data: &mut Value) {
        for coercion in &self.coercions {
            if let Some(slot) = lookup_mut(data, &coercion.path) {
                *slot = coercion.value.clone();
            } else {
                debug_assert!(false, "coercion path '{}' did not resolve", coercion.path);
            }
        }
    }

    fn push_error(&mut self, error: SchemaError) {
        self.errors.push(error);
    }

    fn push_coercion(&mut self, path: DataPath, value: Value) {
        self.coercions.push(Coercion { path, value });
    }

    /// Absorbs a committed trial branch: its coercions stand, its error
    /// absence has already been checked by the caller.
    fn commit(&mut self, branch: Evaluation) {
        self.coercions.extend(branch.coercions);
    }
}

fn lookup_mut<'v>(data: &'v mut Value, path: &DataPath) -> Option<&'v mut Value> {
    let mut current = data;
    for segment in path.segments() {
        current = match segment {
            PathSegment::Field(name) => current.as_object_mut()?.get_mut(name)?,
            PathSegment::Index(idx) => current.as_array_mut()?.get_mut(*idx)?,
        };
    }
    Some(current)
}

/// Folds the coercions recorded in `out` from index `from` onward into a
/// working copy of `original` (the subtree at `base`), so evaluation steps
/// after the one that recorded them see the converted values.
pub(super) fn absorb_coercions(
    original: &Value,
    base: &DataPath,
    out: &Evaluation,
    from: usize,
    working: &mut Option<Value>,
) {
    let fresh = &out.coercions()[from..];
    if fresh.is_empty() {
        return;
    }
    let current = working.get_or_insert_with(|| original.clone());
    for coercion in fresh {
        if let Some(slot) = lookup_relative_mut(current, base, &coercion.path) {
            *slot = coercion.value.clone();
        }
    }
}

/// Resolves an absolute `path` within a subtree rooted at `base`. Returns
/// `None` when `path` does not extend `base`.
fn lookup_relative_mut<'v>(
    data: &'v mut Value,
    base: &DataPath,
    path: &DataPath,
) -> Option<&'v mut Value> {
    let mut segments = path.segments();
    for expected in base.segments() {
        if segments.next() != Some(expected) {
            return None;
        }
    }
    let mut current = data;
    for segment in segments {
        current = match segment {
            PathSegment::Field(name) => current.as_object_mut()?.get_mut(name)?,
            PathSegment::Index(idx) => current.as_array_mut()?.get_mut(*idx)?,
        };
    }
    Some(current)
}

/// Evaluates one schema node against a data value, appending violations and
/// coercion decisions to `out`.
///
/// `Err` is reserved for the fatal configuration class (dangling `$ref`,
/// runaway reference chains); data problems always land in `out`.
pub(crate) fn eval_node(
    doc: &SchemaDocument,
    id: NodeId,
    value: &Value,
    path: &DataPath,
    ctx: &EvalContext<'_>,
    out: &mut Evaluation,
) -> Result<(), RegistryError> {
    let node = doc.node(id);

    // A reference node evaluates as if the referenced schema were inlined.
    // A dangling name is a registration bug, not bad input, so it surfaces
    // immediately instead of becoming a validation error.
    if let Some(name) = &node.reference {
        let target = ctx.source.lookup(name).ok_or_else(|| {
            RegistryError::InvalidSchema(format!(
                "dangling $ref: schema '{}' is not registered",
                name
            ))
        })?;
        let ctx = ctx.descend(path)?;
        return eval_node(&target, target.root(), value, path, &ctx, out);
    }

    let current = check_type(node, value, path, ctx, out);
    let value = current.as_ref();

    scalar::check_enum(node, value, path, out);
    scalar::check_number(node, value, path, out);
    scalar::check_string(node, value, path, ctx, out);
    array::check(doc, node, value, path, ctx, out)?;
    object::check(doc, node, value, path, ctx, out)?;
    combinators::check(doc, node, value, path, ctx, out)?;

    Ok(())
}

/// Applies the `type` keyword. In coercive mode a scalar kind mismatch is
/// handed to the coercion engine, trying declared candidates in listed
/// order; a successful conversion is recorded and returned so the remaining
/// keywords on this node see the converted value. Failures fall through to
/// an ordinary `type` violation.
fn check_type<'v>(
    node: &SchemaNode,
    value: &'v Value,
    path: &DataPath,
    ctx: &EvalContext<'_>,
    out: &mut Evaluation,
) -> Cow<'v, Value> {
    let Some(types) = &node.types else {
        return Cow::Borrowed(value);
    };

    if types.iter().any(|t| t.matches(value)) {
        return Cow::Borrowed(value);
    }

    if ctx.mode == CoercionMode::Coerce {
        for target in types {
            if !target.is_scalar() {
                continue;
            }
            if let Some(converted) = coerce(*target, value) {
                out.push_coercion(path.clone(), converted.clone());
                return Cow::Owned(converted);
            }
        }
    }

    let expected = types
        .iter()
        .map(|t| t.name())
        .collect::<Vec<_>>()
        .join(" or ");
    let got = value_kind_name(value);
    out.push_error(
        SchemaError::new(
            path.clone(),
            "type",
            format!("expected {}, got {}", expected, got),
        )
        .with_expected(expected)
        .with_got(got),
    );
    Cow::Borrowed(value)
}
