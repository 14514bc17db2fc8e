//! Composition keywords: `allOf`, `anyOf`, `oneOf`, `not`.
//!
//! The error shapes are deliberately asymmetric: `allOf` concatenates every
//! sub-schema's violations, while `anyOf` and `oneOf` collapse to a single
//! synthetic error for the keyword itself, since the branch failures are
//! exclusive alternatives and reporting their union would drown callers.
//!
//! `anyOf`, `oneOf`, and `not` trial-evaluate branches with isolated
//! outputs; only a committed branch's coercion decisions reach the caller.

use serde_json::Value;

use super::{absorb_coercions, eval_node, EvalContext, Evaluation};
use crate::error::SchemaError;
use crate::path::DataPath;
use crate::registry::RegistryError;
use crate::schema::{NodeId, SchemaDocument, SchemaNode};

pub(super) fn check(
    doc: &SchemaDocument,
    node: &SchemaNode,
    value: &Value,
    path: &DataPath,
    ctx: &EvalContext<'_>,
    out: &mut Evaluation,
) -> Result<(), RegistryError> {
    // A conversion recorded by one branch must be visible to the branches
    // and keywords evaluated after it, the same way keywords within a node
    // see the coerced value. Committed coercions are folded into a local
    // working copy that later steps evaluate against.
    let mut working: Option<Value> = None;

    if let Some(ids) = &node.all_of {
        // Every sub-schema must hold; its errors (and coercions) flow
        // straight into the parent output.
        for id in ids {
            let before = out.coercions().len();
            eval_node(doc, *id, working.as_ref().unwrap_or(value), path, ctx, out)?;
            absorb_coercions(value, path, out, before, &mut working);
        }
    }

    if let Some(ids) = &node.any_of {
        let before = out.coercions().len();
        check_any_of(doc, ids, working.as_ref().unwrap_or(value), path, ctx, out)?;
        absorb_coercions(value, path, out, before, &mut working);
    }

    if let Some(ids) = &node.one_of {
        let before = out.coercions().len();
        check_one_of(doc, ids, working.as_ref().unwrap_or(value), path, ctx, out)?;
        absorb_coercions(value, path, out, before, &mut working);
    }

    if let Some(id) = &node.not {
        let branch = trial(doc, *id, working.as_ref().unwrap_or(value), path, ctx)?;
        if branch.is_valid() {
            out.push_error(SchemaError::new(
                path.clone(),
                "not",
                "value must not match the forbidden schema",
            ));
        }
    }

    Ok(())
}

fn check_any_of(
    doc: &SchemaDocument,
    ids: &[NodeId],
    value: &Value,
    path: &DataPath,
    ctx: &EvalContext<'_>,
    out: &mut Evaluation,
) -> Result<(), RegistryError> {
    for id in ids {
        let branch = trial(doc, *id, value, path, ctx)?;
        if branch.is_valid() {
            out.commit(branch);
            return Ok(());
        }
    }

    out.push_error(SchemaError::new(
        path.clone(),
        "anyOf",
        format!("value did not match any of {} schemas", ids.len()),
    ));
    Ok(())
}

fn check_one_of(
    doc: &SchemaDocument,
    ids: &[NodeId],
    value: &Value,
    path: &DataPath,
    ctx: &EvalContext<'_>,
    out: &mut Evaluation,
) -> Result<(), RegistryError> {
    let mut matched = Vec::new();
    for id in ids {
        let branch = trial(doc, *id, value, path, ctx)?;
        if branch.is_valid() {
            matched.push(branch);
        }
    }

    match matched.len() {
        1 => {
            out.commit(matched.pop().expect("one matched branch"));
        }
        0 => out.push_error(SchemaError::new(
            path.clone(),
            "oneOf",
            format!(
                "value did not match any of {} schemas, expected exactly one",
                ids.len()
            ),
        )),
        n => out.push_error(SchemaError::new(
            path.clone(),
            "oneOf",
            format!(
                "value matched {} of {} schemas, expected exactly one",
                n,
                ids.len()
            ),
        )),
    }
    Ok(())
}

/// Evaluates a branch into a fresh output so its errors and coercions stay
/// isolated until the caller decides to commit.
fn trial(
    doc: &SchemaDocument,
    id: NodeId,
    value: &Value,
    path: &DataPath,
    ctx: &EvalContext<'_>,
) -> Result<Evaluation, RegistryError> {
    let mut branch = Evaluation::new();
    eval_node(doc, id, value, path, ctx, &mut branch)?;
    Ok(branch)
}
