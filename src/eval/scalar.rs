//! Scalar keyword checks: `enum`, numeric bounds, string constraints, and
//! `format`.
//!
//! Each keyword is independent and order-insensitive within its group; every
//! violation is reported, never just the first. A keyword whose kind guard
//! does not match the value (e.g. `minLength` against a number) simply does
//! not apply; the kind mismatch itself is the `type` keyword's concern.

use serde_json::Value;

use super::{EvalContext, Evaluation};
use crate::error::SchemaError;
use crate::path::DataPath;
use crate::schema::SchemaNode;

pub(super) fn check_enum(node: &SchemaNode, value: &Value, path: &DataPath, out: &mut Evaluation) {
    let Some(allowed) = &node.enum_values else {
        return;
    };
    // Deep equality against each literal.
    if !allowed.iter().any(|candidate| candidate == value) {
        out.push_error(
            SchemaError::new(
                path.clone(),
                "enum",
                format!("value is not one of the {} allowed literals", allowed.len()),
            )
            .with_got(value.to_string()),
        );
    }
}

pub(super) fn check_number(node: &SchemaNode, value: &Value, path: &DataPath, out: &mut Evaluation) {
    if node.minimum.is_none() && node.maximum.is_none() {
        return;
    }
    let Some(n) = value.as_f64() else {
        return;
    };

    if let Some(min) = node.minimum {
        if n < min {
            out.push_error(
                SchemaError::new(
                    path.clone(),
                    "minimum",
                    format!("value must be at least {}, got {}", min, n),
                )
                .with_expected(format!(">= {}", min))
                .with_got(n.to_string()),
            );
        }
    }

    if let Some(max) = node.maximum {
        if n > max {
            out.push_error(
                SchemaError::new(
                    path.clone(),
                    "maximum",
                    format!("value must be at most {}, got {}", max, n),
                )
                .with_expected(format!("<= {}", max))
                .with_got(n.to_string()),
            );
        }
    }
}

pub(super) fn check_string(
    node: &SchemaNode,
    value: &Value,
    path: &DataPath,
    ctx: &EvalContext<'_>,
    out: &mut Evaluation,
) {
    let Some(s) = value.as_str() else {
        return;
    };

    if let Some(min) = node.min_length {
        let len = s.chars().count();
        if len < min {
            out.push_error(
                SchemaError::new(
                    path.clone(),
                    "minLength",
                    format!("length must be at least {}, got {}", min, len),
                )
                .with_expected(format!("at least {} characters", min))
                .with_got(format!("{} characters", len)),
            );
        }
    }

    if let Some(max) = node.max_length {
        let len = s.chars().count();
        if len > max {
            out.push_error(
                SchemaError::new(
                    path.clone(),
                    "maxLength",
                    format!("length must be at most {}, got {}", max, len),
                )
                .with_expected(format!("at most {} characters", max))
                .with_got(format!("{} characters", len)),
            );
        }
    }

    if let Some(pattern) = &node.pattern {
        if !pattern.is_match(s) {
            out.push_error(
                SchemaError::new(
                    path.clone(),
                    "pattern",
                    format!("must match pattern '{}'", pattern.source),
                )
                .with_expected(format!("string matching '{}'", pattern.source))
                .with_got(s.to_string()),
            );
        }
    }

    if let Some(format) = &node.format {
        // Unknown format names are ignored; the active set belongs to the
        // caller and is fixed for the duration of the call.
        if ctx.formats().check(format, s) == Some(false) {
            out.push_error(
                SchemaError::new(
                    path.clone(),
                    "format",
                    format!("must be a valid {} string", format),
                )
                .with_expected(format.clone())
                .with_got(s.to_string()),
            );
        }
    }
}
