//! Object keyword checks: `required`, `properties`, `patternProperties`,
//! `additionalProperties`.
//!
//! Declared properties recurse in schema declaration order; the sweep for
//! undeclared properties follows data insertion order. A required-property
//! error points at the missing property slot, one path segment below the
//! object itself.

use serde_json::Value;

use super::{eval_node, EvalContext, Evaluation};
use crate::error::SchemaError;
use crate::path::DataPath;
use crate::registry::RegistryError;
use crate::schema::{AdditionalProperties, SchemaDocument, SchemaNode};

pub(super) fn check(
    doc: &SchemaDocument,
    node: &SchemaNode,
    value: &Value,
    path: &DataPath,
    ctx: &EvalContext<'_>,
    out: &mut Evaluation,
) -> Result<(), RegistryError> {
    let Some(obj) = value.as_object() else {
        return Ok(());
    };

    if let Some(required) = &node.required {
        for name in required {
            if !obj.contains_key(name) {
                out.push_error(
                    SchemaError::new(
                        path.push_field(name),
                        "required",
                        format!("required property '{}' is missing", name),
                    )
                    .with_expected("value"),
                );
            }
        }
    }

    if let Some(properties) = &node.properties {
        for (name, schema_id) in properties {
            if let Some(child) = obj.get(name) {
                eval_node(doc, *schema_id, child, &path.push_field(name), ctx, out)?;
            }
        }
    }

    // patternProperties apply to every key they match, on top of any
    // declared property schema for the same key.
    if let Some(patterns) = &node.pattern_properties {
        for (key, child) in obj {
            for (pattern, schema_id) in patterns {
                if pattern.is_match(key) {
                    eval_node(doc, *schema_id, child, &path.push_field(key), ctx, out)?;
                }
            }
        }
    }

    if let Some(additional) = &node.additional_properties {
        for (key, child) in obj {
            if is_declared(node, key) {
                continue;
            }
            let child_path = path.push_field(key);
            match additional {
                AdditionalProperties::Deny => out.push_error(
                    SchemaError::new(
                        child_path,
                        "additionalProperties",
                        format!("property '{}' is not declared in the schema", key),
                    )
                    .with_got(key.clone()),
                ),
                AdditionalProperties::Schema(schema_id) => {
                    eval_node(doc, *schema_id, child, &child_path, ctx, out)?
                }
            }
        }
    }

    Ok(())
}

/// A property is declared when it is listed under `properties` or covered by
/// a `patternProperties` rule.
fn is_declared(node: &SchemaNode, key: &str) -> bool {
    if let Some(properties) = &node.properties {
        if properties.contains_key(key) {
            return true;
        }
    }
    if let Some(patterns) = &node.pattern_properties {
        if patterns.iter().any(|(pattern, _)| pattern.is_match(key)) {
            return true;
        }
    }
    false
}
