//! Array keyword checks: `minItems`, `maxItems`, `items`, `additionalItems`.

use serde_json::Value;

use super::{eval_node, EvalContext, Evaluation};
use crate::error::SchemaError;
use crate::path::DataPath;
use crate::registry::RegistryError;
use crate::schema::{AdditionalItems, Items, SchemaDocument, SchemaNode};

pub(super) fn check(
    doc: &SchemaDocument,
    node: &SchemaNode,
    value: &Value,
    path: &DataPath,
    ctx: &EvalContext<'_>,
    out: &mut Evaluation,
) -> Result<(), RegistryError> {
    let Some(arr) = value.as_array() else {
        return Ok(());
    };

    if let Some(min) = node.min_items {
        if arr.len() < min {
            out.push_error(
                SchemaError::new(
                    path.clone(),
                    "minItems",
                    format!("array must have at least {} items, got {}", min, arr.len()),
                )
                .with_expected(format!("at least {} items", min))
                .with_got(format!("{} items", arr.len())),
            );
        }
    }

    if let Some(max) = node.max_items {
        if arr.len() > max {
            out.push_error(
                SchemaError::new(
                    path.clone(),
                    "maxItems",
                    format!("array must have at most {} items, got {}", max, arr.len()),
                )
                .with_expected(format!("at most {} items", max))
                .with_got(format!("{} items", arr.len())),
            );
        }
    }

    match &node.items {
        None => {}
        Some(Items::Schema(item_id)) => {
            for (i, item) in arr.iter().enumerate() {
                eval_node(doc, *item_id, item, &path.push_index(i), ctx, out)?;
            }
        }
        Some(Items::Tuple { schemas, additional }) => {
            for (i, item) in arr.iter().enumerate() {
                let item_path = path.push_index(i);
                match schemas.get(i) {
                    Some(schema_id) => eval_node(doc, *schema_id, item, &item_path, ctx, out)?,
                    // Elements past the tuple follow the additionalItems rule;
                    // with no rule declared they are ignored.
                    None => match additional {
                        None => {}
                        Some(AdditionalItems::Deny) => out.push_error(
                            SchemaError::new(
                                item_path,
                                "additionalItems",
                                format!("array must not have more than {} items", schemas.len()),
                            )
                            .with_expected(format!("at most {} items", schemas.len())),
                        ),
                        Some(AdditionalItems::Schema(schema_id)) => {
                            eval_node(doc, *schema_id, item, &item_path, ctx, out)?
                        }
                    },
                }
            }
        }
    }

    Ok(())
}
