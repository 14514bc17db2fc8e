//! Compilation of raw schema documents into the arena form.
//!
//! Compilation is the registration-time half of schema handling: every
//! keyword's shape is checked here, so the evaluator can assume structural
//! well-formedness and only ever fail on data (or on a dangling `$ref`).

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use super::node::{
    AdditionalItems, AdditionalProperties, CompiledPattern, DataKind, Items, NodeId, SchemaNode,
};
use super::SchemaDocument;
use crate::registry::RegistryError;

pub(super) fn compile(raw: &Value) -> Result<SchemaDocument, RegistryError> {
    let mut doc = SchemaDocument::new_empty();
    let root = compile_node(raw, &mut doc)?;
    doc.set_root(root);
    Ok(doc)
}

fn invalid(message: impl Into<String>) -> RegistryError {
    RegistryError::InvalidSchema(message.into())
}

fn compile_node(raw: &Value, doc: &mut SchemaDocument) -> Result<NodeId, RegistryError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| invalid("schema must be an object of keyword fields"))?;

    let mut node = SchemaNode::default();

    // $ref nodes are pure references; sibling keywords are ignored.
    if let Some(reference) = obj.get("$ref") {
        let name = reference
            .as_str()
            .ok_or_else(|| invalid("'$ref' must be a schema name string"))?;
        node.reference = Some(name.to_string());
        return Ok(doc.push(node));
    }

    if let Some(types) = obj.get("type") {
        node.types = Some(compile_types(types)?);
    }

    if let Some(values) = obj.get("enum") {
        let list = values
            .as_array()
            .ok_or_else(|| invalid("'enum' must be an array of literal values"))?;
        if list.is_empty() {
            return Err(invalid("'enum' must not be empty"));
        }
        node.enum_values = Some(list.clone());
    }

    node.minimum = compile_number(obj.get("minimum"), "minimum")?;
    node.maximum = compile_number(obj.get("maximum"), "maximum")?;
    node.min_length = compile_count(obj.get("minLength"), "minLength")?;
    node.max_length = compile_count(obj.get("maxLength"), "maxLength")?;
    node.min_items = compile_count(obj.get("minItems"), "minItems")?;
    node.max_items = compile_count(obj.get("maxItems"), "maxItems")?;

    if let Some(pattern) = obj.get("pattern") {
        let source = pattern
            .as_str()
            .ok_or_else(|| invalid("'pattern' must be a regex string"))?;
        node.pattern = Some(compile_pattern(source)?);
    }

    if let Some(format) = obj.get("format") {
        let name = format
            .as_str()
            .ok_or_else(|| invalid("'format' must be a format name string"))?;
        node.format = Some(name.to_string());
    }

    if let Some(items) = obj.get("items") {
        node.items = Some(compile_items(items, obj.get("additionalItems"), doc)?);
    }

    if let Some(required) = obj.get("required") {
        let list = required
            .as_array()
            .ok_or_else(|| invalid("'required' must be an array of property names"))?;
        let mut names = Vec::with_capacity(list.len());
        for entry in list {
            let name = entry
                .as_str()
                .ok_or_else(|| invalid("'required' entries must be strings"))?;
            names.push(name.to_string());
        }
        node.required = Some(names);
    }

    if let Some(properties) = obj.get("properties") {
        let map = properties
            .as_object()
            .ok_or_else(|| invalid("'properties' must be an object of sub-schemas"))?;
        let mut compiled = IndexMap::with_capacity(map.len());
        for (name, sub) in map {
            compiled.insert(name.clone(), compile_node(sub, doc)?);
        }
        node.properties = Some(compiled);
    }

    if let Some(patterns) = obj.get("patternProperties") {
        let map = patterns
            .as_object()
            .ok_or_else(|| invalid("'patternProperties' must be an object of sub-schemas"))?;
        let mut compiled = Vec::with_capacity(map.len());
        for (source, sub) in map {
            compiled.push((compile_pattern(source)?, compile_node(sub, doc)?));
        }
        node.pattern_properties = Some(compiled);
    }

    if let Some(additional) = obj.get("additionalProperties") {
        node.additional_properties = match additional {
            Value::Bool(true) => None,
            Value::Bool(false) => Some(AdditionalProperties::Deny),
            Value::Object(_) => Some(AdditionalProperties::Schema(compile_node(additional, doc)?)),
            _ => {
                return Err(invalid(
                    "'additionalProperties' must be a boolean or a sub-schema",
                ))
            }
        };
    }

    node.all_of = compile_schema_list(obj.get("allOf"), "allOf", doc)?;
    node.any_of = compile_schema_list(obj.get("anyOf"), "anyOf", doc)?;
    node.one_of = compile_schema_list(obj.get("oneOf"), "oneOf", doc)?;

    if let Some(sub) = obj.get("not") {
        node.not = Some(compile_node(sub, doc)?);
    }

    Ok(doc.push(node))
}

fn compile_types(raw: &Value) -> Result<Vec<DataKind>, RegistryError> {
    let parse = |name: &Value| -> Result<DataKind, RegistryError> {
        let name = name
            .as_str()
            .ok_or_else(|| invalid("'type' entries must be type name strings"))?;
        DataKind::from_name(name).ok_or_else(|| invalid(format!("unknown type name '{}'", name)))
    };

    match raw {
        Value::String(_) => Ok(vec![parse(raw)?]),
        Value::Array(list) => {
            if list.is_empty() {
                return Err(invalid("'type' must not be an empty array"));
            }
            list.iter().map(parse).collect()
        }
        _ => Err(invalid(
            "'type' must be a type name or an array of type names",
        )),
    }
}

fn compile_number(raw: Option<&Value>, keyword: &str) -> Result<Option<f64>, RegistryError> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| invalid(format!("'{}' must be a number", keyword))),
    }
}

fn compile_count(raw: Option<&Value>, keyword: &str) -> Result<Option<usize>, RegistryError> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .as_u64()
            .map(|n| Some(n as usize))
            .ok_or_else(|| invalid(format!("'{}' must be a non-negative integer", keyword))),
    }
}

fn compile_pattern(source: &str) -> Result<CompiledPattern, RegistryError> {
    let regex = Regex::new(source)
        .map_err(|e| invalid(format!("invalid regex pattern '{}': {}", source, e)))?;
    Ok(CompiledPattern {
        regex,
        source: source.to_string(),
    })
}

fn compile_items(
    raw: &Value,
    additional: Option<&Value>,
    doc: &mut SchemaDocument,
) -> Result<Items, RegistryError> {
    match raw {
        Value::Object(_) => Ok(Items::Schema(compile_node(raw, doc)?)),
        Value::Array(list) => {
            let mut schemas = Vec::with_capacity(list.len());
            for sub in list {
                schemas.push(compile_node(sub, doc)?);
            }
            let additional = match additional {
                None | Some(Value::Bool(true)) => None,
                Some(Value::Bool(false)) => Some(AdditionalItems::Deny),
                Some(sub @ Value::Object(_)) => {
                    Some(AdditionalItems::Schema(compile_node(sub, doc)?))
                }
                Some(_) => {
                    return Err(invalid(
                        "'additionalItems' must be a boolean or a sub-schema",
                    ))
                }
            };
            Ok(Items::Tuple { schemas, additional })
        }
        _ => Err(invalid(
            "'items' must be a sub-schema or an array of sub-schemas",
        )),
    }
}

fn compile_schema_list(
    raw: Option<&Value>,
    keyword: &str,
    doc: &mut SchemaDocument,
) -> Result<Option<Vec<NodeId>>, RegistryError> {
    let Some(raw) = raw else { return Ok(None) };
    let list = raw
        .as_array()
        .ok_or_else(|| invalid(format!("'{}' must be an array of sub-schemas", keyword)))?;
    if list.is_empty() {
        return Err(invalid(format!("'{}' must not be empty", keyword)));
    }
    let mut ids = Vec::with_capacity(list.len());
    for sub in list {
        ids.push(compile_node(sub, doc)?);
    }
    Ok(Some(ids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compile_empty_schema() {
        let doc = compile(&json!({})).unwrap();
        let root = doc.node(doc.root());
        assert!(root.types.is_none());
        assert!(root.properties.is_none());
    }

    #[test]
    fn test_compile_rejects_non_object() {
        assert!(compile(&json!("string")).is_err());
        assert!(compile(&json!(true)).is_err());
        assert!(compile(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_compile_type_forms() {
        let doc = compile(&json!({"type": "string"})).unwrap();
        assert_eq!(doc.node(doc.root()).types, Some(vec![DataKind::String]));

        let doc = compile(&json!({"type": ["integer", "string"]})).unwrap();
        assert_eq!(
            doc.node(doc.root()).types,
            Some(vec![DataKind::Integer, DataKind::String])
        );

        assert!(compile(&json!({"type": "float"})).is_err());
        assert!(compile(&json!({"type": []})).is_err());
        assert!(compile(&json!({"type": 3})).is_err());
    }

    #[test]
    fn test_compile_properties_preserves_order() {
        let doc = compile(&json!({
            "properties": {
                "zeta": {"type": "string"},
                "alpha": {"type": "integer"},
                "mid": {"type": "boolean"}
            }
        }))
        .unwrap();

        let props = doc.node(doc.root()).properties.as_ref().unwrap();
        let names: Vec<_> = props.keys().cloned().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_compile_nested_schema() {
        let doc = compile(&json!({
            "type": "object",
            "required": ["user"],
            "properties": {
                "user": {
                    "type": "object",
                    "properties": {
                        "tags": {
                            "type": "array",
                            "items": {"type": "string", "minLength": 1}
                        }
                    }
                }
            }
        }))
        .unwrap();

        let root = doc.node(doc.root());
        let user_id = root.properties.as_ref().unwrap()["user"];
        let user = doc.node(user_id);
        let tags_id = user.properties.as_ref().unwrap()["tags"];
        let tags = doc.node(tags_id);
        match tags.items.as_ref().unwrap() {
            Items::Schema(item_id) => {
                assert_eq!(doc.node(*item_id).min_length, Some(1));
            }
            other => panic!("expected shared item schema, got {:?}", other),
        }
    }

    #[test]
    fn test_compile_tuple_items() {
        let doc = compile(&json!({
            "items": [{"type": "string"}, {"type": "integer"}],
            "additionalItems": false
        }))
        .unwrap();

        match doc.node(doc.root()).items.as_ref().unwrap() {
            Items::Tuple { schemas, additional } => {
                assert_eq!(schemas.len(), 2);
                assert!(matches!(additional, Some(AdditionalItems::Deny)));
            }
            other => panic!("expected tuple items, got {:?}", other),
        }
    }

    #[test]
    fn test_compile_additional_items_true_is_allow() {
        let doc = compile(&json!({
            "items": [{"type": "string"}],
            "additionalItems": true
        }))
        .unwrap();

        match doc.node(doc.root()).items.as_ref().unwrap() {
            Items::Tuple { additional, .. } => assert!(additional.is_none()),
            other => panic!("expected tuple items, got {:?}", other),
        }
    }

    #[test]
    fn test_compile_ref_ignores_siblings() {
        let doc = compile(&json!({"$ref": "Other", "type": "string"})).unwrap();
        let root = doc.node(doc.root());
        assert_eq!(root.reference.as_deref(), Some("Other"));
        assert!(root.types.is_none());
    }

    #[test]
    fn test_compile_invalid_keyword_shapes() {
        assert!(compile(&json!({"minLength": -1})).is_err());
        assert!(compile(&json!({"minLength": "3"})).is_err());
        assert!(compile(&json!({"minimum": "0"})).is_err());
        assert!(compile(&json!({"pattern": "["})).is_err());
        assert!(compile(&json!({"pattern": 7})).is_err());
        assert!(compile(&json!({"enum": []})).is_err());
        assert!(compile(&json!({"required": [1]})).is_err());
        assert!(compile(&json!({"properties": []})).is_err());
        assert!(compile(&json!({"allOf": []})).is_err());
        assert!(compile(&json!({"anyOf": {}})).is_err());
        assert!(compile(&json!({"additionalProperties": "no"})).is_err());
        assert!(compile(&json!({"$ref": 42})).is_err());
    }

    #[test]
    fn test_references_collected() {
        let doc = compile(&json!({
            "properties": {
                "a": {"$ref": "Node"},
                "b": {"items": {"$ref": "Leaf"}},
                "c": {"$ref": "Node"}
            }
        }))
        .unwrap();

        assert_eq!(doc.references(), vec!["Leaf", "Node"]);
    }
}
