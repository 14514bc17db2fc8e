//! Schema node and keyword value types.

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use std::fmt;

/// Index of a node within a [`SchemaDocument`](super::SchemaDocument) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// A regex keyword value, keeping the source pattern for error messages.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub regex: Regex,
    pub source: String,
}

impl CompiledPattern {
    pub fn is_match(&self, s: &str) -> bool {
        self.regex.is_match(s)
    }
}

/// The runtime kind of a data value, as named by the `type` keyword.
///
/// `Integer` and `Number` overlap deliberately: integers satisfy `number`,
/// and a float with no fractional part (`2.0`) satisfies `integer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl DataKind {
    /// Parses a `type` keyword name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "null" => Some(DataKind::Null),
            "boolean" => Some(DataKind::Boolean),
            "integer" => Some(DataKind::Integer),
            "number" => Some(DataKind::Number),
            "string" => Some(DataKind::String),
            "array" => Some(DataKind::Array),
            "object" => Some(DataKind::Object),
            _ => None,
        }
    }

    /// The keyword name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            DataKind::Null => "null",
            DataKind::Boolean => "boolean",
            DataKind::Integer => "integer",
            DataKind::Number => "number",
            DataKind::String => "string",
            DataKind::Array => "array",
            DataKind::Object => "object",
        }
    }

    /// Checks whether a value is of this kind.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            DataKind::Null => value.is_null(),
            DataKind::Boolean => value.is_boolean(),
            DataKind::Integer => match value {
                Value::Number(n) => {
                    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
                }
                _ => false,
            },
            DataKind::Number => value.is_number(),
            DataKind::String => value.is_string(),
            DataKind::Array => value.is_array(),
            DataKind::Object => value.is_object(),
        }
    }

    /// Returns true for scalar kinds, the only coercion targets.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, DataKind::Array | DataKind::Object)
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the keyword-style kind name of a value, for error messages.
pub(crate) fn value_kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The `items` keyword: one shared schema, or positional tuple schemas with
/// an optional rule for elements beyond the tuple.
#[derive(Debug, Clone)]
pub enum Items {
    /// Every element validates against the same schema.
    Schema(NodeId),
    /// Positional validation; `additional` governs elements past the end of
    /// the list (absent means they are ignored).
    Tuple {
        schemas: Vec<NodeId>,
        additional: Option<AdditionalItems>,
    },
}

/// The `additionalItems` keyword value.
#[derive(Debug, Clone)]
pub enum AdditionalItems {
    /// `additionalItems: false`: extra elements are violations.
    Deny,
    /// `additionalItems: {..}`: extra elements validate against this schema.
    Schema(NodeId),
}

/// The `additionalProperties` keyword value. An absent keyword means
/// undeclared properties are allowed.
#[derive(Debug, Clone)]
pub enum AdditionalProperties {
    /// `additionalProperties: false`: undeclared properties are violations.
    Deny,
    /// `additionalProperties: {..}`: undeclared properties validate against
    /// this schema.
    Schema(NodeId),
}

/// One compiled schema node: every keyword the evaluator understands, each
/// optional. Sub-schemas are arena ids within the owning document.
///
/// A node carrying `reference` ignores its sibling keywords during
/// evaluation (draft-07 `$ref` semantics).
#[derive(Debug, Clone, Default)]
pub struct SchemaNode {
    pub types: Option<Vec<DataKind>>,
    pub enum_values: Option<Vec<Value>>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<CompiledPattern>,
    pub format: Option<String>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub items: Option<Items>,
    pub required: Option<Vec<String>>,
    pub properties: Option<IndexMap<String, NodeId>>,
    pub pattern_properties: Option<Vec<(CompiledPattern, NodeId)>>,
    pub additional_properties: Option<AdditionalProperties>,
    pub all_of: Option<Vec<NodeId>>,
    pub any_of: Option<Vec<NodeId>>,
    pub one_of: Option<Vec<NodeId>>,
    pub not: Option<NodeId>,
    pub reference: Option<String>,
}
