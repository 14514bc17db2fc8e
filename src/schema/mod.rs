//! Compiled schema documents.
//!
//! A schema arrives as an already-parsed JSON document (an object with
//! keyword fields). Registration compiles it into a [`SchemaDocument`]: an
//! arena of [`SchemaNode`]s indexed by [`NodeId`], where sub-schemas are node
//! indices rather than boxed trees. Named `$ref`s stay names and are resolved
//! through the registry at evaluation time, so recursive and
//! mutually-recursive schemas register in O(1) without expansion.

mod compile;
mod node;

pub use node::{
    AdditionalItems, AdditionalProperties, CompiledPattern, DataKind, Items, NodeId, SchemaNode,
};
pub(crate) use node::value_kind_name;

use serde_json::Value;

use crate::registry::RegistryError;

/// A compiled, immutable schema document.
///
/// Documents are built once by [`SchemaDocument::compile`] and never mutated
/// afterwards; the registry hands them out behind `Arc` for shared read-only
/// access during validation.
#[derive(Debug)]
pub struct SchemaDocument {
    nodes: Vec<SchemaNode>,
    root: NodeId,
}

impl SchemaDocument {
    /// Compiles a raw schema document into its arena form.
    ///
    /// Fails with [`RegistryError::InvalidSchema`] if any keyword has the
    /// wrong shape (non-object document, unknown type name, invalid regex,
    /// empty combinator list, ...). Unknown keywords are ignored.
    pub fn compile(raw: &Value) -> Result<Self, RegistryError> {
        compile::compile(raw)
    }

    /// The root node of this document.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Looks up a node by id.
    ///
    /// Ids are only ever produced by the compiler for this document, so the
    /// lookup cannot fail.
    pub fn node(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id.0]
    }

    /// Returns the names of all schemas this document references via `$ref`,
    /// sorted and deduplicated.
    ///
    /// References resolve lazily during evaluation; call this after
    /// registration to verify reference integrity up front.
    pub fn references(&self) -> Vec<String> {
        let mut refs: Vec<String> = self
            .nodes
            .iter()
            .filter_map(|n| n.reference.clone())
            .collect();
        refs.sort();
        refs.dedup();
        refs
    }

    pub(crate) fn push(&mut self, node: SchemaNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub(crate) fn new_empty() -> Self {
        Self {
            nodes: Vec::new(),
            root: NodeId(0),
        }
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }
}
