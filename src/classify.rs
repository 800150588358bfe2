//! Node kind classification.
//!
//! Every node coarsely behaves as a [`NodeKind::Document`], a
//! [`NodeKind::Folder`], or neither. `Unknown` is a first-class answer for
//! custom domain types, never an error. Indirection ("link") nodes classify
//! as whatever they stand in for, resolved through exactly one hop — a link
//! pointing at another link is `Unknown` by construction.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::dictionary::{TypeDictionary, type_matches};
use crate::errors::{NodescopeError, NodescopeResult};
use crate::name::{QualifiedName, builtin};
use crate::store::{NodeRef, NodeStore};

/// Coarse classification of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum NodeKind {
    Document,
    Folder,
    Unknown,
}

impl NodeKind {
    pub fn is_document(self) -> bool {
        self == Self::Document
    }

    pub fn is_folder(self) -> bool {
        self == Self::Folder
    }

    /// Whether children may be created under a node of this kind. Only
    /// documents refuse children; `Unknown` kinds are containers as far as
    /// creation is concerned.
    pub fn allows_children(self) -> bool {
        self != Self::Document
    }
}

/// Classifies concrete types against the dictionary's hierarchy.
///
/// # Example
///
/// ```
/// use nodescope_store::classify::{Classifier, NodeKind};
/// use nodescope_store::dictionary::MemoryDictionary;
/// use nodescope_store::name::builtin;
///
/// let dict = MemoryDictionary::with_builtins();
/// let classifier = Classifier::new(&dict);
///
/// assert_eq!(classifier.classify(&builtin::folder(), || None), NodeKind::Folder);
/// assert_eq!(classifier.classify(&builtin::document(), || None), NodeKind::Document);
/// ```
pub struct Classifier<'d, D: TypeDictionary> {
    dictionary: &'d D,
}

impl<'d, D: TypeDictionary> Classifier<'d, D> {
    pub fn new(dictionary: &'d D) -> Self {
        Self { dictionary }
    }

    /// Classify a concrete type. `link_target` supplies the target node's
    /// concrete type when the node turns out to be a generic indirection; it
    /// is consulted at most once.
    pub fn classify<F>(&self, concrete_type: &QualifiedName, link_target: F) -> NodeKind
    where
        F: FnOnce() -> Option<QualifiedName>,
    {
        // quick check for the common types
        if *concrete_type == builtin::folder() || *concrete_type == builtin::folder_link() {
            return NodeKind::Folder;
        }
        if *concrete_type == builtin::document() || *concrete_type == builtin::document_link() {
            return NodeKind::Document;
        }

        if self.dictionary.is_subtype(concrete_type, &builtin::link()) {
            if self.dictionary.is_subtype(concrete_type, &builtin::folder_link()) {
                return NodeKind::Folder;
            }
            if self.dictionary.is_subtype(concrete_type, &builtin::document_link()) {
                return NodeKind::Document;
            }

            // one hop of indirection, never more
            let Some(target_type) = link_target() else {
                return NodeKind::Unknown;
            };
            if self.dictionary.is_subtype(&target_type, &builtin::link()) {
                return NodeKind::Unknown;
            }
            return self.classify_concrete(&target_type);
        }

        self.classify_concrete(concrete_type)
    }

    /// Classify a node by reference, wiring the one-hop target lookup from
    /// the store. Missing nodes are a not-found error.
    pub fn classify_node(
        &self,
        store: &impl NodeStore,
        node: &NodeRef,
    ) -> NodescopeResult<NodeKind> {
        let concrete_type = store
            .node_type(node)
            .ok_or_else(|| NodescopeError::not_found(format!("Node not found: {node}")))?;
        Ok(self.classify(&concrete_type, || {
            store
                .link_target(node)
                .and_then(|target| store.node_type(&target))
        }))
    }

    /// Error unless the node classifies as a document.
    pub fn expect_document(
        &self,
        store: &impl NodeStore,
        node: &NodeRef,
    ) -> NodescopeResult<()> {
        if self.classify_node(store, node)?.is_document() {
            Ok(())
        } else {
            Err(NodescopeError::invalid_argument(format!(
                "Node is not a file: {node}"
            )))
        }
    }

    /// Error unless the node classifies as a folder.
    pub fn expect_folder(&self, store: &impl NodeStore, node: &NodeRef) -> NodescopeResult<()> {
        if self.classify_node(store, node)?.is_folder() {
            Ok(())
        } else {
            Err(NodescopeError::invalid_argument(format!(
                "Node is not a folder: {node}"
            )))
        }
    }

    /// Existence check plus [`type_matches`] on the node's concrete type.
    pub fn node_matches(
        &self,
        store: &impl NodeStore,
        node: &NodeRef,
        expected: Option<&HashSet<QualifiedName>>,
        excluded: Option<&HashSet<QualifiedName>>,
    ) -> NodescopeResult<bool> {
        let concrete_type = store
            .node_type(node)
            .ok_or_else(|| NodescopeError::not_found(format!("Node not found: {node}")))?;
        Ok(type_matches(self.dictionary, &concrete_type, expected, excluded))
    }

    fn classify_concrete(&self, ty: &QualifiedName) -> NodeKind {
        if self.dictionary.is_subtype(ty, &builtin::folder()) {
            if self.dictionary.is_subtype(ty, &builtin::system_folder()) {
                return NodeKind::Unknown;
            }
            return NodeKind::Folder;
        }
        if self.dictionary.is_subtype(ty, &builtin::document()) {
            return NodeKind::Document;
        }
        NodeKind::Unknown
    }
}
