//! Node store interface.
//!
//! The store holds the nodes themselves: their concrete type, attached
//! aspects, position in the parent/child tree, link targets, and
//! directly-set access-control state. This crate only consumes the narrow
//! interface below; [`MemoryNodeStore`](memory::MemoryNodeStore) is the
//! bundled backend.

pub mod memory;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::NodescopeResult;
use crate::filter::SearchUniverse;
use crate::name::QualifiedName;
use crate::permissions::AccessEntry;

/// Opaque reference identifying a node.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
    derive_more::Into,
)]
pub struct NodeRef(String);

impl NodeRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeRef {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Storage-side view of nodes and their direct access-control state.
///
/// Reads are infallible lookups returning `Option`/empty collections for
/// missing nodes; mutations report missing nodes and unsettable permission
/// names as errors. The mutation half is expected to run inside the caller's
/// transaction — this crate never retries or rolls back.
pub trait NodeStore {
    fn node_exists(&self, node: &NodeRef) -> bool;

    /// The node's concrete type, or `None` when the node does not exist.
    fn node_type(&self, node: &NodeRef) -> Option<QualifiedName>;

    fn node_aspects(&self, node: &NodeRef) -> HashSet<QualifiedName>;

    /// Target of an indirection node. One hop only; callers never chase
    /// chains through this.
    fn link_target(&self, node: &NodeRef) -> Option<NodeRef>;

    /// All children of `parent`, unfiltered.
    fn children(&self, parent: &NodeRef) -> Vec<NodeRef>;

    /// Children of `parent` bounded by a resolved search universe.
    fn list_children(&self, parent: &NodeRef, universe: &SearchUniverse) -> Vec<NodeRef>;

    fn inherits_permissions(&self, node: &NodeRef) -> bool;

    fn set_inherits_permissions(&mut self, node: &NodeRef, enabled: bool) -> NodescopeResult<()>;

    /// Snapshot of the entries set directly on `node` (inherited entries are
    /// not included).
    fn direct_permissions(&self, node: &NodeRef) -> Vec<AccessEntry>;

    /// Set or overwrite one direct entry. Fails with
    /// [`NodescopeError::PermissionNotSettable`](crate::errors::NodescopeError::PermissionNotSettable)
    /// when the permission name is not settable for this node.
    fn set_permission(&mut self, node: &NodeRef, entry: &AccessEntry) -> NodescopeResult<()>;

    fn delete_permission(
        &mut self,
        node: &NodeRef,
        principal: &str,
        permission: &str,
    ) -> NodescopeResult<()>;
}
