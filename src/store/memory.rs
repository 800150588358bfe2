//! In-memory node store backend.
//!
//! Holds nodes, their tree positions, and their direct access-control state
//! in plain hash maps. The backend doubles as the
//! [`PrincipalDirectory`](crate::permissions::PrincipalDirectory) consulted
//! by permission validation.

use std::collections::{HashMap, HashSet};

use typed_builder::TypedBuilder;

use crate::errors::{NodescopeError, NodescopeResult};
use crate::filter::SearchUniverse;
use crate::name::QualifiedName;
use crate::permissions::{AccessEntry, PrincipalDirectory};
use crate::store::{NodeRef, NodeStore};

/// Permission names settable out of the box.
pub const DEFAULT_SETTABLE_PERMISSIONS: [&str; 4] =
    ["Read", "Write", "Delete", "ChangePermissions"];

/// One node's stored state.
///
/// # Example
///
/// ```
/// use nodescope_store::name::builtin;
/// use nodescope_store::store::memory::NodeRecord;
///
/// let record = NodeRecord::builder()
///     .node_type(builtin::folder())
///     .build();
/// assert!(record.inherits_permissions);
/// assert!(record.aspects.is_empty());
/// ```
#[derive(Debug, Clone, TypedBuilder)]
#[builder(doc)]
pub struct NodeRecord {
    pub node_type: QualifiedName,

    #[builder(default)]
    pub aspects: HashSet<QualifiedName>,

    /// Target node for indirection types. One hop; the store never chases
    /// chains on the caller's behalf.
    #[builder(default, setter(strip_option))]
    pub link_target: Option<NodeRef>,

    #[builder(default, setter(strip_option))]
    pub parent: Option<NodeRef>,

    #[builder(default = true)]
    pub inherits_permissions: bool,

    #[builder(default)]
    pub direct_permissions: Vec<AccessEntry>,
}

/// In-memory [`NodeStore`] and [`PrincipalDirectory`].
///
/// # Example
///
/// ```
/// use nodescope_store::name::builtin;
/// use nodescope_store::store::memory::{MemoryNodeStore, NodeRecord};
/// use nodescope_store::store::{NodeRef, NodeStore};
///
/// let mut store = MemoryNodeStore::new();
/// store.add_node("root", NodeRecord::builder().node_type(builtin::folder()).build());
/// assert!(store.node_exists(&NodeRef::new("root")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryNodeStore {
    nodes: HashMap<NodeRef, NodeRecord>,
    principals: HashSet<String>,
    settable_permissions: HashSet<String>,
}

impl MemoryNodeStore {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            principals: HashSet::new(),
            settable_permissions: DEFAULT_SETTABLE_PERMISSIONS
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }

    /// Insert a node, replacing any previous record under the same ref.
    pub fn add_node(&mut self, id: impl Into<NodeRef>, record: NodeRecord) {
        self.nodes.insert(id.into(), record);
    }

    /// Make a principal known to validation.
    pub fn register_principal(&mut self, principal: impl Into<String>) {
        self.principals.insert(principal.into());
    }

    /// Extend the set of settable permission names beyond
    /// [`DEFAULT_SETTABLE_PERMISSIONS`].
    pub fn register_settable_permission(&mut self, name: impl Into<String>) {
        self.settable_permissions.insert(name.into());
    }

    fn node_mut(&mut self, node: &NodeRef) -> NodescopeResult<&mut NodeRecord> {
        self.nodes
            .get_mut(node)
            .ok_or_else(|| NodescopeError::not_found(format!("Node not found: {node}")))
    }
}

impl NodeStore for MemoryNodeStore {
    fn node_exists(&self, node: &NodeRef) -> bool {
        self.nodes.contains_key(node)
    }

    fn node_type(&self, node: &NodeRef) -> Option<QualifiedName> {
        self.nodes.get(node).map(|record| record.node_type.clone())
    }

    fn node_aspects(&self, node: &NodeRef) -> HashSet<QualifiedName> {
        self.nodes
            .get(node)
            .map(|record| record.aspects.clone())
            .unwrap_or_default()
    }

    fn link_target(&self, node: &NodeRef) -> Option<NodeRef> {
        self.nodes.get(node).and_then(|record| record.link_target.clone())
    }

    fn children(&self, parent: &NodeRef) -> Vec<NodeRef> {
        let mut children: Vec<NodeRef> = self
            .nodes
            .iter()
            .filter(|(_, record)| record.parent.as_ref() == Some(parent))
            .map(|(id, _)| id.clone())
            .collect();
        children.sort();
        children
    }

    fn list_children(&self, parent: &NodeRef, universe: &SearchUniverse) -> Vec<NodeRef> {
        self.children(parent)
            .into_iter()
            .filter(|child| {
                let Some(record) = self.nodes.get(child) else {
                    return false;
                };
                let type_ok = universe.is_type_unrestricted()
                    || universe.search_types.contains(&record.node_type);
                type_ok && record.aspects.is_disjoint(&universe.ignore_aspects)
            })
            .collect()
    }

    fn inherits_permissions(&self, node: &NodeRef) -> bool {
        self.nodes
            .get(node)
            .map(|record| record.inherits_permissions)
            .unwrap_or(true)
    }

    fn set_inherits_permissions(&mut self, node: &NodeRef, enabled: bool) -> NodescopeResult<()> {
        self.node_mut(node)?.inherits_permissions = enabled;
        Ok(())
    }

    fn direct_permissions(&self, node: &NodeRef) -> Vec<AccessEntry> {
        self.nodes
            .get(node)
            .map(|record| record.direct_permissions.clone())
            .unwrap_or_default()
    }

    fn set_permission(&mut self, node: &NodeRef, entry: &AccessEntry) -> NodescopeResult<()> {
        if !self.settable_permissions.contains(&entry.permission) {
            return Err(NodescopeError::PermissionNotSettable {
                name: entry.permission.clone(),
            });
        }
        let record = self.node_mut(node)?;
        match record
            .direct_permissions
            .iter_mut()
            .find(|e| e.principal == entry.principal && e.permission == entry.permission)
        {
            Some(existing) => existing.status = entry.status,
            None => record.direct_permissions.push(entry.clone()),
        }
        Ok(())
    }

    fn delete_permission(
        &mut self,
        node: &NodeRef,
        principal: &str,
        permission: &str,
    ) -> NodescopeResult<()> {
        let record = self.node_mut(node)?;
        record
            .direct_permissions
            .retain(|e| !(e.principal == principal && e.permission == permission));
        Ok(())
    }
}

impl PrincipalDirectory for MemoryNodeStore {
    fn principal_exists(&self, principal: &str) -> bool {
        self.principals.contains(principal)
    }
}
