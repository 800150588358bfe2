//! Direct permission reconciliation.
//!
//! A node carries access-control entries set directly on it plus an
//! "inherit from parent" flag. Callers submit the complete desired direct
//! state; [`reconcile`] diffs it against the current snapshot into a
//! [`PermissionPlan`] of adds and removals, and [`apply_plan`] executes the
//! plan against the store. Removals run before additions so the node never
//! transiently holds two entries for the same `(principal, permission)`
//! pair.
//!
//! The reconciler performs no optimistic-concurrency check between the
//! snapshot it was given and the apply step; concurrent writers race with
//! last-write-wins semantics at the store layer.

use std::collections::{HashMap, HashSet};

use log::debug;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::errors::{NodescopeError, NodescopeResult};
use crate::store::{NodeRef, NodeStore};

/// Pseudo-principal addressing every authenticated principal at once.
pub const ALL_PRINCIPALS: &str = "EVERYONE";

/// Allow/deny status of an access-control entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessStatus {
    Allowed,
    Denied,
}

/// One access-control entry: `(principal, permission, status)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessEntry {
    pub principal: String,
    pub permission: String,
    pub status: AccessStatus,
}

impl AccessEntry {
    pub fn new(
        principal: impl Into<String>,
        permission: impl Into<String>,
        status: AccessStatus,
    ) -> Self {
        Self {
            principal: principal.into(),
            permission: permission.into(),
            status,
        }
    }

    /// An `Allowed` entry.
    pub fn allow(principal: impl Into<String>, permission: impl Into<String>) -> Self {
        Self::new(principal, permission, AccessStatus::Allowed)
    }

    /// A `Denied` entry.
    pub fn deny(principal: impl Into<String>, permission: impl Into<String>) -> Self {
        Self::new(principal, permission, AccessStatus::Denied)
    }
}

/// Caller-supplied desired permission state for one node.
///
/// `locally_set` is the complete desired set of direct entries; entries the
/// node currently holds but the caller does not re-specify are removed. A
/// `None` list leaves direct entries untouched. `inherited` exists only so
/// that a caller echoing back a node's full permission view can be told
/// apart from one trying to set inherited entries — any non-empty value is
/// rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionSpec {
    pub is_inheritance_enabled: Option<bool>,
    pub locally_set: Option<Vec<AccessEntry>>,
    pub inherited: Option<Vec<AccessEntry>>,
}

/// The operations needed to move a node's direct permissions from current to
/// desired state. Transient; computed fresh per request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionPlan {
    /// New value for the inherit-from-parent flag, when it changes.
    pub inheritance_change: Option<bool>,
    pub to_add: Vec<AccessEntry>,
    pub to_remove: Vec<AccessEntry>,
}

impl PermissionPlan {
    /// True when applying the plan would change nothing.
    pub fn is_empty(&self) -> bool {
        self.inheritance_change.is_none() && self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Existence checks for principals, consulted during validation.
pub trait PrincipalDirectory {
    fn principal_exists(&self, principal: &str) -> bool;
}

/// Validate a desired permission state before any reconciliation.
///
/// Rejects inherited entries, duplicate `(principal, permission)` pairs
/// (status differences do not make a pair distinct), empty principal or
/// permission names, and principals unknown to the directory (other than
/// [`ALL_PRINCIPALS`]).
pub fn validate_spec(
    spec: &PermissionSpec,
    principals: &impl PrincipalDirectory,
) -> NodescopeResult<()> {
    if let Some(inherited) = &spec.inherited {
        if !inherited.is_empty() {
            return Err(NodescopeError::invalid_argument(
                "Cannot set inherited permissions on a node, only directly-set entries",
            ));
        }
    }

    let Some(locally_set) = &spec.locally_set else {
        return Ok(());
    };

    let keys: HashSet<(&str, &str)> = locally_set
        .iter()
        .map(|e| (e.principal.as_str(), e.permission.as_str()))
        .collect();
    if keys.len() != locally_set.len() {
        return Err(NodescopeError::invalid_argument(
            "Duplicate permissions, there is more than one entry with the same principal and permission name",
        ));
    }

    for entry in locally_set {
        if entry.principal.is_empty() {
            return Err(NodescopeError::invalid_argument("Principal id is expected"));
        }
        if entry.permission.is_empty() {
            return Err(NodescopeError::invalid_argument(
                "Permission name is expected",
            ));
        }
        if entry.principal != ALL_PRINCIPALS && !principals.principal_exists(&entry.principal) {
            return Err(NodescopeError::invalid_argument(format!(
                "Cannot set permissions on this node - unknown principal: {}",
                entry.principal
            )));
        }
    }

    Ok(())
}

/// Diff the current direct entries against the desired state.
///
/// Desired entries are processed in caller order; entries that already exist
/// with the same status become no-ops, entries with a different status are
/// re-added (a set overwrites), and current entries the caller did not
/// re-specify end up in `to_remove` (in their snapshot order).
///
/// # Example
///
/// ```
/// use nodescope_store::permissions::{reconcile, AccessEntry, PermissionSpec};
///
/// let current = vec![
///     AccessEntry::allow("alice", "Read"),
///     AccessEntry::allow("bob", "Write"),
/// ];
/// let spec = PermissionSpec {
///     locally_set: Some(vec![
///         AccessEntry::deny("alice", "Read"),
///         AccessEntry::allow("carol", "Read"),
///     ]),
///     ..Default::default()
/// };
///
/// let plan = reconcile(&current, &spec, true);
/// assert_eq!(plan.to_add, spec.locally_set.clone().unwrap());
/// assert_eq!(plan.to_remove, vec![AccessEntry::allow("bob", "Write")]);
/// ```
pub fn reconcile(
    current_direct: &[AccessEntry],
    spec: &PermissionSpec,
    current_inherit: bool,
) -> PermissionPlan {
    let mut plan = PermissionPlan {
        inheritance_change: spec
            .is_inheritance_enabled
            .filter(|enabled| *enabled != current_inherit),
        ..Default::default()
    };

    let Some(desired) = &spec.locally_set else {
        return plan;
    };

    let mut remaining: HashMap<(&str, &str), (usize, &AccessEntry)> = current_direct
        .iter()
        .enumerate()
        .map(|(i, e)| ((e.principal.as_str(), e.permission.as_str()), (i, e)))
        .collect();

    for entry in desired {
        match remaining.remove(&(entry.principal.as_str(), entry.permission.as_str())) {
            None => plan.to_add.push(entry.clone()),
            Some((_, existing)) if existing.status != entry.status => {
                plan.to_add.push(entry.clone());
            }
            Some(_) => {} // unchanged, leave as-is
        }
    }

    let mut leftover: Vec<(usize, &AccessEntry)> = remaining.into_values().collect();
    leftover.sort_by_key(|(i, _)| *i);
    plan.to_remove = leftover.into_iter().map(|(_, e)| e.clone()).collect();

    debug!(
        "reconciled permissions: {} to add, {} to remove, inheritance change {:?}",
        plan.to_add.len(),
        plan.to_remove.len(),
        plan.inheritance_change
    );
    plan
}

/// Execute a plan against the store: inheritance flag first, then removals,
/// then additions.
///
/// A permission name the store refuses surfaces as
/// [`NodescopeError::PermissionNotSettable`]; entries applied before the
/// failure remain applied — rollback belongs to the enclosing transaction.
pub fn apply_plan(
    store: &mut impl NodeStore,
    node: &NodeRef,
    plan: &PermissionPlan,
) -> NodescopeResult<()> {
    if let Some(enabled) = plan.inheritance_change {
        store.set_inherits_permissions(node, enabled)?;
    }
    for entry in &plan.to_remove {
        store.delete_permission(node, &entry.principal, &entry.permission)?;
    }
    for entry in &plan.to_add {
        store.set_permission(node, entry)?;
    }
    Ok(())
}

/// Validate, snapshot, reconcile and apply in one call.
///
/// Returns the executed plan so callers can observe what changed.
pub fn update_permissions<S>(
    store: &mut S,
    node: &NodeRef,
    spec: &PermissionSpec,
) -> NodescopeResult<PermissionPlan>
where
    S: NodeStore + PrincipalDirectory,
{
    validate_spec(spec, store)?;
    if !store.node_exists(node) {
        return Err(NodescopeError::not_found(format!("Node not found: {node}")));
    }
    let current = store.direct_permissions(node);
    let inherit = store.inherits_permissions(node);
    let plan = reconcile(&current, spec, inherit);
    apply_plan(store, node, &plan)?;
    Ok(plan)
}
