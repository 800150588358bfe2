// Integration tests for permission reconciliation against the in-memory
// store.

pub mod common;

use std::collections::HashMap;

use common::fixture_store;
use nodescope_store::errors::{NodescopeError, NodescopeResult};
use nodescope_store::permissions::{
    ALL_PRINCIPALS, AccessEntry, AccessStatus, PermissionSpec, reconcile, update_permissions,
};
use nodescope_store::store::{NodeRef, NodeStore};
use quickcheck::quickcheck;

fn spec_of(entries: Vec<AccessEntry>) -> PermissionSpec {
    PermissionSpec {
        locally_set: Some(entries),
        ..Default::default()
    }
}

#[test]
fn test_update_scenario_add_overwrite_remove() -> NodescopeResult<()> {
    let mut store = fixture_store();
    let root = NodeRef::new("root");

    // current: alice Read allow, bob Write allow
    let spec = spec_of(vec![
        AccessEntry::deny("alice", "Read"),
        AccessEntry::allow("carol", "Read"),
    ]);
    let plan = update_permissions(&mut store, &root, &spec)?;

    assert_eq!(
        plan.to_add,
        vec![
            AccessEntry::deny("alice", "Read"),
            AccessEntry::allow("carol", "Read"),
        ]
    );
    assert_eq!(plan.to_remove, vec![AccessEntry::allow("bob", "Write")]);

    let after = store.direct_permissions(&root);
    assert_eq!(after.len(), 2);
    assert!(after.contains(&AccessEntry::deny("alice", "Read")));
    assert!(after.contains(&AccessEntry::allow("carol", "Read")));
    Ok(())
}

#[test]
fn test_update_is_idempotent() -> NodescopeResult<()> {
    let mut store = fixture_store();
    let root = NodeRef::new("root");

    let spec = spec_of(vec![
        AccessEntry::deny("alice", "Read"),
        AccessEntry::allow("carol", "Read"),
    ]);
    let first = update_permissions(&mut store, &root, &spec)?;
    assert!(!first.is_empty());

    // re-submitting the applied state changes nothing
    let second = update_permissions(&mut store, &root, &spec)?;
    assert!(second.is_empty());
    Ok(())
}

#[test]
fn test_duplicate_desired_entries_rejected_before_mutation() {
    let mut store = fixture_store();
    let root = NodeRef::new("root");
    let before = store.direct_permissions(&root);

    let spec = spec_of(vec![
        AccessEntry::allow("alice", "Read"),
        AccessEntry::deny("alice", "Read"),
    ]);
    assert!(matches!(
        update_permissions(&mut store, &root, &spec),
        Err(NodescopeError::InvalidArgument(_))
    ));
    assert_eq!(store.direct_permissions(&root), before);
}

#[test]
fn test_unknown_principal_rejected_before_mutation() {
    let mut store = fixture_store();
    let root = NodeRef::new("root");
    let before = store.direct_permissions(&root);

    let spec = spec_of(vec![AccessEntry::allow("mallory", "Read")]);
    match update_permissions(&mut store, &root, &spec) {
        Err(NodescopeError::InvalidArgument(msg)) => assert!(msg.contains("mallory")),
        other => panic!("expected InvalidArgument, got {other:?}"),
    }
    assert_eq!(store.direct_permissions(&root), before);
}

#[test]
fn test_everyone_pseudo_principal_accepted() -> NodescopeResult<()> {
    let mut store = fixture_store();
    let root = NodeRef::new("root");

    let spec = spec_of(vec![
        AccessEntry::allow("alice", "Read"),
        AccessEntry::allow("bob", "Write"),
        AccessEntry::allow(ALL_PRINCIPALS, "Read"),
    ]);
    update_permissions(&mut store, &root, &spec)?;

    assert!(
        store
            .direct_permissions(&root)
            .contains(&AccessEntry::allow(ALL_PRINCIPALS, "Read"))
    );
    Ok(())
}

#[test]
fn test_inherited_entries_in_desired_state_rejected() {
    let mut store = fixture_store();
    let root = NodeRef::new("root");

    let spec = PermissionSpec {
        inherited: Some(vec![AccessEntry::allow("alice", "Read")]),
        ..Default::default()
    };
    assert!(matches!(
        update_permissions(&mut store, &root, &spec),
        Err(NodescopeError::InvalidArgument(_))
    ));
}

#[test]
fn test_inheritance_flag_toggles() -> NodescopeResult<()> {
    let mut store = fixture_store();
    let root = NodeRef::new("root");
    assert!(store.inherits_permissions(&root));

    let spec = PermissionSpec {
        is_inheritance_enabled: Some(false),
        ..Default::default()
    };
    let plan = update_permissions(&mut store, &root, &spec)?;
    assert_eq!(plan.inheritance_change, Some(false));
    assert!(!store.inherits_permissions(&root));

    // same value again: no change scheduled
    let plan = update_permissions(&mut store, &root, &spec)?;
    assert!(plan.is_empty());
    Ok(())
}

#[test]
fn test_missing_node_is_not_found() {
    let mut store = fixture_store();
    let spec = spec_of(vec![AccessEntry::allow("alice", "Read")]);
    assert!(matches!(
        update_permissions(&mut store, &NodeRef::new("ghost"), &spec),
        Err(NodescopeError::NotFound(_))
    ));
}

#[test]
fn test_unsettable_permission_leaves_partial_state() {
    let mut store = fixture_store();
    let root = NodeRef::new("root");

    // "Fly" is not a settable permission name for this store; validation
    // cannot know that, so the failure surfaces at apply time after the
    // earlier entries went through
    let spec = spec_of(vec![
        AccessEntry::deny("alice", "Read"),
        AccessEntry::allow("carol", "Fly"),
    ]);
    let err = update_permissions(&mut store, &root, &spec).unwrap_err();
    assert!(matches!(
        err,
        NodescopeError::PermissionNotSettable { ref name } if name == "Fly"
    ));

    // removals ran, and the overwrite before the failure stuck
    let after = store.direct_permissions(&root);
    assert!(after.contains(&AccessEntry::deny("alice", "Read")));
    assert!(!after.contains(&AccessEntry::allow("bob", "Write")));
    assert!(!after.iter().any(|e| e.permission == "Fly"));
}

#[test]
fn test_clearing_all_direct_permissions() -> NodescopeResult<()> {
    let mut store = fixture_store();
    let root = NodeRef::new("root");

    let plan = update_permissions(&mut store, &root, &spec_of(vec![]))?;
    assert_eq!(plan.to_remove.len(), 2);
    assert!(store.direct_permissions(&root).is_empty());
    Ok(())
}

fn entry_from(raw: (u8, u8, bool)) -> AccessEntry {
    let (p, n, allow) = raw;
    AccessEntry::new(
        format!("principal-{}", p % 4),
        format!("Permission{}", n % 4),
        if allow {
            AccessStatus::Allowed
        } else {
            AccessStatus::Denied
        },
    )
}

fn dedup_by_key(entries: Vec<AccessEntry>) -> Vec<AccessEntry> {
    let mut seen = std::collections::HashSet::new();
    entries
        .into_iter()
        .filter(|e| seen.insert((e.principal.clone(), e.permission.clone())))
        .collect()
}

quickcheck! {
    /// Applying a reconciliation plan to the current entries always lands
    /// exactly on the desired state.
    fn prop_plan_reaches_desired_state(
        current_raw: Vec<(u8, u8, bool)>,
        desired_raw: Vec<(u8, u8, bool)>
    ) -> bool {
        let current = dedup_by_key(current_raw.into_iter().map(entry_from).collect());
        let desired = dedup_by_key(desired_raw.into_iter().map(entry_from).collect());

        let plan = reconcile(&current, &spec_of(desired.clone()), true);

        // simulate the store: remove, then upsert
        let mut state: HashMap<(String, String), AccessStatus> = current
            .iter()
            .map(|e| ((e.principal.clone(), e.permission.clone()), e.status))
            .collect();
        for e in &plan.to_remove {
            state.remove(&(e.principal.clone(), e.permission.clone()));
        }
        for e in &plan.to_add {
            state.insert((e.principal.clone(), e.permission.clone()), e.status);
        }

        let want: HashMap<(String, String), AccessStatus> = desired
            .iter()
            .map(|e| ((e.principal.clone(), e.permission.clone()), e.status))
            .collect();
        state == want
    }

    /// Reconciling a state against itself is always a no-op.
    fn prop_reconcile_self_is_empty(current_raw: Vec<(u8, u8, bool)>) -> bool {
        let current = dedup_by_key(current_raw.into_iter().map(entry_from).collect());
        reconcile(&current, &spec_of(current.clone()), true).is_empty()
    }
}
