// Shared fixtures: a populated dictionary and node tree used across the
// integration tests.

use nodescope_store::dictionary::MemoryDictionary;
use nodescope_store::name::{QualifiedName, builtin};
use nodescope_store::permissions::AccessEntry;
use nodescope_store::store::NodeRef;
use nodescope_store::store::memory::{MemoryNodeStore, NodeRecord};

pub fn invoice_type() -> QualifiedName {
    QualifiedName::new("finance", "invoice")
}

pub fn archive_type() -> QualifiedName {
    QualifiedName::new("finance", "archive")
}

pub fn lead_type() -> QualifiedName {
    QualifiedName::new("crm", "lead")
}

pub fn spool_type() -> QualifiedName {
    QualifiedName::new("internal", "spool")
}

pub fn hidden_aspect() -> QualifiedName {
    QualifiedName::new("sys", "hidden")
}

pub fn checked_aspect() -> QualifiedName {
    QualifiedName::new("audit", "checked")
}

/// Builtins plus a few custom types: documents (`finance:invoice`), folders
/// (`finance:archive`), a plain domain object (`crm:lead`), a system-folder
/// subtype (`internal:spool`), and two aspects.
pub fn fixture_dictionary() -> MemoryDictionary {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut dict = MemoryDictionary::with_builtins();
    dict.register_type(invoice_type(), Some(&builtin::document()))
        .expect("register invoice");
    dict.register_type(archive_type(), Some(&builtin::folder()))
        .expect("register archive");
    dict.register_type(lead_type(), Some(&builtin::object()))
        .expect("register lead");
    dict.register_type(spool_type(), Some(&builtin::system_folder()))
        .expect("register spool");
    dict.register_aspect(hidden_aspect());
    dict.register_aspect(checked_aspect());
    dict
}

/// A small tree under "root":
///
/// ```text
/// root (core:folder)
/// ├── report (core:document)
/// ├── invoice (finance:invoice, aspect audit:checked)
/// ├── drafts (core:folder)
/// ├── spool (internal:spool)
/// ├── lead (crm:lead)
/// ├── hidden-report (core:document, aspect sys:hidden)
/// ├── report-link (core:link -> report)
/// └── chain-link (core:link -> report-link)
/// ```
///
/// Principals "alice", "bob" and "carol" are registered; "root" carries
/// direct permissions for alice and bob.
pub fn fixture_store() -> MemoryNodeStore {
    let mut store = MemoryNodeStore::new();
    let root = NodeRef::new("root");

    store.add_node(
        "root",
        NodeRecord::builder()
            .node_type(builtin::folder())
            .direct_permissions(vec![
                AccessEntry::allow("alice", "Read"),
                AccessEntry::allow("bob", "Write"),
            ])
            .build(),
    );
    store.add_node(
        "report",
        NodeRecord::builder()
            .node_type(builtin::document())
            .parent(root.clone())
            .build(),
    );
    store.add_node(
        "invoice",
        NodeRecord::builder()
            .node_type(invoice_type())
            .aspects([checked_aspect()].into())
            .parent(root.clone())
            .build(),
    );
    store.add_node(
        "drafts",
        NodeRecord::builder()
            .node_type(builtin::folder())
            .parent(root.clone())
            .build(),
    );
    store.add_node(
        "spool",
        NodeRecord::builder()
            .node_type(spool_type())
            .parent(root.clone())
            .build(),
    );
    store.add_node(
        "lead",
        NodeRecord::builder()
            .node_type(lead_type())
            .parent(root.clone())
            .build(),
    );
    store.add_node(
        "hidden-report",
        NodeRecord::builder()
            .node_type(builtin::document())
            .aspects([hidden_aspect()].into())
            .parent(root.clone())
            .build(),
    );
    store.add_node(
        "report-link",
        NodeRecord::builder()
            .node_type(builtin::link())
            .link_target(NodeRef::new("report"))
            .parent(root.clone())
            .build(),
    );
    store.add_node(
        "chain-link",
        NodeRecord::builder()
            .node_type(builtin::link())
            .link_target(NodeRef::new("report-link"))
            .parent(root.clone())
            .build(),
    );

    for principal in ["alice", "bob", "carol"] {
        store.register_principal(principal);
    }
    store
}
