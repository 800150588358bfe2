//! # Nodescope Store
//!
//! A type-aware node classification, listing-filter resolution, and
//! permission reconciliation library for hierarchical content stores.
//!
//! ## Features
//!
//! - **Typed hierarchy**: single-inheritance node types plus flat,
//!   independently attachable aspects, answered by a pluggable dictionary
//! - **Filter resolution**: explicit-type or file/folder filters resolved
//!   into a bounded search universe for listing queries
//! - **Kind classification**: documents, folders, and first-class `Unknown`,
//!   with single-hop link resolution
//! - **Permission reconciliation**: diff a node's direct access-control
//!   entries against a desired state into a minimal add/remove plan
//! - **In-memory backend**: a [`store::memory::MemoryNodeStore`] for
//!   embedding and tests
//!
//! ## Quick Start
//!
//! ```rust
//! use nodescope_store::prelude::*;
//!
//! // A dictionary seeded with the built-in content model
//! let mut dict = MemoryDictionary::with_builtins();
//! dict.register_type(QualifiedName::new("finance", "invoice"), Some(&builtin::document()))?;
//!
//! // Resolve a listing filter into a search universe
//! let resolver = FilterResolver::new(&dict);
//! let universe = resolver.resolve(&ListingFilter::builder().is_file(true).build())?;
//! assert!(universe.search_types.contains(&QualifiedName::new("finance", "invoice")));
//!
//! // Classify a concrete type
//! let classifier = Classifier::new(&dict);
//! let kind = classifier.classify(&QualifiedName::new("finance", "invoice"), || None);
//! assert_eq!(kind, NodeKind::Document);
//! # Ok::<(), nodescope_store::errors::NodescopeError>(())
//! ```

pub mod classify;
pub mod dictionary;
pub mod errors;
pub mod filter;
pub mod name;
pub mod permissions;
pub mod prelude;
pub mod store;
