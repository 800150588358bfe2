//! Prelude module for convenient imports.
//!
//! Re-exports the most commonly used types and traits so embedders can get
//! started with a single import.
//!
//! # Usage
//!
//! ```rust
//! use nodescope_store::prelude::*;
//! ```
//!
//! # What's Included
//!
//! - Names: [`QualifiedName`] and the [`builtin`] content model
//! - Dictionary: [`TypeDictionary`], [`MemoryDictionary`], [`type_matches`]
//! - Filters: [`ListingFilter`], [`FilterResolver`], [`SearchUniverse`]
//! - Classification: [`Classifier`], [`NodeKind`]
//! - Permissions: [`AccessEntry`], [`AccessStatus`], [`PermissionSpec`],
//!   [`PermissionPlan`], [`reconcile`], [`update_permissions`]
//! - Store: [`NodeStore`], [`NodeRef`], [`MemoryNodeStore`], [`NodeRecord`]
//! - Errors: [`NodescopeError`], [`NodescopeResult`]
//!
//! Less common pieces (validation/apply building blocks, the
//! [`PrincipalDirectory`](crate::permissions::PrincipalDirectory) seam) stay
//! out of the prelude; import them from their modules when needed.

pub use crate::classify::{Classifier, NodeKind};
pub use crate::dictionary::{MemoryDictionary, TypeDictionary, type_matches};
pub use crate::errors::{NodescopeError, NodescopeResult};
pub use crate::filter::{FilterResolver, ListingFilter, SearchUniverse};
pub use crate::name::{QualifiedName, builtin};
pub use crate::permissions::{
    AccessEntry, AccessStatus, PermissionPlan, PermissionSpec, reconcile, update_permissions,
};
pub use crate::store::{NodeRef, NodeStore};
pub use crate::store::memory::{MemoryNodeStore, NodeRecord};
