//! Qualified names for node types and aspects.
//!
//! Types and aspects share one identifier space: a namespace prefix plus a
//! local name, written `ns:local`. Types form a single-inheritance hierarchy
//! rooted at [`builtin::object`]; aspects are flat markers with no hierarchy
//! of their own. The hierarchy itself lives in the
//! [`TypeDictionary`](crate::dictionary::TypeDictionary) — a `QualifiedName`
//! is just the key into it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{NodescopeError, NodescopeResult};

/// A namespaced identifier naming a node type or an aspect.
///
/// # Example
///
/// ```
/// use nodescope_store::name::QualifiedName;
///
/// let name = QualifiedName::parse("core:folder").unwrap();
/// assert_eq!(name.namespace(), "core");
/// assert_eq!(name.local(), "folder");
/// assert_eq!(name.to_string(), "core:folder");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualifiedName {
    namespace: String,
    local: String,
}

impl QualifiedName {
    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local: local.into(),
        }
    }

    /// Parse a `ns:local` string. Both parts must be non-empty.
    ///
    /// # Example
    ///
    /// ```
    /// use nodescope_store::name::QualifiedName;
    ///
    /// assert!(QualifiedName::parse("core:document").is_ok());
    /// assert!(QualifiedName::parse("no-colon").is_err());
    /// assert!(QualifiedName::parse(":missing-prefix").is_err());
    /// ```
    pub fn parse(raw: &str) -> NodescopeResult<Self> {
        let (namespace, local) = raw.split_once(':').ok_or_else(|| {
            NodescopeError::invalid_argument(format!("Malformed qualified name: {raw}"))
        })?;
        if namespace.is_empty() || local.is_empty() {
            return Err(NodescopeError::invalid_argument(format!(
                "Malformed qualified name: {raw}"
            )));
        }
        Ok(Self::new(namespace, local))
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn local(&self) -> &str {
        &self.local
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.local)
    }
}

/// The built-in content model every repository carries.
///
/// These names are pre-registered by
/// [`MemoryDictionary::with_builtins`](crate::dictionary::MemoryDictionary::with_builtins)
/// and are the pivots of classification and filter resolution.
pub mod builtin {
    use super::QualifiedName;

    pub const NS_CORE: &str = "core";
    pub const NS_APP: &str = "app";

    /// Universal base type; every node type descends from it.
    pub fn object() -> QualifiedName {
        QualifiedName::new(NS_CORE, "object")
    }

    /// Content-bearing ("file") type.
    pub fn document() -> QualifiedName {
        QualifiedName::new(NS_CORE, "document")
    }

    /// Folder type.
    pub fn folder() -> QualifiedName {
        QualifiedName::new(NS_CORE, "folder")
    }

    /// Internal system container; never implicitly searchable.
    pub fn system_folder() -> QualifiedName {
        QualifiedName::new(NS_CORE, "system-folder")
    }

    /// Generic indirection ("link") type.
    pub fn link() -> QualifiedName {
        QualifiedName::new(NS_CORE, "link")
    }

    /// Indirection node standing in for a document.
    pub fn document_link() -> QualifiedName {
        QualifiedName::new(NS_APP, "document-link")
    }

    /// Indirection node standing in for a folder.
    pub fn folder_link() -> QualifiedName {
        QualifiedName::new(NS_APP, "folder-link")
    }
}
