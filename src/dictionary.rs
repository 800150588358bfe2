//! Type and aspect dictionary.
//!
//! The dictionary answers subtype and existence questions about
//! [`QualifiedName`]s. Types form a single-inheritance hierarchy; aspects are
//! a flat namespace with no hierarchy. Every other component of this crate
//! treats the dictionary as a cheap, read-only collaborator and performs no
//! memoization of its own.
//!
//! [`MemoryDictionary`] is the bundled implementation: embedders register
//! their content model on top of [`MemoryDictionary::with_builtins`], which
//! seeds the seven built-in names from [`crate::name::builtin`].

use std::collections::{HashMap, HashSet};

use crate::errors::{NodescopeError, NodescopeResult};
use crate::name::{QualifiedName, builtin};

/// Read-only subtype and existence queries over the registered model.
pub trait TypeDictionary {
    /// True iff `ty` equals or transitively descends from `ancestor`.
    /// An unregistered `ty` is a subtype of nothing, including itself.
    fn is_subtype(&self, ty: &QualifiedName, ancestor: &QualifiedName) -> bool;

    /// The subtype closure of `ty`: `ty` itself plus its subtypes, transitive
    /// or direct-only. Empty when `ty` is not a registered type.
    fn subtypes_of(&self, ty: &QualifiedName, transitive: bool) -> HashSet<QualifiedName>;

    fn type_exists(&self, name: &QualifiedName) -> bool;

    fn aspect_exists(&self, name: &QualifiedName) -> bool;
}

/// In-memory [`TypeDictionary`] with a registration API.
///
/// # Example
///
/// ```
/// use nodescope_store::dictionary::{MemoryDictionary, TypeDictionary};
/// use nodescope_store::name::{QualifiedName, builtin};
///
/// let mut dict = MemoryDictionary::with_builtins();
/// let invoice = QualifiedName::new("finance", "invoice");
/// dict.register_type(invoice.clone(), Some(&builtin::document())).unwrap();
///
/// assert!(dict.is_subtype(&invoice, &builtin::document()));
/// assert!(dict.is_subtype(&invoice, &builtin::object()));
/// assert!(!dict.is_subtype(&invoice, &builtin::folder()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDictionary {
    parents: HashMap<QualifiedName, Option<QualifiedName>>,
    children: HashMap<QualifiedName, Vec<QualifiedName>>,
    aspects: HashSet<QualifiedName>,
}

impl MemoryDictionary {
    /// An empty dictionary with no types at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// A dictionary seeded with the built-in content model:
    /// `core:object` as the root, `core:document`, `core:folder` and
    /// `core:link` under it, `core:system-folder` under `core:folder`, and
    /// the two specialized link types under `core:link`.
    pub fn with_builtins() -> Self {
        let mut dict = Self::new();
        dict.insert_type(builtin::object(), None);
        dict.insert_type(builtin::document(), Some(builtin::object()));
        dict.insert_type(builtin::folder(), Some(builtin::object()));
        dict.insert_type(builtin::system_folder(), Some(builtin::folder()));
        dict.insert_type(builtin::link(), Some(builtin::object()));
        dict.insert_type(builtin::document_link(), Some(builtin::link()));
        dict.insert_type(builtin::folder_link(), Some(builtin::link()));
        dict
    }

    /// Register a type under an optional parent.
    ///
    /// The parent must already be registered; a `None` parent creates a new
    /// hierarchy root. Re-registering a name is an error.
    pub fn register_type(
        &mut self,
        name: QualifiedName,
        parent: Option<&QualifiedName>,
    ) -> NodescopeResult<()> {
        if self.parents.contains_key(&name) {
            return Err(NodescopeError::invalid_argument(format!(
                "Type already registered: {name}"
            )));
        }
        if let Some(parent) = parent {
            if !self.parents.contains_key(parent) {
                return Err(NodescopeError::not_found(format!(
                    "Unknown parent type: {parent}"
                )));
            }
        }
        self.insert_type(name, parent.cloned());
        Ok(())
    }

    /// Register an aspect. Aspects have no hierarchy; re-registration is a
    /// no-op.
    pub fn register_aspect(&mut self, name: QualifiedName) {
        self.aspects.insert(name);
    }

    fn insert_type(&mut self, name: QualifiedName, parent: Option<QualifiedName>) {
        if let Some(parent) = &parent {
            self.children
                .entry(parent.clone())
                .or_default()
                .push(name.clone());
        }
        self.parents.insert(name, parent);
    }

    fn collect_descendants(&self, ty: &QualifiedName, out: &mut HashSet<QualifiedName>) {
        if let Some(direct) = self.children.get(ty) {
            for child in direct {
                if out.insert(child.clone()) {
                    self.collect_descendants(child, out);
                }
            }
        }
    }
}

impl TypeDictionary for MemoryDictionary {
    fn is_subtype(&self, ty: &QualifiedName, ancestor: &QualifiedName) -> bool {
        if !self.parents.contains_key(ty) {
            return false;
        }
        let mut current = Some(ty);
        while let Some(name) = current {
            if name == ancestor {
                return true;
            }
            current = self.parents.get(name).and_then(|p| p.as_ref());
        }
        false
    }

    fn subtypes_of(&self, ty: &QualifiedName, transitive: bool) -> HashSet<QualifiedName> {
        let mut out = HashSet::new();
        if !self.parents.contains_key(ty) {
            return out;
        }
        out.insert(ty.clone());
        if transitive {
            self.collect_descendants(ty, &mut out);
        } else if let Some(direct) = self.children.get(ty) {
            out.extend(direct.iter().cloned());
        }
        out
    }

    fn type_exists(&self, name: &QualifiedName) -> bool {
        self.parents.contains_key(name)
    }

    fn aspect_exists(&self, name: &QualifiedName) -> bool {
        self.aspects.contains(name)
    }
}

/// Membership check of a concrete type against expected/excluded type sets.
///
/// A single expected type with no exclusions short-circuits to a plain
/// subtype walk; every other shape materializes the transitive subtype
/// closures of both sets. An absent `expected` means "any type"; an absent or
/// empty `excluded` excludes nothing.
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
/// use nodescope_store::dictionary::{MemoryDictionary, type_matches};
/// use nodescope_store::name::builtin;
///
/// let dict = MemoryDictionary::with_builtins();
/// let expected: HashSet<_> = [builtin::folder()].into();
///
/// assert!(type_matches(&dict, &builtin::system_folder(), Some(&expected), None));
/// assert!(!type_matches(&dict, &builtin::document(), Some(&expected), None));
/// ```
pub fn type_matches<D: TypeDictionary>(
    dictionary: &D,
    ty: &QualifiedName,
    expected: Option<&HashSet<QualifiedName>>,
    excluded: Option<&HashSet<QualifiedName>>,
) -> bool {
    if let Some(expected_set) = expected {
        if excluded.is_none_or(|e| e.is_empty()) {
            if let Some(only) = expected_set.iter().next() {
                if expected_set.len() == 1 {
                    return dictionary.is_subtype(ty, only);
                }
            }
        }
    }

    let in_expected = match expected {
        None => true,
        Some(set) => {
            let mut closure = HashSet::new();
            for name in set {
                closure.extend(dictionary.subtypes_of(name, true));
            }
            closure.contains(ty)
        }
    };

    let in_excluded = match excluded {
        None => false,
        Some(set) => {
            let mut closure = HashSet::new();
            for name in set {
                closure.extend(dictionary.subtypes_of(name, true));
            }
            closure.contains(ty)
        }
    };

    in_expected && !in_excluded
}
