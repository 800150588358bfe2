//! Listing filters and search-universe resolution.
//!
//! A listing request narrows what it wants with either an explicit node type
//! or `is_file`/`is_folder` booleans. [`FilterResolver`] turns that into a
//! [`SearchUniverse`]: the concrete set of types the store should search for
//! plus the aspects whose presence suppresses a node from results. The
//! universe is transient — computed per request, never persisted.

use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::dictionary::TypeDictionary;
use crate::errors::{NodescopeError, NodescopeResult};
use crate::name::{QualifiedName, builtin};

/// Marker token an explicit node-type filter may carry as its last
/// space-separated word to opt into subtype matching, e.g.
/// `"finance:invoice INCLUDE_SUBTYPES"`. Matched case-insensitively.
pub const INCLUDE_SUBTYPES_MARKER: &str = "INCLUDE_SUBTYPES";

/// Filter criteria for a listing request.
///
/// `node_type` is mutually exclusive with the two booleans, and
/// `is_file = true` together with `is_folder = true` is contradictory; both
/// shapes are rejected at resolution time.
///
/// # Example
///
/// ```
/// use nodescope_store::filter::ListingFilter;
///
/// let filter = ListingFilter::builder().is_folder(true).build();
/// assert_eq!(filter.is_folder, Some(true));
/// assert_eq!(filter.node_type, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, TypedBuilder)]
#[builder(doc)]
pub struct ListingFilter {
    /// Explicit type filter as a raw `ns:local` string, optionally suffixed
    /// with [`INCLUDE_SUBTYPES_MARKER`].
    #[builder(default, setter(strip_option, into))]
    pub node_type: Option<String>,

    #[builder(default, setter(strip_option))]
    pub is_file: Option<bool>,

    #[builder(default, setter(strip_option))]
    pub is_folder: Option<bool>,
}

impl ListingFilter {
    /// A filter that restricts nothing.
    pub fn unfiltered() -> Self {
        Self::default()
    }
}

/// A resolved search universe: concrete types to search for and aspects
/// whose presence excludes a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchUniverse {
    pub search_types: HashSet<QualifiedName>,
    pub ignore_aspects: HashSet<QualifiedName>,
}

impl SearchUniverse {
    /// True when the universe places no type restriction at all — the
    /// search types contain the universal base type, which every node
    /// descends from.
    pub fn is_type_unrestricted(&self) -> bool {
        self.search_types.contains(&builtin::object())
    }
}

/// Resolves [`ListingFilter`]s into [`SearchUniverse`]s against a dictionary
/// and a deployment-level ignore list.
///
/// The ignore list names types and aspects that should never surface in
/// generic listings (internal bookkeeping types and the like). Entries
/// naming a type are dropped from the universe outright; entries naming an
/// aspect become `ignore_aspects`; entries naming neither are skipped
/// silently.
///
/// # Example
///
/// ```
/// use nodescope_store::dictionary::MemoryDictionary;
/// use nodescope_store::filter::{FilterResolver, ListingFilter};
/// use nodescope_store::name::builtin;
///
/// let dict = MemoryDictionary::with_builtins();
/// let resolver = FilterResolver::new(&dict);
///
/// let universe = resolver.resolve(&ListingFilter::unfiltered()).unwrap();
/// assert_eq!(universe.search_types.len(), 1);
/// assert!(universe.search_types.contains(&builtin::object()));
/// assert!(universe.ignore_aspects.is_empty());
/// ```
pub struct FilterResolver<'d, D: TypeDictionary> {
    dictionary: &'d D,
    ignored: HashSet<QualifiedName>,
}

impl<'d, D: TypeDictionary> FilterResolver<'d, D> {
    pub fn new(dictionary: &'d D) -> Self {
        Self {
            dictionary,
            ignored: HashSet::new(),
        }
    }

    /// Attach the deployment-level ignore list.
    pub fn with_ignored(mut self, ignored: impl IntoIterator<Item = QualifiedName>) -> Self {
        self.ignored = ignored.into_iter().collect();
        self
    }

    /// Resolve a filter into a search universe.
    pub fn resolve(&self, filter: &ListingFilter) -> NodescopeResult<SearchUniverse> {
        if filter.is_file == Some(true) && filter.is_folder == Some(true) {
            return Err(NodescopeError::invalid_argument(
                "Invalid filter (is_file=true and is_folder=true) - a node cannot be both a file and a folder",
            ));
        }

        // include subtypes by default, unless filtering by an explicit type
        let mut include_subtypes = true;
        let mut explicit: Option<QualifiedName> = None;

        if let Some(raw) = &filter.node_type {
            if filter.is_file.is_some() || filter.is_folder.is_some() {
                return Err(NodescopeError::invalid_argument(
                    "Invalid filter - node_type and is_file/is_folder are mutually exclusive",
                ));
            }
            let (name, explicit_subtypes) = self.parse_node_type_filter(raw)?;
            explicit = Some(name);
            include_subtypes = explicit_subtypes;
        }

        let mut search: HashSet<QualifiedName> = HashSet::new();

        if let Some(ty) = &explicit {
            if include_subtypes {
                search.extend(self.dictionary.subtypes_of(ty, true));
            }
            search.insert(ty.clone());
            self.remove_system_containers(&mut search, include_subtypes);
        } else {
            match (filter.is_file, filter.is_folder) {
                // no filtering at all, or only exclusions: collapse to the
                // universal base type ("anything else" is not separately
                // expressible as a type set)
                (None, None) | (Some(false), None) | (None, Some(false)) | (Some(false), Some(false)) => {
                    search.insert(builtin::object());
                }
                _ => {
                    if filter.is_file == Some(true) {
                        search.extend(self.dictionary.subtypes_of(&builtin::document(), true));
                        search.insert(builtin::document());
                    }
                    if filter.is_folder == Some(true) {
                        search.extend(self.dictionary.subtypes_of(&builtin::folder(), true));
                        search.insert(builtin::folder());
                        self.remove_system_containers(&mut search, include_subtypes);
                    }
                }
            }
        }

        let mut ignore_aspects = HashSet::new();
        if !self.ignored.is_empty() {
            let mut not_in_search: HashSet<QualifiedName> =
                self.ignored.difference(&search).cloned().collect();
            not_in_search.remove(&builtin::system_folder());
            for name in not_in_search {
                // only registered aspects are actionable downstream; names
                // that are neither a type nor an aspect are skipped
                if self.dictionary.aspect_exists(&name) {
                    ignore_aspects.insert(name);
                }
            }
            for name in &self.ignored {
                search.remove(name);
            }
        }

        debug!(
            "resolved filter to {} search types, {} ignored aspects",
            search.len(),
            ignore_aspects.len()
        );

        Ok(SearchUniverse {
            search_types: search,
            ignore_aspects,
        })
    }

    /// System containers are never implicitly searchable, no matter how they
    /// were swept into the working set.
    fn remove_system_containers(&self, search: &mut HashSet<QualifiedName>, subtree: bool) {
        if subtree {
            for name in self.dictionary.subtypes_of(&builtin::system_folder(), true) {
                search.remove(&name);
            }
        }
        search.remove(&builtin::system_folder());
    }

    /// Split an explicit type string into the name and the subtype opt-in.
    fn parse_node_type_filter(&self, raw: &str) -> NodescopeResult<(QualifiedName, bool)> {
        let mut include_subtypes = false;
        let mut type_str = raw;

        if let Some(idx) = raw.rfind(' ') {
            if idx > 0 && raw[idx + 1..].eq_ignore_ascii_case(INCLUDE_SUBTYPES_MARKER) {
                include_subtypes = true;
                type_str = &raw[..idx];
            }
        }

        let name = QualifiedName::parse(type_str)?;
        if !self.dictionary.type_exists(&name) {
            return Err(NodescopeError::not_found(format!(
                "Unknown filter node type: {type_str}"
            )));
        }
        Ok((name, include_subtypes))
    }
}
