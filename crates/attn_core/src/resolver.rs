//! Hierarchical attribute/priority resolution.
//!
//! A directory's resolved view is every ancestor's store merged root to
//! leaf, with the directory's own store applied last. Merging is per key:
//! a descendant can add or override one key of an inherited facet without
//! dropping its siblings. File-derived facets are never inherited.

use crate::config::{Config, StoreConfig, StoreKind};
use crate::error::{AttnError, Result};
use crate::paths::{ancestor_keys, key_to_path, rel_key, resolve_dir};
use crate::scanner::DirectoryScanner;
use crate::store::{store_path, FacetMap, FacetName, FacetStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::iter;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Resolved views for a whole tree: directory key -> facet map.
pub type ResolvedTree = BTreeMap<String, FacetMap>;

/// Resolved attribute and priority views, keyed by directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedData {
    /// Per-directory resolved attributes.
    pub attributes: ResolvedTree,
    /// Per-directory resolved priorities.
    pub priorities: ResolvedTree,
}

impl ResolvedData {
    /// Directory keys present in either tree, sorted.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self
            .attributes
            .keys()
            .chain(self.priorities.keys())
            .map(String::as_str)
            .collect();
        paths.sort_unstable();
        paths.dedup();
        paths
    }
}

/// Resolved attributes and priorities of a single directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedView {
    /// Resolved attributes.
    pub attributes: FacetMap,
    /// Resolved priorities.
    pub priorities: FacetMap,
}

/// A directory's own, unmerged store contents.
#[derive(Debug, Clone, Default)]
struct OwnStores {
    attributes: FacetMap,
    priorities: FacetMap,
}

impl OwnStores {
    fn get(&self, kind: StoreKind) -> &FacetMap {
        match kind {
            StoreKind::Attributes => &self.attributes,
            StoreKind::Priorities => &self.priorities,
        }
    }
}

/// Reads every store in a tree and produces inherited views.
///
/// Read-only: nothing is written, and results are recomputed on every call.
pub struct HierarchicalResolver {
    root: PathBuf,
    scanner: DirectoryScanner,
    store: StoreConfig,
    include_inheriting: bool,
}

impl HierarchicalResolver {
    /// Creates a resolver for `root`.
    pub fn new(root: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let scanner = DirectoryScanner::new(root, config)?;
        Ok(Self {
            root: scanner.root().to_path_buf(),
            scanner,
            store: config.store.clone(),
            include_inheriting: config.resolve.include_inheriting_directories,
        })
    }

    /// Resolves every store-owning directory in the tree.
    ///
    /// By default a directory that owns no store is not listed, even when
    /// it would inherit from an ancestor; use
    /// [`resolve_directory`](Self::resolve_directory) for those, or set
    /// `resolve.include_inheriting_directories` to list them here too. Directories whose
    /// resolved view is empty are omitted. A malformed store is logged and
    /// contributes nothing.
    pub fn resolve(&self) -> Result<ResolvedData> {
        let listing = self.scanner.walk()?;

        let mut own = BTreeMap::new();
        for key in &listing.store_directories {
            own.insert(key.clone(), self.load_own(key)?);
        }

        let targets: Vec<&String> = if self.include_inheriting {
            listing
                .directories
                .iter()
                .filter(|key| {
                    own.contains_key(key.as_str())
                        || ancestor_keys(key).iter().any(|a| own.contains_key(a))
                })
                .collect()
        } else {
            listing.store_directories.iter().collect()
        };

        let mut data = ResolvedData::default();
        for key in targets {
            let attributes = merge_chain(key, &own, StoreKind::Attributes);
            let priorities = merge_chain(key, &own, StoreKind::Priorities);
            if !attributes.is_empty() {
                data.attributes.insert(key.clone(), attributes);
            }
            if !priorities.is_empty() {
                data.priorities.insert(key.clone(), priorities);
            }
        }

        debug!(
            "resolved {} attribute views and {} priority views",
            data.attributes.len(),
            data.priorities.len()
        );
        Ok(data)
    }

    /// Resolves a single directory, whether or not it owns a store.
    pub fn resolve_directory(&self, dir: &Path) -> Result<ResolvedView> {
        let dir = resolve_dir(&self.root, dir)?;
        let key = rel_key(&self.root, &dir)?;

        let mut own = BTreeMap::new();
        for k in ancestor_keys(&key).into_iter().chain(iter::once(key.clone())) {
            let stores = self.load_own(&k)?;
            own.insert(k, stores);
        }

        Ok(ResolvedView {
            attributes: merge_chain(&key, &own, StoreKind::Attributes),
            priorities: merge_chain(&key, &own, StoreKind::Priorities),
        })
    }

    fn load_own(&self, key: &str) -> Result<OwnStores> {
        let dir = key_to_path(&self.root, key);
        Ok(OwnStores {
            attributes: self.load_kind(&dir, StoreKind::Attributes)?,
            priorities: self.load_kind(&dir, StoreKind::Priorities)?,
        })
    }

    fn load_kind(&self, dir: &Path, kind: StoreKind) -> Result<FacetMap> {
        let path = store_path(dir, &self.store, kind);
        match FacetStore::load(&path) {
            Ok(Some(store)) => Ok(store.to_facet_map()),
            Ok(None) => Ok(FacetMap::new()),
            Err(e @ AttnError::MalformedStoreFile { .. }) => {
                warn!("ignoring store: {}", e);
                Ok(FacetMap::new())
            }
            Err(e) => Err(e),
        }
    }
}

/// Merges `overlay` into `base` key by key; overlay values win.
pub fn deep_merge(base: &mut FacetMap, overlay: &FacetMap) {
    for (facet, values) in overlay {
        let target = base.entry(facet.clone()).or_default();
        for (key, value) in values {
            target.insert(key.clone(), *value);
        }
    }
}

/// Folds the chain for `key`. File-derived facets describe files of their
/// own directory, so ancestors contribute manual facets only.
fn merge_chain(key: &str, own: &BTreeMap<String, OwnStores>, kind: StoreKind) -> FacetMap {
    let mut merged = FacetMap::new();
    for ancestor in ancestor_keys(key) {
        if let Some(stores) = own.get(&ancestor) {
            deep_merge(&mut merged, &manual_only(stores.get(kind)));
        }
    }
    if let Some(stores) = own.get(key) {
        deep_merge(&mut merged, stores.get(kind));
    }
    merged
}

fn manual_only(map: &FacetMap) -> FacetMap {
    map.iter()
        .filter(|(name, _)| !FacetName::parse(name).is_file_derived())
        .map(|(name, values)| (name.clone(), values.clone()))
        .collect()
}
