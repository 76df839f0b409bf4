//! Directory scanning for trackable files and store-bearing directories.

use crate::config::{Config, StoreConfig};
use crate::error::Result;
use crate::filter::PathFilter;
use crate::paths::{absolute_root, key_to_path, rel_key, ROOT_KEY};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Everything one walk of the tree learns, keyed by root-relative path.
#[derive(Debug, Clone, Default)]
pub struct TreeListing {
    /// Every traversed directory, sorted.
    pub directories: BTreeSet<String>,
    /// Directories holding an attribute or priority store.
    pub store_directories: BTreeSet<String>,
    /// Directories holding at least one trackable file.
    pub trackable_directories: BTreeSet<String>,
}

/// Enumerates trackable files and relevant directories under a root.
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    root: PathBuf,
    filter: PathFilter,
    store: StoreConfig,
    track_files: bool,
}

impl DirectoryScanner {
    /// Creates a scanner for `root`.
    ///
    /// A relative `root` is made absolute against the current directory.
    /// The configured store file names are always excluded from tracking.
    pub fn new(root: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let filter = PathFilter::new(&config.tracking)?
            .exclude_file(config.store.attributes_file.clone())
            .exclude_file(config.store.priorities_file.clone());

        Ok(Self {
            root: absolute_root(root.as_ref())?,
            filter,
            store: config.store.clone(),
            track_files: config.tracking.track_files,
        })
    }

    /// Returns the tracked root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path filter in use.
    pub fn filter(&self) -> &PathFilter {
        &self.filter
    }

    /// Lists the trackable files directly inside `dir`, sorted.
    ///
    /// Not recursive. A missing directory yields an empty list.
    pub fn scan_directory(&self, dir: &Path) -> Result<Vec<String>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let dir_key = rel_key(&self.root, dir)?;

        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                debug!("skipping non-UTF-8 file name in {}", dir.display());
                continue;
            };
            if self.filter.is_trackable_path(&join_key(&dir_key, &name)) {
                files.push(name);
            }
        }

        files.sort();
        Ok(files)
    }

    /// Walks the whole tree once.
    ///
    /// Hidden directories (e.g. `.git`) are not entered. Unreadable entries
    /// are logged and skipped.
    pub fn walk(&self) -> Result<TreeListing> {
        let mut listing = TreeListing::default();

        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("skipping unreadable entry during scan: {}", e);
                    continue;
                }
            };

            let key = rel_key(&self.root, entry.path())?;
            if entry.file_type().is_dir() {
                listing.directories.insert(key);
                continue;
            }

            let Some(parent) = entry.path().parent() else {
                continue;
            };
            let parent_key = rel_key(&self.root, parent)?;
            let name = entry.file_name().to_string_lossy();

            if self.store.is_store_file(&name) {
                listing.store_directories.insert(parent_key);
            } else if self.filter.is_trackable_path(&key) {
                listing.trackable_directories.insert(parent_key);
            }
        }

        Ok(listing)
    }

    /// Returns every directory that holds a store or, when file tracking is
    /// on, at least one trackable file. Sorted by key.
    pub fn discover_directories(&self) -> Result<Vec<String>> {
        let listing = self.walk()?;
        let mut dirs = listing.store_directories;
        if self.track_files {
            dirs.extend(listing.trackable_directories);
        }
        Ok(dirs.into_iter().collect())
    }

    /// Maps each discovered directory to its trackable files, omitting
    /// directories with none.
    pub fn scan_repository(&self) -> Result<BTreeMap<String, Vec<String>>> {
        let mut out = BTreeMap::new();
        for key in self.discover_directories()? {
            let files = self.scan_directory(&key_to_path(&self.root, &key))?;
            if !files.is_empty() {
                out.insert(key, files);
            }
        }
        Ok(out)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|s| s.starts_with('.'))
}

fn join_key(dir_key: &str, name: &str) -> String {
    if dir_key == ROOT_KEY {
        name.to_string()
    } else {
        format!("{}/{}", dir_key, name)
    }
}
