//! Reconciles file-derived facets with the files on disk.

use crate::config::{Config, StoreConfig, StoreKind};
use crate::error::Result;
use crate::identity::IdentityResolver;
use crate::paths::{key_to_path, rel_key, resolve_dir};
use crate::scanner::DirectoryScanner;
use crate::store::{store_path, Facet, FacetName, FacetStore, IDENTITY_KEY, REVIEW_KEY};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of an operation that may legitimately have nothing to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The operation ran.
    Done(T),
    /// The operation had nothing to work on.
    Skipped(SkipReason),
}

impl<T> Outcome<T> {
    /// Returns true if the operation ran.
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    /// Returns the report, if the operation ran.
    pub fn done(self) -> Option<T> {
        match self {
            Self::Done(report) => Some(report),
            Self::Skipped(_) => None,
        }
    }

    /// Returns the skip reason, if the operation did not run.
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::Done(_) => None,
            Self::Skipped(reason) => Some(*reason),
        }
    }
}

/// Why an operation was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The directory holds no trackable files.
    NoTrackableFiles,
    /// The directory has no attribute store yet.
    StoreMissing,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTrackableFiles => f.write_str("no trackable files found"),
            Self::StoreMissing => f.write_str("no attribute store found"),
        }
    }
}

/// A file whose identity could not be computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    /// Bare file name.
    pub filename: String,
    /// Why it failed.
    pub reason: String,
}

/// Report from [`FacetSynchronizer::sync`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Root-relative key of the directory.
    pub directory: String,
    /// Facets created for newly seen files.
    pub created: usize,
    /// Facets whose identity changed.
    pub updated: usize,
    /// Trackable files scanned.
    pub total: usize,
    /// Files skipped because they could not be read.
    pub failed: Vec<FileFailure>,
}

/// Report from [`FacetSynchronizer::refresh_identities`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Root-relative key of the directory.
    pub directory: String,
    /// Facets whose identity changed.
    pub updated: usize,
    /// Files skipped because they could not be read.
    pub failed: Vec<FileFailure>,
}

/// Report from [`FacetSynchronizer::cleanup`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Root-relative key of the directory.
    pub directory: String,
    /// Facets removed because their file is gone.
    pub removed: usize,
}

/// Facet counts for one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetStatistics {
    /// File-derived facets.
    pub file_facets: usize,
    /// Manual facets.
    pub manual_facets: usize,
    /// All facets.
    pub total: usize,
    /// Whether content hashing is delegated to version control.
    pub vcs_managed: bool,
}

/// Aggregate report from [`FacetSynchronizer::sync_repository`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositorySyncReport {
    /// Directories synchronized.
    pub directories: usize,
    /// Facets created across all directories.
    pub created: usize,
    /// Facets updated across all directories.
    pub updated: usize,
    /// Per-file failures, as (directory key, failure).
    pub failed: Vec<(String, FileFailure)>,
    /// Directories whose store could not be processed, as (directory key, error).
    pub errors: Vec<(String, String)>,
}

/// Creates, updates and removes file-derived facets.
///
/// Only the attribute store is touched, and only its file-derived facets.
/// Every operation is idempotent.
pub struct FacetSynchronizer {
    root: PathBuf,
    scanner: DirectoryScanner,
    identity: IdentityResolver,
    store: StoreConfig,
}

impl FacetSynchronizer {
    /// Creates a synchronizer for `root`.
    pub fn new(root: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let scanner = DirectoryScanner::new(root, config)?;
        let identity = IdentityResolver::new(scanner.root(), &config.vcs);
        Ok(Self::with_parts(scanner, identity, config.store.clone()))
    }

    /// Creates a synchronizer from already-built components.
    ///
    /// The root is taken from `scanner`.
    pub fn with_parts(
        scanner: DirectoryScanner,
        identity: IdentityResolver,
        store: StoreConfig,
    ) -> Self {
        Self {
            root: scanner.root().to_path_buf(),
            scanner,
            identity,
            store,
        }
    }

    /// Creates facets for new files and refreshes changed identities.
    ///
    /// New facets get the content identity and a review status of 0.0.
    /// Existing facets only ever have their identity overwritten.
    pub fn sync(&self, dir: &Path) -> Result<Outcome<SyncReport>> {
        let dir = resolve_dir(&self.root, dir)?;
        let files = self.scanner.scan_directory(&dir)?;
        if files.is_empty() {
            return Ok(Outcome::Skipped(SkipReason::NoTrackableFiles));
        }

        let path = store_path(&dir, &self.store, StoreKind::Attributes);
        let mut store = FacetStore::load_or_default(&path)?;
        let mut report = SyncReport {
            directory: rel_key(&self.root, &dir)?,
            total: files.len(),
            ..SyncReport::default()
        };
        let mut dirty = false;

        for filename in &files {
            let id = match self.identity.identity(&dir.join(filename)) {
                Ok(id) => id,
                Err(e) => {
                    warn!("skipping {}: {}", filename, e);
                    report.failed.push(FileFailure {
                        filename: filename.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let name = FacetName::file(filename.as_str());
            match store.facet_mut(&name) {
                Some(facet) => {
                    if facet.content_id() != Some(id) {
                        debug!("{} changed: now {}", filename, id);
                        facet.set(IDENTITY_KEY, id);
                        report.updated += 1;
                        dirty = true;
                    }
                    if facet.get(REVIEW_KEY).is_none() {
                        facet.set(REVIEW_KEY, 0.0);
                        dirty = true;
                    }
                }
                None => {
                    let mut facet = Facet::new(name);
                    facet.set(IDENTITY_KEY, id);
                    facet.set(REVIEW_KEY, 0.0);
                    store.insert_facet(facet);
                    report.created += 1;
                    dirty = true;
                }
            }
        }

        if dirty {
            store.save(&path)?;
        }

        info!(
            "{}: created {} and updated {} file facets ({} files)",
            report.directory, report.created, report.updated, report.total
        );
        Ok(Outcome::Done(report))
    }

    /// Recomputes identities of existing file facets whose file still exists.
    ///
    /// Facets of missing files are left alone; see [`cleanup`](Self::cleanup).
    pub fn refresh_identities(&self, dir: &Path) -> Result<Outcome<RefreshReport>> {
        let dir = resolve_dir(&self.root, dir)?;
        let path = store_path(&dir, &self.store, StoreKind::Attributes);
        let Some(mut store) = FacetStore::load(&path)? else {
            return Ok(Outcome::Skipped(SkipReason::StoreMissing));
        };

        let mut report = RefreshReport {
            directory: rel_key(&self.root, &dir)?,
            ..RefreshReport::default()
        };

        for name in file_facet_names(&store) {
            let Some(filename) = name.filename() else {
                continue;
            };
            let file = dir.join(filename);
            if !file.is_file() {
                continue;
            }

            let id = match self.identity.identity(&file) {
                Ok(id) => id,
                Err(e) => {
                    warn!("skipping {}: {}", filename, e);
                    report.failed.push(FileFailure {
                        filename: filename.to_string(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if let Some(facet) = store.facet_mut(&name) {
                if facet.content_id() != Some(id) {
                    facet.set(IDENTITY_KEY, id);
                    report.updated += 1;
                }
            }
        }

        if report.updated > 0 {
            store.save(&path)?;
        }

        info!("{}: updated {} identities", report.directory, report.updated);
        Ok(Outcome::Done(report))
    }

    /// Removes file facets whose file no longer exists.
    pub fn cleanup(&self, dir: &Path) -> Result<Outcome<CleanupReport>> {
        let dir = resolve_dir(&self.root, dir)?;
        let path = store_path(&dir, &self.store, StoreKind::Attributes);
        let Some(mut store) = FacetStore::load(&path)? else {
            return Ok(Outcome::Skipped(SkipReason::StoreMissing));
        };

        let mut report = CleanupReport {
            directory: rel_key(&self.root, &dir)?,
            ..CleanupReport::default()
        };

        for name in file_facet_names(&store) {
            let gone = name
                .filename()
                .is_some_and(|filename| !dir.join(filename).exists());
            if gone && store.remove_facet(&name).is_some() {
                debug!("removed facet {}", name);
                report.removed += 1;
            }
        }

        if report.removed > 0 {
            store.save(&path)?;
        }

        info!("{}: removed {} facets for deleted files", report.directory, report.removed);
        Ok(Outcome::Done(report))
    }

    /// Counts file-derived and manual facets without modifying anything.
    pub fn statistics(&self, dir: &Path) -> Result<Outcome<FacetStatistics>> {
        let dir = resolve_dir(&self.root, dir)?;
        let path = store_path(&dir, &self.store, StoreKind::Attributes);
        let Some(store) = FacetStore::load(&path)? else {
            return Ok(Outcome::Skipped(SkipReason::StoreMissing));
        };

        let file_facets = store.facets().filter(|f| f.name().is_file_derived()).count();
        Ok(Outcome::Done(FacetStatistics {
            file_facets,
            manual_facets: store.len() - file_facets,
            total: store.len(),
            vcs_managed: self.identity.is_vcs_managed(),
        }))
    }

    /// Runs [`sync`](Self::sync) on every discovered directory.
    ///
    /// A directory whose store cannot be processed is logged, recorded and
    /// skipped; the remaining directories still run.
    pub fn sync_repository(&self) -> Result<RepositorySyncReport> {
        let mut report = RepositorySyncReport::default();

        for key in self.scanner.discover_directories()? {
            match self.sync(&key_to_path(&self.root, &key)) {
                Ok(Outcome::Done(dir_report)) => {
                    report.directories += 1;
                    report.created += dir_report.created;
                    report.updated += dir_report.updated;
                    report
                        .failed
                        .extend(dir_report.failed.into_iter().map(|f| (key.clone(), f)));
                }
                Ok(Outcome::Skipped(reason)) => debug!("{}: {}", key, reason),
                Err(e) => {
                    warn!("{}: {}", key, e);
                    report.errors.push((key, e.to_string()));
                }
            }
        }

        info!(
            "processed {} directories: created {}, updated {} file facets",
            report.directories, report.created, report.updated
        );
        Ok(report)
    }

    /// Returns true if content hashing is delegated to version control.
    pub fn is_vcs_managed(&self) -> bool {
        self.identity.is_vcs_managed()
    }
}

fn file_facet_names(store: &FacetStore) -> Vec<FacetName> {
    store
        .facets()
        .map(|f| f.name().clone())
        .filter(FacetName::is_file_derived)
        .collect()
}
