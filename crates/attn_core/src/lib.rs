//! Attention Core Library
//!
//! Attaches quantitative attributes (completion, coverage, ...) and
//! priorities (importance weights) to directories of a source tree, and
//! ranks everything by unmet priority:
//! - Per-directory attribute and priority stores
//! - File-derived facets keyed by git-compatible content identity
//! - Hierarchical inheritance of store data down the tree
//! - Deterministic score and urgency rankings
//!
//! # Quick Start
//!
//! ```
//! use attn_core::{Config, Workspace};
//! use std::fs;
//! use tempfile::TempDir;
//!
//! let tmp = TempDir::new().unwrap();
//! fs::write(tmp.path().join("Attributes.ini"), "[TechnicalDebt]\ncode_coverage=0.5\n").unwrap();
//! fs::write(tmp.path().join("Priorities.ini"), "[TechnicalDebt]\ncode_coverage=0.8\n").unwrap();
//!
//! let ws = Workspace::with_config(tmp.path(), Config::default()).unwrap();
//! let rankings = ws.rankings().unwrap();
//! assert_eq!(rankings.urgency[0].attribute, "code_coverage");
//! ```
//!
//! # File Facets
//!
//! Every trackable file gets a `File:<name>` facet holding its content
//! identity, which is exactly what `git hash-object` would print:
//!
//! ```
//! use attn_core::ContentId;
//!
//! let id = ContentId::hash_blob(b"test content\n");
//! assert_eq!(id.as_hex(), "d670460b4b4aece5915caf5c68d12f560a9fe3e4");
//! ```

mod calculator;
mod config;
mod content_id;
mod error;
mod filter;
mod identity;
mod paths;
mod resolver;
mod scanner;
mod store;
mod sync;
mod vcs;
mod workspace;

pub use calculator::{Calculator, RankingSummary, ScoredItem, UrgencyItem};
pub use config::{
    Config, ResolveConfig, StoreConfig, StoreKind, TrackingConfig, VcsConfig, CONFIG_FILE,
    DEFAULT_ATTRIBUTES_FILE, DEFAULT_PRIORITIES_FILE,
};
pub use content_id::ContentId;
pub use error::{AttnError, Result};
pub use filter::PathFilter;
pub use identity::{manual_identity, IdentityResolver};
pub use paths::{rel_key, resolve_dir, ROOT_KEY};
pub use resolver::{deep_merge, HierarchicalResolver, ResolvedData, ResolvedTree, ResolvedView};
pub use scanner::{DirectoryScanner, TreeListing};
pub use store::{
    store_path, Facet, FacetMap, FacetName, FacetStore, StoreValue, FILE_FACET_PREFIX,
    IDENTITY_KEY, REVIEW_KEY,
};
pub use sync::{
    CleanupReport, FacetStatistics, FacetSynchronizer, FileFailure, Outcome, RefreshReport,
    RepositorySyncReport, SkipReason, SyncReport,
};
pub use vcs::{is_available as git_available, GitCli, VcsBackend};
pub use workspace::{Rankings, Workspace};
