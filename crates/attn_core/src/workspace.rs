//! Tracked-tree handle tying configuration to the core components.

use crate::calculator::{Calculator, RankingSummary, ScoredItem, UrgencyItem};
use crate::config::{Config, StoreKind};
use crate::error::{AttnError, Result};
use crate::paths::{key_to_path, resolve_dir};
use crate::resolver::{HierarchicalResolver, ResolvedData};
use crate::scanner::DirectoryScanner;
use crate::store::{store_path, FacetMap, FacetStore};
use crate::sync::FacetSynchronizer;
use std::fs;
use std::path::{Path, PathBuf};

/// A tracked tree: its root and configuration.
///
/// The root is explicit and owned here; every component is built from it.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    config: Config,
}

/// Both rankings plus their summary, computed from one resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rankings {
    /// Most urgent first.
    pub urgency: Vec<UrgencyItem>,
    /// Lowest score first.
    pub score: Vec<ScoredItem>,
    /// Aggregates over the urgency ranking.
    pub summary: RankingSummary,
}

impl Workspace {
    /// Opens the tree at `path`, loading `.attention.toml` if present.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a directory or the configuration
    /// is invalid.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use attn_core::Workspace;
    ///
    /// let ws = Workspace::open(".").unwrap();
    /// let rankings = ws.rankings().unwrap();
    /// println!("{} items", rankings.summary.total_items);
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let root = canonical_root(path.as_ref())?;
        let config = Config::load(&root)?;
        Ok(Self { root, config })
    }

    /// Opens the tree at `path` with an explicit configuration.
    pub fn with_config(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        let root = canonical_root(path.as_ref())?;
        Ok(Self { root, config })
    }

    /// Returns the tracked root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds a directory scanner.
    pub fn scanner(&self) -> Result<DirectoryScanner> {
        DirectoryScanner::new(&self.root, &self.config)
    }

    /// Builds a facet synchronizer.
    pub fn synchronizer(&self) -> Result<FacetSynchronizer> {
        FacetSynchronizer::new(&self.root, &self.config)
    }

    /// Builds a hierarchical resolver.
    pub fn resolver(&self) -> Result<HierarchicalResolver> {
        HierarchicalResolver::new(&self.root, &self.config)
    }

    /// Resolves the whole tree.
    pub fn resolve(&self) -> Result<ResolvedData> {
        self.resolver()?.resolve()
    }

    /// Resolves the tree and ranks every item.
    pub fn rankings(&self) -> Result<Rankings> {
        let data = self.resolve()?;
        let calculator = Calculator::from_resolved(&data);
        let urgency = calculator.urgency_ranking();
        let summary = RankingSummary::from_urgency(&urgency);
        Ok(Rankings {
            score: calculator.score_ranking(),
            urgency,
            summary,
        })
    }

    /// Writes `data` as the store of the given kind for directory `key`,
    /// creating the directory if needed.
    pub fn write_store(&self, key: &str, kind: StoreKind, data: &FacetMap) -> Result<PathBuf> {
        let dir = resolve_dir(&self.root, &key_to_path(Path::new(""), key))?;
        fs::create_dir_all(&dir)?;
        let path = store_path(&dir, &self.config.store, kind);
        FacetStore::from_facet_map(data).save(&path)?;
        Ok(path)
    }
}

fn canonical_root(path: &Path) -> Result<PathBuf> {
    let root = path.canonicalize()?;
    if !root.is_dir() {
        return Err(AttnError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Not a directory: {}", root.display()),
        )));
    }
    Ok(root)
}
