//! Configuration for a tracked tree.

use crate::error::{AttnError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Name of the optional configuration file at the tree root.
pub const CONFIG_FILE: &str = ".attention.toml";

/// Comprehensive configuration for a tracked tree.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Which files get file-derived facets.
    #[serde(default)]
    pub tracking: TrackingConfig,

    /// Store file naming.
    #[serde(default)]
    pub store: StoreConfig,

    /// Version-control integration.
    #[serde(default)]
    pub vcs: VcsConfig,

    /// Hierarchical resolution options.
    #[serde(default)]
    pub resolve: ResolveConfig,
}

impl Config {
    /// Load configuration from `<root>/.attention.toml`, or defaults if absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| AttnError::ConfigError(format!("failed to read config: {}", e)))?;
            toml::from_str(&content)
                .map_err(|e| AttnError::ConfigError(format!("failed to parse config: {}", e)))
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to `<root>/.attention.toml`.
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = root.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self)
            .map_err(|e| AttnError::ConfigError(format!("failed to serialize config: {}", e)))?;
        fs::write(&path, content)
            .map_err(|e| AttnError::ConfigError(format!("failed to write config: {}", e)))?;
        Ok(())
    }
}

/// File tracking rules used by the path filter and scanner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Whether trackable files make a directory eligible for discovery (default: true).
    pub track_files: bool,

    /// Recognized extensions, leading dot included.
    pub file_extensions: Vec<String>,

    /// Exclusion globs, matched against the file name and its root-relative path.
    pub exclude_patterns: Vec<String>,

    /// Exact file names that are never tracked.
    pub exclude_files: Vec<String>,

    /// Track every non-excluded file regardless of extension (default: false).
    pub include_all_extensions: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            track_files: true,
            file_extensions: [".rb", ".js", ".py", ".java", ".go", ".rs", ".ts", ".jsx", ".tsx"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclude_patterns: [
                "*_test.rb",
                "*_spec.rb",
                "spec/**/*",
                "test/**/*",
                "node_modules/**/*",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            exclude_files: vec![
                DEFAULT_ATTRIBUTES_FILE.to_string(),
                DEFAULT_PRIORITIES_FILE.to_string(),
            ],
            include_all_extensions: false,
        }
    }
}

/// Default attribute store file name.
pub const DEFAULT_ATTRIBUTES_FILE: &str = "Attributes.ini";

/// Default priority store file name.
pub const DEFAULT_PRIORITIES_FILE: &str = "Priorities.ini";

/// Store file naming.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// File holding a directory's attributes.
    pub attributes_file: String,

    /// File holding a directory's priorities.
    pub priorities_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            attributes_file: DEFAULT_ATTRIBUTES_FILE.to_string(),
            priorities_file: DEFAULT_PRIORITIES_FILE.to_string(),
        }
    }
}

impl StoreConfig {
    /// Returns the store file name for the given kind.
    pub fn file_name(&self, kind: StoreKind) -> &str {
        match kind {
            StoreKind::Attributes => &self.attributes_file,
            StoreKind::Priorities => &self.priorities_file,
        }
    }

    /// Returns true if `name` is one of the two store files.
    pub fn is_store_file(&self, name: &str) -> bool {
        name == self.attributes_file || name == self.priorities_file
    }
}

/// The two store instances every directory may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    /// Completion-style values.
    Attributes,
    /// Importance weights.
    Priorities,
}

/// Version-control integration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VcsConfig {
    /// Try git for content hashing at all (default: true).
    pub enabled: bool,

    /// Kill a git invocation after this many milliseconds (default: 5000).
    pub timeout_ms: u64,
}

impl Default for VcsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: 5_000,
        }
    }
}

impl VcsConfig {
    /// Returns the subprocess timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Hierarchical resolution options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Also emit views for directories that own no store but inherit one (default: false).
    pub include_inheriting_directories: bool,
}
