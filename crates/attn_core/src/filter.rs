//! Include/exclude policy for trackable files.

use crate::config::TrackingConfig;
use crate::error::{AttnError, Result};
use glob::{MatchOptions, Pattern};

/// `*` never crosses a `/`, while `**` spans directories.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Decides whether a file gets a file-derived facet.
///
/// Pure predicate over names; never touches the filesystem.
#[derive(Debug, Clone)]
pub struct PathFilter {
    extensions: Vec<String>,
    patterns: Vec<Pattern>,
    exclude_files: Vec<String>,
    include_all_extensions: bool,
}

impl PathFilter {
    /// Compiles the tracking rules.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` if an exclusion glob does not parse.
    pub fn new(config: &TrackingConfig) -> Result<Self> {
        let patterns = config
            .exclude_patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| AttnError::InvalidPattern {
                    pattern: p.clone(),
                    reason: e.msg.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            extensions: config.file_extensions.clone(),
            patterns,
            exclude_files: config.exclude_files.clone(),
            include_all_extensions: config.include_all_extensions,
        })
    }

    /// Adds an exact file name to the exclusion list.
    pub fn exclude_file(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.exclude_files.contains(&name) {
            self.exclude_files.push(name);
        }
        self
    }

    /// Returns true if a bare file name is trackable.
    ///
    /// Rules, first match wins: listed file names, hidden files and
    /// exclusion globs are rejected; then the extension must be recognized
    /// unless every extension is accepted.
    pub fn is_trackable(&self, file_name: &str) -> bool {
        if self.exclude_files.iter().any(|f| f == file_name) {
            return false;
        }
        if file_name.starts_with('.') {
            return false;
        }
        if self.matches_exclusion(file_name) {
            return false;
        }
        self.include_all_extensions || self.has_recognized_extension(file_name)
    }

    /// Returns true if a file, given by its `/`-separated root-relative
    /// path, is trackable.
    ///
    /// Applies [`is_trackable`](Self::is_trackable) to the final component,
    /// and additionally checks path-aware globs such as `spec/**/*` against
    /// the whole path.
    pub fn is_trackable_path(&self, rel_path: &str) -> bool {
        let file_name = rel_path.rsplit('/').next().unwrap_or(rel_path);
        if !self.is_trackable(file_name) {
            return false;
        }
        rel_path == file_name || !self.matches_exclusion(rel_path)
    }

    fn matches_exclusion(&self, candidate: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_with(candidate, MATCH_OPTIONS))
    }

    fn has_recognized_extension(&self, file_name: &str) -> bool {
        match extension(file_name) {
            Some(ext) => self.extensions.iter().any(|e| e == ext),
            None => false,
        }
    }
}

/// Returns the extension including its dot, ignoring a leading dot.
fn extension(file_name: &str) -> Option<&str> {
    match file_name.rfind('.') {
        Some(0) | None => None,
        Some(idx) if idx + 1 == file_name.len() => None,
        Some(idx) => Some(&file_name[idx..]),
    }
}
