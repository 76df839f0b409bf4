//! Per-directory attribute and priority stores.
//!
//! A store is a flat section-based text file:
//!
//! ```text
//! [TechnicalDebt]
//! code_coverage=0.5
//!
//! [File:event_processor.rb]
//! git_object_id=d670460b4b4aece5915caf5c68d12f560a9fe3e4
//! review_status=0.0
//! ```
//!
//! Each section is a facet, each line a key and a value. Section and key
//! order survive a load/save cycle.

use crate::config::{StoreConfig, StoreKind};
use crate::content_id::ContentId;
use crate::error::{AttnError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Section-name prefix marking a file-derived facet.
pub const FILE_FACET_PREFIX: &str = "File:";

/// Key holding a file-derived facet's content identity.
pub const IDENTITY_KEY: &str = "git_object_id";

/// Key holding a file-derived facet's review completion.
pub const REVIEW_KEY: &str = "review_status";

/// Resolved or raw numeric data: facet name -> key -> value.
pub type FacetMap = BTreeMap<String, BTreeMap<String, f64>>;

/// Name of a facet, classified once at the serialization boundary.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FacetName {
    /// One per tracked file, named after the file.
    FileDerived {
        /// Bare file name within the store's directory.
        filename: String,
    },
    /// Authored by hand or by other tools.
    Manual {
        /// Section name as written.
        name: String,
    },
}

impl FacetName {
    /// Facet for a tracked file.
    pub fn file(filename: impl Into<String>) -> Self {
        Self::FileDerived {
            filename: filename.into(),
        }
    }

    /// Manual facet.
    pub fn manual(name: impl Into<String>) -> Self {
        Self::Manual { name: name.into() }
    }

    /// Classifies a section header.
    pub fn parse(section: &str) -> Self {
        match section.strip_prefix(FILE_FACET_PREFIX) {
            Some(filename) if !filename.is_empty() => Self::file(filename),
            _ => Self::manual(section),
        }
    }

    /// Returns true for file-derived facets.
    pub fn is_file_derived(&self) -> bool {
        matches!(self, Self::FileDerived { .. })
    }

    /// Returns the backing file name of a file-derived facet.
    pub fn filename(&self) -> Option<&str> {
        match self {
            Self::FileDerived { filename } => Some(filename),
            Self::Manual { .. } => None,
        }
    }
}

impl fmt::Display for FacetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileDerived { filename } => write!(f, "{}{}", FILE_FACET_PREFIX, filename),
            Self::Manual { name } => f.write_str(name),
        }
    }
}

/// A single stored value.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    /// Attribute or priority value.
    Number(f64),
    /// Anything that isn't a number, e.g. a content identity.
    Text(String),
}

impl StoreValue {
    /// Interprets a raw value for `key`. The identity key is always text.
    fn parse(key: &str, raw: &str) -> Self {
        if key != IDENTITY_KEY {
            if let Ok(n) = raw.parse::<f64>() {
                return Self::Number(n);
            }
        }
        Self::Text(raw.to_string())
    }

    /// Returns the numeric value, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Returns the text value, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

impl fmt::Display for StoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Debug keeps the decimal point: 0.0 rather than 0.
            Self::Number(n) => write!(f, "{:?}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for StoreValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<ContentId> for StoreValue {
    fn from(id: ContentId) -> Self {
        Self::Text(id.as_hex())
    }
}

/// One section of a store.
///
/// Comment lines are kept with the header or key they precede, so a
/// read-modify-write leaves hand-written notes in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Facet {
    name: FacetName,
    comments: Vec<String>,
    entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    comments: Vec<String>,
    key: String,
    value: StoreValue,
}

impl Facet {
    /// Creates an empty facet.
    pub fn new(name: FacetName) -> Self {
        Self {
            name,
            comments: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Returns the facet's name.
    pub fn name(&self) -> &FacetName {
        &self.name
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&StoreValue> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.value)
    }

    /// Sets `key`, keeping its position if it already exists.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<StoreValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.value = value,
            None => self.entries.push(Entry {
                comments: Vec::new(),
                key,
                value,
            }),
        }
    }

    fn attach_comments(&mut self, key: &str, comments: &mut Vec<String>) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) {
            entry.comments.append(comments);
        }
    }

    /// Entries in file order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &StoreValue)> {
        self.entries.iter().map(|e| (e.key.as_str(), &e.value))
    }

    /// Returns the stored content identity, if present and well-formed.
    pub fn content_id(&self) -> Option<ContentId> {
        self.get(IDENTITY_KEY)
            .and_then(StoreValue::as_text)
            .and_then(|s| ContentId::from_hex(s).ok())
    }

    /// Numeric entries only.
    pub fn numbers(&self) -> BTreeMap<String, f64> {
        self.entries
            .iter()
            .filter_map(|e| e.value.as_number().map(|n| (e.key.clone(), n)))
            .collect()
    }
}

/// Contents of one store file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacetStore {
    facets: Vec<Facet>,
    trailing: Vec<String>,
}

impl FacetStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses store text. `path` is only used in error messages.
    ///
    /// Repeated sections are merged; a repeated key keeps its last value.
    /// Lines starting with `;` or `#` are kept as comments of the header or
    /// key that follows them.
    ///
    /// # Errors
    ///
    /// Returns `MalformedStoreFile` for an unterminated or empty section
    /// header, a key line outside any section, a line without `=`, or an
    /// empty key.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let malformed = |line: usize, reason: &str| AttnError::MalformedStoreFile {
            path: path.to_path_buf(),
            line,
            reason: reason.to_string(),
        };

        let mut store = Self::new();
        let mut current: Option<usize> = None;
        let mut pending: Vec<String> = Vec::new();

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();

            if line.is_empty() {
                continue;
            }
            if line.starts_with(';') || line.starts_with('#') {
                pending.push(line.to_string());
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let name = rest
                    .strip_suffix(']')
                    .ok_or_else(|| malformed(line_no, "unterminated section header"))?
                    .trim();
                if name.is_empty() {
                    return Err(malformed(line_no, "empty section name"));
                }
                let idx = store.position_or_insert(FacetName::parse(name));
                store.facets[idx].comments.append(&mut pending);
                current = Some(idx);
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| malformed(line_no, "expected key=value"))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(malformed(line_no, "empty key"));
            }
            let idx = current.ok_or_else(|| malformed(line_no, "entry outside of any section"))?;
            let value = StoreValue::parse(key, value.trim());
            store.facets[idx].set(key, value);
            store.facets[idx].attach_comments(key, &mut pending);
        }

        store.trailing = pending;
        Ok(store)
    }

    /// Loads a store file.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Self::parse(&content, path).map(Some)
    }

    /// Loads a store file, or returns an empty store if it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        Ok(Self::load(path)?.unwrap_or_default())
    }

    /// Renders the store in file format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, facet) in self.facets.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            push_comments(&mut out, &facet.comments);
            out.push_str(&format!("[{}]\n", facet.name));
            for entry in &facet.entries {
                push_comments(&mut out, &entry.comments);
                out.push_str(&format!("{}={}\n", entry.key, entry.value));
            }
        }
        push_comments(&mut out, &self.trailing);
        out
    }

    /// Writes the store atomically.
    ///
    /// Uses temp file + fsync + rename. There is no locking: concurrent
    /// writers race and the last rename wins.
    pub fn save(&self, path: &Path) -> Result<()> {
        let tmp_path = tmp_path_for(path);

        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(self.render().as_bytes())?;
            file.sync_all()?;
        }

        fs::rename(&tmp_path, path)?;

        #[cfg(unix)]
        {
            if let Some(parent) = path.parent() {
                if let Ok(dir_file) = File::open(parent) {
                    let _ = dir_file.sync_all();
                }
            }
        }

        Ok(())
    }

    /// Returns the facet with the given name.
    pub fn facet(&self, name: &FacetName) -> Option<&Facet> {
        self.facets.iter().find(|f| &f.name == name)
    }

    /// Returns the facet with the given name, mutably.
    pub fn facet_mut(&mut self, name: &FacetName) -> Option<&mut Facet> {
        self.facets.iter_mut().find(|f| &f.name == name)
    }

    /// Inserts a facet, replacing one with the same name in place.
    pub fn insert_facet(&mut self, facet: Facet) {
        match self.facets.iter_mut().find(|f| f.name == facet.name) {
            Some(existing) => *existing = facet,
            None => self.facets.push(facet),
        }
    }

    /// Removes and returns the named facet.
    pub fn remove_facet(&mut self, name: &FacetName) -> Option<Facet> {
        let idx = self.facets.iter().position(|f| &f.name == name)?;
        Some(self.facets.remove(idx))
    }

    /// Facets in file order.
    pub fn facets(&self) -> impl Iterator<Item = &Facet> {
        self.facets.iter()
    }

    /// Number of facets.
    pub fn len(&self) -> usize {
        self.facets.len()
    }

    /// Returns true if the store has no facets.
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    /// Numeric view: facet name -> key -> value, text values dropped.
    pub fn to_facet_map(&self) -> FacetMap {
        let mut map = FacetMap::new();
        for facet in &self.facets {
            map.insert(facet.name.to_string(), facet.numbers());
        }
        map
    }

    /// Builds a store from a numeric view.
    pub fn from_facet_map(map: &FacetMap) -> Self {
        let mut store = Self::new();
        for (name, values) in map {
            let mut facet = Facet::new(FacetName::parse(name));
            for (key, value) in values {
                facet.set(key.clone(), *value);
            }
            store.facets.push(facet);
        }
        store
    }

    fn position_or_insert(&mut self, name: FacetName) -> usize {
        match self.facets.iter().position(|f| f.name == name) {
            Some(idx) => idx,
            None => {
                self.facets.push(Facet::new(name));
                self.facets.len() - 1
            }
        }
    }
}

/// Path of a directory's store file of the given kind.
pub fn store_path(dir: &Path, config: &StoreConfig, kind: StoreKind) -> PathBuf {
    dir.join(config.file_name(kind))
}

fn push_comments(out: &mut String, comments: &[String]) {
    for comment in comments {
        out.push_str(comment);
        out.push('\n');
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
