//! Root-relative path handling.
//!
//! Every directory is identified by a `/`-separated path relative to the
//! tracked root, with the root itself rendered as `"."`.

use crate::error::{AttnError, Result};
use std::path::{Component, Path, PathBuf};

/// Key used for the tracked root.
pub const ROOT_KEY: &str = ".";

/// Resolves `dir` (absolute, or relative to `root`) to an absolute path
/// inside `root`.
///
/// Normalization is lexical: `.` components are dropped and `..` pops a
/// component. Symlinks are not followed.
///
/// # Errors
///
/// Returns `OutsideRoot` if the result does not lie under `root`.
pub fn resolve_dir(root: &Path, dir: &Path) -> Result<PathBuf> {
    let joined = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        root.join(dir)
    };

    match normalize(&joined) {
        Some(normalized) if normalized.starts_with(root) => Ok(normalized),
        _ => Err(AttnError::OutsideRoot(joined)),
    }
}

/// Makes `root` absolute against the current directory and normalizes it
/// lexically, so `"."` and `"../proj"` work as roots.
///
/// # Errors
///
/// Returns `Io` if the current directory cannot be read, or `OutsideRoot`
/// if `..` climbs past the filesystem root.
pub fn absolute_root(root: &Path) -> Result<PathBuf> {
    let joined = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()?.join(root)
    };
    normalize(&joined).ok_or(AttnError::OutsideRoot(joined))
}

fn normalize(path: &Path) -> Option<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    return None;
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Some(normalized)
}

/// Renders `path` as a root-relative key.
///
/// # Errors
///
/// Returns `OutsideRoot` if `path` is not under `root`.
pub fn rel_key(root: &Path, path: &Path) -> Result<String> {
    let rel = path
        .strip_prefix(root)
        .map_err(|_| AttnError::OutsideRoot(path.to_path_buf()))?;

    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        Ok(ROOT_KEY.to_string())
    } else {
        Ok(parts.join("/"))
    }
}

/// Returns the keys of every proper ancestor of `key`, farthest first.
///
/// The root has no ancestors; `"a/b/c"` yields `[".", "a", "a/b"]`.
pub fn ancestor_keys(key: &str) -> Vec<String> {
    if key == ROOT_KEY {
        return Vec::new();
    }

    let parts: Vec<&str> = key.split('/').collect();
    let mut out = vec![ROOT_KEY.to_string()];
    for i in 1..parts.len() {
        out.push(parts[..i].join("/"));
    }
    out
}

/// Joins a root-relative key back onto `root`.
pub fn key_to_path(root: &Path, key: &str) -> PathBuf {
    if key == ROOT_KEY {
        root.to_path_buf()
    } else {
        key.split('/').fold(root.to_path_buf(), |acc, part| acc.join(part))
    }
}
