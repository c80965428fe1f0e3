//! Path helpers shared by scope resolution, key derivation and indexing.
//!
//! Template keys always use `/` separators regardless of platform, so the
//! helpers here convert between [`Path`]s and `/`-joined strings and perform
//! lexical normalization of `.`/`..` segments.

use anyhow::{Context, Result, anyhow};
use std::path::{Component, Path, PathBuf};

/// Safely canonicalizes a path, handling paths whose last component does not exist.
///
/// # Errors
/// Returns an error if neither the path nor its parent can be canonicalized
pub fn safe_canonicalize(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        if let Some(parent) = path.parent()
            && parent.exists()
        {
            let canonical_parent = parent.canonicalize().with_context(|| {
                format!("Failed to canonicalize parent of '{}'", path.display())
            })?;

            if let Some(file_name) = path.file_name() {
                return Ok(canonical_parent.join(file_name));
            }
        }
        return Err(anyhow!("Path does not exist: {}", path.display()));
    }

    path.canonicalize().with_context(|| format!("Failed to canonicalize path: {}", path.display()))
}

/// Returns the normal components of `path` below `base`, as strings.
///
/// The comparison is lexical first; when that fails both paths are
/// canonicalized and compared again, so symlinked or relative spellings of
/// the same location still match. Returns `None` when `path` is not under
/// `base`.
pub fn components_below(base: &Path, path: &Path) -> Option<Vec<String>> {
    if let Some(parts) = lexical_components_below(base, path) {
        return Some(parts);
    }
    let base = safe_canonicalize(base).ok()?;
    components_below_canonical(&base, path)
}

/// Like [`components_below`] without touching the filesystem.
pub fn lexical_components_below(base: &Path, path: &Path) -> Option<Vec<String>> {
    let relative = path.strip_prefix(base).ok()?;
    relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        .then(|| normal_components(relative))
}

/// Components of `path` below an already canonical `canonical_base`.
///
/// Only `path` is canonicalized.
pub fn components_below_canonical(canonical_base: &Path, path: &Path) -> Option<Vec<String>> {
    let path = safe_canonicalize(path).ok()?;
    path.strip_prefix(canonical_base).ok().map(normal_components)
}

fn normal_components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Converts Windows separators to `/`.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Lexically normalizes a `/`-separated path.
///
/// Empty and `.` segments are dropped and `..` removes the previous segment.
/// Returns `None` when `..` would climb above the first segment.
///
/// # Examples
///
/// ```
/// use view_params::utils::normalize_segments;
///
/// let normalized = normalize_segments("views//site/./../layouts/main");
/// assert_eq!(normalized.as_deref(), Some("views/layouts/main"));
/// assert_eq!(normalize_segments("../outside"), None);
/// ```
pub fn normalize_segments(path: &str) -> Option<String> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }
    Some(segments.join("/"))
}

/// Whether the last segment of a `/`-separated path carries a file extension.
pub fn has_extension(path: &str) -> bool {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    match file_name.rfind('.') {
        Some(dot) => dot > 0 && dot + 1 < file_name.len(),
        None => false,
    }
}
