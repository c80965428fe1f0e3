//! Canonical template identities.

use serde::{Serialize, Serializer};
use std::fmt;
use std::path::Path;

use crate::constants::{APP_ALIAS, VIEWS_DIR};
use crate::utils::{components_below, has_extension, normalize_segments};

/// Canonical identity of a template: `@<alias>/<path>.<ext>`.
///
/// Application-local templates are keyed under `@app/` followed by their path
/// below the application directory, e.g. `@app/views/site/index.php` or
/// `@app/modules/admin/views/default/index.php`. Keys compare by exact string
/// equality.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateKey(String);

impl TemplateKey {
    /// Build a key from an alias (`@app`, `@common`, ...) and a path below it.
    ///
    /// The path is normalized and `default_extension` appended when its last
    /// segment has none. Returns `None` for an empty path or one that climbs
    /// above the alias root.
    pub fn from_alias_path(alias: &str, path: &str, default_extension: &str) -> Option<Self> {
        let normalized = normalize_segments(path)?;
        if normalized.is_empty() {
            return None;
        }
        let mut key = format!("{alias}/{normalized}");
        if !has_extension(&normalized) {
            key.push('.');
            key.push_str(default_extension);
        }
        Some(Self(key))
    }

    /// Derive the key of a template file inside an application directory.
    ///
    /// Only files below a `views` directory are templates. Returns `None` for
    /// any other file or for files outside `application_dir`.
    pub fn for_template_file(application_dir: &Path, file: &Path) -> Option<Self> {
        let parts = components_below(application_dir, file)?;
        let (_, directories) = parts.split_last()?;
        if !directories.iter().any(|segment| segment == VIEWS_DIR) {
            return None;
        }
        Some(Self(format!("{APP_ALIAS}/{}", parts.join("/"))))
    }

    /// Wrap a string that is already a canonical key.
    pub fn from_canonical(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TemplateKey({:?})", self.0)
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for TemplateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
