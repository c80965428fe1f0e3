//! Logical applications sharing one source tree.
//!
//! A framework project either holds a single application (the configured root
//! contains `controllers/`) or several applications side by side
//! (`frontend/`, `backend/`, `console/`, ...). Templates and call sites are
//! only compared within the same application.
//!
//! - [`ApplicationId`] - interned application name
//! - [`ApplicationScope`] - application of a file together with its location
//! - [`ApplicationScopeResolver`] - maps files to scopes, caching the project root

mod resolver;

pub use resolver::ApplicationScopeResolver;

use dashmap::DashSet;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use crate::constants::{MODULES_DIR, SINGLE_APPLICATION_ID, VIEWS_DIR};

static INTERNED: OnceLock<DashSet<Arc<str>>> = OnceLock::new();

fn intern(name: &str) -> Arc<str> {
    let table = INTERNED.get_or_init(DashSet::new);
    if let Some(existing) = table.get(name) {
        return Arc::clone(existing.key());
    }
    let interned: Arc<str> = Arc::from(name);
    table.insert(Arc::clone(&interned));
    interned
}

/// Name of a logical application.
///
/// Ids are interned, so cloning is a reference-count bump. The empty id means
/// "unscoped": the file lies outside the root or directly in it. It is
/// compared like any other id.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApplicationId(Arc<str>);

impl ApplicationId {
    /// Intern `name` as an application id.
    pub fn new(name: &str) -> Self {
        Self(intern(name))
    }

    /// The id of a single-application project.
    pub fn single() -> Self {
        Self::new(SINGLE_APPLICATION_ID)
    }

    /// The empty id.
    pub fn unscoped() -> Self {
        Self::new("")
    }

    /// Whether this is the empty id.
    pub fn is_unscoped(&self) -> bool {
        self.0.is_empty()
    }

    /// The id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApplicationId({:?})", self.as_str())
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ApplicationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl From<&str> for ApplicationId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// The application a file belongs to and where the file sits inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationScope {
    /// Application id
    pub id: ApplicationId,
    /// Directory of the application (the root for single-application and unscoped files)
    pub base_dir: PathBuf,
    /// Path of the file below `base_dir`, `/`-separated, when the file is under it
    pub relative_path: Option<String>,
}

impl ApplicationScope {
    /// Segments of the file's directory below the application base.
    fn directory_segments(&self) -> Vec<&str> {
        let Some(relative) = self.relative_path.as_deref() else {
            return Vec::new();
        };
        let mut segments: Vec<&str> = relative.split('/').filter(|s| !s.is_empty()).collect();
        segments.pop();
        segments
    }

    /// Directory of the calling file below the application base, `/`-separated.
    pub fn file_directory(&self) -> Option<String> {
        self.relative_path.as_ref().map(|_| self.directory_segments().join("/"))
    }

    /// Prefix of the innermost module the file belongs to, e.g. `modules/admin/`.
    ///
    /// Nested modules (`modules/shop/modules/cart/...`) yield the deepest one.
    /// Empty when the file is not inside a module.
    pub fn module_prefix(&self) -> String {
        let segments = self.directory_segments();
        let mut end = 0;
        let mut i = 0;
        while i + 1 < segments.len() {
            if segments[i] == MODULES_DIR {
                end = i + 2;
                i += 2;
            } else {
                i += 1;
            }
        }
        if end == 0 {
            String::new()
        } else {
            format!("{}/", segments[..end].join("/"))
        }
    }

    /// Whether the file is itself a template (lies under a `views` directory).
    pub fn is_in_views(&self) -> bool {
        self.directory_segments().contains(&VIEWS_DIR)
    }
}
