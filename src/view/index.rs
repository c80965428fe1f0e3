//! Template parameter index.
//!
//! The analysis only ever reads from the index through [`TemplateIndex`].
//! [`MemoryTemplateIndex`] is an in-memory implementation that scans a project
//! tree and can be kept current file by file; any host-owned store that can
//! answer lookups by key works equally well.

use anyhow::{Context, Result};
use dashmap::DashMap;
use glob::{MatchOptions, Pattern};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::hash::BuildHasher;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use super::key::TemplateKey;
use super::parameters::extract_parameters;
use crate::application::{ApplicationId, ApplicationScopeResolver};
use crate::config::Project;
use crate::constants::VIEWS_DIR;
use crate::core::file_error::FileOperationContext;
use crate::core::{FileOperation, FileOperationError, FileOps};

/// What one template file consumes.
///
/// Several records may share a key when different applications contain a
/// template at the same relative location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateRecord {
    /// Application the template file belongs to
    pub application: ApplicationId,
    /// Canonical key of the template
    pub key: TemplateKey,
    /// Concrete file
    pub path: PathBuf,
    /// Names of the variables the template reads without assigning
    pub parameters: BTreeSet<String>,
}

/// Read access to template records.
pub trait TemplateIndex: Send + Sync {
    /// All records stored under `key`, across every application.
    fn lookup(&self, key: &TemplateKey) -> Vec<Arc<TemplateRecord>>;
}

impl<S> TemplateIndex for HashMap<TemplateKey, Vec<Arc<TemplateRecord>>, S>
where
    S: BuildHasher + Send + Sync,
{
    fn lookup(&self, key: &TemplateKey) -> Vec<Arc<TemplateRecord>> {
        self.get(key).cloned().unwrap_or_default()
    }
}

/// Concurrent in-memory template index for one project.
///
/// Lookups may run from any number of threads while files are upserted or
/// removed; a reader sees either the previous or the new record of a file,
/// never a partially updated key.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use view_params::application::ApplicationScopeResolver;
/// use view_params::config::Project;
/// use view_params::view::{MemoryTemplateIndex, TemplateIndex, TemplateKey};
///
/// # fn example() -> anyhow::Result<()> {
/// let project = Project::open("/srv/shop")?;
/// let index = MemoryTemplateIndex::build(project, Arc::new(ApplicationScopeResolver::new()))?;
/// let records = index.lookup(&TemplateKey::from_canonical("@app/views/site/index.php"));
/// for record in records {
///     println!("{} ({}): {:?}", record.path.display(), record.application, record.parameters);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MemoryTemplateIndex {
    project: Project,
    scopes: Arc<ApplicationScopeResolver>,
    records: DashMap<TemplateKey, Vec<Arc<TemplateRecord>>>,
    files: DashMap<PathBuf, TemplateKey>,
}

impl MemoryTemplateIndex {
    /// Create an empty index for `project`.
    pub fn new(project: Project, scopes: Arc<ApplicationScopeResolver>) -> Self {
        Self {
            project,
            scopes,
            records: DashMap::new(),
            files: DashMap::new(),
        }
    }

    /// Create an index for `project` and fill it from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured view extension does not form a
    /// valid file pattern.
    pub fn build(project: Project, scopes: Arc<ApplicationScopeResolver>) -> Result<Self> {
        let index = Self::new(project, scopes);
        index.rescan()?;
        Ok(index)
    }

    /// The project this index covers.
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Drop every record and scan the application root again.
    ///
    /// Every file matching `**/views/**/*.<ext>` below the root is read and
    /// extracted in parallel. Invalid UTF-8 is replaced before extraction; files
    /// that cannot be read at all are logged and left out. Returns the number
    /// of templates indexed.
    ///
    /// # Errors
    ///
    /// Returns an error if the template file pattern is invalid.
    pub fn rescan(&self) -> Result<usize> {
        let root = self.scopes.root(&self.project);
        let extension = &self.project.config.default_view_extension;
        let pattern_str = format!("**/{VIEWS_DIR}/**/*.{}", Pattern::escape(extension));
        let pattern = Pattern::new(&pattern_str)
            .with_context(|| format!("Invalid template pattern: {pattern_str}"))?;
        let options = MatchOptions {
            require_literal_separator: true,
            ..MatchOptions::new()
        };

        self.records.clear();
        self.files.clear();

        let mut candidates = Vec::new();
        for entry in WalkDir::new(&root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(root.as_path()).to_path_buf();
                    let context = FileOperationContext::new(
                        FileOperation::Walk,
                        path,
                        "indexing templates",
                        "view::index",
                    );
                    let error = FileOperationError::new(context, std::io::Error::from(e));
                    warn!("{}", error.user_message());
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&root) else {
                continue;
            };
            let relative = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if pattern.matches_with(&relative, options) {
                trace!("Template candidate: {}", relative);
                candidates.push(entry.into_path());
            }
        }

        let skipped = AtomicUsize::new(0);
        candidates.par_iter().for_each(|path| {
            let read = FileOps::read_lossy_with_context(path, "indexing template", "view::index");
            let content = match read {
                Ok(content) => content,
                Err(e) => {
                    warn!("{}", e.user_message());
                    skipped.fetch_add(1, Ordering::Relaxed);
                    return;
                }
            };
            if self.upsert_file(path, &content).is_none() {
                skipped.fetch_add(1, Ordering::Relaxed);
            }
        });

        let indexed = self.files.len();
        debug!(
            "Indexed {} templates under {} ({} skipped)",
            indexed,
            root.display(),
            skipped.load(Ordering::Relaxed)
        );
        Ok(indexed)
    }

    /// Index `content` as the current text of the template file at `path`.
    ///
    /// Replaces any record the file had before. A file that is not a template
    /// of this project (not below a `views` directory of an application) is
    /// dropped from the index instead. Returns the file's key when indexed.
    pub fn upsert_file(&self, path: &Path, content: &str) -> Option<TemplateKey> {
        let scope = self.scopes.scope(path, &self.project);
        let Some(key) = TemplateKey::for_template_file(&scope.base_dir, path) else {
            trace!("{} is not a template, not indexed", path.display());
            self.remove_file(path);
            return None;
        };

        let record = Arc::new(TemplateRecord {
            application: scope.id,
            key: key.clone(),
            path: path.to_path_buf(),
            parameters: extract_parameters(content),
        });
        trace!(
            "Indexed {} as {} with parameters {:?}",
            path.display(),
            key,
            record.parameters
        );

        if let Some(previous) = self.files.insert(path.to_path_buf(), key.clone())
            && previous != key
        {
            self.remove_record(&previous, path);
        }

        let mut records = self.records.entry(key.clone()).or_default();
        records.retain(|r| r.path != path);
        records.push(record);
        Some(key)
    }

    /// Drop the record of the file at `path`. Returns whether it was indexed.
    pub fn remove_file(&self, path: &Path) -> bool {
        match self.files.remove(path) {
            Some((_, key)) => {
                self.remove_record(&key, path);
                debug!("Removed template {} from index", path.display());
                true
            }
            None => false,
        }
    }

    fn remove_record(&self, key: &TemplateKey, path: &Path) {
        let now_empty = match self.records.get_mut(key) {
            Some(mut records) => {
                records.retain(|r| r.path != path);
                records.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.records.remove_if(key, |_, records| records.is_empty());
        }
    }

    /// Number of indexed template files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no template is indexed.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl TemplateIndex for MemoryTemplateIndex {
    fn lookup(&self, key: &TemplateKey) -> Vec<Arc<TemplateRecord>> {
        self.records.get(key).map(|records| records.value().clone()).unwrap_or_default()
    }
}
