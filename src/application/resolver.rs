//! Application scope resolution with a per-project root cache.

use dashmap::DashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::{ApplicationId, ApplicationScope};
use crate::config::Project;
use crate::constants::CONTROLLERS_DIR;
use crate::utils::{
    components_below_canonical, lexical_components_below, normalize_separators, safe_canonicalize,
};

/// Cached root of one project, with the setting it was computed from.
#[derive(Debug, Clone)]
struct RootEntry {
    root_path: Option<String>,
    root: PathBuf,
    /// `None` when the root does not exist.
    canonical_root: Option<PathBuf>,
    /// The root itself has a `controllers` directory.
    single_application: bool,
}

/// Maps source files to the logical application they belong to.
///
/// The configured root of each project is resolved once and cached by
/// project base directory, together with whether the root is a single
/// application. A cached entry remembers the `root_path` setting it was
/// computed for and is recomputed when the setting differs, so a changed
/// setting is never answered from a stale entry. Call
/// [`invalidate`](Self::invalidate) when the directory layout on disk changes.
///
/// The resolver is safe to share between threads analysing different files.
///
/// # Examples
///
/// ```rust,no_run
/// use view_params::application::ApplicationScopeResolver;
/// use view_params::config::{Project, ProjectConfig};
/// use std::path::Path;
///
/// let project = Project::new("/srv/shop", ProjectConfig::default());
/// let resolver = ApplicationScopeResolver::new();
/// let file = Path::new("/srv/shop/frontend/controllers/SiteController.php");
/// let app = resolver.resolve(file, &project);
/// println!("application: {app}");
/// ```
#[derive(Debug, Default)]
pub struct ApplicationScopeResolver {
    roots: DashMap<PathBuf, RootEntry>,
}

impl ApplicationScopeResolver {
    /// Create a resolver with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The directory holding the project's application(s).
    pub fn root(&self, project: &Project) -> PathBuf {
        self.entry(project).root
    }

    fn entry(&self, project: &Project) -> RootEntry {
        let root_path = project.config.root_path.as_ref();
        if let Some(entry) = self.roots.get(&project.base_dir)
            && entry.root_path.as_ref() == root_path
        {
            return entry.clone();
        }

        let root = resolve_root(&project.base_dir, root_path.map(String::as_str));
        let single_application = root.join(CONTROLLERS_DIR).is_dir();
        debug!(
            "Resolved application root for {}: {} ({})",
            project.base_dir.display(),
            root.display(),
            if single_application { "single application" } else { "multiple applications" }
        );
        let entry = RootEntry {
            root_path: root_path.cloned(),
            canonical_root: safe_canonicalize(&root).ok(),
            root,
            single_application,
        };
        self.roots.insert(project.base_dir.clone(), entry.clone());
        entry
    }

    /// Drop the cached root and layout of the project based at `base_dir`.
    pub fn invalidate(&self, base_dir: &Path) {
        if self.roots.remove(base_dir).is_some() {
            debug!("Invalidated application root cache for {}", base_dir.display());
        }
    }

    /// Drop every cached root.
    pub fn invalidate_all(&self) {
        self.roots.clear();
    }

    /// The application `file` belongs to.
    pub fn resolve(&self, file: &Path, project: &Project) -> ApplicationId {
        self.scope(file, project).id
    }

    /// The application `file` belongs to, with the application directory and
    /// the file's position inside it.
    pub fn scope(&self, file: &Path, project: &Project) -> ApplicationScope {
        let RootEntry {
            root,
            canonical_root,
            single_application,
            ..
        } = self.entry(project);
        let below_root = lexical_components_below(&root, file).or_else(|| {
            components_below_canonical(canonical_root.as_deref()?, file)
        });

        if single_application {
            return ApplicationScope {
                id: ApplicationId::single(),
                relative_path: below_root.map(|parts| parts.join("/")),
                base_dir: root,
            };
        }

        match below_root {
            Some(parts) if parts.len() >= 2 => {
                let id = ApplicationId::new(&parts[0]);
                trace!("{} belongs to application '{}'", file.display(), id);
                ApplicationScope {
                    id,
                    base_dir: root.join(&parts[0]),
                    relative_path: Some(parts[1..].join("/")),
                }
            }
            _ => {
                trace!("{} is outside any application under {}", file.display(), root.display());
                ApplicationScope {
                    id: ApplicationId::unscoped(),
                    base_dir: root,
                    relative_path: None,
                }
            }
        }
    }
}

/// Resolve the configured root of a project.
///
/// Without an override the base directory is the root. An override naming an
/// existing directory (absolute, or relative to the base directory) is used
/// as is. Otherwise the override is walked below the base directory one
/// segment at a time and the deepest existing directory reached is returned.
pub fn resolve_root(base_dir: &Path, root_path: Option<&str>) -> PathBuf {
    let Some(root_path) = root_path else {
        return base_dir.to_path_buf();
    };

    let direct = Path::new(root_path);
    if direct.is_absolute() && direct.is_dir() {
        return direct.to_path_buf();
    }
    let joined = base_dir.join(direct);
    if !direct.is_absolute() && joined.is_dir() {
        return joined;
    }

    let normalized = normalize_separators(root_path);
    let mut relative = normalized.as_str();
    if let Some(stripped) = relative.strip_prefix("./") {
        relative = stripped;
    }
    if let Some(stripped) = relative.strip_prefix('/') {
        relative = stripped;
    }

    let mut current = base_dir.to_path_buf();
    for segment in relative.split('/').filter(|s| !s.is_empty()) {
        let child = current.join(segment);
        if !child.is_dir() {
            debug!(
                "Root path '{}' stops at missing segment '{}', using {}",
                root_path,
                segment,
                current.display()
            );
            break;
        }
        current = child;
    }
    current
}
