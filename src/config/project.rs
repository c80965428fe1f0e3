//! Per-project analysis settings.
//!
//! A project is identified by its base directory. Its settings live in an
//! optional `view-params.toml` next to the sources:
//!
//! ```toml
//! # Directory holding the framework application(s), relative to the base dir
//! root_path = "app"
//! # Extension appended to template paths written without one
//! default_view_extension = "php"
//! # Method names treated as render calls
//! render_methods = ["render", "renderAjax", "renderPartial"]
//!
//! [inspections]
//! # "batch" reports one finding per name, "interactive" groups them
//! mode = "batch"
//! missing_required = true
//! unused_supplied = true
//! ```
//!
//! Every key is optional. A missing file yields the defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::parser::parse_config;
use crate::constants::{CONFIG_FILE_NAME, DEFAULT_RENDER_METHODS, DEFAULT_VIEW_EXTENSION};
use crate::core::ViewParamsError;
use crate::inspection::InspectionOptions;

fn default_view_extension() -> String {
    DEFAULT_VIEW_EXTENSION.to_string()
}

fn default_render_methods() -> Vec<String> {
    DEFAULT_RENDER_METHODS.iter().map(|m| (*m).to_string()).collect()
}

/// Settings that influence how call sites and templates are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Optional override of the directory holding the application(s).
    ///
    /// Either an existing path (absolute, or relative to the project base dir)
    /// or a `/`-separated relative path that is walked segment by segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_path: Option<String>,

    /// Extension appended to template paths written without one, no leading dot.
    #[serde(default = "default_view_extension")]
    pub default_view_extension: String,

    /// Method names whose calls are checked.
    #[serde(default = "default_render_methods")]
    pub render_methods: Vec<String>,

    /// Which inspections run and how they report.
    #[serde(default)]
    pub inspections: InspectionOptions,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root_path: None,
            default_view_extension: default_view_extension(),
            render_methods: default_render_methods(),
            inspections: InspectionOptions::default(),
        }
    }
}

impl ProjectConfig {
    /// Load the configuration file of the project rooted at `base_dir`.
    ///
    /// Returns the defaults when `view-params.toml` does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if a value fails [`validate`](Self::validate).
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, base_dir.display());
            return Ok(Self::default());
        }

        let config: Self = parse_config(&path)
            .with_context(|| format!("Failed to load project config from {}", path.display()))?;
        config.normalized()
    }

    /// Check the settings and return them with the extension normalized.
    ///
    /// # Errors
    ///
    /// Returns [`ViewParamsError::ConfigError`] for an empty extension or an
    /// empty render method list.
    pub fn normalized(mut self) -> Result<Self> {
        self.default_view_extension =
            self.default_view_extension.trim().trim_start_matches('.').to_string();
        self.validate()?;
        Ok(self)
    }

    /// Validate the settings.
    ///
    /// # Errors
    ///
    /// Returns [`ViewParamsError::ConfigError`] describing the first invalid value.
    pub fn validate(&self) -> Result<(), ViewParamsError> {
        if self.default_view_extension.is_empty() {
            return Err(ViewParamsError::config("default_view_extension must not be empty"));
        }
        if self.default_view_extension.contains(['/', '\\']) {
            return Err(ViewParamsError::config(format!(
                "default_view_extension '{}' must not contain path separators",
                self.default_view_extension
            )));
        }
        if self.render_methods.iter().all(|m| m.trim().is_empty()) {
            return Err(ViewParamsError::config("render_methods must name at least one method"));
        }
        Ok(())
    }

    /// Whether `name` is one of the configured render methods.
    pub fn is_render_method(&self, name: &str) -> bool {
        self.render_methods.iter().any(|m| m == name)
    }
}

/// A project: its base directory together with its settings.
///
/// The base directory identifies the project for caching purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Project base directory
    pub base_dir: PathBuf,
    /// Analysis settings
    pub config: ProjectConfig,
}

impl Project {
    /// Create a project from a base directory and explicit settings.
    pub fn new(base_dir: impl Into<PathBuf>, config: ProjectConfig) -> Self {
        Self {
            base_dir: base_dir.into(),
            config,
        }
    }

    /// Open the project at `base_dir`, loading `view-params.toml` if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is invalid.
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        let config = ProjectConfig::load(&base_dir)?;
        Ok(Self {
            base_dir,
            config,
        })
    }
}
