//! On-disk project fixtures.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::Project;
use crate::constants::{CONFIG_FILE_NAME, CONTROLLERS_DIR};

/// A temporary project directory laid out like a framework source tree.
///
/// The directory is deleted when the fixture is dropped.
pub struct ProjectFixture {
    temp_dir: TempDir,
}

impl ProjectFixture {
    /// An empty project directory.
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new().context("Failed to create project fixture directory")?,
        })
    }

    /// A single-application project: `controllers/` directly in the base directory.
    pub fn single_app() -> Result<Self> {
        let fixture = Self::new()?;
        fixture.mkdir(CONTROLLERS_DIR)?;
        Ok(fixture)
    }

    /// A multi-application project with one `<app>/controllers/` per name.
    pub fn multi_app(apps: &[&str]) -> Result<Self> {
        let fixture = Self::new()?;
        for app in apps {
            fixture.mkdir(&format!("{app}/{CONTROLLERS_DIR}"))?;
        }
        Ok(fixture)
    }

    /// Project base directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of a `/`-separated relative path inside the project.
    pub fn join(&self, relative: &str) -> PathBuf {
        relative.split('/').fold(self.path().to_path_buf(), |path, segment| path.join(segment))
    }

    /// Create a directory and its parents.
    pub fn mkdir(&self, relative: &str) -> Result<PathBuf> {
        let dir = self.join(relative);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        Ok(dir)
    }

    /// Write a file, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(&path, content)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        Ok(path)
    }

    /// Write the project configuration file.
    pub fn write_config(&self, toml: &str) -> Result<PathBuf> {
        self.write(CONFIG_FILE_NAME, toml)
    }

    /// Open the project, loading the configuration file if written.
    pub fn project(&self) -> Result<Project> {
        Project::open(self.path())
    }
}
