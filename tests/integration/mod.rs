//! Integration test suite for view-params
//!
//! These tests lay out framework projects on disk, build the template index
//! from them and judge render calls end to end.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! RUST_LOG=view_params=debug cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - `cancellation` - aborting batch checks
//! - `fixes` - applying fix actions and re-checking the result
//! - `index_lifecycle` - building, updating and pruning the template index
//! - `multi_application` - templates sharing a key across applications
//! - `resolution` - module, view, widget and alias template paths
//! - `root_path` - configured application roots

mod cancellation;
mod fixes;
mod index_lifecycle;
mod multi_application;
mod resolution;
mod root_path;

use anyhow::Result;
use std::sync::Arc;
use view_params::application::ApplicationScopeResolver;
use view_params::config::Project;
use view_params::inspection::{ConsistencyChecker, InspectionOptions};
use view_params::test_utils::ProjectFixture;
use view_params::view::MemoryTemplateIndex;

/// A checker wired to an index built from a fixture project.
pub struct Analysis {
    pub project: Project,
    pub scopes: Arc<ApplicationScopeResolver>,
    pub index: Arc<MemoryTemplateIndex>,
    pub checker: ConsistencyChecker,
}

impl Analysis {
    /// Build the index from disk and create a checker running `options`.
    pub fn new(fixture: &ProjectFixture, options: InspectionOptions) -> Result<Self> {
        let project = fixture.project()?;
        let scopes = Arc::new(ApplicationScopeResolver::new());
        let index = Arc::new(MemoryTemplateIndex::build(project.clone(), Arc::clone(&scopes))?);
        let checker =
            ConsistencyChecker::new(project.clone(), Arc::clone(&scopes), index.clone(), options);
        Ok(Self {
            project,
            scopes,
            index,
            checker,
        })
    }

    /// Like [`Analysis::new`], with the inspections configured for the project.
    pub fn configured(fixture: &ProjectFixture) -> Result<Self> {
        let project = fixture.project()?;
        let options = project.config.inspections;
        Self::new(fixture, options)
    }
}

/// Names reported by the findings, in report order.
pub fn reported(findings: &[view_params::inspection::Finding]) -> Vec<String> {
    findings.iter().flat_map(|finding| finding.parameters.iter().cloned()).collect()
}
