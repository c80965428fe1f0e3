//! Per-call-site consistency checking.

use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

use super::supplied::{self, SuppliedParameters};
use super::{Finding, InspectionOptions, missing, unused};
use crate::application::ApplicationScopeResolver;
use crate::config::Project;
use crate::core::{CancellationToken, ViewParamsError};
use crate::syntax::{Expr, RenderCall};
use crate::view::{TemplateIndex, TemplatePathResolver};

/// Everything the judgments need about one call site.
pub(crate) struct CallSite<'a> {
    pub(crate) file: &'a Path,
    pub(crate) call: &'a RenderCall,
    /// Template argument as written, quotes included
    pub(crate) template_text: &'a str,
    pub(crate) required: BTreeSet<String>,
    pub(crate) supplied: SuppliedParameters,
    pub(crate) options: InspectionOptions,
}

/// Compares what render calls pass with what their templates read.
///
/// Each call site is judged on its own; the checker holds no state between
/// calls and can be shared between threads.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use view_params::application::ApplicationScopeResolver;
/// use view_params::config::Project;
/// use view_params::inspection::{ConsistencyChecker, InspectionOptions};
/// use view_params::view::MemoryTemplateIndex;
///
/// # fn example(calls: Vec<view_params::syntax::RenderCall>) -> anyhow::Result<()> {
/// let project = Project::open("/srv/shop")?;
/// let scopes = Arc::new(ApplicationScopeResolver::new());
/// let index = Arc::new(MemoryTemplateIndex::build(project.clone(), Arc::clone(&scopes))?);
/// let checker = ConsistencyChecker::new(project, scopes, index, InspectionOptions::default());
///
/// let file = std::path::Path::new("/srv/shop/frontend/controllers/SiteController.php");
/// for call in &calls {
///     for finding in checker.check_call(file, call) {
///         println!("{finding}");
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct ConsistencyChecker {
    project: Project,
    scopes: Arc<ApplicationScopeResolver>,
    index: Arc<dyn TemplateIndex>,
    resolver: TemplatePathResolver,
    options: InspectionOptions,
}

impl ConsistencyChecker {
    /// Create a checker for `project`.
    pub fn new(
        project: Project,
        scopes: Arc<ApplicationScopeResolver>,
        index: Arc<dyn TemplateIndex>,
        options: InspectionOptions,
    ) -> Self {
        let resolver = TemplatePathResolver::new(project.config.default_view_extension.clone());
        Self {
            project,
            scopes,
            index,
            resolver,
            options,
        }
    }

    /// Create a checker running the inspections configured for `project`.
    pub fn for_project(
        project: Project,
        scopes: Arc<ApplicationScopeResolver>,
        index: Arc<dyn TemplateIndex>,
    ) -> Self {
        let options = project.config.inspections;
        Self::new(project, scopes, index, options)
    }

    /// The options the checker runs with.
    pub fn options(&self) -> InspectionOptions {
        self.options
    }

    /// Judge one call appearing in `file`.
    ///
    /// Produces nothing when the method is not a render method, the template
    /// cannot be resolved, no template of the call's application is indexed
    /// under the key, or the supplied parameters cannot be determined.
    pub fn check_call(&self, file: &Path, call: &RenderCall) -> Vec<Finding> {
        if !self.project.config.is_render_method(&call.method) {
            trace!("'{}' is not a render method", call.method);
            return Vec::new();
        }
        let Some(template) = call.template_arg() else {
            return Vec::new();
        };
        let Expr::String(literal) = template else {
            trace!("Render call at {:?} has no literal template argument", call.span);
            return Vec::new();
        };

        let scope = self.scopes.scope(file, &self.project);
        let Some(key) = self.resolver.resolve(template, &scope, &call.caller) else {
            debug!(
                "Skipping call at {:?} in {}: template path unresolvable",
                call.span,
                file.display()
            );
            return Vec::new();
        };

        let records: Vec<_> = self
            .index
            .lookup(&key)
            .into_iter()
            .filter(|record| record.application == scope.id)
            .collect();
        if records.is_empty() {
            debug!(
                "Skipping call at {:?} in {}: no template {} in application '{}'",
                call.span,
                file.display(),
                key,
                scope.id
            );
            return Vec::new();
        }

        let supplied = match call.params_arg() {
            None => SuppliedParameters::default(),
            Some(argument) => match supplied::extract(argument) {
                Some(supplied) => supplied,
                None => {
                    debug!(
                        "Skipping call at {:?} in {}: supplied parameters unknown",
                        call.span,
                        file.display()
                    );
                    return Vec::new();
                }
            },
        };

        let site = CallSite {
            file,
            call,
            template_text: &literal.text,
            required: records.iter().flat_map(|record| record.parameters.iter().cloned()).collect(),
            supplied,
            options: self.options,
        };

        let mut findings = Vec::new();
        if self.options.missing_required {
            findings.extend(missing::report(&site));
        }
        if self.options.unused_supplied {
            findings.extend(unused::report(&site));
        }
        trace!("{} findings for {} at {:?}", findings.len(), key, call.span);
        findings
    }

    /// Judge every call of one file, checking `cancel` between call sites.
    ///
    /// # Errors
    ///
    /// Returns [`ViewParamsError::Cancelled`] once cancellation is requested;
    /// findings collected for the file so far are discarded.
    pub fn check_file(
        &self,
        file: &Path,
        calls: &[RenderCall],
        cancel: &CancellationToken,
    ) -> Result<Vec<Finding>, ViewParamsError> {
        let mut findings = Vec::new();
        for call in calls {
            cancel.check()?;
            findings.extend(self.check_call(file, call));
        }
        debug!("{} findings in {} ({} render calls)", findings.len(), file.display(), calls.len());
        Ok(findings)
    }

    /// Judge many files in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`ViewParamsError::Cancelled`] when cancellation is requested
    /// before every file is done.
    pub fn check_files(
        &self,
        files: &[(PathBuf, Vec<RenderCall>)],
        cancel: &CancellationToken,
    ) -> Result<Vec<Finding>, ViewParamsError> {
        let per_file: Vec<Vec<Finding>> = files
            .par_iter()
            .map(|(file, calls)| self.check_file(file, calls, cancel))
            .collect::<Result<_, _>>()?;
        Ok(per_file.into_iter().flatten().collect())
    }
}
