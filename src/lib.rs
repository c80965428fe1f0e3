//! view-params - render call / view template consistency analysis
//!
//! Checks that the calls rendering a view template (`$this->render('index', [...])`)
//! pass exactly the parameters the template reads, in framework projects that
//! host several logical applications (`frontend`, `backend`, `console`, ...)
//! in one source tree.
//!
//! # Architecture Overview
//!
//! The host parses source files and hands every render-method call over as a
//! [`syntax::RenderCall`]. For each call:
//!
//! 1. the containing file is mapped to its application
//!    ([`application::ApplicationScopeResolver`])
//! 2. the template path literal is canonicalized into a [`view::TemplateKey`]
//!    ([`view::TemplatePathResolver`])
//! 3. the templates stored under that key are looked up and filtered to the
//!    call's application ([`view::TemplateIndex`])
//! 4. the names the call passes are extracted from its second argument
//!    ([`inspection::supplied`])
//! 5. both sets are compared and findings with fix actions are produced
//!    ([`inspection::ConsistencyChecker`])
//!
//! Anything that cannot be determined statically (a dynamic template path, a
//! parameter argument that is not a literal, a template missing from the index)
//! silences the call site instead of guessing.
//!
//! # Core Modules
//!
//! ## Analysis
//! - [`application`] - logical applications and the per-project root cache
//! - [`view`] - template keys, path resolution, parameter extraction and the index
//! - [`inspection`] - the missing/unused judgments, findings and fix edits
//!
//! ## Supporting Modules
//! - [`config`] - project settings (`view-params.toml`)
//! - [`constants`] - framework layout conventions and defaults
//! - [`core`] - error types and cancellation
//! - [`syntax`] - the expression shapes exchanged with the host parser
//! - [`utils`] - path helpers
//!
//! # Configuration (view-params.toml)
//!
//! ```toml
//! root_path = "apps"
//! default_view_extension = "php"
//! render_methods = ["render", "renderAjax", "renderPartial"]
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use view_params::application::ApplicationScopeResolver;
//! use view_params::config::Project;
//! use view_params::core::CancellationToken;
//! use view_params::inspection::{ConsistencyChecker, InspectionOptions};
//! use view_params::view::MemoryTemplateIndex;
//!
//! # use std::path::PathBuf;
//! # use view_params::syntax::RenderCall;
//! # fn example(files: Vec<(PathBuf, Vec<RenderCall>)>) -> anyhow::Result<()> {
//! let project = Project::open("/srv/shop")?;
//! let scopes = Arc::new(ApplicationScopeResolver::new());
//! let index = Arc::new(MemoryTemplateIndex::build(project.clone(), Arc::clone(&scopes))?);
//! let checker = ConsistencyChecker::new(project, scopes, index, InspectionOptions::default());
//!
//! for finding in checker.check_files(&files, &CancellationToken::new())? {
//!     println!("{finding}");
//! }
//! # Ok(())
//! # }
//! ```

// Analysis
pub mod application;
pub mod inspection;
pub mod view;

// Supporting modules
pub mod config;
pub mod constants;
pub mod core;
pub mod syntax;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
