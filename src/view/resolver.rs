//! Resolution of a render call's template path literal into a [`TemplateKey`].
//!
//! The literal selects where the path is anchored:
//!
//! | Literal          | Anchored at                                          |
//! |------------------|------------------------------------------------------|
//! | `//site/index`   | the application's view root, `@app/views/`           |
//! | `@alias/x`       | the alias (`@app`, or the call's own application)    |
//! | `/site/index`    | the current module's view root                       |
//! | `index`          | the controller's, view's or widget's own directory   |
//!
//! The result uses the same format [`TemplateKey::for_template_file`] derives
//! from real files, so a resolved key can be looked up in the index directly.

use tracing::trace;

use super::key::TemplateKey;
use crate::application::ApplicationScope;
use crate::constants::{APP_ALIAS, CONTROLLER_SUFFIX, VIEWS_DIR};
use crate::syntax::{CallerContext, Expr};

/// How a template path literal is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// `//path`: relative to the application's view root
    ApplicationAbsolute,
    /// `@alias/path`: relative to an alias
    Alias,
    /// `/path`: relative to the current module's view root
    ModuleAbsolute,
    /// `path`: relative to the calling controller, view or widget
    Relative,
}

impl ResolveMode {
    /// Classify a raw template path literal.
    pub fn of(path: &str) -> Self {
        if path.starts_with("//") {
            ResolveMode::ApplicationAbsolute
        } else if path.starts_with('@') {
            ResolveMode::Alias
        } else if path.starts_with('/') {
            ResolveMode::ModuleAbsolute
        } else {
            ResolveMode::Relative
        }
    }
}

/// Canonicalizes template path literals.
#[derive(Debug, Clone)]
pub struct TemplatePathResolver {
    default_extension: String,
}

impl TemplatePathResolver {
    /// Create a resolver appending `default_extension` to paths without one.
    pub fn new(default_extension: impl Into<String>) -> Self {
        Self {
            default_extension: default_extension.into(),
        }
    }

    /// Resolve the template argument of a call.
    ///
    /// Only a non-interpolated string literal is resolvable; any other
    /// expression yields `None`.
    pub fn resolve(
        &self,
        literal: &Expr,
        scope: &ApplicationScope,
        caller: &CallerContext,
    ) -> Option<TemplateKey> {
        let path = literal.as_static_string()?;
        let key = self.resolve_path(path, scope, caller);
        trace!("Template path '{}' resolved to {:?}", path, key);
        key
    }

    /// Resolve raw template path text.
    pub fn resolve_path(
        &self,
        path: &str,
        scope: &ApplicationScope,
        caller: &CallerContext,
    ) -> Option<TemplateKey> {
        if path.is_empty() {
            return None;
        }

        match ResolveMode::of(path) {
            ResolveMode::ApplicationAbsolute => {
                self.key(APP_ALIAS, &format!("{VIEWS_DIR}/{}", &path[2..]))
            }
            ResolveMode::Alias => {
                let (alias, rest) = path.split_once('/')?;
                let own_alias = !scope.id.is_unscoped() && alias[1..] == *scope.id.as_str();
                if alias == APP_ALIAS || own_alias {
                    self.key(APP_ALIAS, rest)
                } else {
                    self.key(alias, rest)
                }
            }
            ResolveMode::ModuleAbsolute => {
                let module = scope.module_prefix();
                self.key(APP_ALIAS, &format!("{module}{VIEWS_DIR}/{}", &path[1..]))
            }
            ResolveMode::Relative => self.resolve_relative(path, scope, caller),
        }
    }

    fn resolve_relative(
        &self,
        path: &str,
        scope: &ApplicationScope,
        caller: &CallerContext,
    ) -> Option<TemplateKey> {
        if let Some(class_name) = caller.class_short_name()
            && let Some(controller) = class_name.strip_suffix(CONTROLLER_SUFFIX)
            && !controller.is_empty()
        {
            let module = scope.module_prefix();
            let id = controller_id(controller);
            return self.key(APP_ALIAS, &format!("{module}{VIEWS_DIR}/{id}/{path}"));
        }

        let directory = scope.file_directory()?;
        if scope.is_in_views() {
            return self.key(APP_ALIAS, &format!("{directory}/{path}"));
        }

        // Widgets and other view-rendering classes keep their templates next to them
        caller.class_name.as_ref()?;
        if directory.is_empty() {
            self.key(APP_ALIAS, &format!("{VIEWS_DIR}/{path}"))
        } else {
            self.key(APP_ALIAS, &format!("{directory}/{VIEWS_DIR}/{path}"))
        }
    }

    fn key(&self, alias: &str, path: &str) -> Option<TemplateKey> {
        TemplateKey::from_alias_path(alias, path, &self.default_extension)
    }
}

/// Convert a controller class name without its suffix into a controller id.
///
/// Words are lowercased and joined by `-`; a run of capitals stays one word.
///
/// ```
/// use view_params::view::controller_id;
///
/// assert_eq!(controller_id("Site"), "site");
/// assert_eq!(controller_id("PostComment"), "post-comment");
/// assert_eq!(controller_id("HTMLExport"), "htmlexport");
/// ```
pub fn controller_id(name: &str) -> String {
    let mut id = String::with_capacity(name.len() + 4);
    let mut previous_upper = true;
    for ch in name.chars() {
        if ch.is_uppercase() {
            if !previous_upper {
                id.push('-');
            }
            id.extend(ch.to_lowercase());
            previous_upper = true;
        } else {
            id.push(ch);
            previous_upper = false;
        }
    }
    id
}
