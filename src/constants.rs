//! Global constants used throughout the view-params codebase.
//!
//! Names of framework directories, default settings and the builtin that
//! forwards local variables under their own names. Keeping them in one place
//! makes the layout conventions the analysis relies on easy to find.

/// Application id returned for single-application projects.
///
/// A project whose root directly contains a `controllers` directory has only
/// one logical application, always named `app`.
pub const SINGLE_APPLICATION_ID: &str = "app";

/// Directory whose presence under the root marks a single-application layout.
pub const CONTROLLERS_DIR: &str = "controllers";

/// Directory segment that holds view templates.
pub const VIEWS_DIR: &str = "views";

/// Directory segment that holds nested modules.
pub const MODULES_DIR: &str = "modules";

/// Alias every application-local template key is rooted at.
pub const APP_ALIAS: &str = "@app";

/// Class-name suffix identifying controllers.
pub const CONTROLLER_SUFFIX: &str = "Controller";

/// Variable-aggregation builtin recognized as a parameter argument.
pub const AGGREGATION_BUILTIN: &str = "compact";

/// Default file extension appended to template paths without one.
pub const DEFAULT_VIEW_EXTENSION: &str = "php";

/// Name of the optional per-project configuration file.
pub const CONFIG_FILE_NAME: &str = "view-params.toml";

/// Method names treated as render calls unless configured otherwise.
pub const DEFAULT_RENDER_METHODS: &[&str] = &["render", "renderAjax", "renderPartial"];

/// Variables that are always in scope inside a template and never parameters.
///
/// `$this` is the view object the template is rendered by; the rest are
/// PHP superglobals.
pub const IMPLICIT_TEMPLATE_VARIABLES: &[&str] = &[
    "this",
    "GLOBALS",
    "_SERVER",
    "_GET",
    "_POST",
    "_FILES",
    "_COOKIE",
    "_SESSION",
    "_REQUEST",
    "_ENV",
    "http_response_header",
    "argc",
    "argv",
];
