//! Configuration for view-params.
//!
//! - [`ProjectConfig`] - per-project settings from `view-params.toml`
//! - [`Project`] - a base directory together with its settings
//! - [`parse_config`] - generic TOML loading with file context

mod parser;
mod project;

pub use parser::parse_config;
pub use project::{Project, ProjectConfig};
