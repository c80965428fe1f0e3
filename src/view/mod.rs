//! Templates: identity, path resolution and the parameters they consume.
//!
//! - [`key`] - [`TemplateKey`], the canonical template identity
//! - [`resolver`] - turns a render call's path literal into a key
//! - [`parameters`] - scans a template for the variables it reads
//! - [`index`] - [`TemplateIndex`] and the in-memory [`MemoryTemplateIndex`]

pub mod index;
pub mod key;
pub mod parameters;
pub mod resolver;

pub use index::{MemoryTemplateIndex, TemplateIndex, TemplateRecord};
pub use key::TemplateKey;
pub use parameters::{ScanError, extract_parameters, try_extract_parameters};
pub use resolver::{ResolveMode, TemplatePathResolver, controller_id};
