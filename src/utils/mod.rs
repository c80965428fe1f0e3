//! Cross-platform path utilities.

pub mod path;

pub use path::{
    components_below, components_below_canonical, has_extension, lexical_components_below,
    normalize_segments, normalize_separators, safe_canonicalize,
};
