//! Generic configuration parsing utilities.
//!
//! Reads a TOML file into any `DeserializeOwned` type. Read failures carry
//! the file operation context, parse failures become
//! [`ViewParamsError::ConfigParseError`] naming the file.
//!
//! ```rust,no_run
//! use view_params::config::parse_config;
//! use serde::Deserialize;
//! use std::path::Path;
//!
//! #[derive(Deserialize)]
//! struct Settings {
//!     default_view_extension: String,
//! }
//!
//! # fn example() -> anyhow::Result<()> {
//! let settings: Settings = parse_config(Path::new("view-params.toml"))?;
//! println!("extension: {}", settings.default_view_extension);
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use std::path::Path;

use crate::core::{FileOps, ViewParamsError};

/// Parse a TOML configuration file into the specified type.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The file contains invalid TOML syntax
/// - The TOML structure does not match `T`
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content =
        FileOps::read_with_context(path, "loading configuration", "config::parse_config")?;

    let parsed = toml::from_str(&content).map_err(|source| ViewParamsError::ConfigParseError {
        file: path.to_path_buf(),
        source,
    })?;

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        #[serde(default)]
        methods: Vec<String>,
    }

    #[test]
    fn test_parse_config_valid() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sample.toml");
        std::fs::write(&path, "name = \"views\"\nmethods = [\"render\"]\n").unwrap();

        let parsed: Sample = parse_config(&path).unwrap();
        assert_eq!(
            parsed,
            Sample {
                name: "views".to_string(),
                methods: vec!["render".to_string()],
            }
        );
    }

    #[test]
    fn test_parse_config_invalid_syntax() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("broken.toml");
        std::fs::write(&path, "name = [unclosed").unwrap();

        let error = parse_config::<Sample>(&path).unwrap_err();
        assert!(error.to_string().contains("Invalid configuration file syntax"));
        assert!(error.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_parse_config_missing_file() {
        let temp = tempdir().unwrap();
        let error = parse_config::<Sample>(&temp.path().join("absent.toml")).unwrap_err();
        assert!(error.to_string().contains("absent.toml"));
    }
}
