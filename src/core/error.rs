//! Error handling for view-params
//!
//! The analysis itself never fails: unresolvable call sites, missing index data
//! and unparsable templates all degrade to "no finding" and are only logged.
//! The errors in this module cover the setup around the analysis: loading and
//! validating configuration, reading files while building the in-memory index,
//! applying fix edits, and cooperative cancellation of a file traversal.
//!
//! # Examples
//!
//! ```rust,no_run
//! use view_params::core::ViewParamsError;
//!
//! fn check() -> Result<(), ViewParamsError> {
//!     Err(ViewParamsError::Cancelled)
//! }
//!
//! match check() {
//!     Err(ViewParamsError::Cancelled) => println!("analysis interrupted"),
//!     Err(e) => eprintln!("{e}"),
//!     Ok(()) => {}
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

use super::file_error::FileOperationError;

/// The main error type for view-params operations.
///
/// # Error Categories
///
/// - [`ConfigError`](ViewParamsError::ConfigError) - a configuration value is invalid
/// - [`ConfigParseError`](ViewParamsError::ConfigParseError) - the configuration file is not
///   valid TOML
/// - [`InvalidEdit`](ViewParamsError::InvalidEdit) - fix edits overlap or fall outside the source
/// - [`Cancelled`](ViewParamsError::Cancelled) - a traversal was cancelled between call sites
/// - [`FileOperation`](ViewParamsError::FileOperation) - a file could not be read, with context
#[derive(Error, Debug)]
pub enum ViewParamsError {
    /// A configuration value failed validation.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the invalid setting
        message: String,
    },

    /// The configuration file could not be parsed.
    #[error("Invalid configuration file syntax in {file}")]
    ConfigParseError {
        /// Path of the configuration file
        file: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// Text edits could not be applied to a source text.
    #[error("Cannot apply edit at {start}..{end}: {reason}")]
    InvalidEdit {
        /// Start offset of the offending edit
        start: usize,
        /// End offset of the offending edit
        end: usize,
        /// Why the edit was rejected
        reason: String,
    },

    /// The analysis was cancelled; findings collected so far were discarded.
    #[error("Analysis cancelled")]
    Cancelled,

    /// A file operation failed.
    #[error(transparent)]
    FileOperation(#[from] Box<FileOperationError>),
}

impl ViewParamsError {
    /// Shorthand for a [`ConfigError`](ViewParamsError::ConfigError).
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Returns `true` when the error only signals cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<FileOperationError> for ViewParamsError {
    fn from(error: FileOperationError) -> Self {
        Self::FileOperation(Box::new(error))
    }
}
