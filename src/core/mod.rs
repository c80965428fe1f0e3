//! Core types shared by every analysis component.
//!
//! - [`error`] - the crate error type [`ViewParamsError`]
//! - [`file_error`] - file operation errors that carry the operation site context
//! - [`CancellationToken`] - cooperative cancellation for file traversals

pub mod error;
pub mod file_error;

pub use error::ViewParamsError;
pub use file_error::{FileOperation, FileOperationError, FileResultExt, FileOps};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation flag shared between the host and a traversal.
///
/// The analysis checks the token between call sites and stops with
/// [`ViewParamsError::Cancelled`]. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every traversal holding a clone of this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Return [`ViewParamsError::Cancelled`] once cancellation has been requested.
    pub fn check(&self) -> Result<(), ViewParamsError> {
        if self.is_cancelled() {
            Err(ViewParamsError::Cancelled)
        } else {
            Ok(())
        }
    }
}
