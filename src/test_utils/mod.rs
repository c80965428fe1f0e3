//! Test utilities for view-params
//!
//! Helpers shared by unit and integration tests:
//! - [`ProjectFixture`] - a temporary framework project with applications,
//!   controllers and view templates on disk
//! - [`SourceCall`] - a render call together with the source text its spans
//!   point into, for checking findings and applying fixes
//!
//! # Example
//!
//! ```rust,no_run
//! use view_params::test_utils::{ProjectFixture, init_test_logging};
//!
//! init_test_logging(None);
//! let fixture = ProjectFixture::multi_app(&["frontend", "backend"]).unwrap();
//! fixture.write("frontend/views/site/index.php", "<?= $title ?>").unwrap();
//! let project = fixture.project().unwrap();
//! ```

pub mod calls;
pub mod fixtures;

pub use calls::SourceCall;
pub use fixtures::ProjectFixture;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Initializes the tracing subscriber once, no matter how often it is called.
/// Uses `level` when given, otherwise the `RUST_LOG` environment variable;
/// with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=view_params=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
