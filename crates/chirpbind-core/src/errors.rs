//! Error types for the core ownership layer.

use thiserror::Error;

use crate::memory::LeakReport;

/// Errors reported by the core crate.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error
/// variants without breaking changes. All public APIs return
/// `Result<T, CoreError>`; library code never panics.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CoreError {
    /// The leak checker found tracked allocations still alive.
    #[error("memory leak check failed: {0}")]
    LeakDetected(LeakReport),

    /// Internal error (programmer error, not user error).
    #[error("internal error: {0}")]
    Internal(String),
}
