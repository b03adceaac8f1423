//! Error types for the inspiral crate.

use thiserror::Error;

use chirpbind_core::CoreError;

/// Errors reported by the inspiral crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum InspiralError {
    /// Failure propagated from the core ownership layer, including a
    /// failed leak check.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A self-check observed an inconsistent fixture.
    #[error("self-check error: {0}")]
    Check(String),
}
