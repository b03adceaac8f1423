//! # chirpbind-inspiral
//!
//! Inspiral extension crate on top of `chirpbind-core`.
//!
//! Provides [`ChirpTemplate`], a tracked parent fixture whose child slot
//! holds a core [`chirpbind_core::StrainSegment`]; reading the child hands
//! out a [`SegmentRef`] that keeps the owning template alive (parent
//! tracking across the crate boundary). The [`selfcheck`] module runs the
//! ownership checks end to end against the module-level fixtures and the
//! process-wide leak checker.

pub mod errors;
pub mod fixture;
pub mod globalvar;
pub mod selfcheck;

pub use errors::InspiralError;
pub use fixture::{ChirpTemplate, SegmentRef};

/// Version string of this crate.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
