//! # chirpbind-core
//!
//! Core handle-ownership layer for the chirpbind library family.
//!
//! This crate provides:
//! - **memory**: a process-wide allocation registry and leak checker that
//!   audit every tracked handle the library hands out
//! - **handle**: RAII registration guards and parent-tracked child handles
//!   (a child handle keeps its owning parent alive while it is reachable)
//! - **fixture**: the base payload type, [`StrainSegment`], a shared handle
//!   to a sampled strain series
//! - **globalvar**: module-level fixtures mirroring the global-variable
//!   namespace of a generated binding layer
//!
//! Release of tracked handles is deterministic and eager: the registry
//! record is released at the moment the last handle drops, never deferred,
//! so [`check_memory_leaks`] reflects outstanding allocations exactly.

pub mod errors;
pub mod fixture;
pub mod globalvar;
pub mod handle;
pub mod memory;

pub use errors::CoreError;
pub use fixture::StrainSegment;
pub use handle::{AllocGuard, ChildRef};
pub use memory::{AllocationRegistry, LeakReport, MemoryStats};

/// Version string of this crate.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Check the process-wide registry for outstanding tracked allocations.
///
/// Returns `Err(CoreError::LeakDetected)` carrying a per-tag report if any
/// tracked handle is still alive.
pub fn check_memory_leaks() -> Result<(), CoreError> {
    memory::global().check_leaks()
}
