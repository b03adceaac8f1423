//! Shared helpers for the chirpbind integration tests.

use std::sync::Arc;

use chirpbind_core::memory::AllocationRegistry;

/// Fresh registry isolated from the process-wide one, so concurrent tests
/// never observe each other's allocations.
pub fn isolated_registry() -> Arc<AllocationRegistry> {
    Arc::new(AllocationRegistry::new())
}
