//! RAII registration guards and parent-tracked child handles.
//!
//! [`AllocGuard`] ties one registry record to the lifetime of the inner
//! struct that owns it. [`ChildRef`] implements parent tracking: a handle
//! to a child value that also holds the owning parent's `Arc`, so the
//! parent (and its registry record) stays alive as long as the child
//! handle is reachable.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::memory::{AllocationId, AllocationRegistry};

/// RAII guard for one registry record.
///
/// Registered on construction, released on drop. Dropping never fails:
/// releasing a record the registry does not hold (e.g. registered while
/// tracking was disabled) is a no-op.
#[derive(Debug)]
pub struct AllocGuard {
    id: AllocationId,
    registry: Arc<AllocationRegistry>,
}

impl AllocGuard {
    /// Register one allocation under `tag` in `registry`.
    pub fn new(registry: &Arc<AllocationRegistry>, tag: &'static str) -> Self {
        Self {
            id: registry.register(tag),
            registry: Arc::clone(registry),
        }
    }

    /// The registry this guard is registered in.
    pub fn registry(&self) -> &Arc<AllocationRegistry> {
        &self.registry
    }
}

impl Drop for AllocGuard {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

/// Child handle that keeps its owning parent alive.
///
/// Holds the child value by shared handle and the parent's `Arc`. The
/// parent's allocation is released only when the last handle into it
/// (parent handle or child ref) drops; release is eager, at that drop
/// point, never finalizer-deferred.
pub struct ChildRef<C, P> {
    child: C,
    parent: Arc<P>,
}

impl<C, P> ChildRef<C, P> {
    pub fn new(child: C, parent: Arc<P>) -> Self {
        Self { child, parent }
    }

    /// Drop the parent keep-alive and return the bare child value.
    pub fn into_child(self) -> C {
        self.child
    }

    /// Strong count on the owning parent, including this handle's share.
    pub fn parent_handles(&self) -> usize {
        Arc::strong_count(&self.parent)
    }
}

impl<C, P> Deref for ChildRef<C, P> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.child
    }
}

impl<C: Clone, P> Clone for ChildRef<C, P> {
    fn clone(&self) -> Self {
        Self {
            child: self.child.clone(),
            parent: Arc::clone(&self.parent),
        }
    }
}

impl<C: fmt::Debug, P> fmt::Debug for ChildRef<C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildRef")
            .field("child", &self.child)
            .field("parent_handles", &Arc::strong_count(&self.parent))
            .finish()
    }
}
