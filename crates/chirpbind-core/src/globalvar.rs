//! Module-level fixtures, the analog of a generated binding layer's
//! global-variable namespace.
//!
//! Both fixtures live in static storage and are untracked: reading or
//! assigning them never creates a registry record of their own. Tracked
//! segments assigned into [`scratch_segment`] keep their record until they
//! are replaced or every handle drops.

use std::sync::{OnceLock, PoisonError, RwLock};

use crate::fixture::StrainSegment;

static UNIT_SEGMENT: OnceLock<StrainSegment> = OnceLock::new();
static SCRATCH_SEGMENT: OnceLock<SegmentCell> = OnceLock::new();

/// Constant shared fixture: a single unit sample.
///
/// Every call returns a handle to the same static segment; assigning it
/// anywhere can never produce a leak.
pub fn unit_segment() -> StrainSegment {
    UNIT_SEGMENT
        .get_or_init(|| StrainSegment::untracked(1.0, 0.0, vec![1.0]))
        .clone()
}

/// Assignable module-level segment slot.
pub fn scratch_segment() -> &'static SegmentCell {
    SCRATCH_SEGMENT.get_or_init(|| SegmentCell::new(unit_segment()))
}

/// An assignable slot holding one shared segment handle.
///
/// Replacing the occupant drops the previous handle at the point of
/// assignment, releasing its registry record if no other handle shares it.
#[derive(Debug)]
pub struct SegmentCell {
    slot: RwLock<StrainSegment>,
}

impl SegmentCell {
    pub fn new(seed: StrainSegment) -> Self {
        Self {
            slot: RwLock::new(seed),
        }
    }

    /// Read the current occupant, sharing its ownership.
    pub fn get(&self) -> StrainSegment {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the occupant, dropping the previous handle eagerly.
    pub fn set(&self, segment: StrainSegment) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = segment;
    }

    /// Replace the occupant and hand back the previous one.
    pub fn replace(&self, segment: StrainSegment) -> StrainSegment {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::AllocationRegistry;
    use std::sync::Arc;

    #[test]
    fn unit_segment_is_shared_and_untracked() {
        let a = unit_segment();
        let b = unit_segment();
        assert!(!a.is_tracked());
        assert_eq!(a.len(), b.len());
        // Both handles share the one static allocation.
        assert!(a.handle_count() >= 3);
    }

    #[test]
    fn cell_assignment_releases_the_replaced_segment() {
        let registry = Arc::new(AllocationRegistry::new());
        let cell = SegmentCell::new(unit_segment());

        let tracked = StrainSegment::new_in(&registry, 0.5, 15.0, vec![0.5; 4]);
        cell.set(tracked);
        // The cell now holds the only handle.
        assert_eq!(registry.live_count(), 1);

        cell.set(unit_segment());
        assert_eq!(registry.live_count(), 0);
        assert!(registry.check_leaks().is_ok());
    }

    #[test]
    fn replace_hands_back_the_previous_occupant() {
        let registry = Arc::new(AllocationRegistry::new());
        let cell = SegmentCell::new(unit_segment());

        let tracked = StrainSegment::new_in(&registry, 0.5, 15.0, vec![0.5; 4]);
        cell.set(tracked);
        let prev = cell.replace(unit_segment());
        assert!(prev.is_tracked());
        assert_eq!(registry.live_count(), 1);

        drop(prev);
        assert_eq!(registry.live_count(), 0);
    }
}
