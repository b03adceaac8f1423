//! Allocation registry and leak checker.
//!
//! Every tracked handle the library hands out registers itself here with a
//! static tag and releases its record when the last handle drops. The leak
//! checker reads the registry and is the correctness oracle for ownership
//! tracking: a clean run releases everything before checking.
//!
//! Notes:
//! - Deterministic reporting: [`LeakReport`] entries are sorted by tag.
//! - Tracking can be disabled wholesale with [`AllocationRegistry::set_enabled`];
//!   releases of records that were never stored are no-ops, so guard drops
//!   stay infallible across enable/disable transitions.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use rustc_hash::FxHashMap;
use serde::Serialize;
use smallvec::SmallVec;

use crate::errors::CoreError;

/// Opaque id of one tracked allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllocationId(u64);

/// Registry statistics snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemoryStats {
    /// Records currently live.
    pub live: usize,
    /// Total records ever registered (while tracking was enabled).
    pub total_registered: u64,
    /// Total records released.
    pub total_released: u64,
    /// High-water mark of simultaneously live records.
    pub peak_live: usize,
}

/// One line of a leak report: a tag and how many of its records are live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeakEntry {
    pub tag: &'static str,
    pub count: usize,
}

/// Per-tag summary of live allocations, sorted by tag.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LeakReport {
    entries: SmallVec<[LeakEntry; 8]>,
}

impl LeakReport {
    /// True when no allocation is live.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of live allocations across all tags.
    pub fn live_total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Entries in tag order.
    pub fn entries(&self) -> &[LeakEntry] {
        &self.entries
    }
}

impl std::fmt::Display for LeakReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.entries.is_empty() {
            return write!(f, "no live allocations");
        }
        write!(f, "{} live allocations: ", self.live_total())?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} x{}", entry.tag, entry.count)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
struct RegistryInner {
    live: FxHashMap<u64, &'static str>,
    next_id: u64,
    total_registered: u64,
    total_released: u64,
    peak_live: usize,
    enabled: bool,
}

impl RegistryInner {
    fn new() -> Self {
        Self {
            live: FxHashMap::default(),
            next_id: 0,
            total_registered: 0,
            total_released: 0,
            peak_live: 0,
            enabled: true,
        }
    }
}

/// Thread-safe registry of live tracked allocations.
///
/// One process-wide instance backs the library's own handles (see
/// [`global`]); tests that need isolation construct their own and pass it
/// to the `*_in` fixture constructors.
#[derive(Debug)]
pub struct AllocationRegistry {
    inner: Mutex<RegistryInner>,
}

impl AllocationRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        // A poisoned lock means a panicked holder, not corrupt bookkeeping;
        // the counters remain usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register one allocation under `tag` and return its id.
    ///
    /// When tracking is disabled the id is still unique but no record is
    /// stored, and releasing it later is a no-op.
    pub fn register(&self, tag: &'static str) -> AllocationId {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        if inner.enabled {
            inner.live.insert(id, tag);
            inner.total_registered += 1;
            if inner.live.len() > inner.peak_live {
                inner.peak_live = inner.live.len();
            }
        }
        AllocationId(id)
    }

    /// Release the record for `id`. Unknown ids are ignored; returns whether
    /// a record was actually removed.
    pub fn release(&self, id: AllocationId) -> bool {
        let mut inner = self.lock();
        if inner.live.remove(&id.0).is_some() {
            inner.total_released += 1;
            true
        } else {
            false
        }
    }

    /// Number of records currently live.
    pub fn live_count(&self) -> usize {
        self.lock().live.len()
    }

    /// Enable or disable tracking of new registrations.
    pub fn set_enabled(&self, enabled: bool) {
        self.lock().enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.lock().enabled
    }

    /// Snapshot of the registry counters.
    pub fn stats(&self) -> MemoryStats {
        let inner = self.lock();
        MemoryStats {
            live: inner.live.len(),
            total_registered: inner.total_registered,
            total_released: inner.total_released,
            peak_live: inner.peak_live,
        }
    }

    /// Per-tag summary of live records, sorted by tag.
    pub fn leak_report(&self) -> LeakReport {
        let inner = self.lock();
        let mut counts: FxHashMap<&'static str, usize> = FxHashMap::default();
        for tag in inner.live.values().copied() {
            *counts.entry(tag).or_insert(0) += 1;
        }
        let mut entries: SmallVec<[LeakEntry; 8]> = counts
            .into_iter()
            .map(|(tag, count)| LeakEntry { tag, count })
            .collect();
        entries.sort_unstable_by_key(|e| e.tag);
        LeakReport { entries }
    }

    /// Fail with a [`CoreError::LeakDetected`] if any record is live.
    pub fn check_leaks(&self) -> Result<(), CoreError> {
        let report = self.leak_report();
        if report.is_empty() {
            Ok(())
        } else {
            Err(CoreError::LeakDetected(report))
        }
    }
}

impl Default for AllocationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: OnceLock<Arc<AllocationRegistry>> = OnceLock::new();

/// Process-wide default registry backing the library's tracked handles.
pub fn global() -> &'static Arc<AllocationRegistry> {
    GLOBAL.get_or_init(|| Arc::new(AllocationRegistry::new()))
}
