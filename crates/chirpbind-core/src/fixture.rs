//! Base payload type: a shared handle to a sampled strain series.

use std::sync::Arc;

use crate::handle::AllocGuard;
use crate::memory::{self, AllocationRegistry};

/// Registry tag for strain segment allocations.
pub const SEGMENT_TAG: &str = "strain_segment";

#[derive(Debug)]
struct SegmentInner {
    _guard: Option<AllocGuard>,
    delta_t: f64,
    f0: f64,
    samples: Vec<f64>,
}

/// Shared handle to a uniformly sampled strain series.
///
/// `Clone` shares the underlying allocation; no new registry record is
/// created. Tracked segments release their record when the last handle
/// drops. Segments backing static fixtures are untracked and never appear
/// in a leak report.
#[derive(Debug, Clone)]
pub struct StrainSegment {
    inner: Arc<SegmentInner>,
}

impl StrainSegment {
    /// New tracked segment in the process-wide registry.
    pub fn new(delta_t: f64, f0: f64, samples: Vec<f64>) -> Self {
        Self::new_in(memory::global(), delta_t, f0, samples)
    }

    /// New tracked segment in an explicit registry.
    pub fn new_in(
        registry: &Arc<AllocationRegistry>,
        delta_t: f64,
        f0: f64,
        samples: Vec<f64>,
    ) -> Self {
        Self::build(
            Some(AllocGuard::new(registry, SEGMENT_TAG)),
            delta_t,
            f0,
            samples,
        )
    }

    /// New untracked segment, for fixtures with static storage.
    pub(crate) fn untracked(delta_t: f64, f0: f64, samples: Vec<f64>) -> Self {
        Self::build(None, delta_t, f0, samples)
    }

    fn build(guard: Option<AllocGuard>, delta_t: f64, f0: f64, samples: Vec<f64>) -> Self {
        Self {
            inner: Arc::new(SegmentInner {
                _guard: guard,
                delta_t,
                f0,
                samples,
            }),
        }
    }

    /// Sample interval in seconds.
    pub fn delta_t(&self) -> f64 {
        self.inner.delta_t
    }

    /// Start frequency in Hz.
    pub fn f0(&self) -> f64 {
        self.inner.f0
    }

    pub fn len(&self) -> usize {
        self.inner.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.samples.is_empty()
    }

    pub fn samples(&self) -> &[f64] {
        &self.inner.samples
    }

    /// Segment duration in seconds.
    pub fn duration(&self) -> f64 {
        self.inner.delta_t * self.inner.samples.len() as f64
    }

    /// Root-mean-square strain; zero for an empty segment.
    pub fn rms(&self) -> f64 {
        if self.inner.samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = self.inner.samples.iter().map(|s| s * s).sum();
        (sum_sq / self.inner.samples.len() as f64).sqrt()
    }

    /// Whether this segment holds a registry record.
    pub fn is_tracked(&self) -> bool {
        self.inner._guard.is_some()
    }

    /// Number of handles sharing this segment.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}
