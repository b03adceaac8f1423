//! Template fixture with a cross-crate parent-tracked child slot.

use std::ops::Deref;
use std::sync::{Arc, PoisonError, RwLock};

use chirpbind_core::handle::{AllocGuard, ChildRef};
use chirpbind_core::memory::{self, AllocationRegistry};
use chirpbind_core::StrainSegment;

/// Registry tag for chirp template allocations.
pub const TEMPLATE_TAG: &str = "chirp_template";

const SAMPLE_RATE: f64 = 4096.0;
const F_START: f64 = 30.0;
const SEGMENT_SAMPLES: usize = 64;

/// Chirp mass of a binary with component masses `m1`, `m2` (solar masses).
pub fn chirp_mass(m1: f64, m2: f64) -> f64 {
    (m1 * m2).powf(0.6) / (m1 + m2).powf(0.2)
}

// Newtonian-order stand-in waveform: a short sweep starting at F_START,
// amplitude scaled by the chirp mass.
fn synthesize_samples(m1: f64, m2: f64) -> Vec<f64> {
    let mc = chirp_mass(m1, m2);
    let amplitude = mc.powf(5.0 / 3.0) * 1e-21;
    let delta_t = 1.0 / SAMPLE_RATE;
    let mut phase = 0.0f64;
    (0..SEGMENT_SAMPLES)
        .map(|i| {
            let f = F_START * (1.0 + 0.5 * i as f64 / SEGMENT_SAMPLES as f64);
            phase += 2.0 * std::f64::consts::PI * f * delta_t;
            amplitude * phase.cos()
        })
        .collect()
}

#[derive(Debug)]
struct TemplateInner {
    _guard: Option<AllocGuard>,
    mass1: f64,
    mass2: f64,
    segment: RwLock<StrainSegment>,
}

/// Tracked parent fixture: a template owning a strain segment child slot.
///
/// Construction registers the template and a freshly tracked child segment.
/// Reading the child via [`ChirpTemplate::segment`] hands out a
/// [`SegmentRef`] that keeps this template alive; assigning via
/// [`ChirpTemplate::set_segment`] shares ownership of the incoming segment
/// and drops the replaced one at the point of assignment.
#[derive(Debug, Clone)]
pub struct ChirpTemplate {
    inner: Arc<TemplateInner>,
}

impl ChirpTemplate {
    /// New tracked template in the process-wide registry.
    pub fn new(mass1: f64, mass2: f64) -> Self {
        Self::new_in(memory::global(), mass1, mass2)
    }

    /// New tracked template in an explicit registry.
    pub fn new_in(registry: &Arc<AllocationRegistry>, mass1: f64, mass2: f64) -> Self {
        let guard = AllocGuard::new(registry, TEMPLATE_TAG);
        let segment = StrainSegment::new_in(
            registry,
            1.0 / SAMPLE_RATE,
            F_START,
            synthesize_samples(mass1, mass2),
        );
        Self::build(Some(guard), mass1, mass2, segment)
    }

    /// New untracked template for fixtures with static storage; its child
    /// slot starts at the untracked constant segment.
    pub(crate) fn untracked(mass1: f64, mass2: f64) -> Self {
        Self::build(None, mass1, mass2, chirpbind_core::globalvar::unit_segment())
    }

    fn build(guard: Option<AllocGuard>, mass1: f64, mass2: f64, segment: StrainSegment) -> Self {
        Self {
            inner: Arc::new(TemplateInner {
                _guard: guard,
                mass1,
                mass2,
                segment: RwLock::new(segment),
            }),
        }
    }

    /// Read the child slot, keeping this template alive through the
    /// returned handle. Repeated reads register nothing new.
    pub fn segment(&self) -> SegmentRef {
        let child = self
            .inner
            .segment
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        SegmentRef {
            inner: ChildRef::new(child, Arc::clone(&self.inner)),
        }
    }

    /// Assign the child slot, dropping the previous occupant eagerly.
    pub fn set_segment(&self, segment: StrainSegment) {
        *self
            .inner
            .segment
            .write()
            .unwrap_or_else(PoisonError::into_inner) = segment;
    }

    pub fn mass1(&self) -> f64 {
        self.inner.mass1
    }

    pub fn mass2(&self) -> f64 {
        self.inner.mass2
    }

    /// Chirp mass of this template's binary.
    pub fn chirp_mass(&self) -> f64 {
        chirp_mass(self.inner.mass1, self.inner.mass2)
    }

    /// Whether this template holds a registry record.
    pub fn is_tracked(&self) -> bool {
        self.inner._guard.is_some()
    }

    /// Number of handles keeping this template alive, child refs included.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

/// Child handle into a template's segment slot.
///
/// Dereferences to the segment and keeps the owning [`ChirpTemplate`]
/// alive until dropped.
#[derive(Debug, Clone)]
pub struct SegmentRef {
    inner: ChildRef<StrainSegment, TemplateInner>,
}

impl SegmentRef {
    /// Strong count on the owning template, including this handle's share.
    pub fn template_handles(&self) -> usize {
        self.inner.parent_handles()
    }

    /// Drop the template keep-alive and return the bare segment handle.
    pub fn into_segment(self) -> StrainSegment {
        self.inner.into_child()
    }
}

impl Deref for SegmentRef {
    type Target = StrainSegment;

    fn deref(&self) -> &StrainSegment {
        &self.inner
    }
}
