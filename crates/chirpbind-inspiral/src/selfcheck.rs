//! Library self-checks for load sanity and cross-crate parent tracking.
//!
//! These run against the module-level fixtures and the process-wide
//! registry. Every local handle acquired during a check is dropped before
//! the leak check runs; any handle the caller withholds will surface in
//! the reported leak.

use crate::errors::InspiralError;
use crate::fixture::ChirpTemplate;
use crate::globalvar;

/// Default parent-tracking loop count. More than one iteration is needed to
/// catch an off-by-one in handle counting; the exact count is not
/// load-bearing.
pub const DEFAULT_ITERATIONS: usize = 7;

/// Verify both crates are present and their module-level fixtures are
/// readable.
pub fn module_load() -> Result<(), InspiralError> {
    if chirpbind_core::version().is_empty() {
        return Err(InspiralError::Check(
            "chirpbind-core reports no version".into(),
        ));
    }
    if crate::version().is_empty() {
        return Err(InspiralError::Check(
            "chirpbind-inspiral reports no version".into(),
        ));
    }

    let unit = chirpbind_core::globalvar::unit_segment();
    if unit.is_empty() {
        return Err(InspiralError::Check(
            "constant segment fixture has no samples".into(),
        ));
    }

    let scratch = chirpbind_core::globalvar::scratch_segment().get();
    if !scratch.delta_t().is_finite() {
        return Err(InspiralError::Check(
            "scratch segment fixture is unreadable".into(),
        ));
    }

    let shared = globalvar::shared_template().segment();
    if !shared.delta_t().is_finite() {
        return Err(InspiralError::Check(
            "shared template fixture is unreadable".into(),
        ));
    }

    Ok(())
}

/// Exercise cross-crate parent tracking and assert the registry is clean.
///
/// Constructs one tracked template, then `iterations` times: reads the
/// instance child, reads the shared fixture's child, and assigns the core
/// constant segment into the shared fixture's slot. Rebinding on each
/// iteration drops the previous child handles eagerly. All local handles
/// are then dropped explicitly before the process-wide leak check.
pub fn parent_tracking(iterations: usize) -> Result<(), InspiralError> {
    let a = ChirpTemplate::new(1.4, 1.4);
    let mut b = None;
    let mut c = None;

    for _ in 0..iterations {
        let instance_child = a.segment();
        if !instance_child.rms().is_finite() {
            return Err(InspiralError::Check(
                "instance child segment is unreadable".into(),
            ));
        }
        b = Some(instance_child);

        c = Some(globalvar::shared_template().segment());
        globalvar::shared_template().set_segment(chirpbind_core::globalvar::unit_segment());
    }

    drop(c);
    drop(b);
    drop(a);

    chirpbind_core::check_memory_leaks()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the process-wide registry is not contended; every
    // other test in this crate uses its own registry.
    #[test]
    fn self_checks_pass_end_to_end() -> Result<(), InspiralError> {
        module_load()?;
        parent_tracking(DEFAULT_ITERATIONS)?;
        parent_tracking(0)?;
        parent_tracking(1)?;
        chirpbind_core::check_memory_leaks()?;
        Ok(())
    }
}
