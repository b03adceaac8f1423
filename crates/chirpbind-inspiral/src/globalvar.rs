//! Module-level fixtures for the inspiral crate.

use std::sync::OnceLock;

use crate::fixture::ChirpTemplate;

static SHARED_TEMPLATE: OnceLock<ChirpTemplate> = OnceLock::new();

/// Assignable module-level template fixture.
///
/// The template itself lives in static storage and is untracked; its child
/// slot starts at the core constant segment and can be read and assigned
/// across the crate boundary. Whatever tracked segment is assigned into it
/// stays live (and visible to the leak checker) until replaced.
pub fn shared_template() -> &'static ChirpTemplate {
    SHARED_TEMPLATE.get_or_init(|| ChirpTemplate::untracked(1.4, 1.4))
}
