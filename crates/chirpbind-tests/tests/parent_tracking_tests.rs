//! Cross-crate parent tracking: a child handle must keep its owning
//! template (and both registry records) alive until the child drops.

use chirpbind_core::globalvar::unit_segment;
use chirpbind_inspiral::ChirpTemplate;
use chirpbind_tests::isolated_registry;

#[test]
fn child_ref_keeps_template_alive_after_parent_drop() {
    let registry = isolated_registry();
    let template = ChirpTemplate::new_in(&registry, 1.4, 1.3);
    assert_eq!(registry.live_count(), 2); // template + its child segment

    let seg = template.segment();
    drop(template);

    // The template survives through the child handle; the segment is
    // still readable.
    assert_eq!(seg.template_handles(), 1);
    assert_eq!(registry.live_count(), 2);
    assert!(seg.rms().is_finite());
    assert!(seg.duration() > 0.0);

    drop(seg);
    assert!(registry.check_leaks().is_ok());
}

#[test]
fn repeated_child_reads_do_not_register_allocations() {
    let registry = isolated_registry();
    let template = ChirpTemplate::new_in(&registry, 1.4, 1.4);

    for _ in 0..100 {
        let seg = template.segment();
        assert!(!seg.is_empty());
    }

    assert_eq!(registry.live_count(), 2);
    assert_eq!(template.handle_count(), 1);
    drop(template);
    assert_eq!(registry.live_count(), 0);
}

#[test]
fn cross_crate_assignment_of_the_constant_is_clean() {
    let registry = isolated_registry();
    let template = ChirpTemplate::new_in(&registry, 2.0, 1.1);

    // Assigning the untracked constant replaces (and releases) the
    // template's own tracked child.
    template.set_segment(unit_segment());
    assert_eq!(registry.live_count(), 1);

    drop(template);
    assert!(registry.check_leaks().is_ok());
}

#[test]
fn rebinding_loop_mirrors_the_ownership_flow() {
    let registry = isolated_registry();
    let a = ChirpTemplate::new_in(&registry, 1.4, 1.4);
    let shared = ChirpTemplate::new_in(&registry, 1.9, 1.2);
    assert_eq!(registry.live_count(), 4);

    let mut b = None;
    let mut c = None;
    for _ in 0..7 {
        b = Some(a.segment());
        c = Some(shared.segment());
        shared.set_segment(unit_segment());
    }
    // shared's tracked child was replaced on the first iteration; c still
    // holds a handle to the occupant it read last.
    drop(c);
    drop(b);
    drop(shared);
    drop(a);

    assert_eq!(registry.live_count(), 0);
    assert!(registry.check_leaks().is_ok());
}

#[test]
fn child_refs_can_outlive_several_parent_generations() {
    let registry = isolated_registry();
    let mut refs = Vec::new();

    for _ in 0..3 {
        let template = ChirpTemplate::new_in(&registry, 1.4, 1.4);
        refs.push(template.segment());
        // template drops here; its allocations stay pinned by the ref
    }
    assert_eq!(registry.live_count(), 6);

    refs.clear();
    assert!(registry.check_leaks().is_ok());
}
