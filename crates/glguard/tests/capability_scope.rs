//! Capability state restoration across scopes.

use glguard::{Capability, GlApi, StateScope};
use glguard_core::fake::FakeGl;

#[test]
fn test_enabled_capabilities_revert_when_the_scope_ends() {
    let gl = FakeGl::new();
    gl.seed_capability(gl::BLEND, false);
    gl.seed_capability(gl::SCISSOR_TEST, false);

    {
        let mut scope = StateScope::new(&gl);
        scope
            .enable(Capability::Blend)
            .enable(Capability::ScissorTest);
        assert!(gl.is_enabled(gl::BLEND));
        assert!(gl.is_enabled(gl::SCISSOR_TEST));
    }

    assert!(!gl.is_enabled(gl::BLEND));
    assert!(!gl.is_enabled(gl::SCISSOR_TEST));
}

#[test]
fn test_commit_makes_changes_outlive_the_scope() {
    let gl = FakeGl::new();
    gl.seed_capability(gl::DEPTH_TEST, false);

    {
        let mut scope = StateScope::new(&gl);
        scope.enable(Capability::DepthTest);
        scope.commit();
    }

    assert!(gl.is_enabled(gl::DEPTH_TEST));
}

#[test]
fn test_mixed_toggles_restore_their_own_baselines() {
    let gl = FakeGl::new();
    gl.seed_capability(gl::CULL_FACE, true);
    gl.seed_capability(gl::BLEND, false);

    {
        let mut scope = StateScope::new(&gl);
        scope.disable(Capability::CullFace).enable(Capability::Blend);
    }

    assert!(gl.is_enabled(gl::CULL_FACE));
    assert!(!gl.is_enabled(gl::BLEND));
}

#[test]
fn test_redundant_enables_suppress_host_traffic() {
    let gl = FakeGl::new();

    let mut scope = StateScope::new(&gl);
    scope.enable(Capability::Blend);
    scope.enable(Capability::Blend);
    assert_eq!(gl.calls("enable"), 1);

    scope.disable(Capability::Blend);
    scope.disable(Capability::Blend);
    assert_eq!(gl.calls("disable"), 1);
}
