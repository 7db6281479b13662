//! Framebuffer attachment and completeness validation.

use glguard::{
    Attachment, Error, ErrorKind, Framebuffer, FramebufferTarget, Texture, TextureTarget,
};
use glguard_core::fake::FakeGl;

#[test]
fn test_attach_2d_runs_under_a_scoped_bind() {
    let gl = FakeGl::new();
    let texture = Texture::new(&gl, TextureTarget::Texture2D).unwrap();
    let mut framebuffer = Framebuffer::new(&gl, FramebufferTarget::Framebuffer).unwrap();

    framebuffer
        .attach_2d(Attachment::Color(0), &texture, 0)
        .unwrap();

    assert_eq!(gl.calls("framebuffer_texture_2d"), 1);
    assert_eq!(gl.bound(gl::FRAMEBUFFER), 0);
}

#[test]
fn test_attach_error_names_the_operation() {
    let gl = FakeGl::new();
    let texture = Texture::new(&gl, TextureTarget::Texture2D).unwrap();
    let mut framebuffer = Framebuffer::new(&gl, FramebufferTarget::Framebuffer).unwrap();

    gl.fail_on("framebuffer_texture_2d", gl::INVALID_OPERATION);
    let err = framebuffer
        .attach_2d(Attachment::Depth, &texture, 0)
        .unwrap_err();

    match err {
        Error::Call(call) => {
            assert_eq!(call.operation, "framebuffer: failed to attach texture");
            assert_eq!(call.source.kind, ErrorKind::InvalidOperation);
        }
        other => panic!("expected a call error, got {other:?}"),
    }
    // The binding slot was restored on the error path.
    assert_eq!(gl.bound(gl::FRAMEBUFFER), 0);
}

#[test]
fn test_status_reports_complete_by_default() {
    let gl = FakeGl::new();
    let mut framebuffer = Framebuffer::new(&gl, FramebufferTarget::Framebuffer).unwrap();

    let status = framebuffer.status().unwrap();

    assert!(status.complete());
    assert_eq!(status.describe(), "framebuffer complete");
    assert_eq!(gl.bound(gl::FRAMEBUFFER), 0);
}

#[test]
fn test_incomplete_status_carries_a_message() {
    let gl = FakeGl::new();
    let mut framebuffer = Framebuffer::new(&gl, FramebufferTarget::Framebuffer).unwrap();
    gl.set_framebuffer_status(gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT);

    let status = framebuffer.status().unwrap();

    assert!(!status.complete());
    assert!(status.describe().contains("missing attachment"));
    assert_eq!(status.raw, gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT);
}

#[test]
fn test_unknown_status_is_not_swallowed() {
    let gl = FakeGl::new();
    let mut framebuffer = Framebuffer::new(&gl, FramebufferTarget::Framebuffer).unwrap();
    gl.set_framebuffer_status(0x1234);

    let status = framebuffer.status().unwrap();

    assert!(!status.complete());
    assert_eq!(status.describe(), "unknown framebuffer status");
}

#[test]
fn test_layered_attach_uses_the_level_only_entry_point() {
    let gl = FakeGl::new();
    let texture = Texture::new(&gl, TextureTarget::Array2D).unwrap();
    let mut framebuffer = Framebuffer::new(&gl, FramebufferTarget::Framebuffer).unwrap();

    framebuffer
        .attach(Attachment::Color(1), &texture, 0)
        .unwrap();

    assert_eq!(gl.calls("framebuffer_texture"), 1);
    assert_eq!(gl.calls("framebuffer_texture_2d"), 0);
}
