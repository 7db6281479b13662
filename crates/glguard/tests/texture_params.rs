//! Texture parameter updates under combined state and binding scopes.

use glguard::{Error, ErrorKind, FilterMode, GlApi, Texture, TextureTarget, WrapMode};
use glguard_core::fake::FakeGl;

#[test]
fn test_wrap_params_touch_all_three_coordinates() {
    let gl = FakeGl::new();
    let mut texture = Texture::new(&gl, TextureTarget::Texture2D).unwrap();

    texture.set_wrap_params(WrapMode::Repeat).unwrap();

    assert_eq!(gl.calls("tex_parameter_i"), 3);
    assert_eq!(gl.bound(gl::TEXTURE_2D), 0);
}

#[test]
fn test_param_update_restores_the_target_capability() {
    let gl = FakeGl::new();
    gl.seed_capability(gl::TEXTURE_2D, false);
    let mut texture = Texture::new(&gl, TextureTarget::Texture2D).unwrap();

    texture.set_filter_params(FilterMode::Linear).unwrap();

    // Enabled for the duration of the call, back off afterwards.
    assert_eq!(gl.calls("enable"), 1);
    assert!(!gl.is_enabled(gl::TEXTURE_2D));
}

#[test]
fn test_targets_without_an_enable_bit_skip_the_state_scope() {
    let gl = FakeGl::new();
    let mut texture = Texture::new(&gl, TextureTarget::Rectangle).unwrap();

    texture.set_filter_params(FilterMode::Nearest).unwrap();

    assert_eq!(gl.calls("enable"), 0);
    assert_eq!(gl.calls("tex_parameter_i"), 2);
}

#[test]
fn test_set_params_combines_wrap_and_filter() {
    let gl = FakeGl::new();
    let mut texture = Texture::new(&gl, TextureTarget::Texture2D).unwrap();

    texture
        .set_params(WrapMode::ClampToEdge, FilterMode::Linear)
        .unwrap();

    // Three wrap coordinates plus two filters.
    assert_eq!(gl.calls("tex_parameter_i"), 5);
}

#[test]
fn test_bind_error_is_classified_and_attributed() {
    let gl = FakeGl::new();
    let mut texture = Texture::new(&gl, TextureTarget::Texture2D).unwrap();

    gl.fail_on("bind_texture", gl::INVALID_OPERATION);
    let err = texture.set_wrap_params(WrapMode::Repeat).unwrap_err();

    match err {
        Error::Call(call) => {
            assert_eq!(call.operation, "texture: failed to bind");
            assert_eq!(call.source.kind, ErrorKind::InvalidOperation);
            assert_eq!(
                call.detail,
                "the texture was previously created with another target"
            );
        }
        other => panic!("expected a call error, got {other:?}"),
    }
}

#[test]
fn test_param_error_is_classified_and_attributed() {
    let gl = FakeGl::new();
    let mut texture = Texture::new(&gl, TextureTarget::Texture2D).unwrap();

    gl.fail_on("tex_parameter_i", gl::INVALID_ENUM);
    let err = texture.set_wrap_params(WrapMode::Repeat).unwrap_err();

    match err {
        Error::Call(call) => {
            assert_eq!(call.operation, "texture: failed to set wrap params");
        }
        other => panic!("expected a call error, got {other:?}"),
    }
    // Binding and capability both restored on the error path.
    assert_eq!(gl.bound(gl::TEXTURE_2D), 0);
    assert!(!gl.is_enabled(gl::TEXTURE_2D));
}
