//! Shader compilation, program linking, activation, and the uniform cache.

use glguard::{Error, ErrorKind, Program, ScopedBindRef, Shader, ShaderKind};
use glguard_core::fake::FakeGl;

const VERTEX_SRC: &str = "void main() { gl_Position = vec4(0.0); }";

#[test]
fn test_successful_compile_has_an_empty_log() {
    let gl = FakeGl::new();
    let shader = Shader::new(&gl, ShaderKind::Vertex).unwrap();

    shader.source(VERTEX_SRC).unwrap();
    let result = shader.compile().unwrap();

    assert!(result.success);
    assert!(result.info.is_empty());
    assert_eq!(gl.calls("compile_shader"), 1);
}

#[test]
fn test_failed_compile_returns_the_info_log() {
    let gl = FakeGl::new();
    let shader = Shader::new(&gl, ShaderKind::Fragment).unwrap();
    gl.set_compile_failure(shader.id(), "0:1: syntax error");

    shader.source("not glsl").unwrap();
    let result = shader.compile().unwrap();

    assert!(!result.success);
    assert_eq!(result.info, "0:1: syntax error");
}

#[test]
fn test_failed_link_returns_the_info_log() {
    let gl = FakeGl::new();
    let mut program = Program::new(&gl).unwrap();
    gl.set_link_failure(program.id(), "unresolved varying");

    let result = program.link().unwrap();

    assert!(!result.success);
    assert_eq!(result.info, "unresolved varying");
}

#[cfg(feature = "validate-programs")]
#[test]
fn test_validation_failure_reports_like_a_link_failure() {
    let gl = FakeGl::new();
    let mut program = Program::new(&gl).unwrap();
    gl.set_validate_failure(program.id(), "samplers of different types use the same unit");

    let result = program.link().unwrap();

    assert!(!result.success);
    assert!(result.info.contains("samplers"));
    assert_eq!(gl.calls("validate_program"), 1);
}

#[test]
fn test_attach_and_link_pipeline() {
    let gl = FakeGl::new();
    let shader = Shader::new(&gl, ShaderKind::Vertex).unwrap();
    shader.source(VERTEX_SRC).unwrap();
    assert!(shader.compile().unwrap().success);

    let mut program = Program::new(&gl).unwrap();
    program.attach(&shader).unwrap();
    let result = program.link().unwrap();

    assert!(result.success);
    assert_eq!(gl.calls("attach_shader"), 1);
    assert_eq!(gl.calls("link_program"), 1);
}

#[test]
fn test_attach_error_names_the_operation() {
    let gl = FakeGl::new();
    let shader = Shader::new(&gl, ShaderKind::Vertex).unwrap();
    let program = Program::new(&gl).unwrap();

    gl.fail_on("attach_shader", gl::INVALID_OPERATION);
    let err = program.attach(&shader).unwrap_err();

    match err {
        Error::Call(call) => {
            assert_eq!(call.operation, "program: failed to attach");
            assert_eq!(call.source.kind, ErrorKind::InvalidOperation);
        }
        other => panic!("expected a call error, got {other:?}"),
    }
}

#[test]
fn test_scoped_use_restores_program_zero() {
    let gl = FakeGl::new();
    let program = Program::new(&gl).unwrap();

    {
        let _active = ScopedBindRef::new(&program).unwrap();
        assert_eq!(gl.active_program(), program.id());
    }

    assert_eq!(gl.active_program(), 0);
}

#[test]
fn test_uniform_locations_are_memoized_until_relink() {
    let gl = FakeGl::new();
    let mut program = Program::new(&gl).unwrap();
    program.link().unwrap();

    let first = program.uniform_location("u_projection").unwrap();
    let second = program.uniform_location("u_projection").unwrap();
    assert_eq!(first, second);
    assert_eq!(gl.calls("get_uniform_location"), 1);

    // Relinking invalidates the cache wholesale.
    program.link().unwrap();
    let third = program.uniform_location("u_projection").unwrap();
    assert_eq!(third, first);
    assert_eq!(gl.calls("get_uniform_location"), 2);
}

#[test]
fn test_missing_uniform_is_reported_by_name() {
    let gl = FakeGl::new();
    let program = Program::new(&gl).unwrap();
    gl.set_uniform_missing(program.id(), "u_missing");

    let err = program.uniform_location("u_missing").unwrap_err();
    assert!(err.to_string().contains("u_missing"));
}
