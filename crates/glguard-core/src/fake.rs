//! In-memory stand-in for the host context, for unit tests.
//!
//! [`FakeGl`] models exactly the state the real host keeps globally: the
//! bound handle per target, the capability bits, the active program, and
//! the sticky error register. It additionally counts every entry point by
//! name and supports one-shot failure injection, so tests can assert on
//! call traffic and on error attribution without a live context.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::os::raw::c_void;
use std::ptr::NonNull;

use gl::types::{GLenum, GLint, GLuint};

use crate::api::GlApi;

#[derive(Default)]
struct FakeState {
    next_handle: GLuint,
    live: BTreeSet<GLuint>,
    deleted: Vec<GLuint>,
    bound: BTreeMap<GLenum, GLuint>,
    active_program: GLuint,
    caps: BTreeMap<GLenum, bool>,
    sticky: GLenum,
    armed_failure: Option<GLenum>,
    named_failures: BTreeMap<String, GLenum>,
    mapped_targets: BTreeSet<GLenum>,
    calls: BTreeMap<&'static str, usize>,
    shader_logs: BTreeMap<GLuint, String>,
    program_logs: BTreeMap<GLuint, String>,
    failed_compiles: BTreeSet<GLuint>,
    failed_links: BTreeSet<GLuint>,
    failed_validations: BTreeSet<GLuint>,
    missing_uniforms: BTreeSet<(GLuint, String)>,
    uniforms: BTreeMap<(GLuint, String), GLint>,
    next_uniform_location: GLint,
    framebuffer_status: Option<GLenum>,
}

impl FakeState {
    /// Count a state-changing entry point. An armed one-shot failure lands
    /// in the sticky register here, attributing it to this call.
    fn record(&mut self, name: &'static str) -> bool {
        *self.calls.entry(name).or_insert(0) += 1;
        if let Some(raw) = self.armed_failure.take() {
            self.sticky = raw;
            return true;
        }
        if let Some(raw) = self.named_failures.remove(name) {
            self.sticky = raw;
            return true;
        }
        false
    }

    /// Count a query entry point. Queries never consume an armed failure.
    fn note(&mut self, name: &'static str) {
        *self.calls.entry(name).or_insert(0) += 1;
    }

    fn alloc(&mut self) -> GLuint {
        self.next_handle += 1;
        self.live.insert(self.next_handle);
        self.next_handle
    }

    fn release(&mut self, id: GLuint) {
        self.live.remove(&id);
        self.deleted.push(id);
    }
}

/// Instrumented in-memory host.
pub struct FakeGl {
    state: RefCell<FakeState>,
}

impl FakeGl {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(FakeState::default()),
        }
    }

    /// Put a raw code straight into the sticky register.
    pub fn set_error(&self, raw: GLenum) {
        self.state.borrow_mut().sticky = raw;
    }

    /// Arm a failure that the *next* state-changing call will raise.
    pub fn fail_next(&self, raw: GLenum) {
        self.state.borrow_mut().armed_failure = Some(raw);
    }

    /// Arm a one-shot failure for the next run of the named entry point.
    pub fn fail_on(&self, name: &str, raw: GLenum) {
        self.state
            .borrow_mut()
            .named_failures
            .insert(name.to_owned(), raw);
    }

    /// How many times the named entry point ran.
    pub fn calls(&self, name: &str) -> usize {
        self.state.borrow().calls.get(name).copied().unwrap_or(0)
    }

    /// Handle currently bound to `target` (0 when empty).
    pub fn bound(&self, target: GLenum) -> GLuint {
        self.state.borrow().bound.get(&target).copied().unwrap_or(0)
    }

    pub fn active_program(&self) -> GLuint {
        self.state.borrow().active_program
    }

    /// Set a capability bit without counting a call, to model pre-existing
    /// host state.
    pub fn seed_capability(&self, cap: GLenum, enabled: bool) {
        self.state.borrow_mut().caps.insert(cap, enabled);
    }

    pub fn is_live(&self, id: GLuint) -> bool {
        self.state.borrow().live.contains(&id)
    }

    pub fn was_deleted(&self, id: GLuint) -> bool {
        self.state.borrow().deleted.contains(&id)
    }

    pub fn is_mapped(&self, target: GLenum) -> bool {
        self.state.borrow().mapped_targets.contains(&target)
    }

    pub fn set_compile_failure(&self, shader: GLuint, log: &str) {
        let mut state = self.state.borrow_mut();
        state.failed_compiles.insert(shader);
        state.shader_logs.insert(shader, log.to_owned());
    }

    pub fn set_link_failure(&self, program: GLuint, log: &str) {
        let mut state = self.state.borrow_mut();
        state.failed_links.insert(program);
        state.program_logs.insert(program, log.to_owned());
    }

    pub fn set_validate_failure(&self, program: GLuint, log: &str) {
        let mut state = self.state.borrow_mut();
        state.failed_validations.insert(program);
        state.program_logs.insert(program, log.to_owned());
    }

    pub fn set_uniform_missing(&self, program: GLuint, name: &str) {
        self.state
            .borrow_mut()
            .missing_uniforms
            .insert((program, name.to_owned()));
    }

    pub fn set_framebuffer_status(&self, status: GLenum) {
        self.state.borrow_mut().framebuffer_status = Some(status);
    }
}

impl Default for FakeGl {
    fn default() -> Self {
        Self::new()
    }
}

impl GlApi for FakeGl {
    fn get_error(&self) -> GLenum {
        let mut state = self.state.borrow_mut();
        state.note("get_error");
        std::mem::replace(&mut state.sticky, gl::NO_ERROR)
    }

    fn enable(&self, cap: GLenum) {
        let mut state = self.state.borrow_mut();
        state.record("enable");
        state.caps.insert(cap, true);
    }

    fn disable(&self, cap: GLenum) {
        let mut state = self.state.borrow_mut();
        state.record("disable");
        state.caps.insert(cap, false);
    }

    fn is_enabled(&self, cap: GLenum) -> bool {
        let mut state = self.state.borrow_mut();
        state.note("is_enabled");
        state.caps.get(&cap).copied().unwrap_or(false)
    }

    fn gen_buffer(&self) -> GLuint {
        let mut state = self.state.borrow_mut();
        state.record("gen_buffer");
        state.alloc()
    }

    fn delete_buffer(&self, id: GLuint) {
        let mut state = self.state.borrow_mut();
        state.record("delete_buffer");
        state.release(id);
    }

    fn bind_buffer(&self, target: GLenum, id: GLuint) {
        let mut state = self.state.borrow_mut();
        state.record("bind_buffer");
        state.bound.insert(target, id);
    }

    fn buffer_data(&self, _target: GLenum, _data: &[u8], _usage: GLenum) {
        self.state.borrow_mut().record("buffer_data");
    }

    fn buffer_sub_data(&self, _target: GLenum, _offset: isize, _data: &[u8]) {
        self.state.borrow_mut().record("buffer_sub_data");
    }

    fn map_buffer(&self, target: GLenum, _access: GLenum) -> *mut c_void {
        let mut state = self.state.borrow_mut();
        if state.record("map_buffer") {
            return std::ptr::null_mut();
        }
        state.mapped_targets.insert(target);
        NonNull::<c_void>::dangling().as_ptr()
    }

    fn unmap_buffer(&self, target: GLenum) -> bool {
        let mut state = self.state.borrow_mut();
        let failed = state.record("unmap_buffer");
        state.mapped_targets.remove(&target);
        !failed
    }

    fn gen_texture(&self) -> GLuint {
        let mut state = self.state.borrow_mut();
        state.record("gen_texture");
        state.alloc()
    }

    fn delete_texture(&self, id: GLuint) {
        let mut state = self.state.borrow_mut();
        state.record("delete_texture");
        state.release(id);
    }

    fn bind_texture(&self, target: GLenum, id: GLuint) {
        let mut state = self.state.borrow_mut();
        state.record("bind_texture");
        state.bound.insert(target, id);
    }

    fn tex_parameter_i(&self, _target: GLenum, _pname: GLenum, _value: GLint) {
        self.state.borrow_mut().record("tex_parameter_i");
    }

    fn create_shader(&self, _kind: GLenum) -> GLuint {
        let mut state = self.state.borrow_mut();
        state.record("create_shader");
        state.alloc()
    }

    fn delete_shader(&self, id: GLuint) {
        let mut state = self.state.borrow_mut();
        state.record("delete_shader");
        state.release(id);
    }

    fn shader_source(&self, _id: GLuint, _source: &str) {
        self.state.borrow_mut().record("shader_source");
    }

    fn compile_shader(&self, _id: GLuint) {
        self.state.borrow_mut().record("compile_shader");
    }

    fn get_shader_iv(&self, id: GLuint, pname: GLenum) -> GLint {
        let mut state = self.state.borrow_mut();
        state.note("get_shader_iv");
        match pname {
            gl::COMPILE_STATUS => GLint::from(!state.failed_compiles.contains(&id)),
            gl::INFO_LOG_LENGTH => state
                .shader_logs
                .get(&id)
                .map_or(0, |log| log.len() as GLint),
            _ => 0,
        }
    }

    fn get_shader_info_log(&self, id: GLuint) -> String {
        let mut state = self.state.borrow_mut();
        state.note("get_shader_info_log");
        state.shader_logs.get(&id).cloned().unwrap_or_default()
    }

    fn create_program(&self) -> GLuint {
        let mut state = self.state.borrow_mut();
        state.record("create_program");
        state.alloc()
    }

    fn delete_program(&self, id: GLuint) {
        let mut state = self.state.borrow_mut();
        state.record("delete_program");
        state.release(id);
    }

    fn attach_shader(&self, _program: GLuint, _shader: GLuint) {
        self.state.borrow_mut().record("attach_shader");
    }

    fn detach_shader(&self, _program: GLuint, _shader: GLuint) {
        self.state.borrow_mut().record("detach_shader");
    }

    fn link_program(&self, _id: GLuint) {
        self.state.borrow_mut().record("link_program");
    }

    fn validate_program(&self, _id: GLuint) {
        self.state.borrow_mut().record("validate_program");
    }

    fn get_program_iv(&self, id: GLuint, pname: GLenum) -> GLint {
        let mut state = self.state.borrow_mut();
        state.note("get_program_iv");
        match pname {
            gl::LINK_STATUS => GLint::from(!state.failed_links.contains(&id)),
            gl::VALIDATE_STATUS => GLint::from(!state.failed_validations.contains(&id)),
            gl::INFO_LOG_LENGTH => state
                .program_logs
                .get(&id)
                .map_or(0, |log| log.len() as GLint),
            _ => 0,
        }
    }

    fn get_program_info_log(&self, id: GLuint) -> String {
        let mut state = self.state.borrow_mut();
        state.note("get_program_info_log");
        state.program_logs.get(&id).cloned().unwrap_or_default()
    }

    fn use_program(&self, id: GLuint) {
        let mut state = self.state.borrow_mut();
        state.record("use_program");
        state.active_program = id;
    }

    fn get_uniform_location(&self, program: GLuint, name: &str) -> GLint {
        let mut state = self.state.borrow_mut();
        state.record("get_uniform_location");
        let key = (program, name.to_owned());
        if state.missing_uniforms.contains(&key) {
            return -1;
        }
        if let Some(&location) = state.uniforms.get(&key) {
            return location;
        }
        let location = state.next_uniform_location;
        state.next_uniform_location += 1;
        state.uniforms.insert(key, location);
        location
    }

    fn gen_framebuffer(&self) -> GLuint {
        let mut state = self.state.borrow_mut();
        state.record("gen_framebuffer");
        state.alloc()
    }

    fn delete_framebuffer(&self, id: GLuint) {
        let mut state = self.state.borrow_mut();
        state.record("delete_framebuffer");
        state.release(id);
    }

    fn bind_framebuffer(&self, target: GLenum, id: GLuint) {
        let mut state = self.state.borrow_mut();
        state.record("bind_framebuffer");
        state.bound.insert(target, id);
    }

    fn framebuffer_texture(
        &self,
        _target: GLenum,
        _attachment: GLenum,
        _texture: GLuint,
        _level: GLint,
    ) {
        self.state.borrow_mut().record("framebuffer_texture");
    }

    fn framebuffer_texture_1d(
        &self,
        _target: GLenum,
        _attachment: GLenum,
        _textarget: GLenum,
        _texture: GLuint,
        _level: GLint,
    ) {
        self.state.borrow_mut().record("framebuffer_texture_1d");
    }

    fn framebuffer_texture_2d(
        &self,
        _target: GLenum,
        _attachment: GLenum,
        _textarget: GLenum,
        _texture: GLuint,
        _level: GLint,
    ) {
        self.state.borrow_mut().record("framebuffer_texture_2d");
    }

    fn framebuffer_texture_3d(
        &self,
        _target: GLenum,
        _attachment: GLenum,
        _textarget: GLenum,
        _texture: GLuint,
        _level: GLint,
        _layer: GLint,
    ) {
        self.state.borrow_mut().record("framebuffer_texture_3d");
    }

    fn check_framebuffer_status(&self, _target: GLenum) -> GLenum {
        let mut state = self.state.borrow_mut();
        if state.record("check_framebuffer_status") {
            return 0;
        }
        state.framebuffer_status.unwrap_or(gl::FRAMEBUFFER_COMPLETE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_armed_failure_fires_on_the_next_mutating_call_only() {
        let gl = FakeGl::new();
        gl.fail_next(gl::INVALID_ENUM);

        // A query does not consume the armed failure.
        assert!(!gl.is_enabled(gl::BLEND));
        assert_eq!(gl.get_error(), gl::NO_ERROR);

        gl.enable(gl::BLEND);
        assert_eq!(gl.get_error(), gl::INVALID_ENUM);

        // One-shot: a later call is clean again.
        gl.enable(gl::CULL_FACE);
        assert_eq!(gl.get_error(), gl::NO_ERROR);
    }

    #[test]
    fn test_handles_are_unique_and_tracked() {
        let gl = FakeGl::new();
        let a = gl.gen_buffer();
        let b = gl.gen_texture();
        assert_ne!(a, b);
        assert!(gl.is_live(a));

        gl.delete_buffer(a);
        assert!(!gl.is_live(a));
        assert!(gl.was_deleted(a));
        assert!(gl.is_live(b));
    }

    #[test]
    fn test_sticky_register_clears_on_read() {
        let gl = FakeGl::new();
        gl.set_error(gl::OUT_OF_MEMORY);
        assert_eq!(gl.get_error(), gl::OUT_OF_MEMORY);
        assert_eq!(gl.get_error(), gl::NO_ERROR);
    }
}
