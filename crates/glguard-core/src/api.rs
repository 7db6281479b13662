//! The host graphics API surface consumed by every component.
//!
//! [`GlApi`] mirrors the upstream C entry points one-to-one: per resource
//! kind a creation call returning a handle, a deletion call, a bind call
//! taking `(target, handle)`, and mutators scoped to whatever is currently
//! bound, plus the global sticky error register and the capability toggles.
//! Nothing in this crate touches ambient GL state directly: resources and
//! scopes borrow a `&dyn GlApi` at construction, so tests can substitute
//! the instrumented [`FakeGl`](crate::fake::FakeGl) for the loaded context.

use std::os::raw::c_void;

use gl::types::{GLenum, GLint, GLuint};

/// Mirror of the handle-based host API.
///
/// All methods take `&self`; the host's state is global to the current
/// context, not to this value. Enum-typed arguments are passed as raw
/// `GLenum`s here; the typed wrappers live one layer up, next to the
/// resources that use them.
pub trait GlApi {
    // =====================================================================
    // Sticky error register
    // =====================================================================

    /// Read and clear the pending error code. `gl::NO_ERROR` if none.
    fn get_error(&self) -> GLenum;

    // =====================================================================
    // Capabilities
    // =====================================================================

    fn enable(&self, cap: GLenum);
    fn disable(&self, cap: GLenum);
    fn is_enabled(&self, cap: GLenum) -> bool;

    // =====================================================================
    // Buffers
    // =====================================================================

    fn gen_buffer(&self) -> GLuint;
    fn delete_buffer(&self, id: GLuint);
    fn bind_buffer(&self, target: GLenum, id: GLuint);
    fn buffer_data(&self, target: GLenum, data: &[u8], usage: GLenum);
    fn buffer_sub_data(&self, target: GLenum, offset: isize, data: &[u8]);
    fn map_buffer(&self, target: GLenum, access: GLenum) -> *mut c_void;
    /// Returns `false` if the data store became corrupt while mapped.
    fn unmap_buffer(&self, target: GLenum) -> bool;

    // =====================================================================
    // Textures
    // =====================================================================

    fn gen_texture(&self) -> GLuint;
    fn delete_texture(&self, id: GLuint);
    fn bind_texture(&self, target: GLenum, id: GLuint);
    fn tex_parameter_i(&self, target: GLenum, pname: GLenum, value: GLint);

    // =====================================================================
    // Shaders
    // =====================================================================

    fn create_shader(&self, kind: GLenum) -> GLuint;
    fn delete_shader(&self, id: GLuint);
    fn shader_source(&self, id: GLuint, source: &str);
    fn compile_shader(&self, id: GLuint);
    fn get_shader_iv(&self, id: GLuint, pname: GLenum) -> GLint;
    fn get_shader_info_log(&self, id: GLuint) -> String;

    // =====================================================================
    // Programs
    // =====================================================================

    fn create_program(&self) -> GLuint;
    fn delete_program(&self, id: GLuint);
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn detach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, id: GLuint);
    fn validate_program(&self, id: GLuint);
    fn get_program_iv(&self, id: GLuint, pname: GLenum) -> GLint;
    fn get_program_info_log(&self, id: GLuint) -> String;
    /// `id == 0` deactivates the current program.
    fn use_program(&self, id: GLuint);
    /// `-1` if `name` does not name an active uniform.
    fn get_uniform_location(&self, program: GLuint, name: &str) -> GLint;

    // =====================================================================
    // Framebuffers
    // =====================================================================

    fn gen_framebuffer(&self) -> GLuint;
    fn delete_framebuffer(&self, id: GLuint);
    fn bind_framebuffer(&self, target: GLenum, id: GLuint);
    fn framebuffer_texture(&self, target: GLenum, attachment: GLenum, texture: GLuint, level: GLint);
    fn framebuffer_texture_1d(
        &self,
        target: GLenum,
        attachment: GLenum,
        textarget: GLenum,
        texture: GLuint,
        level: GLint,
    );
    fn framebuffer_texture_2d(
        &self,
        target: GLenum,
        attachment: GLenum,
        textarget: GLenum,
        texture: GLuint,
        level: GLint,
    );
    fn framebuffer_texture_3d(
        &self,
        target: GLenum,
        attachment: GLenum,
        textarget: GLenum,
        texture: GLuint,
        level: GLint,
        layer: GLint,
    );
    fn check_framebuffer_status(&self, target: GLenum) -> GLenum;
}
