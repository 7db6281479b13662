//! Loaded OpenGL context, forwarding the host-API surface to the `gl` crate.

use std::ffi::CString;
use std::os::raw::c_void;

use gl::types::{GLchar, GLenum, GLint, GLsizei, GLsizeiptr, GLuint};
use once_cell::sync::OnceCell;

use crate::api::GlApi;

static GL_LOADED: OnceCell<()> = OnceCell::new();

/// The live host context.
///
/// GL function pointers are loaded exactly once via `gl_loader`; the value
/// itself is free to create as often as needed.
///
/// # Safety
///
/// Every method assumes the OpenGL context that was current when it was
/// loaded is valid and current on the calling thread. Using it from another
/// thread, or with no current context, is undefined behavior.
#[derive(Debug, Clone, Copy)]
pub struct LoadedGl(());

impl LoadedGl {
    pub fn load() -> Self {
        GL_LOADED.get_or_init(|| {
            gl_loader::init_gl();
            gl::load_with(|symbol| gl_loader::get_proc_address(symbol).cast());
        });

        Self(())
    }
}

impl GlApi for LoadedGl {
    fn get_error(&self) -> GLenum {
        unsafe { gl::GetError() }
    }

    fn enable(&self, cap: GLenum) {
        unsafe { gl::Enable(cap) }
    }

    fn disable(&self, cap: GLenum) {
        unsafe { gl::Disable(cap) }
    }

    fn is_enabled(&self, cap: GLenum) -> bool {
        unsafe { gl::IsEnabled(cap) == gl::TRUE }
    }

    fn gen_buffer(&self) -> GLuint {
        let mut id = 0;
        unsafe { gl::GenBuffers(1, &mut id) };
        id
    }

    fn delete_buffer(&self, id: GLuint) {
        unsafe { gl::DeleteBuffers(1, &id) }
    }

    fn bind_buffer(&self, target: GLenum, id: GLuint) {
        unsafe { gl::BindBuffer(target, id) }
    }

    fn buffer_data(&self, target: GLenum, data: &[u8], usage: GLenum) {
        unsafe {
            gl::BufferData(
                target,
                data.len() as GLsizeiptr,
                data.as_ptr().cast(),
                usage,
            )
        }
    }

    fn buffer_sub_data(&self, target: GLenum, offset: isize, data: &[u8]) {
        unsafe {
            gl::BufferSubData(
                target,
                offset,
                data.len() as GLsizeiptr,
                data.as_ptr().cast(),
            )
        }
    }

    fn map_buffer(&self, target: GLenum, access: GLenum) -> *mut c_void {
        unsafe { gl::MapBuffer(target, access) }
    }

    fn unmap_buffer(&self, target: GLenum) -> bool {
        unsafe { gl::UnmapBuffer(target) == gl::TRUE }
    }

    fn gen_texture(&self) -> GLuint {
        let mut id = 0;
        unsafe { gl::GenTextures(1, &mut id) };
        id
    }

    fn delete_texture(&self, id: GLuint) {
        unsafe { gl::DeleteTextures(1, &id) }
    }

    fn bind_texture(&self, target: GLenum, id: GLuint) {
        unsafe { gl::BindTexture(target, id) }
    }

    fn tex_parameter_i(&self, target: GLenum, pname: GLenum, value: GLint) {
        unsafe { gl::TexParameteri(target, pname, value) }
    }

    fn create_shader(&self, kind: GLenum) -> GLuint {
        unsafe { gl::CreateShader(kind) }
    }

    fn delete_shader(&self, id: GLuint) {
        unsafe { gl::DeleteShader(id) }
    }

    fn shader_source(&self, id: GLuint, source: &str) {
        let ptr = source.as_ptr() as *const GLchar;
        let len = source.len() as GLint;
        unsafe { gl::ShaderSource(id, 1, &ptr, &len) }
    }

    fn compile_shader(&self, id: GLuint) {
        unsafe { gl::CompileShader(id) }
    }

    fn get_shader_iv(&self, id: GLuint, pname: GLenum) -> GLint {
        let mut value = 0;
        unsafe { gl::GetShaderiv(id, pname, &mut value) };
        value
    }

    fn get_shader_info_log(&self, id: GLuint) -> String {
        let capacity = self.get_shader_iv(id, gl::INFO_LOG_LENGTH).max(0);
        let mut buf = vec![0u8; capacity as usize];
        let mut written: GLsizei = 0;
        unsafe {
            gl::GetShaderInfoLog(id, capacity, &mut written, buf.as_mut_ptr().cast());
        }
        buf.truncate(written.max(0) as usize);
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn delete_program(&self, id: GLuint) {
        unsafe { gl::DeleteProgram(id) }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::DetachShader(program, shader) }
    }

    fn link_program(&self, id: GLuint) {
        unsafe { gl::LinkProgram(id) }
    }

    fn validate_program(&self, id: GLuint) {
        unsafe { gl::ValidateProgram(id) }
    }

    fn get_program_iv(&self, id: GLuint, pname: GLenum) -> GLint {
        let mut value = 0;
        unsafe { gl::GetProgramiv(id, pname, &mut value) };
        value
    }

    fn get_program_info_log(&self, id: GLuint) -> String {
        let capacity = self.get_program_iv(id, gl::INFO_LOG_LENGTH).max(0);
        let mut buf = vec![0u8; capacity as usize];
        let mut written: GLsizei = 0;
        unsafe {
            gl::GetProgramInfoLog(id, capacity, &mut written, buf.as_mut_ptr().cast());
        }
        buf.truncate(written.max(0) as usize);
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn use_program(&self, id: GLuint) {
        unsafe { gl::UseProgram(id) }
    }

    fn get_uniform_location(&self, program: GLuint, name: &str) -> GLint {
        let Ok(name) = CString::new(name) else {
            return -1;
        };
        unsafe { gl::GetUniformLocation(program, name.as_ptr()) }
    }

    fn gen_framebuffer(&self) -> GLuint {
        let mut id = 0;
        unsafe { gl::GenFramebuffers(1, &mut id) };
        id
    }

    fn delete_framebuffer(&self, id: GLuint) {
        unsafe { gl::DeleteFramebuffers(1, &id) }
    }

    fn bind_framebuffer(&self, target: GLenum, id: GLuint) {
        unsafe { gl::BindFramebuffer(target, id) }
    }

    fn framebuffer_texture(&self, target: GLenum, attachment: GLenum, texture: GLuint, level: GLint) {
        unsafe { gl::FramebufferTexture(target, attachment, texture, level) }
    }

    fn framebuffer_texture_1d(
        &self,
        target: GLenum,
        attachment: GLenum,
        textarget: GLenum,
        texture: GLuint,
        level: GLint,
    ) {
        unsafe { gl::FramebufferTexture1D(target, attachment, textarget, texture, level) }
    }

    fn framebuffer_texture_2d(
        &self,
        target: GLenum,
        attachment: GLenum,
        textarget: GLenum,
        texture: GLuint,
        level: GLint,
    ) {
        unsafe { gl::FramebufferTexture2D(target, attachment, textarget, texture, level) }
    }

    fn framebuffer_texture_3d(
        &self,
        target: GLenum,
        attachment: GLenum,
        textarget: GLenum,
        texture: GLuint,
        level: GLint,
        layer: GLint,
    ) {
        unsafe { gl::FramebufferTexture3D(target, attachment, textarget, texture, level, layer) }
    }

    fn check_framebuffer_status(&self, target: GLenum) -> GLenum {
        unsafe { gl::CheckFramebufferStatus(target) }
    }
}
