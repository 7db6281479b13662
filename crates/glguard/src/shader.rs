//! Shader objects: source upload and compilation.

use gl::types::{GLenum, GLuint};
use glguard_core::error::{check_error, clear_error, ensure_no_error, CallError, ErrorKind, Result};
use glguard_core::GlApi;
use tracing::{error, trace};

/// Pipeline stage a shader object is created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ShaderKind {
    Vertex = gl::VERTEX_SHADER,
    Fragment = gl::FRAGMENT_SHADER,
    Geometry = gl::GEOMETRY_SHADER,
    TessControl = gl::TESS_CONTROL_SHADER,
    TessEvaluation = gl::TESS_EVALUATION_SHADER,
    Compute = gl::COMPUTE_SHADER,
}

impl ShaderKind {
    pub fn raw(self) -> GLenum {
        self as GLenum
    }
}

/// Result of a compilation. When `success` is false the shader's info log
/// is in `info` for the caller's convenience. A failed compile is a result,
/// not an error: the host call itself succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileResult {
    pub success: bool,
    pub info: String,
}

/// A shader object, usually attached and linked into a
/// [`Program`](crate::program::Program).
pub struct Shader<'g> {
    gl: &'g dyn GlApi,
    id: GLuint,
    kind: ShaderKind,
    owns: bool,
}

impl<'g> Shader<'g> {
    /// Create a new shader object for the given stage.
    pub fn new(gl: &'g dyn GlApi, kind: ShaderKind) -> Result<Self> {
        clear_error(gl);
        let id = gl.create_shader(kind.raw());
        ensure_no_error(gl)?;
        trace!(id, ?kind, "created shader");

        Ok(Self {
            gl,
            id,
            kind,
            owns: true,
        })
    }

    /// Adopt a caller-supplied handle without taking ownership: the drop
    /// never releases it.
    pub fn from_raw(gl: &'g dyn GlApi, kind: ShaderKind, id: GLuint) -> Self {
        Self {
            gl,
            id,
            kind,
            owns: false,
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    pub fn owns_handle(&self) -> bool {
        self.owns
    }

    /// Replace the shader's source string.
    pub fn source(&self, source: &str) -> Result<()> {
        assert!(self.id > 0, "shader has no name");
        clear_error(self.gl);
        self.gl.shader_source(self.id, source);
        if let Some(err) = check_error(self.gl) {
            return Err(match err.kind {
                ErrorKind::InvalidOperation => CallError::new(
                    "shader: failed to assign source",
                    "'id' is not a shader object",
                    err,
                )
                .into(),
                ErrorKind::InvalidValue => CallError::new(
                    "shader: failed to assign source",
                    "'id' is not a previously created shader",
                    err,
                )
                .into(),
                _ => err.into(),
            });
        }
        Ok(())
    }

    /// Compile the current source, returning the status and info log.
    pub fn compile(&self) -> Result<CompileResult> {
        assert!(self.id > 0, "shader has no name");
        clear_error(self.gl);
        self.gl.compile_shader(self.id);
        if let Some(err) = check_error(self.gl) {
            return Err(match err.kind {
                ErrorKind::InvalidValue => CallError::new(
                    "shader: failed to compile",
                    "'id' is not a previously created shader",
                    err,
                )
                .into(),
                ErrorKind::InvalidOperation => CallError::new(
                    "shader: failed to compile",
                    "'id' is not a shader object",
                    err,
                )
                .into(),
                _ => err.into(),
            });
        }

        let success = self.gl.get_shader_iv(self.id, gl::COMPILE_STATUS) != 0;
        if !success {
            return Ok(CompileResult {
                success: false,
                info: self.gl.get_shader_info_log(self.id),
            });
        }
        Ok(CompileResult {
            success: true,
            info: String::new(),
        })
    }
}

impl Drop for Shader<'_> {
    fn drop(&mut self) {
        if self.owns && self.id > 0 {
            clear_error(self.gl);
            self.gl.delete_shader(self.id);
            if let Some(err) = check_error(self.gl) {
                error!(%err, id = self.id, "failed to release shader");
            }
            trace!(id = self.id, "released shader");
        }
    }
}
