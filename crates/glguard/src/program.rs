//! Program objects: attachment, linking, activation, and the uniform
//! location cache.

use std::cell::RefCell;
use std::collections::HashMap;

use gl::types::{GLint, GLuint};
use glguard_core::error::{
    check_error, clear_error, ensure_no_error, CallError, Error, ErrorKind, Result,
};
use glguard_core::{Bind, GlApi};
use tracing::{error, trace};

use crate::shader::Shader;

/// Result of a link. When `success` is false the program's info log is in
/// `info` for the caller's convenience. A failed link is a result, not an
/// error: the host call itself succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkResult {
    pub success: bool,
    pub info: String,
}

/// A program object: a linked set of shaders.
///
/// Binding a program (directly or through a scoped bind guard) activates
/// it; unbinding activates program 0.
pub struct Program<'g> {
    gl: &'g dyn GlApi,
    id: GLuint,
    owns: bool,
    // Uniform locations survive until the next link, which invalidates
    // them wholesale.
    uniforms: RefCell<HashMap<String, GLint>>,
}

impl<'g> Program<'g> {
    /// Create a new program object.
    pub fn new(gl: &'g dyn GlApi) -> Result<Self> {
        clear_error(gl);
        let id = gl.create_program();
        ensure_no_error(gl)?;
        trace!(id, "created program");

        Ok(Self {
            gl,
            id,
            owns: true,
            uniforms: RefCell::new(HashMap::new()),
        })
    }

    /// Adopt a caller-supplied handle without taking ownership: the drop
    /// never releases it.
    pub fn from_raw(gl: &'g dyn GlApi, id: GLuint) -> Self {
        Self {
            gl,
            id,
            owns: false,
            uniforms: RefCell::new(HashMap::new()),
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn owns_handle(&self) -> bool {
        self.owns
    }

    /// Attach a shader object to this program.
    pub fn attach(&self, shader: &Shader<'_>) -> Result<()> {
        self.attach_raw(shader.id())
    }

    /// Attach by raw shader handle.
    pub fn attach_raw(&self, shader_id: GLuint) -> Result<()> {
        assert!(self.id > 0, "program has no name");
        clear_error(self.gl);
        self.gl.attach_shader(self.id, shader_id);
        if let Some(err) = check_error(self.gl) {
            return Err(match err.kind {
                ErrorKind::InvalidValue => CallError::new(
                    "program: failed to attach",
                    "'id' or 'shader_id' is not a previously created program/shader",
                    err,
                )
                .into(),
                ErrorKind::InvalidOperation => CallError::new(
                    "program: failed to attach",
                    "'id' or 'shader_id' is not a program/shader, or the shader is already attached",
                    err,
                )
                .into(),
                _ => err.into(),
            });
        }
        Ok(())
    }

    /// Detach a shader object from this program.
    pub fn detach(&self, shader: &Shader<'_>) -> Result<()> {
        self.detach_raw(shader.id())
    }

    /// Detach by raw shader handle.
    pub fn detach_raw(&self, shader_id: GLuint) -> Result<()> {
        assert!(self.id > 0, "program has no name");
        clear_error(self.gl);
        self.gl.detach_shader(self.id, shader_id);
        if let Some(err) = check_error(self.gl) {
            return Err(match err.kind {
                ErrorKind::InvalidValue => CallError::new(
                    "program: failed to detach",
                    "'id' or 'shader_id' is not a previously created program/shader",
                    err,
                )
                .into(),
                ErrorKind::InvalidOperation => CallError::new(
                    "program: failed to detach",
                    "'id' or 'shader_id' is not a program/shader, or the shader was not attached",
                    err,
                )
                .into(),
                _ => err.into(),
            });
        }
        Ok(())
    }

    /// Link the attached shaders, returning the status and info log.
    ///
    /// Invalidates every cached uniform location. With the
    /// `validate-programs` feature (default) a successful link is followed
    /// by a validation pass whose failure is reported the same way as a
    /// link failure.
    pub fn link(&mut self) -> Result<LinkResult> {
        assert!(self.id > 0, "program has no name");
        self.uniforms.get_mut().clear();

        clear_error(self.gl);
        self.gl.link_program(self.id);
        if let Some(err) = check_error(self.gl) {
            return Err(match err.kind {
                ErrorKind::InvalidValue => CallError::new(
                    "program: failed to link",
                    "'id' is not a previously created program",
                    err,
                )
                .into(),
                ErrorKind::InvalidOperation => CallError::new(
                    "program: failed to link",
                    "'id' is not a program object, or the program is actively used for transform feedback",
                    err,
                )
                .into(),
                _ => err.into(),
            });
        }

        if self.gl.get_program_iv(self.id, gl::LINK_STATUS) == 0 {
            return Ok(LinkResult {
                success: false,
                info: self.gl.get_program_info_log(self.id),
            });
        }

        #[cfg(feature = "validate-programs")]
        {
            clear_error(self.gl);
            self.gl.validate_program(self.id);
            if let Some(err) = check_error(self.gl) {
                return Err(match err.kind {
                    ErrorKind::InvalidValue => CallError::new(
                        "program: failed to validate",
                        "'id' is not a previously created program",
                        err,
                    )
                    .into(),
                    ErrorKind::InvalidOperation => CallError::new(
                        "program: failed to validate",
                        "'id' is not a program object",
                        err,
                    )
                    .into(),
                    _ => err.into(),
                });
            }

            if self.gl.get_program_iv(self.id, gl::VALIDATE_STATUS) == 0 {
                return Ok(LinkResult {
                    success: false,
                    info: self.gl.get_program_info_log(self.id),
                });
            }
        }

        Ok(LinkResult {
            success: true,
            info: String::new(),
        })
    }

    /// Location of the named uniform, memoized until the next link.
    pub fn uniform_location(&self, name: &str) -> Result<GLint> {
        if let Some(&location) = self.uniforms.borrow().get(name) {
            return Ok(location);
        }

        clear_error(self.gl);
        let location = self.gl.get_uniform_location(self.id, name);
        if let Some(err) = check_error(self.gl) {
            return Err(match err.kind {
                ErrorKind::InvalidValue => CallError::new(
                    "program: failed to look up uniform",
                    "'id' is not a previously created program",
                    err,
                )
                .into(),
                ErrorKind::InvalidOperation => CallError::new(
                    "program: failed to look up uniform",
                    "'id' is not a program object, or the program has not been linked",
                    err,
                )
                .into(),
                _ => err.into(),
            });
        }
        if location < 0 {
            return Err(Error::Failed {
                operation: "program: failed to look up uniform",
                detail: format!("no active uniform named '{name}'"),
            });
        }

        self.uniforms
            .borrow_mut()
            .insert(name.to_owned(), location);
        Ok(location)
    }
}

impl Bind for Program<'_> {
    /// Make this program part of the current rendering state.
    fn bind(&self) -> Result<()> {
        assert!(self.id > 0, "program has no name");
        clear_error(self.gl);
        self.gl.use_program(self.id);
        if let Some(err) = check_error(self.gl) {
            return Err(match err.kind {
                ErrorKind::InvalidValue => CallError::new(
                    "program: failed to use",
                    "'id' is neither 0 nor a previously created program",
                    err,
                )
                .into(),
                ErrorKind::InvalidOperation => CallError::new(
                    "program: failed to use",
                    "'id' is not a program or could not be made part of the current state",
                    err,
                )
                .into(),
                _ => err.into(),
            });
        }
        Ok(())
    }

    /// Activate program 0.
    fn unbind(&self) -> Result<()> {
        clear_error(self.gl);
        self.gl.use_program(0);
        ensure_no_error(self.gl)?;
        Ok(())
    }
}

impl Drop for Program<'_> {
    fn drop(&mut self) {
        if self.owns && self.id > 0 {
            clear_error(self.gl);
            self.gl.delete_program(self.id);
            if let Some(err) = check_error(self.gl) {
                error!(%err, id = self.id, "failed to release program");
            }
            trace!(id = self.id, "released program");
        }
    }
}
