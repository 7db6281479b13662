//! Framebuffer objects: texture attachment and completeness validation.

use gl::types::{GLenum, GLint, GLuint};
use glguard_core::error::{check_error, clear_error, ensure_no_error, CallError, ErrorKind, Result};
use glguard_core::{Bind, GlApi, GlError, ScopedBind};
use tracing::trace;

use crate::texture::Texture;

/// Binding point a framebuffer is created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum FramebufferTarget {
    /// Both read and draw.
    Framebuffer = gl::FRAMEBUFFER,
    Draw = gl::DRAW_FRAMEBUFFER,
    Read = gl::READ_FRAMEBUFFER,
}

impl FramebufferTarget {
    pub fn raw(self) -> GLenum {
        self as GLenum
    }
}

/// An attachment point on a framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attachment {
    Color(u32),
    Depth,
    Stencil,
    DepthStencil,
}

impl Attachment {
    pub fn raw(self) -> GLenum {
        match self {
            Self::Color(index) => gl::COLOR_ATTACHMENT0 + index,
            Self::Depth => gl::DEPTH_ATTACHMENT,
            Self::Stencil => gl::STENCIL_ATTACHMENT,
            Self::DepthStencil => gl::DEPTH_STENCIL_ATTACHMENT,
        }
    }
}

/// Completeness status reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferStatus {
    pub raw: GLenum,
}

impl FramebufferStatus {
    pub fn complete(self) -> bool {
        self.raw == gl::FRAMEBUFFER_COMPLETE
    }

    /// Human-readable description of the status code.
    pub fn describe(self) -> &'static str {
        match self.raw {
            gl::FRAMEBUFFER_COMPLETE => "framebuffer complete",
            gl::FRAMEBUFFER_UNDEFINED => {
                "framebuffer undefined: default framebuffer is bound, but it does not exist"
            }
            gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => {
                "incomplete attachment: one or more attachment points are framebuffer-incomplete"
            }
            gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => {
                "missing attachment: framebuffer does not have at least one image attached"
            }
            gl::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => "incomplete draw buffer",
            gl::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => "incomplete read buffer",
            gl::FRAMEBUFFER_UNSUPPORTED => {
                "framebuffer unsupported: combination of attachments is not supported on this hardware"
            }
            gl::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => "incomplete multisample",
            gl::FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS => "incomplete layer targets",
            _ => "unknown framebuffer status",
        }
    }
}

/// A framebuffer object and the target it binds to.
pub struct Framebuffer<'g> {
    gl: &'g dyn GlApi,
    id: GLuint,
    target: FramebufferTarget,
    owns: bool,
}

impl<'g> Framebuffer<'g> {
    /// Allocate a new framebuffer. The handle is released when the value
    /// drops.
    pub fn new(gl: &'g dyn GlApi, target: FramebufferTarget) -> Result<Self> {
        clear_error(gl);
        let id = gl.gen_framebuffer();
        ensure_no_error(gl)?;
        trace!(id, ?target, "allocated framebuffer");

        Ok(Self {
            gl,
            id,
            target,
            owns: true,
        })
    }

    /// Adopt a caller-supplied handle without taking ownership: the drop
    /// never releases it.
    pub fn from_raw(gl: &'g dyn GlApi, target: FramebufferTarget, id: GLuint) -> Self {
        Self {
            gl,
            id,
            target,
            owns: false,
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn target(&self) -> FramebufferTarget {
        self.target
    }

    pub fn owns_handle(&self) -> bool {
        self.owns
    }

    /// Attach a texture level without a target dimension (layered
    /// attachment).
    pub fn attach(
        &mut self,
        attachment: Attachment,
        texture: &Texture<'_>,
        level: GLint,
    ) -> Result<()> {
        let texture_id = texture.id();
        let bound = ScopedBind::new(self)?;
        clear_error(bound.gl);
        bound
            .gl
            .framebuffer_texture(bound.target.raw(), attachment.raw(), texture_id, level);
        attach_outcome(check_error(bound.gl))
    }

    /// Attach a one-dimensional texture level.
    pub fn attach_1d(
        &mut self,
        attachment: Attachment,
        texture: &Texture<'_>,
        level: GLint,
    ) -> Result<()> {
        let (texture_target, texture_id) = (texture.target().raw(), texture.id());
        let bound = ScopedBind::new(self)?;
        clear_error(bound.gl);
        bound.gl.framebuffer_texture_1d(
            bound.target.raw(),
            attachment.raw(),
            texture_target,
            texture_id,
            level,
        );
        attach_outcome(check_error(bound.gl))
    }

    /// Attach a two-dimensional texture level.
    pub fn attach_2d(
        &mut self,
        attachment: Attachment,
        texture: &Texture<'_>,
        level: GLint,
    ) -> Result<()> {
        let (texture_target, texture_id) = (texture.target().raw(), texture.id());
        let bound = ScopedBind::new(self)?;
        clear_error(bound.gl);
        bound.gl.framebuffer_texture_2d(
            bound.target.raw(),
            attachment.raw(),
            texture_target,
            texture_id,
            level,
        );
        attach_outcome(check_error(bound.gl))
    }

    /// Attach a layer of a three-dimensional texture level.
    pub fn attach_3d(
        &mut self,
        attachment: Attachment,
        texture: &Texture<'_>,
        level: GLint,
        layer: GLint,
    ) -> Result<()> {
        let (texture_target, texture_id) = (texture.target().raw(), texture.id());
        let bound = ScopedBind::new(self)?;
        clear_error(bound.gl);
        bound.gl.framebuffer_texture_3d(
            bound.target.raw(),
            attachment.raw(),
            texture_target,
            texture_id,
            level,
            layer,
        );
        attach_outcome(check_error(bound.gl))
    }

    /// Query completeness of the framebuffer under a scoped binding.
    pub fn status(&mut self) -> Result<FramebufferStatus> {
        let bound = ScopedBind::new(self)?;
        clear_error(bound.gl);
        let raw = bound.gl.check_framebuffer_status(bound.target.raw());
        if let Some(err) = check_error(bound.gl) {
            return Err(match err.kind {
                ErrorKind::InvalidEnum => CallError::new(
                    "framebuffer: failed to validate",
                    "'target' is not one of the allowed values",
                    err,
                )
                .into(),
                _ => err.into(),
            });
        }
        Ok(FramebufferStatus { raw })
    }
}

/// Shared error mapping for the attachment family.
fn attach_outcome(err: Option<GlError>) -> Result<()> {
    let Some(err) = err else {
        return Ok(());
    };
    Err(match err.kind {
        ErrorKind::InvalidEnum => CallError::new(
            "framebuffer: failed to attach texture",
            "'target', 'attachment', or the texture target is not one of the allowed values",
            err,
        )
        .into(),
        ErrorKind::InvalidValue => CallError::new(
            "framebuffer: failed to attach texture",
            "'level' is not a valid mipmap level for the texture",
            err,
        )
        .into(),
        ErrorKind::InvalidOperation => CallError::new(
            "framebuffer: failed to attach texture",
            "the default framebuffer is bound, or the texture and its target are not compatible",
            err,
        )
        .into(),
        _ => err.into(),
    })
}

impl Bind for Framebuffer<'_> {
    fn bind(&self) -> Result<()> {
        assert!(self.id > 0, "framebuffer has no name");
        clear_error(self.gl);
        self.gl.bind_framebuffer(self.target.raw(), self.id);
        if let Some(err) = check_error(self.gl) {
            return Err(match err.kind {
                ErrorKind::InvalidEnum => CallError::new(
                    "framebuffer: failed to bind",
                    "'target' is not one of the allowed values",
                    err,
                )
                .into(),
                ErrorKind::InvalidOperation => CallError::new(
                    "framebuffer: failed to bind",
                    "'id' is neither 0 nor a previously allocated framebuffer name",
                    err,
                )
                .into(),
                _ => err.into(),
            });
        }
        Ok(())
    }

    fn unbind(&self) -> Result<()> {
        clear_error(self.gl);
        self.gl.bind_framebuffer(self.target.raw(), 0);
        ensure_no_error(self.gl)?;
        Ok(())
    }
}

impl Drop for Framebuffer<'_> {
    fn drop(&mut self) {
        if self.owns && self.id > 0 {
            clear_error(self.gl);
            self.gl.delete_framebuffer(self.id);
            if let Some(err) = check_error(self.gl) {
                tracing::error!(%err, id = self.id, "failed to release framebuffer");
            }
            trace!(id = self.id, "released framebuffer");
        }
    }
}
