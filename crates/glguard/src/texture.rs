//! Texture objects: wrap and filter parameters under scoped bindings.
//!
//! Parameter updates enable the texture's target capability in a
//! [`StateScope`] for the duration of the call, so the fixed-function
//! enable bit is restored along with the binding slot.

use gl::types::{GLenum, GLint, GLuint};
use glguard_core::error::{check_error, clear_error, ensure_no_error, CallError, ErrorKind, Result};
use glguard_core::{Bind, Capability, GlApi, ScopedBind, StateScope};
use tracing::trace;

/// Binding point a texture is created for. Fixed for the texture's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TextureTarget {
    Texture1D = gl::TEXTURE_1D,
    Texture2D = gl::TEXTURE_2D,
    Texture3D = gl::TEXTURE_3D,
    Rectangle = gl::TEXTURE_RECTANGLE,
    CubeMap = gl::TEXTURE_CUBE_MAP,
    Array1D = gl::TEXTURE_1D_ARRAY,
    Array2D = gl::TEXTURE_2D_ARRAY,
}

impl TextureTarget {
    pub fn raw(self) -> GLenum {
        self as GLenum
    }

    /// The capability toggled around fixed-function parameter updates, for
    /// the targets that have one.
    pub fn capability(self) -> Option<Capability> {
        match self {
            Self::Texture1D => Some(Capability::Texture1D),
            Self::Texture2D => Some(Capability::Texture2D),
            Self::Texture3D => Some(Capability::Texture3D),
            Self::CubeMap => Some(Capability::TextureCubeMap),
            Self::Rectangle | Self::Array1D | Self::Array2D => None,
        }
    }
}

/// Coordinate wrapping mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum WrapMode {
    Repeat = gl::REPEAT,
    MirroredRepeat = gl::MIRRORED_REPEAT,
    ClampToEdge = gl::CLAMP_TO_EDGE,
    ClampToBorder = gl::CLAMP_TO_BORDER,
}

impl WrapMode {
    pub fn raw(self) -> GLenum {
        self as GLenum
    }
}

/// Minification/magnification filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum FilterMode {
    Nearest = gl::NEAREST,
    Linear = gl::LINEAR,
    NearestMipmapNearest = gl::NEAREST_MIPMAP_NEAREST,
    LinearMipmapNearest = gl::LINEAR_MIPMAP_NEAREST,
    NearestMipmapLinear = gl::NEAREST_MIPMAP_LINEAR,
    LinearMipmapLinear = gl::LINEAR_MIPMAP_LINEAR,
}

impl FilterMode {
    pub fn raw(self) -> GLenum {
        self as GLenum
    }
}

/// A texture object and the target it binds to.
pub struct Texture<'g> {
    gl: &'g dyn GlApi,
    id: GLuint,
    target: TextureTarget,
    owns: bool,
}

impl<'g> Texture<'g> {
    /// Allocate a new texture. The handle is released when the value drops.
    pub fn new(gl: &'g dyn GlApi, target: TextureTarget) -> Result<Self> {
        clear_error(gl);
        let id = gl.gen_texture();
        ensure_no_error(gl)?;
        trace!(id, ?target, "allocated texture");

        Ok(Self {
            gl,
            id,
            target,
            owns: true,
        })
    }

    /// Adopt a caller-supplied handle without taking ownership: the drop
    /// never releases it.
    pub fn from_raw(gl: &'g dyn GlApi, target: TextureTarget, id: GLuint) -> Self {
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

    pub fn target(&self) -> TextureTarget {
        self.target
    }

    pub fn owns_handle(&self) -> bool {
        self.owns
    }

    /// Apply one wrap mode to all three coordinates.
    pub fn set_wrap_params(&mut self, wrap: WrapMode) -> Result<()> {
        self.set_wrap_params_separate(wrap, wrap, wrap)
    }

    /// Apply wrap modes per coordinate.
    pub fn set_wrap_params_separate(
        &mut self,
        wrap_s: WrapMode,
        wrap_t: WrapMode,
        wrap_r: WrapMode,
    ) -> Result<()> {
        let mut pipeline = StateScope::new(self.gl);
        if let Some(cap) = self.target.capability() {
            pipeline.enable(cap);
        }

        let bound = ScopedBind::new(self)?;
        clear_error(bound.gl);
        let target = bound.target.raw();
        bound
            .gl
            .tex_parameter_i(target, gl::TEXTURE_WRAP_S, wrap_s.raw() as GLint);
        bound
            .gl
            .tex_parameter_i(target, gl::TEXTURE_WRAP_T, wrap_t.raw() as GLint);
        bound
            .gl
            .tex_parameter_i(target, gl::TEXTURE_WRAP_R, wrap_r.raw() as GLint);
        if let Some(err) = check_error(bound.gl) {
            return Err(match err.kind {
                ErrorKind::InvalidEnum => CallError::new(
                    "texture: failed to set wrap params",
                    "'target' or one of the wrap modes is not an allowed value",
                    err,
                )
                .into(),
                _ => err.into(),
            });
        }
        Ok(())
    }

    /// Apply one filter to both minification and magnification.
    pub fn set_filter_params(&mut self, filter: FilterMode) -> Result<()> {
        self.set_filter_params_separate(filter, filter)
    }

    /// Apply separate minification and magnification filters.
    pub fn set_filter_params_separate(
        &mut self,
        min_filter: FilterMode,
        mag_filter: FilterMode,
    ) -> Result<()> {
        let mut pipeline = StateScope::new(self.gl);
        if let Some(cap) = self.target.capability() {
            pipeline.enable(cap);
        }

        let bound = ScopedBind::new(self)?;
        clear_error(bound.gl);
        let target = bound.target.raw();
        bound
            .gl
            .tex_parameter_i(target, gl::TEXTURE_MIN_FILTER, min_filter.raw() as GLint);
        bound
            .gl
            .tex_parameter_i(target, gl::TEXTURE_MAG_FILTER, mag_filter.raw() as GLint);
        if let Some(err) = check_error(bound.gl) {
            return Err(match err.kind {
                ErrorKind::InvalidEnum => CallError::new(
                    "texture: failed to set filter params",
                    "'target' or one of the filters is not an allowed value",
                    err,
                )
                .into(),
                _ => err.into(),
            });
        }
        Ok(())
    }

    /// Wrap and filter in one call.
    pub fn set_params(&mut self, wrap: WrapMode, filter: FilterMode) -> Result<()> {
        self.set_wrap_params(wrap)?;
        self.set_filter_params(filter)
    }
}

impl Bind for Texture<'_> {
    fn bind(&self) -> Result<()> {
        assert!(self.id > 0, "texture has no name");
        clear_error(self.gl);
        self.gl.bind_texture(self.target.raw(), self.id);
        if let Some(err) = check_error(self.gl) {
            return Err(match err.kind {
                ErrorKind::InvalidEnum => CallError::new(
                    "texture: failed to bind",
                    "'target' is not one of the allowed values",
                    err,
                )
                .into(),
                ErrorKind::InvalidValue => CallError::new(
                    "texture: failed to bind",
                    "'id' is not a previously allocated texture name",
                    err,
                )
                .into(),
                ErrorKind::InvalidOperation => CallError::new(
                    "texture: failed to bind",
                    "the texture was previously created with another target",
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
        self.gl.bind_texture(self.target.raw(), 0);
        if let Some(err) = check_error(self.gl) {
            return Err(match err.kind {
                ErrorKind::InvalidEnum => CallError::new(
                    "texture: failed to unbind",
                    "'target' is not one of the allowed values",
                    err,
                )
                .into(),
                _ => err.into(),
            });
        }
        Ok(())
    }
}

impl Drop for Texture<'_> {
    fn drop(&mut self) {
        if self.owns && self.id > 0 {
            self.gl.delete_texture(self.id);
            trace!(id = self.id, "released texture");
        }
    }
}
