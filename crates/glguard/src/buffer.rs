//! Buffer objects: data upload and mapped access under scoped bindings.

use std::os::raw::c_void;

use gl::types::{GLenum, GLuint};
use glguard_core::error::{check_error, clear_error, ensure_no_error, CallError, ErrorKind, Result};
use glguard_core::{Bind, GlApi, ScopedBind};
use tracing::{trace, warn};

/// Binding point a buffer is created for. Fixed for the buffer's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum BufferTarget {
    Array = gl::ARRAY_BUFFER,
    ElementArray = gl::ELEMENT_ARRAY_BUFFER,
    PixelPack = gl::PIXEL_PACK_BUFFER,
    PixelUnpack = gl::PIXEL_UNPACK_BUFFER,
    CopyRead = gl::COPY_READ_BUFFER,
    CopyWrite = gl::COPY_WRITE_BUFFER,
    Uniform = gl::UNIFORM_BUFFER,
    TransformFeedback = gl::TRANSFORM_FEEDBACK_BUFFER,
}

impl BufferTarget {
    pub fn raw(self) -> GLenum {
        self as GLenum
    }
}

/// Expected access pattern for the buffer's data store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum BufferUsage {
    StreamDraw = gl::STREAM_DRAW,
    StreamRead = gl::STREAM_READ,
    StreamCopy = gl::STREAM_COPY,
    StaticDraw = gl::STATIC_DRAW,
    StaticRead = gl::STATIC_READ,
    StaticCopy = gl::STATIC_COPY,
    DynamicDraw = gl::DYNAMIC_DRAW,
    DynamicRead = gl::DYNAMIC_READ,
    DynamicCopy = gl::DYNAMIC_COPY,
}

impl BufferUsage {
    pub fn raw(self) -> GLenum {
        self as GLenum
    }
}

/// Access mode for [`Buffer::map`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MapAccess {
    ReadOnly = gl::READ_ONLY,
    WriteOnly = gl::WRITE_ONLY,
    ReadWrite = gl::READ_WRITE,
}

impl MapAccess {
    pub fn raw(self) -> GLenum {
        self as GLenum
    }
}

/// A buffer object and the target it binds to.
pub struct Buffer<'g> {
    gl: &'g dyn GlApi,
    id: GLuint,
    target: BufferTarget,
    mapped: Option<*mut c_void>,
    owns: bool,
}

impl<'g> Buffer<'g> {
    /// Allocate a new buffer. The handle is released when the value drops.
    pub fn new(gl: &'g dyn GlApi, target: BufferTarget) -> Result<Self> {
        clear_error(gl);
        let id = gl.gen_buffer();
        ensure_no_error(gl)?;
        trace!(id, ?target, "allocated buffer");

        Ok(Self {
            gl,
            id,
            target,
            mapped: None,
            owns: true,
        })
    }

    /// Adopt a caller-supplied handle without taking ownership: the drop
    /// never releases it.
    pub fn from_raw(gl: &'g dyn GlApi, target: BufferTarget, id: GLuint) -> Self {
        Self {
            gl,
            id,
            target,
            mapped: None,
            owns: false,
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn target(&self) -> BufferTarget {
        self.target
    }

    pub fn owns_handle(&self) -> bool {
        self.owns
    }

    /// Allocate and fill the data store of the bound buffer.
    pub fn data(&mut self, data: &[u8], usage: BufferUsage) -> Result<()> {
        let bound = ScopedBind::new(self)?;
        clear_error(bound.gl);
        bound.gl.buffer_data(bound.target.raw(), data, usage.raw());
        if let Some(err) = check_error(bound.gl) {
            return Err(match err.kind {
                ErrorKind::InvalidEnum => CallError::new(
                    "buffer: failed to set data",
                    "'target' or 'usage' is not one of the allowed values",
                    err,
                )
                .into(),
                ErrorKind::OutOfMemory => CallError::new(
                    "buffer: failed to set data",
                    "the host could not allocate a data store of the requested size",
                    err,
                )
                .into(),
                _ => err.into(),
            });
        }
        Ok(())
    }

    /// Overwrite a range of the data store.
    pub fn sub_data(&mut self, offset: isize, data: &[u8]) -> Result<()> {
        let bound = ScopedBind::new(self)?;
        clear_error(bound.gl);
        bound.gl.buffer_sub_data(bound.target.raw(), offset, data);
        if let Some(err) = check_error(bound.gl) {
            return Err(match err.kind {
                ErrorKind::InvalidValue => CallError::new(
                    "buffer: failed to set subdata",
                    "'offset' and the data length reach past the end of the data store",
                    err,
                )
                .into(),
                ErrorKind::InvalidOperation => CallError::new(
                    "buffer: failed to set subdata",
                    "the data store is currently mapped",
                    err,
                )
                .into(),
                _ => err.into(),
            });
        }
        Ok(())
    }

    /// Map the data store into client memory.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is already mapped through this wrapper.
    pub fn map(&mut self, access: MapAccess) -> Result<*mut c_void> {
        assert!(self.mapped.is_none(), "buffer is already mapped");

        let bound = ScopedBind::new(self)?;
        clear_error(bound.gl);
        let ptr = bound.gl.map_buffer(bound.target.raw(), access.raw());
        if let Some(err) = check_error(bound.gl) {
            return Err(match err.kind {
                ErrorKind::InvalidEnum => CallError::new(
                    "buffer: failed to map",
                    "'target' or 'access' is not one of the allowed values",
                    err,
                )
                .into(),
                ErrorKind::InvalidOperation => CallError::new(
                    "buffer: failed to map",
                    "the buffer is already mapped by the host",
                    err,
                )
                .into(),
                ErrorKind::OutOfMemory => CallError::new(
                    "buffer: failed to map",
                    "the host could not map the data store",
                    err,
                )
                .into(),
                _ => err.into(),
            });
        }
        drop(bound);

        self.mapped = Some(ptr);
        Ok(ptr)
    }

    /// Release a mapping made by [`Buffer::map`].
    ///
    /// # Panics
    ///
    /// Panics if the buffer is not mapped.
    pub fn unmap(&mut self) -> Result<()> {
        assert!(self.mapped.is_some(), "buffer is not mapped");

        let bound = ScopedBind::new(self)?;
        clear_error(bound.gl);
        let intact = bound.gl.unmap_buffer(bound.target.raw());
        if let Some(err) = check_error(bound.gl) {
            return Err(match err.kind {
                ErrorKind::InvalidOperation => CallError::new(
                    "buffer: failed to unmap",
                    "the buffer is not currently mapped",
                    err,
                )
                .into(),
                _ => err.into(),
            });
        }
        drop(bound);

        self.mapped = None;
        if !intact {
            warn!(id = self.id, "buffer data store became corrupt while mapped");
        }
        Ok(())
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped.is_some()
    }

    /// Pointer from the active mapping, if any.
    pub fn mapped_ptr(&self) -> Option<*mut c_void> {
        self.mapped
    }
}

impl Bind for Buffer<'_> {
    fn bind(&self) -> Result<()> {
        assert!(self.id > 0, "buffer has no name");
        clear_error(self.gl);
        self.gl.bind_buffer(self.target.raw(), self.id);
        if let Some(err) = check_error(self.gl) {
            return Err(match err.kind {
                ErrorKind::InvalidEnum => CallError::new(
                    "buffer: failed to bind",
                    "'target' is not one of the allowed binding points",
                    err,
                )
                .into(),
                ErrorKind::InvalidValue => CallError::new(
                    "buffer: failed to bind",
                    "'id' is not a previously allocated buffer name",
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
        self.gl.bind_buffer(self.target.raw(), 0);
        if let Some(err) = check_error(self.gl) {
            return Err(match err.kind {
                ErrorKind::InvalidEnum => CallError::new(
                    "buffer: failed to unbind",
                    "'target' is not one of the allowed binding points",
                    err,
                )
                .into(),
                _ => err.into(),
            });
        }
        Ok(())
    }
}

impl Drop for Buffer<'_> {
    fn drop(&mut self) {
        if self.owns && self.id > 0 {
            self.gl.delete_buffer(self.id);
            trace!(id = self.id, "released buffer");
        }
    }
}
