//! Resource wrappers over the scoped-binding core.
//!
//! This crate ties [`glguard_core`] (host surface, error bracket, scoped
//! bind guards, capability state) to the concrete resource kinds of the
//! host API. Every wrapper owns exactly one handle, knows its binding
//! target, and implements [`Bind`] so the scoped guards and higher-level
//! operations compose:
//!
//! - [`Buffer`]: data upload, sub-range updates, mapped access.
//! - [`Texture`]: wrap and filter parameters under a state scope.
//! - [`Shader`]: source upload and compilation with info logs.
//! - [`Program`]: attachment, linking, activation, uniform cache.
//! - [`Framebuffer`]: texture attachment and completeness validation.
//!
//! Every mutating operation follows one pattern: acquire a scoped bind,
//! perform exactly one host call, check the sticky error register, and let
//! the guard's drop restore the binding slot.
//!
//! ```ignore
//! let gl = LoadedGl::load();
//! let mut vertices = Buffer::new(&gl, BufferTarget::Array)?;
//! vertices.data(mesh.as_bytes(), BufferUsage::StaticDraw)?;
//! // the array-buffer slot is back to 0 here
//! ```

pub mod buffer;
pub mod bytes;
pub mod framebuffer;
pub mod program;
pub mod shader;
pub mod texture;

// Re-export primary types at crate root for convenience.
pub use buffer::{Buffer, BufferTarget, BufferUsage, MapAccess};
pub use bytes::AsBytes;
pub use framebuffer::{Attachment, Framebuffer, FramebufferStatus, FramebufferTarget};
pub use program::{LinkResult, Program};
pub use shader::{CompileResult, Shader, ShaderKind};
pub use texture::{FilterMode, Texture, TextureTarget, WrapMode};

// The core's primitives, usable standalone.
pub use glguard_core::{
    check_error, clear_error, ensure_no_error, Bind, CallError, Capability, Error, ErrorKind,
    GlApi, GlError, LoadedGl, Result, ScopedBind, ScopedBindRef, StateScope,
};
