//! Safe byte-slice conversion for buffer uploads.

/// Convert a `#[repr(C)]` struct to a byte slice for buffer upload.
///
/// # Safety
///
/// Only implement on `#[repr(C)]` structs whose fields are all plain numeric
/// types (f32, i32, u32, etc.) with no pointers, references, or
/// padding-dependent invariants.
///
/// # Example
///
/// ```rust,ignore
/// #[repr(C)]
/// struct Vertex {
///     position: [f32; 3],
///     uv: [f32; 2],
/// }
///
/// unsafe impl AsBytes for Vertex {}
///
/// // Then:
/// buffer.data(vertex.as_bytes(), BufferUsage::StaticDraw)?;
/// ```
pub unsafe trait AsBytes: Sized {
    /// View `self` as a byte slice. The returned slice has length
    /// `std::mem::size_of::<Self>()`.
    fn as_bytes(&self) -> &[u8] {
        unsafe {
            std::slice::from_raw_parts(self as *const Self as *const u8, std::mem::size_of::<Self>())
        }
    }
}
