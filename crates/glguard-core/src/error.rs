//! Sticky-error classification and the per-call error bracket.
//!
//! The host keeps one pending error code in a global register, cleared on
//! read. Attribution is only correct if every mutating call is bracketed:
//! [`clear_error`], one host call, [`check_error`]. Call sites then match on
//! the classified [`ErrorKind`] to produce a [`CallError`] naming the
//! operation and the argument that is likely invalid.
//!
//! With the `check-errors` feature disabled the bracket compiles to no-ops;
//! the consumer contract is unchanged except that errors are never reported.

use gl::types::GLenum;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::api::GlApi;

/// Classification of a raw host error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, thiserror::Error)]
#[repr(u32)]
pub enum ErrorKind {
    /// An enumerated argument is not one of the allowed values.
    #[error("invalid enum")]
    InvalidEnum = gl::INVALID_ENUM,
    /// A numeric argument is out of range, or a handle was never allocated.
    #[error("invalid value")]
    InvalidValue = gl::INVALID_VALUE,
    /// The call is not allowed in the current state.
    #[error("invalid operation")]
    InvalidOperation = gl::INVALID_OPERATION,
    #[error("invalid framebuffer operation")]
    InvalidFramebufferOperation = gl::INVALID_FRAMEBUFFER_OPERATION,
    #[error("out of memory")]
    OutOfMemory = gl::OUT_OF_MEMORY,
    /// A code this layer does not recognize. Never silently swallowed.
    #[error("unknown error")]
    Unknown = u32::MAX,
}

impl ErrorKind {
    /// Pure mapping from a raw non-zero error code.
    pub fn classify(raw: GLenum) -> Self {
        Self::from_u32(raw).unwrap_or(Self::Unknown)
    }
}

/// A classified host error. Keeps the raw code for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct GlError {
    pub kind: ErrorKind,
    pub raw: GLenum,
}

impl GlError {
    pub fn new(raw: GLenum) -> Self {
        Self {
            kind: ErrorKind::classify(raw),
            raw,
        }
    }
}

/// A host error wrapped with the operation it occurred in and a description
/// of the argument that is likely invalid. The underlying classified error
/// is preserved as the [`std::error::Error::source`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation}: {detail}")]
pub struct CallError {
    pub operation: &'static str,
    pub detail: &'static str,
    #[source]
    pub source: GlError,
}

impl CallError {
    pub fn new(operation: &'static str, detail: &'static str, source: GlError) -> Self {
        Self {
            operation,
            detail,
            source,
        }
    }
}

/// Errors surfaced by this workspace.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A classified host error with no further context.
    #[error(transparent)]
    Gl(#[from] GlError),
    /// A host error attributed to a specific operation and argument.
    #[error(transparent)]
    Call(#[from] CallError),
    /// A failure the host reports through a return value rather than the
    /// sticky register (a missing uniform, for example).
    #[error("{operation}: {detail}")]
    Failed {
        operation: &'static str,
        detail: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Drain the sticky register so the next [`check_error`] reflects only
/// calls made after this point.
#[cfg(feature = "check-errors")]
pub fn clear_error(gl: &dyn GlApi) {
    let _ = gl.get_error();
}

/// Read and clear the sticky register, classifying any pending error.
///
/// Must run immediately after the single host call it is meant to attribute
/// errors to; the register is not a queue.
#[cfg(feature = "check-errors")]
pub fn check_error(gl: &dyn GlApi) -> Option<GlError> {
    match gl.get_error() {
        gl::NO_ERROR => None,
        raw => Some(GlError::new(raw)),
    }
}

/// [`check_error`], erring on any pending code.
#[cfg(feature = "check-errors")]
pub fn ensure_no_error(gl: &dyn GlApi) -> std::result::Result<(), GlError> {
    match check_error(gl) {
        None => Ok(()),
        Some(err) => Err(err),
    }
}

#[cfg(not(feature = "check-errors"))]
#[inline(always)]
pub fn clear_error(_gl: &dyn GlApi) {}

#[cfg(not(feature = "check-errors"))]
#[inline(always)]
pub fn check_error(_gl: &dyn GlApi) -> Option<GlError> {
    None
}

#[cfg(not(feature = "check-errors"))]
#[inline(always)]
pub fn ensure_no_error(_gl: &dyn GlApi) -> std::result::Result<(), GlError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeGl;
    use std::error::Error as _;

    #[test]
    fn test_classify_known_codes() {
        assert_eq!(ErrorKind::classify(gl::INVALID_ENUM), ErrorKind::InvalidEnum);
        assert_eq!(ErrorKind::classify(gl::INVALID_VALUE), ErrorKind::InvalidValue);
        assert_eq!(
            ErrorKind::classify(gl::INVALID_OPERATION),
            ErrorKind::InvalidOperation
        );
        assert_eq!(
            ErrorKind::classify(gl::INVALID_FRAMEBUFFER_OPERATION),
            ErrorKind::InvalidFramebufferOperation
        );
        assert_eq!(ErrorKind::classify(gl::OUT_OF_MEMORY), ErrorKind::OutOfMemory);
    }

    #[test]
    fn test_unrecognized_code_surfaces_as_unknown() {
        let err = GlError::new(0xBEEF);
        assert_eq!(err.kind, ErrorKind::Unknown);
        assert_eq!(err.raw, 0xBEEF);
    }

    #[test]
    fn test_check_reads_and_clears_the_register() {
        let gl = FakeGl::new();
        gl.set_error(gl::INVALID_VALUE);

        let err = check_error(&gl).expect("a pending error");
        assert_eq!(err.kind, ErrorKind::InvalidValue);

        // The register is cleared on read.
        assert_eq!(check_error(&gl), None);
    }

    #[test]
    fn test_clear_discards_a_pending_error() {
        let gl = FakeGl::new();
        gl.set_error(gl::INVALID_ENUM);

        clear_error(&gl);
        assert_eq!(check_error(&gl), None);
    }

    #[test]
    fn test_call_error_chains_to_the_underlying_code() {
        let err = CallError::new(
            "texture: failed to bind",
            "'target' is not one of the allowed values",
            GlError::new(gl::INVALID_ENUM),
        );

        assert_eq!(
            err.to_string(),
            "texture: failed to bind: 'target' is not one of the allowed values"
        );
        let source = err.source().expect("underlying error");
        assert_eq!(source.to_string(), "invalid enum");
    }
}
