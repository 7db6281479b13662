#![allow(clippy::too_many_arguments)]

//! Scoped binding, capability state, and error translation for a
//! handle-based OpenGL context.
//!
//! The host API keeps one global "current" slot per binding target, a
//! global capability bit-vector, and one sticky error code, all trivially
//! leaked by callers that forget to unbind, forget to restore, or skip the
//! error register. This crate turns those disciplines into types:
//!
//! - [`GlApi`] is the explicit host surface; nothing here reads ambient
//!   globals, so tests substitute [`fake::FakeGl`] for [`LoadedGl`].
//! - [`ScopedBind`] / [`ScopedBindRef`] turn "bind, work, unbind" into an
//!   exception-safe scope over anything implementing [`Bind`].
//! - [`StateScope`] records capability changes and reverts them on drop,
//!   with [`StateScope::commit`] to keep changes past the scope.
//! - [`check_error`] and friends bracket each mutating call so the sticky
//!   register is attributed to the operation that raised it.

pub mod api;
pub mod binding;
pub mod context;
pub mod error;
pub mod fake;
pub mod state;

// Re-export primary types at crate root for convenience.
pub use api::GlApi;
pub use binding::{Bind, ScopedBind, ScopedBindRef};
pub use context::LoadedGl;
pub use error::{
    check_error, clear_error, ensure_no_error, CallError, Error, ErrorKind, GlError, Result,
};
pub use state::{Capability, StateScope};
