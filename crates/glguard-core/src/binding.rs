//! Scoped bind guards.
//!
//! A guard owns no data of its own, only the obligation to unbind the
//! resource it bound. Construction binds; drop unbinds. The armed flag
//! enforces bind-once/unbind-once: arming an armed guard, or releasing a
//! disarmed one, is a contract violation.
//!
//! The guard restores the slot to *unbound* (handle 0), never to whatever
//! was bound before it. Two concurrent guards over the same target are
//! therefore a caller error: the inner guard's exit leaves the slot empty,
//! not restored to the outer guard's handle.

use std::ops::{Deref, DerefMut};

use crate::error::Result;

/// A resource that can occupy and vacate a global binding slot.
///
/// `bind` makes the resource current for its target; `unbind` restores the
/// target to the empty binding. Program objects participate too: their
/// bind activates the program and their unbind activates program 0.
pub trait Bind {
    fn bind(&self) -> Result<()>;
    fn unbind(&self) -> Result<()>;
}

/// Scope-bound binding over a mutable borrow.
///
/// Dereferences to the resource so domain operations can run while the
/// binding is held. The resource may also be bound manually elsewhere; this
/// guard only tracks the binding it performed itself.
pub struct ScopedBind<'a, T: Bind> {
    resource: &'a mut T,
    armed: bool,
}

impl<'a, T: Bind> ScopedBind<'a, T> {
    /// Bind `resource` and take on the obligation to unbind it.
    ///
    /// If the bind fails the guard is never constructed and no unbind
    /// obligation exists.
    pub fn new(resource: &'a mut T) -> Result<Self> {
        resource.bind()?;
        Ok(Self {
            resource,
            armed: true,
        })
    }

    /// Re-arm a guard that was explicitly released.
    ///
    /// # Panics
    ///
    /// Panics if the guard is still armed.
    pub fn rebind(&mut self) -> Result<()> {
        assert!(!self.armed, "scoped bind is already armed");
        self.resource.bind()?;
        self.armed = true;
        Ok(())
    }

    /// Unbind before the end of scope.
    ///
    /// On failure the guard stays armed and the drop will retry.
    ///
    /// # Panics
    ///
    /// Panics if the guard is not armed.
    pub fn release(&mut self) -> Result<()> {
        assert!(self.armed, "scoped bind is not armed");
        self.resource.unbind()?;
        self.armed = false;
        Ok(())
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

impl<T: Bind> Deref for ScopedBind<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.resource
    }
}

impl<T: Bind> DerefMut for ScopedBind<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.resource
    }
}

impl<T: Bind> Drop for ScopedBind<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            if let Err(err) = self.resource.unbind() {
                tracing::error!(%err, "unbind failed during scope exit; binding slot may be stale");
            }
            self.armed = false;
        }
    }
}

/// Scope-bound binding over a shared borrow.
///
/// Identical armed/disarmed state machine as [`ScopedBind`], but the
/// resource cannot be mutated through the guard.
pub struct ScopedBindRef<'a, T: Bind> {
    resource: &'a T,
    armed: bool,
}

impl<'a, T: Bind> ScopedBindRef<'a, T> {
    /// Bind `resource` and take on the obligation to unbind it.
    pub fn new(resource: &'a T) -> Result<Self> {
        resource.bind()?;
        Ok(Self {
            resource,
            armed: true,
        })
    }

    /// Re-arm a guard that was explicitly released.
    ///
    /// # Panics
    ///
    /// Panics if the guard is still armed.
    pub fn rebind(&mut self) -> Result<()> {
        assert!(!self.armed, "scoped bind is already armed");
        self.resource.bind()?;
        self.armed = true;
        Ok(())
    }

    /// Unbind before the end of scope.
    ///
    /// # Panics
    ///
    /// Panics if the guard is not armed.
    pub fn release(&mut self) -> Result<()> {
        assert!(self.armed, "scoped bind is not armed");
        self.resource.unbind()?;
        self.armed = false;
        Ok(())
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

impl<T: Bind> Deref for ScopedBindRef<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.resource
    }
}

impl<T: Bind> Drop for ScopedBindRef<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            if let Err(err) = self.resource.unbind() {
                tracing::error!(%err, "unbind failed during scope exit; binding slot may be stale");
            }
            self.armed = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind, GlError};
    use std::cell::Cell;

    /// Counts bind/unbind traffic and fails on demand.
    struct Probe {
        binds: Cell<u32>,
        unbinds: Cell<u32>,
        fail_bind: Cell<bool>,
        fail_unbind: Cell<bool>,
    }

    impl Probe {
        fn new() -> Self {
            Self {
                binds: Cell::new(0),
                unbinds: Cell::new(0),
                fail_bind: Cell::new(false),
                fail_unbind: Cell::new(false),
            }
        }

        fn failure() -> Error {
            GlError {
                kind: ErrorKind::InvalidOperation,
                raw: gl::INVALID_OPERATION,
            }
            .into()
        }
    }

    impl Bind for Probe {
        fn bind(&self) -> Result<()> {
            if self.fail_bind.get() {
                return Err(Self::failure());
            }
            self.binds.set(self.binds.get() + 1);
            Ok(())
        }

        fn unbind(&self) -> Result<()> {
            if self.fail_unbind.get() {
                return Err(Self::failure());
            }
            self.unbinds.set(self.unbinds.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn test_binds_on_construction_and_unbinds_on_drop() {
        let mut probe = Probe::new();
        {
            let guard = ScopedBind::new(&mut probe).unwrap();
            assert!(guard.is_armed());
            assert_eq!(guard.binds.get(), 1);
            assert_eq!(guard.unbinds.get(), 0);
        }
        assert_eq!(probe.binds.get(), 1);
        assert_eq!(probe.unbinds.get(), 1);
    }

    #[test]
    fn test_release_then_rebind_round_trips() {
        let mut probe = Probe::new();
        {
            let mut guard = ScopedBind::new(&mut probe).unwrap();
            guard.release().unwrap();
            assert!(!guard.is_armed());
            guard.rebind().unwrap();
            assert!(guard.is_armed());
        }
        assert_eq!(probe.binds.get(), 2);
        assert_eq!(probe.unbinds.get(), 2);
    }

    #[test]
    #[should_panic(expected = "already armed")]
    fn test_rebinding_an_armed_guard_is_a_contract_violation() {
        let mut probe = Probe::new();
        let mut guard = ScopedBind::new(&mut probe).unwrap();
        let _ = guard.rebind();
    }

    #[test]
    #[should_panic(expected = "not armed")]
    fn test_releasing_a_disarmed_guard_is_a_contract_violation() {
        let mut probe = Probe::new();
        let mut guard = ScopedBind::new(&mut probe).unwrap();
        guard.release().unwrap();
        let _ = guard.release();
    }

    #[test]
    fn test_failed_bind_creates_no_unbind_obligation() {
        let mut probe = Probe::new();
        probe.fail_bind.set(true);

        assert!(ScopedBind::new(&mut probe).is_err());
        assert_eq!(probe.unbinds.get(), 0);
    }

    #[test]
    fn test_failed_unbind_during_drop_does_not_panic() {
        let mut probe = Probe::new();
        {
            let guard = ScopedBind::new(&mut probe).unwrap();
            guard.fail_unbind.set(true);
            // Drop swallows the failure and records it instead.
        }
        assert_eq!(probe.unbinds.get(), 0);
    }

    #[test]
    fn test_failed_release_keeps_the_guard_armed() {
        let mut probe = Probe::new();
        let mut guard = ScopedBind::new(&mut probe).unwrap();
        guard.fail_unbind.set(true);

        assert!(guard.release().is_err());
        assert!(guard.is_armed());
    }

    #[test]
    fn test_shared_guard_runs_the_same_state_machine() {
        let probe = Probe::new();
        {
            let mut guard = ScopedBindRef::new(&probe).unwrap();
            assert!(guard.is_armed());
            guard.release().unwrap();
            guard.rebind().unwrap();
        }
        assert_eq!(probe.binds.get(), 2);
        assert_eq!(probe.unbinds.get(), 2);
    }
}
