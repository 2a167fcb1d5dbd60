//! Process-wide reentrancy latch.
//!
//! One latch guards every state-mutating entry point of the engine. Entry
//! fails with [`OpenspanError::Reentered`] while the latch is held, and the
//! RAII guard releases it on every exit path — success, early return, or
//! error — before control returns to the original caller.
//!
//! This is stricter than per-record locking on purpose: external transfer
//! calls can execute arbitrary code, so *all* mutating entry points are
//! serialized against each other, not only those touching the same record.

use std::cell::Cell;

use openspan_types::{OpenspanError, Result};

/// Single-slot latch for the engine's serializing execution context.
///
/// The engine has no internal parallelism (it is deliberately `!Sync`); the
/// latch exists to reject *synchronous reentry* — a collaborator calling
/// back into the engine from within an operation that is still inside it.
#[derive(Debug, Default)]
pub struct ReentryLatch {
    locked: Cell<bool>,
}

impl ReentryLatch {
    /// Create a new unlocked latch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the latch for the duration of the returned guard.
    ///
    /// # Errors
    /// Returns [`OpenspanError::Reentered`] if the latch is already held.
    pub fn enter(&self) -> Result<Latched<'_>> {
        if self.locked.replace(true) {
            return Err(OpenspanError::Reentered);
        }
        Ok(Latched { latch: self })
    }

    /// Whether an operation is currently inside the latch.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }
}

/// RAII guard: the latch is held while this value lives.
#[derive(Debug)]
pub struct Latched<'a> {
    latch: &'a ReentryLatch,
}

impl Drop for Latched<'_> {
    fn drop(&mut self) {
        self.latch.locked.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_locks_until_drop() {
        let latch = ReentryLatch::new();
        assert!(!latch.is_locked());
        {
            let _held = latch.enter().unwrap();
            assert!(latch.is_locked());
        }
        assert!(!latch.is_locked());
    }

    #[test]
    fn nested_enter_fails() {
        let latch = ReentryLatch::new();
        let _held = latch.enter().unwrap();
        let err = latch.enter().unwrap_err();
        assert!(matches!(err, OpenspanError::Reentered));
        // The failed attempt must not have released the latch.
        assert!(latch.is_locked());
    }

    #[test]
    fn released_on_error_path() {
        let latch = ReentryLatch::new();
        let failing_op = |latch: &ReentryLatch| -> Result<()> {
            let _held = latch.enter()?;
            Err(OpenspanError::Internal("boom".into()))
        };
        assert!(failing_op(&latch).is_err());
        assert!(!latch.is_locked(), "latch must release on the error path");
        assert!(latch.enter().is_ok());
    }
}
