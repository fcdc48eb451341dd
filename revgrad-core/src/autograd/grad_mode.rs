//! Grad mode: whether tracked operations record graph records.
//!
//! The state is per thread, so a no-grad region on one thread never affects
//! graph construction running concurrently on another. Guards restore the
//! state they found on drop, which gives stack discipline for nested scopes
//! and covers early returns and unwinding.

use std::cell::Cell;
use std::marker::PhantomData;

thread_local! {
    static GRAD_ENABLED: Cell<bool> = const { Cell::new(true) };
}

/// Returns `true` if operations on this thread currently build the graph.
pub fn is_grad_enabled() -> bool {
    GRAD_ENABLED.with(|enabled| enabled.get())
}

/// Sets grad mode for the guard's lifetime and restores the previous mode on drop.
///
/// Not `Send`: the guard must be dropped on the thread whose state it changed.
#[must_use = "grad mode is restored as soon as the guard is dropped"]
pub struct GradModeGuard {
    prev: bool,
    _not_send: PhantomData<*const ()>,
}

impl GradModeGuard {
    pub fn set(enabled: bool) -> Self {
        let prev = GRAD_ENABLED.with(|state| state.replace(enabled));
        log::trace!("grad mode set to {} (was {})", enabled, prev);
        GradModeGuard {
            prev,
            _not_send: PhantomData,
        }
    }
}

impl Drop for GradModeGuard {
    fn drop(&mut self) {
        GRAD_ENABLED.with(|state| state.set(self.prev));
    }
}

/// Disables graph construction until dropped.
///
/// ```
/// use revgrad_core::autograd::{is_grad_enabled, NoGradGuard};
///
/// {
///     let _guard = NoGradGuard::new();
///     assert!(!is_grad_enabled());
/// }
/// assert!(is_grad_enabled());
/// ```
#[must_use = "grad mode is restored as soon as the guard is dropped"]
pub struct NoGradGuard {
    _inner: GradModeGuard,
}

impl NoGradGuard {
    pub fn new() -> Self {
        NoGradGuard {
            _inner: GradModeGuard::set(false),
        }
    }
}

impl Default for NoGradGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs `f` with graph construction disabled.
pub fn no_grad<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = NoGradGuard::new();
    f()
}
