//! Critical-section primitive.
//!
//! [`lock`] masks interrupt delivery and returns a [`Token`] holding the
//! previous mask state; [`unlock`] restores exactly that state. Scopes do not
//! nest implicitly: every `lock` is paired with the `unlock` of its own token,
//! innermost first.
//!
//! [`LockGuard`] is the RAII form and hands out the
//! `critical_section::CriticalSection` token needed to borrow state kept in a
//! `critical_section::Mutex`.
//!
//! The backend is whatever `critical_section` implementation is linked:
//! PRIMASK save/restore on Cortex-M (see `hal::cortex_m3`), the `std`
//! implementation for host tests.

use core::marker::PhantomData;

use critical_section::{CriticalSection, RestoreState};

/// Prior interrupt state captured by [`lock`].
#[must_use = "an unreleased token leaves interrupts masked"]
pub struct Token {
    state: RestoreState,
    // must be released on the context that acquired it
    _not_send: PhantomData<*mut ()>,
}

/// Masks interrupts, returning the state to restore.
#[inline]
pub fn lock() -> Token {
    // SAFETY: paired with `unlock`, which consumes the token.
    let state = unsafe { critical_section::acquire() };
    Token {
        state,
        _not_send: PhantomData,
    }
}

/// Restores the interrupt state captured in `token`.
#[inline]
pub fn unlock(token: Token) {
    // SAFETY: the token came from `lock` on this context and is consumed
    // here, so it is released exactly once.
    unsafe { critical_section::release(token.state) }
}

/// RAII critical section
///
/// # Example
///
/// ```rust,ignore
/// let guard = LockGuard::acquire();
/// let pending = events.take(guard.cs());
/// drop(guard); // interrupts restored
/// ```
pub struct LockGuard {
    token: Option<Token>,
}

impl LockGuard {
    pub fn acquire() -> Self {
        Self { token: Some(lock()) }
    }

    /// Token proving interrupts are masked for the guard's lifetime.
    pub fn cs(&self) -> CriticalSection<'_> {
        // SAFETY: the guard holds the lock until it is dropped, and the
        // returned token cannot outlive the borrow of `self`.
        unsafe { CriticalSection::new() }
    }

    /// Releases early; equivalent to dropping the guard.
    pub fn release(mut self) {
        if let Some(token) = self.token.take() {
            unlock(token);
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            unlock(token);
        }
    }
}
