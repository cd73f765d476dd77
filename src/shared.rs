//! Thread-shareable session handle (requires the `std` feature).
//!
//! Hosts that tick on one thread and handle key bindings or menus on another
//! clone a [`SharedSession`] into each. Every operation takes the lock for its
//! whole duration, so a tick and a user action never interleave.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::diagnostics::Diagnostics;
use crate::input::InputSource;
use crate::profile::Profile;
use crate::session::Session;

/// Cloneable, lock-guarded [`Session`].
pub struct SharedSession<I: InputSource> {
    inner: Arc<Mutex<Session<I>>>,
}

impl<I: InputSource> Clone for SharedSession<I> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I: InputSource> SharedSession<I> {
    /// Wrap an existing session.
    pub fn new(session: Session<I>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Hold the lock for a batch of operations.
    pub fn lock(&self) -> MutexGuard<'_, Session<I>> {
        self.inner.lock()
    }

    /// Run `f` with exclusive access.
    pub fn with<R>(&self, f: impl FnOnce(&mut Session<I>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// See [`Session::init`].
    pub fn init(&self) {
        self.inner.lock().init();
    }

    /// See [`Session::teardown`].
    pub fn teardown(&self) {
        self.inner.lock().teardown();
    }

    /// See [`Session::tick`].
    pub fn tick(&self) {
        self.inner.lock().tick();
    }

    /// See [`Session::toggle_enabled`].
    pub fn toggle_enabled(&self) -> bool {
        self.inner.lock().toggle_enabled()
    }

    /// See [`Session::cycle_profile`].
    pub fn cycle_profile(&self) -> Profile {
        self.inner.lock().cycle_profile()
    }

    /// See [`Session::set_profile`].
    pub fn set_profile(&self, profile: Profile) {
        self.inner.lock().set_profile(profile);
    }

    /// See [`Session::diagnostics`].
    pub fn diagnostics(&self) -> Diagnostics {
        self.inner.lock().diagnostics()
    }

    /// Unwrap the session if this is the last handle.
    pub fn try_into_inner(self) -> Result<Session<I>, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}
