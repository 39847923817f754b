//! Single-flight coordination for token refresh.
//!
//! Any number of requests may hit a 401 at the same time; the gate
//! guarantees they coalesce onto one in-flight refresh call and all
//! observe its single outcome.

use std::sync::Mutex;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};

pub(crate) type RefreshFuture = Shared<BoxFuture<'static, bool>>;

/// Holder of the at-most-one in-flight refresh future.
///
/// The mutex guard is only ever held to swap the slot, never across an
/// await point.
#[derive(Default)]
pub(crate) struct RefreshGate {
    in_flight: Mutex<Option<RefreshFuture>>,
}

impl RefreshGate {
    /// Join the in-flight refresh if one exists, otherwise install the
    /// future built by `start` and return a handle to it.
    pub(crate) fn join_or_start(
        &self,
        start: impl FnOnce() -> BoxFuture<'static, bool>,
    ) -> RefreshFuture {
        let mut slot = self.in_flight.lock().unwrap();
        if let Some(in_flight) = slot.as_ref() {
            return in_flight.clone();
        }

        let fut = start().shared();
        *slot = Some(fut.clone());
        fut
    }

    /// Empty the slot so the next demand starts a fresh attempt.
    ///
    /// Called by the refresh future itself once it has settled, success or
    /// failure, before any waiter observes the result.
    pub(crate) fn clear(&self) {
        self.in_flight.lock().unwrap().take();
    }
}
