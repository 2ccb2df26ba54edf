//! Per-cycle processing set: a concurrent-safe set where
//! insertion reports whether the key was already present, so a file
//! already claimed by another in-flight cycle is skipped rather than
//! processed twice. Grounded on the same "claim a key in a concurrent
//! map" idiom the mediation engine's queue manager uses for its
//! in-flight tracking.

use dashmap::DashSet;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct ClaimSet {
    inner: Arc<DashSet<String>>,
}

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to claim `uri`. Returns `true` if this call won the claim.
    pub fn try_claim(&self, uri: &str) -> bool {
        self.inner.insert(uri.to_string())
    }

    pub fn release(&self, uri: &str) {
        self.inner.remove(uri);
    }

    pub fn is_claimed(&self, uri: &str) -> bool {
        self.inner.contains(uri)
    }
}

/// RAII guard releasing a claim when the processing of one file ends,
/// on every exit path including panics.
pub struct ClaimGuard {
    set: ClaimSet,
    uri: String,
}

impl ClaimGuard {
    pub fn new(set: ClaimSet, uri: String) -> Self {
        Self { set, uri }
    }
}

impl Drop for ClaimGuard {
    fn drop(&mut self) {
        self.set.release(&self.uri);
    }
}
