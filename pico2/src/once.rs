//! One-shot claim for embassy tasks whose pool holds a single instance.

use core::sync::atomic::{AtomicBool, Ordering};

/// Set by the first caller that gets to spawn the task.
pub struct SpawnOnce(AtomicBool);

impl SpawnOnce {
    pub const fn new() -> Self { Self(AtomicBool::new(false)) }

    /// True for exactly one caller until [`release`](Self::release).
    pub fn claim(&self) -> bool { self.0.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok() }

    /// Give the claim back after a failed spawn.
    pub fn release(&self) { self.0.store(false, Ordering::Release); }

    #[inline]
    pub fn is_claimed(&self) -> bool { self.0.load(Ordering::Acquire) }
}

impl Default for SpawnOnce {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================
