//! Process-wide scan budget shared by every mob in a tick.

use std::sync::atomic::{AtomicU32, Ordering};

use bevy_ecs::prelude::Resource;

/// Caps the number of candidate block samples evaluated per tick across the
/// whole population. Samples are granted first come, first served in mob
/// iteration order; once exhausted every scanner stops until [`reset`](Self::reset).
#[derive(Resource, Debug)]
pub struct ScanBudget {
    capacity: u32,
    remaining: AtomicU32,
}

impl ScanBudget {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            remaining: AtomicU32::new(capacity),
        }
    }

    /// Take one sample from the budget. Returns `false` once it is exhausted.
    pub fn try_consume(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }

    /// Refill the budget. Called exactly once per tick boundary.
    pub fn reset(&self) {
        self.remaining.store(self.capacity, Ordering::Release);
    }

    pub fn remaining(&self) -> u32 {
        self.remaining.load(Ordering::Acquire)
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Samples consumed since the last reset.
    pub fn used(&self) -> u32 {
        self.capacity - self.remaining()
    }
}
