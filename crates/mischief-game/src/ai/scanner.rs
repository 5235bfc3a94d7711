//! Weighted-random sampling of candidate block positions around a mob.

use rand::Rng;

use mischief_world::BlockPos;

use super::budget::ScanBudget;
use crate::config::ScanSection;

/// Samples positions in a box around an origin, biased toward the origin.
#[derive(Debug, Clone, Copy)]
pub struct TargetScanner {
    pub range_xz: i32,
    pub range_y: i32,
    /// Samples per scan attempt.
    pub count: u32,
}

impl TargetScanner {
    pub fn new(range_xz: i32, range_y: i32, count: u32) -> Self {
        Self {
            range_xz,
            range_y,
            count,
        }
    }

    pub fn from_config(scan: &ScanSection) -> Self {
        Self::new(scan.range_xz, scan.range_y, scan.count)
    }

    /// One sample: each axis is `origin + rand(R) - rand(R)`, a triangular
    /// distribution peaking at the origin.
    pub fn sample_one<R: Rng + ?Sized>(&self, origin: BlockPos, rng: &mut R) -> BlockPos {
        origin.offset(
            triangular(rng, self.range_xz),
            triangular(rng, self.range_y),
            triangular(rng, self.range_xz),
        )
    }

    /// Sample until `accept` returns a value, the request count is spent, or
    /// the budget runs dry.
    pub fn find<R, T, F>(
        &self,
        origin: BlockPos,
        rng: &mut R,
        budget: &ScanBudget,
        mut accept: F,
    ) -> Option<T>
    where
        R: Rng + ?Sized,
        F: FnMut(BlockPos) -> Option<T>,
    {
        for _ in 0..self.count {
            if !budget.try_consume() {
                return None;
            }
            if let Some(found) = accept(self.sample_one(origin, rng)) {
                return Some(found);
            }
        }
        None
    }
}

/// `rand(r) - rand(r)` with `rand(r)` uniform in `[0, r)`.
fn triangular<R: Rng + ?Sized>(rng: &mut R, range: i32) -> i32 {
    if range <= 0 {
        return 0;
    }
    rng.gen_range(0..range) - rng.gen_range(0..range)
}
