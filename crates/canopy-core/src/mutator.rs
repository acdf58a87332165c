use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::params::TreeParams;
use crate::rng::XorShift32;

/// No mutation fires during the first seconds of a session.
pub const WARMUP_SECS: f64 = 10.0;
/// The second-of-minute that gates structural mutation.
pub const MUTATION_SECOND: u32 = 42;
/// Branch-factor growth stops once the tree is this deep.
pub const BRANCH_GROWTH_DEPTH_CEILING: u32 = 5;

/// Wall-clock readings the mutator ticks against. A trait so tests can
/// drive the clock to any second of the minute.
pub trait WallClock {
    /// Seconds elapsed since session start.
    fn elapsed_secs(&self) -> f64;
    /// Current second of the minute, 0-59.
    fn second_of_minute(&self) -> u32;
}

/// Real clock: `Instant` for elapsed time, `SystemTime` for the
/// second of the minute.
#[derive(Debug)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl WallClock for SystemClock {
    fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    fn second_of_minute(&self) -> u32 {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        (since_epoch.as_secs() % 60) as u32
    }
}

/// Slow, wall-clock-gated evolution of the tree's discrete structure.
///
/// Ticked at 1 Hz, independent of the frame rate. Two gates run per
/// tick once the warm-up has passed:
///
/// - At second 42 of any minute, the branch factor moves by exactly
///   one in the current growth direction. Direction flips once the
///   factor exits [2, 16], and growth is only allowed while the depth
///   stays below a small ceiling, which keeps depth and branch factor
///   coupled so the recursion cost stays bounded.
/// - With probability 1/(second+1) (a uniform draw over [0, second]
///   landing exactly on 42, so never before second 42), the depth
///   shifts and the rotation speed picks up by 2.
///
/// The tie to the real clock's second-of-minute rather than elapsed
/// tick count is deliberate; mutations cluster at a recognizable
/// moment of the minute instead of drifting constantly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuralMutator {
    branch_increase: bool,
    #[serde(skip)]
    rng: XorShift32,
}

impl Default for StructuralMutator {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuralMutator {
    pub fn new() -> Self {
        Self {
            branch_increase: true,
            rng: XorShift32::default(),
        }
    }

    #[cfg(test)]
    fn with_rng(rng: XorShift32) -> Self {
        Self {
            branch_increase: true,
            rng,
        }
    }

    /// One mutation tick. Call at a fixed 1-second cadence.
    pub fn tick(&mut self, clock: &impl WallClock, tree: &mut TreeParams) {
        if clock.elapsed_secs() < WARMUP_SECS {
            return;
        }
        let second = clock.second_of_minute();

        if second == MUTATION_SECOND {
            if tree.branch_factor >= 16 {
                self.branch_increase = false;
            } else if tree.branch_factor <= 2 {
                self.branch_increase = true;
            }
            if self.branch_increase && tree.depth < BRANCH_GROWTH_DEPTH_CEILING {
                tree.branch_factor += 1;
            } else if !self.branch_increase {
                tree.branch_factor -= 1;
            }
        }

        // uniform over [0, second]: hits 42 with chance 1/(second+1),
        // and cannot hit it at all while second < 42
        if self.rng.int_in(0, second) == MUTATION_SECOND {
            if tree.branch_factor < 10 {
                tree.set_depth(tree.depth + 1);
            } else if tree.depth > 3 {
                tree.set_depth(tree.depth - 1);
            }
            tree.rotation_speed += 2.0;
        }
    }
}
