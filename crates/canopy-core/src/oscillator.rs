use serde::{Deserialize, Serialize};

use crate::rng::XorShift32;

/// A bounded value that drifts toward a limit and reverses direction
/// at the bounds.
///
/// The lower turnaround is fixed at `min`. The upper turnaround is
/// re-rolled on every advance, uniform in [max/2, max], so the
/// oscillation pulses organically instead of tracing a fixed-period
/// triangle wave. The value never escapes [min, max] by more than one
/// step's delta; there is deliberately no hard clamp, since snapping
/// to the bound would change the turnaround timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Oscillator {
    pub value: f32,
    pub speed: f32,
    pub min: f32,
    pub max: f32,
    pub increasing: bool,
    #[serde(skip)]
    rng: XorShift32,
}

impl Oscillator {
    pub fn new(value: f32, speed: f32, min: f32, max: f32) -> Self {
        Self {
            value,
            speed,
            min,
            max,
            increasing: true,
            rng: XorShift32::default(),
        }
    }

    /// Advance one frame and return the new value.
    ///
    /// Step size is `speed / 100` per call.
    pub fn advance(&mut self) -> f32 {
        if self.value <= self.min {
            self.increasing = true;
        }
        let turnaround = self.rng.range_f32(self.max / 2.0, self.max);
        if self.value >= turnaround {
            self.increasing = false;
        }
        let delta = self.speed / 100.0;
        self.value += if self.increasing { delta } else { -delta };
        self.value
    }

    /// Push the value by an external amount (mouse wheel), staying
    /// inside [min, max].
    pub fn nudge(&mut self, delta: f32) {
        self.value = (self.value + delta).clamp(self.min, self.max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stays_within_bounds_plus_one_step() {
        let mut osc = Oscillator::new(300.0, 7.0, 0.0, 2000.0);
        let step = osc.speed / 100.0;
        for _ in 0..500_000 {
            let v = osc.advance();
            assert!(v >= osc.min - step, "value {v} escaped below min");
            assert!(v <= osc.max + step, "value {v} escaped above max");
        }
    }

    #[test]
    fn test_flips_up_at_min() {
        let mut osc = Oscillator::new(0.0, 10.0, 0.0, 100.0);
        osc.increasing = false;
        osc.advance();
        assert!(osc.increasing, "reaching min should force increasing");
        assert!(osc.value > 0.0);
    }

    #[test]
    fn test_flips_down_above_max() {
        // at value == max every rolled turnaround is <= value
        let mut osc = Oscillator::new(100.0, 10.0, 0.0, 100.0);
        osc.advance();
        assert!(!osc.increasing, "reaching max should force decreasing");
        assert!(osc.value < 100.0);
    }

    #[test]
    fn test_never_flips_below_half_max() {
        // below max/2 the rolled turnaround can never trigger
        let mut osc = Oscillator::new(10.0, 1.0, 0.0, 2000.0);
        for _ in 0..1000 {
            osc.advance();
            assert!(osc.increasing);
        }
    }

    #[test]
    fn test_zero_speed_holds_value() {
        let mut osc = Oscillator::new(100.0, 0.0, 0.0, 2000.0);
        for _ in 0..100 {
            assert_eq!(osc.advance(), 100.0);
        }
    }

    #[test]
    fn test_nudge_clamps() {
        let mut osc = Oscillator::new(3.0, 0.0, 0.0, 2000.0);
        osc.nudge(-5.0);
        assert_eq!(osc.value, 0.0);
        osc.nudge(5000.0);
        assert_eq!(osc.value, 2000.0);
    }
}
