//! Timing curves used by the tweens.
//!
//! The named curves are the standard cubic-bezier presets (CSS / Material):
//! a curve maps linear progress `x ∈ [0,1]` to eased progress `y`, with
//! `y(0) = 0` and `y(1) = 1`.

use serde::{Deserialize, Serialize};

/// Newton iterations before falling back to bisection.
const NEWTON_ITERATIONS: usize = 8;
const NEWTON_MIN_SLOPE: f32 = 1e-3;
const SOLVE_EPSILON: f32 = 1e-5;
const BISECTION_ITERATIONS: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
    /// Material "standard" curve, the default for one-shot layout moves.
    FastOutSlowIn,
}

impl Easing {
    pub const ALL: [Easing; 5] = [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut, Easing::FastOutSlowIn];

    pub fn label(self) -> &'static str {
        match self {
            Easing::Linear => "Linear",
            Easing::EaseIn => "Ease in",
            Easing::EaseOut => "Ease out",
            Easing::EaseInOut => "Ease in-out",
            Easing::FastOutSlowIn => "Fast out, slow in",
        }
    }

    /// Control points `(x1, y1, x2, y2)` of the curve.
    fn control_points(self) -> Option<(f32, f32, f32, f32)> {
        match self {
            Easing::Linear => None,
            Easing::EaseIn => Some((0.42, 0.0, 1.0, 1.0)),
            Easing::EaseOut => Some((0.0, 0.0, 0.58, 1.0)),
            Easing::EaseInOut => Some((0.42, 0.0, 0.58, 1.0)),
            Easing::FastOutSlowIn => Some((0.4, 0.0, 0.2, 1.0)),
        }
    }

    /// Map linear progress to eased progress. Input is clamped to `[0,1]`.
    pub fn apply(self, progress: f32) -> f32 {
        let x = progress.clamp(0.0, 1.0);
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        match self.control_points() {
            None => x,
            Some((x1, y1, x2, y2)) => {
                let t = solve_curve_x(x, x1, x2);
                bezier(t, y1, y2)
            }
        }
    }
}

/// One coordinate of a cubic bezier anchored at 0 and 1.
fn bezier(t: f32, p1: f32, p2: f32) -> f32 {
    let u = 1.0 - t;
    3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
}

fn bezier_slope(t: f32, p1: f32, p2: f32) -> f32 {
    let u = 1.0 - t;
    3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

/// Find the curve parameter `t` whose x coordinate equals `x`.
///
/// x(t) is monotonic for control points within `[0,1]`, so Newton converges
/// quickly from `t = x`; flat regions fall back to bisection.
fn solve_curve_x(x: f32, x1: f32, x2: f32) -> f32 {
    let mut t = x;
    for _ in 0..NEWTON_ITERATIONS {
        let err = bezier(t, x1, x2) - x;
        if err.abs() < SOLVE_EPSILON {
            return t;
        }
        let slope = bezier_slope(t, x1, x2);
        if slope.abs() < NEWTON_MIN_SLOPE {
            break;
        }
        t -= err / slope;
    }

    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    t = x;
    for _ in 0..BISECTION_ITERATIONS {
        let value = bezier(t, x1, x2);
        if (value - x).abs() < SOLVE_EPSILON {
            break;
        }
        if value < x {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) / 2.0;
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_curves_hit_endpoints() {
        for easing in Easing::ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
            assert_eq!(easing.apply(-3.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(7.5), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for easing in Easing::ALL {
            let mut previous = 0.0;
            for step in 0..=100 {
                let value = easing.apply(step as f32 / 100.0);
                assert!(value + 1e-4 >= previous, "{easing:?} decreased at step {step}: {previous} -> {value}");
                previous = value;
            }
        }
    }

    #[test]
    fn ease_in_out_is_symmetric_around_midpoint() {
        let mid = Easing::EaseInOut.apply(0.5);
        assert!((mid - 0.5).abs() < 1e-3, "mid = {mid}");
        let a = Easing::EaseInOut.apply(0.2);
        let b = Easing::EaseInOut.apply(0.8);
        assert!((a + b - 1.0).abs() < 1e-3, "a = {a}, b = {b}");
    }

    #[test]
    fn ease_in_starts_slow_and_ease_out_starts_fast() {
        assert!(Easing::EaseIn.apply(0.25) < 0.25);
        assert!(Easing::EaseOut.apply(0.25) > 0.25);
        assert!(Easing::FastOutSlowIn.apply(0.5) > 0.5);
        assert_eq!(Easing::Linear.apply(0.3), 0.3);
    }
}
