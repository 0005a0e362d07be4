//! Timing curves.
//!
//! The named curves are the standard cubic-bezier presets used by platform animation APIs, so a
//! pose sampled here lines up with what a native renderer would draw for the same timing.

use serde::{Deserialize, Serialize};

/// A CSS-style cubic bezier timing function through (0,0), (x1,y1), (x2,y2), (1,1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezier {
    pub const EASE_IN: Self = Self::new(0.42, 0.0, 1.0, 1.0);
    pub const EASE_OUT: Self = Self::new(0.0, 0.0, 0.58, 1.0);
    pub const EASE_IN_OUT: Self = Self::new(0.42, 0.0, 0.58, 1.0);

    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Maps linear progress `x` in [0, 1] to eased progress.
    pub fn apply(&self, x: f32) -> f32 {
        let x = f64::from(x.clamp(0.0, 1.0));
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        let t = self.solve_t(x);
        Self::sample(f64::from(self.y1), f64::from(self.y2), t) as f32
    }

    fn sample(p1: f64, p2: f64, t: f64) -> f64 {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        ((a * t + b) * t + c) * t
    }

    fn sample_derivative(p1: f64, p2: f64, t: f64) -> f64 {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        (3.0 * a * t + 2.0 * b) * t + c
    }

    /// Finds the curve parameter whose x equals `x`: Newton first, bisection as fallback.
    fn solve_t(&self, x: f64) -> f64 {
        const EPSILON: f64 = 1e-7;
        let (x1, x2) = (f64::from(self.x1), f64::from(self.x2));

        let mut t = x;
        for _ in 0..8 {
            let err = Self::sample(x1, x2, t) - x;
            if err.abs() < EPSILON {
                return t;
            }
            let slope = Self::sample_derivative(x1, x2, t);
            if slope.abs() < 1e-6 {
                break;
            }
            t -= err / slope;
        }

        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        t = x;
        while hi - lo > EPSILON {
            let value = Self::sample(x1, x2, t);
            if (value - x).abs() < EPSILON {
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
}

/// Easing function applied to normalized progress.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Curve {
    Linear,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
    Bezier(CubicBezier),
}

impl Curve {
    /// Applies the curve to a t value (0-1).
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Curve::Linear => t,
            Curve::EaseIn => CubicBezier::EASE_IN.apply(t),
            Curve::EaseOut => CubicBezier::EASE_OUT.apply(t),
            Curve::EaseInOut => CubicBezier::EASE_IN_OUT.apply(t),
            Curve::Bezier(bezier) => bezier.apply(t),
        }
    }
}

/// Quadratic falloff `1 - (1 - t)^2`, used for the vertical lift of a flying heart.
pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Linear interpolation between `from` and `to`.
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}
