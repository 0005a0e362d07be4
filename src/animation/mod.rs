mod easing;
mod spring;
mod tween;

pub use easing::{ease_out_quad, lerp, CubicBezier, Curve};
pub use spring::Spring;
pub use tween::{Repeat, Tween};
