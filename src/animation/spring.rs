use std::time::Duration;

use crate::constants::{SPRING_MAX_STEP, SPRING_THRESHOLD};

/// A time-based spring for smooth, slightly bouncy transitions.
///
/// Parameters follow the "response / damping fraction" model: `response` is the period of the
/// undamped oscillation in seconds, `damping_fraction` is 1.0 for critical damping and below 1.0
/// for a visible overshoot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub position: f32,
    pub velocity: f32,
    pub target: f32,
    pub stiffness: f32,
    pub damping: f32,
}

impl Default for Spring {
    fn default() -> Self {
        Self::from_response(0.55, 1.0)
    }
}

impl Spring {
    /// Creates a new spring with raw stiffness and damping coefficients.
    pub fn new(stiffness: f32, damping: f32) -> Self {
        Self {
            position: 0.0,
            velocity: 0.0,
            target: 0.0,
            stiffness,
            damping,
        }
    }

    /// Creates a spring from a response time (seconds) and damping fraction.
    pub fn from_response(response: f32, damping_fraction: f32) -> Self {
        let response = response.max(f32::EPSILON);
        let omega = std::f32::consts::TAU / response;
        Self::new(omega * omega, 2.0 * damping_fraction * omega)
    }

    /// Places the spring at rest on `value`.
    pub fn at(mut self, value: f32) -> Self {
        self.snap_to(value);
        self
    }

    /// Advances the spring physics by `dt`. Returns true if still animating.
    pub fn update(&mut self, dt: Duration) -> bool {
        let mut remaining = dt.as_secs_f32();
        while remaining > 0.0 {
            let h = remaining.min(SPRING_MAX_STEP);
            let accel = -self.stiffness * (self.position - self.target) - self.damping * self.velocity;
            self.velocity += accel * h;
            self.position += self.velocity * h;
            remaining -= h;
        }

        // Close enough and slow enough: snap to target
        let distance = (self.target - self.position).abs();
        if distance < SPRING_THRESHOLD && self.velocity.abs() < SPRING_THRESHOLD {
            self.position = self.target;
            self.velocity = 0.0;
            return false;
        }

        true
    }

    /// Sets the target value for the spring to animate towards.
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jumps to `value` with no motion.
    pub fn snap_to(&mut self, value: f32) {
        self.position = value;
        self.target = value;
        self.velocity = 0.0;
    }

    /// Returns true if the spring is open (target > 0.5).
    pub fn is_open(&self) -> bool {
        self.target > 0.5
    }

    /// Returns true if the spring rests on its target.
    pub fn is_settled(&self) -> bool {
        self.position == self.target && self.velocity == 0.0
    }
}
