use std::time::Duration;

use super::Curve;

/// How a tween repeats after its first leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repeat {
    /// Total number of legs, including the first.
    pub legs: u32,
    /// Odd-numbered legs run backwards.
    pub autoreverse: bool,
}

/// A delayed, eased 0→1 progression, sampled from elapsed time.
///
/// Tweens hold no clock of their own; callers pass elapsed time since the tween's origin, which
/// keeps every pose a pure function of time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub delay: Duration,
    pub duration: Duration,
    pub curve: Curve,
    pub repeat: Option<Repeat>,
}

impl Tween {
    pub fn new(duration: Duration, curve: Curve) -> Self {
        Self {
            delay: Duration::ZERO,
            duration,
            curve,
            repeat: None,
        }
    }

    /// Set the delay before the tween starts
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Repeat for `legs` legs in total
    pub fn repeat(mut self, legs: u32, autoreverse: bool) -> Self {
        self.repeat = Some(Repeat { legs, autoreverse });
        self
    }

    fn legs(&self) -> u32 {
        self.repeat.map_or(1, |r| r.legs.max(1))
    }

    /// Time from origin until the tween holds its final value.
    /// Saturates at `Duration::MAX` for spans too long to represent.
    pub fn end(&self) -> Duration {
        self.duration
            .checked_mul(self.legs())
            .and_then(|span| span.checked_add(self.delay))
            .unwrap_or(Duration::MAX)
    }

    /// Eased progress in [0, 1] at `elapsed`. Holds 0 before the delay and 1 after the last leg.
    pub fn value(&self, elapsed: Duration) -> f32 {
        if elapsed <= self.delay {
            return 0.0;
        }
        if self.duration.is_zero() || elapsed >= self.end() {
            return 1.0;
        }

        let local = (elapsed - self.delay).as_secs_f64() / self.duration.as_secs_f64();
        let leg = local.floor() as u32;
        let within = (local - f64::from(leg)) as f32;
        let reversed = matches!(self.repeat, Some(Repeat { autoreverse: true, .. })) && leg % 2 == 1;

        let progress = if reversed { 1.0 - within } else { within };
        self.curve.apply(progress)
    }

    /// Interpolates between `from` and `to` along the tween at `elapsed`.
    pub fn lerp(&self, from: f32, to: f32, elapsed: Duration) -> f32 {
        super::lerp(from, to, self.value(elapsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_tween_holds_before_delay_and_after_end() {
        let tween = Tween::new(ms(100), Curve::Linear).delay(ms(50));
        assert_eq!(tween.value(ms(0)), 0.0);
        assert_eq!(tween.value(ms(50)), 0.0);
        assert!((tween.value(ms(100)) - 0.5).abs() < 1e-5);
        assert_eq!(tween.value(ms(150)), 1.0);
        assert_eq!(tween.value(ms(10_000)), 1.0);
        assert_eq!(tween.end(), ms(150));
    }

    #[test]
    fn test_autoreverse_legs_bounce() {
        let tween = Tween::new(ms(100), Curve::Linear).repeat(3, true);
        assert!((tween.value(ms(50)) - 0.5).abs() < 1e-5);
        assert!((tween.value(ms(125)) - 0.75).abs() < 1e-5);
        assert!((tween.value(ms(199)) - 0.01).abs() < 1e-3);
        assert!((tween.value(ms(250)) - 0.5).abs() < 1e-5);
        assert_eq!(tween.value(ms(300)), 1.0);
        assert_eq!(tween.end(), ms(300));
    }

    #[test]
    fn test_restarting_legs_without_autoreverse() {
        let tween = Tween::new(ms(100), Curve::Linear).repeat(2, false);
        assert!((tween.value(ms(125)) - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_zero_duration_jumps() {
        let tween = Tween::new(Duration::ZERO, Curve::EaseOut).delay(ms(10));
        assert_eq!(tween.value(ms(5)), 0.0);
        assert_eq!(tween.value(ms(11)), 1.0);
    }

    #[test]
    fn test_lerp_scales_range() {
        let tween = Tween::new(ms(100), Curve::Linear);
        assert!((tween.lerp(1.05, 1.12, ms(100)) - 1.12).abs() < 1e-6);
        assert!((tween.lerp(1.05, 1.12, ms(0)) - 1.05).abs() < 1e-6);
    }

    #[test]
    fn test_end_saturates_instead_of_overflowing() {
        let tween = Tween::new(Duration::from_millis(u64::MAX / 2), Curve::Linear)
            .delay(ms(160))
            .repeat(u32::MAX, true);
        assert_eq!(tween.end(), Duration::MAX);
        let early = tween.value(ms(500));
        assert!((0.0..1.0).contains(&early), "value {}", early);
    }
}
