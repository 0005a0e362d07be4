//! Flying-heart particles.
//!
//! A particle is an id plus a direction. Everything visual about it is derived from elapsed time
//! through [`ParticleTimeline::pose`], so the renderer can sample it on any frame.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::{ease_out_quad, Curve, Tween};
use crate::config::millis;
use crate::constants::*;
use crate::error::{MicroExpError, Result};

/// Identity of one particle, unique within its counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticleId(pub u64);

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Horizontal drift of a flying heart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// -1.0 for left, 1.0 for right.
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// Where a particle is in its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticlePhase {
    /// Drawn at rest while the lead delay runs.
    Spawned,
    /// Motion, fade and wing flap in progress.
    Animating,
    /// Lifetime over; the owning counter removes it when the completion timer fires.
    Completed,
}

/// A particle owned by a counter's active collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Particle {
    pub id: ParticleId,
    pub direction: Direction,
    /// Scheduler time at spawn.
    pub spawned_at: Duration,
}

impl Particle {
    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.spawned_at)
    }
}

/// Visual state of a particle at one instant, relative to the counter's heart icon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticlePose {
    pub offset_x: f32,
    pub offset_y: f32,
    pub scale: f32,
    pub opacity: f32,
    pub rotation_deg: f32,
    pub wing_opacity: f32,
    pub wing_flap: f32,
    pub left_wing_rotation_deg: f32,
    pub right_wing_rotation_deg: f32,
}

/// The fixed timeline every flying heart follows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTimeline {
    #[serde(with = "millis", rename = "lead_delay_ms")]
    pub lead_delay: Duration,
    #[serde(with = "millis", rename = "motion_ms")]
    pub motion: Duration,
    #[serde(with = "millis", rename = "wing_reveal_ms")]
    pub wing_reveal: Duration,
    pub flap_legs: u32,
    pub lift: f32,
    pub spread: f32,
    pub rotation_deg: f32,
}

impl Default for ParticleTimeline {
    fn default() -> Self {
        Self {
            lead_delay: Duration::from_millis(LEAD_DELAY_MS),
            motion: Duration::from_millis(MOTION_MS),
            wing_reveal: Duration::from_millis(WING_REVEAL_MS),
            flap_legs: FLAP_LEGS,
            lift: PARTICLE_LIFT,
            spread: PARTICLE_SPREAD,
            rotation_deg: PARTICLE_ROTATION_DEG,
        }
    }
}

impl ParticleTimeline {
    /// Time from spawn until the completion signal fires.
    ///
    /// Deliberately longer than the 1.0 s motion: ending there would drop the particle mid-fade.
    pub fn lifetime(&self) -> Duration {
        self.lead_delay + self.motion
    }

    pub fn validate(&self) -> Result<()> {
        if self.motion.is_zero() {
            return Err(MicroExpError::Config("particle motion must be non-zero".to_string()));
        }
        if self.flap_legs == 0 {
            return Err(MicroExpError::Config("wing flap needs at least one leg".to_string()));
        }
        let flap_end = (self.motion / 4)
            .checked_mul(self.flap_legs)
            .and_then(|flap| flap.checked_add(self.lead_delay));
        let lifetime = self.lead_delay.checked_add(self.motion);
        if flap_end.is_none() || lifetime.is_none() {
            return Err(MicroExpError::Config("particle timeline is too long".to_string()));
        }
        Ok(())
    }

    pub fn phase(&self, elapsed: Duration) -> ParticlePhase {
        if elapsed >= self.lifetime() {
            ParticlePhase::Completed
        } else if elapsed < self.lead_delay {
            ParticlePhase::Spawned
        } else {
            ParticlePhase::Animating
        }
    }

    fn travel(&self) -> Tween {
        Tween::new(self.motion, Curve::EaseOut).delay(self.lead_delay)
    }

    // Starts 40% into the motion and lasts half of it.
    fn fade(&self) -> Tween {
        Tween::new(self.motion / 2, Curve::EaseOut).delay(self.lead_delay + self.motion * 2 / 5)
    }

    fn wings(&self) -> Tween {
        Tween::new(self.wing_reveal, Curve::EaseInOut).delay(self.lead_delay)
    }

    fn flap(&self) -> Tween {
        Tween::new(self.motion / 4, Curve::EaseInOut)
            .delay(self.lead_delay)
            .repeat(self.flap_legs, true)
    }

    /// Samples the pose of a particle heading `direction`, `elapsed` after its spawn.
    pub fn pose(&self, direction: Direction, elapsed: Duration) -> ParticlePose {
        let sign = direction.sign();
        let travel = self.travel().value(elapsed);
        let eased = ease_out_quad(travel);
        let flap = self.flap().value(elapsed);

        ParticlePose {
            offset_x: self.spread * sign * eased,
            offset_y: -self.lift * eased,
            scale: self.travel().lerp(PARTICLE_START_SCALE, PARTICLE_END_SCALE, elapsed),
            opacity: 1.0 - self.fade().value(elapsed),
            rotation_deg: travel * self.rotation_deg * sign,
            wing_opacity: self.wings().value(elapsed),
            wing_flap: flap,
            left_wing_rotation_deg: LEFT_WING_BASE_DEG + WING_FLAP_DEG * flap,
            right_wing_rotation_deg: RIGHT_WING_BASE_DEG - WING_FLAP_DEG * flap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_lifetime_includes_lead_delay() {
        assert_eq!(ParticleTimeline::default().lifetime(), ms(1160));
    }

    #[test]
    fn test_pose_at_rest_during_lead_delay() {
        let timeline = ParticleTimeline::default();
        let pose = timeline.pose(Direction::Left, ms(100));
        assert_eq!(
            pose,
            ParticlePose {
                offset_x: 0.0,
                offset_y: 0.0,
                scale: PARTICLE_START_SCALE,
                opacity: 1.0,
                rotation_deg: 0.0,
                wing_opacity: 0.0,
                wing_flap: 0.0,
                left_wing_rotation_deg: LEFT_WING_BASE_DEG,
                right_wing_rotation_deg: RIGHT_WING_BASE_DEG,
            }
        );
    }

    #[test]
    fn test_pose_at_end_of_lifetime() {
        let timeline = ParticleTimeline::default();
        let pose = timeline.pose(Direction::Right, timeline.lifetime());
        assert_eq!(pose.offset_x, PARTICLE_SPREAD);
        assert_eq!(pose.offset_y, -PARTICLE_LIFT);
        assert_eq!(pose.opacity, 0.0);
        assert_eq!(pose.rotation_deg, PARTICLE_ROTATION_DEG);
        assert!((pose.scale - PARTICLE_END_SCALE).abs() < 1e-6);
        assert_eq!(pose.wing_opacity, 1.0);
        assert_eq!(pose.wing_flap, 1.0);
    }

    #[test]
    fn test_direction_mirrors_horizontal_motion() {
        let timeline = ParticleTimeline::default();
        let left = timeline.pose(Direction::Left, ms(600));
        let right = timeline.pose(Direction::Right, ms(600));
        assert!(left.offset_x < 0.0);
        assert_eq!(left.offset_x, -right.offset_x);
        assert_eq!(left.offset_y, right.offset_y);
        assert_eq!(left.rotation_deg, -right.rotation_deg);
    }

    #[test]
    fn test_fade_covers_final_half_of_motion() {
        let timeline = ParticleTimeline::default();
        assert_eq!(timeline.pose(Direction::Left, ms(560)).opacity, 1.0);
        let mid = timeline.pose(Direction::Left, ms(800)).opacity;
        assert!(mid > 0.0 && mid < 1.0);
        assert_eq!(timeline.pose(Direction::Left, ms(1060)).opacity, 0.0);
    }

    #[test]
    fn test_wing_flap_bounces_three_legs() {
        let timeline = ParticleTimeline::default();
        // Legs of 250ms starting at 160ms: up, down, up.
        assert!((timeline.pose(Direction::Left, ms(410)).wing_flap - 1.0).abs() < 1e-3);
        assert!(timeline.pose(Direction::Left, ms(660)).wing_flap < 1e-3);
        assert_eq!(timeline.pose(Direction::Left, ms(950)).wing_flap, 1.0);
    }

    #[test]
    fn test_phase_boundaries() {
        let timeline = ParticleTimeline::default();
        assert_eq!(timeline.phase(ms(0)), ParticlePhase::Spawned);
        assert_eq!(timeline.phase(ms(159)), ParticlePhase::Spawned);
        assert_eq!(timeline.phase(ms(160)), ParticlePhase::Animating);
        assert_eq!(timeline.phase(ms(1159)), ParticlePhase::Animating);
        assert_eq!(timeline.phase(ms(1160)), ParticlePhase::Completed);
    }

    #[test]
    fn test_validate_rejects_zero_motion() {
        let timeline = ParticleTimeline {
            motion: Duration::ZERO,
            ..Default::default()
        };
        assert!(timeline.validate().is_err());
        assert!(ParticleTimeline::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_flap_span_that_overflows() {
        let timeline = ParticleTimeline {
            flap_legs: u32::MAX,
            motion: Duration::from_millis(u64::MAX / 2),
            ..Default::default()
        };
        assert!(timeline.validate().is_err());
        // Sampling stays total even when validation was skipped.
        let pose = timeline.pose(Direction::Left, ms(500));
        assert!(pose.opacity.is_finite() && pose.wing_flap.is_finite());
    }
}
