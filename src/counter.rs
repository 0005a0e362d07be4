//! Heart counter: a bounded tap counter that launches a flying heart on every tap.
//!
//! The counter owns three pieces of state: the count, a transient pressed flag, and the set of
//! in-flight particles. All of it changes on the owner's task. Delayed changes (pressed reset,
//! particle completion) are timers on the injected [`Scheduler`]; the owner feeds fired timers
//! back through [`HeartCounter::handle_timer`].
//!
//! Renderers pull [`CounterSnapshot`]s each frame and may subscribe to [`CounterEvent`]s to
//! learn when to redraw.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

use crate::config::{Color, CounterConfig};
use crate::constants::{
    EVENT_CHANNEL_CAPACITY, PRESSED_BUTTON_SCALE, PRESSED_HEART_SCALE, PRESS_RESET_MS,
};
use crate::haptics::{Haptics, NoHaptics};
use crate::particle::{Direction, Particle, ParticleId, ParticlePhase, ParticlePose, ParticleTimeline};
use crate::random::DirectionSource;
use crate::scheduler::{FiredTimer, ManualScheduler, Scheduler, Timer, TimerHandle};

/// Changes a renderer may want to react to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CounterEvent {
    CountChanged { count: u64 },
    /// A tap arrived while the count sat at its bound.
    BoundReached { count: u64 },
    PressedChanged { pressed: bool },
    ParticleSpawned { id: ParticleId, direction: Direction },
    ParticleCompleted { id: ParticleId },
    TornDown,
}

/// One particle as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleDescriptor {
    pub id: ParticleId,
    pub direction: Direction,
    pub phase: ParticlePhase,
    pub elapsed_ms: u64,
    pub pose: ParticlePose,
}

/// Everything needed to draw the counter at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub count: u64,
    pub display_text: String,
    pub max_count: Option<u64>,
    pub is_pressed: bool,
    /// Target scale of the capsule button.
    pub button_scale: f32,
    /// Target scale of the resting heart icon.
    pub heart_scale: f32,
    pub accent_color: Color,
    pub particles: Vec<ParticleDescriptor>,
}

#[derive(Debug)]
struct ActiveParticle {
    particle: Particle,
    timer: TimerHandle,
}

/// Counter-with-particle-effect component.
pub struct HeartCounter<S: Scheduler> {
    config: CounterConfig,
    timeline: ParticleTimeline,
    count: u64,
    is_pressed: bool,
    press_resets: Vec<TimerHandle>,
    particles: Vec<ActiveParticle>,
    next_particle: u64,
    scheduler: S,
    directions: Box<dyn DirectionSource>,
    haptics: Box<dyn Haptics>,
    events: broadcast::Sender<CounterEvent>,
}

impl<S: Scheduler> HeartCounter<S> {
    /// Creates a counter at zero with a random direction source and no haptic engine.
    pub fn new(config: CounterConfig, scheduler: S) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config,
            timeline: ParticleTimeline::default(),
            count: 0,
            is_pressed: false,
            press_resets: Vec::new(),
            particles: Vec::new(),
            next_particle: 0,
            scheduler,
            directions: Box::new(fastrand::Rng::new()),
            haptics: Box::new(NoHaptics),
            events,
        }
    }

    pub fn with_timeline(mut self, timeline: ParticleTimeline) -> Self {
        self.timeline = timeline;
        self
    }

    pub fn with_direction_source(mut self, source: impl DirectionSource + 'static) -> Self {
        self.directions = Box::new(source);
        self
    }

    pub fn with_haptics(mut self, haptics: impl Haptics + 'static) -> Self {
        self.haptics = Box::new(haptics);
        self
    }

    /// Starts from `count`, clamped to the bound.
    pub fn with_initial_count(mut self, count: u64) -> Self {
        self.count = self.config.max_count.map_or(count, |max| count.min(max));
        self
    }

    /// Handles a tap: bounded increment, press feedback, one new particle, optional haptic.
    pub fn increment(&mut self) -> ParticleId {
        // An unbounded counter still stops at u64::MAX.
        let max = self.config.max_count.unwrap_or(u64::MAX);
        if self.count >= max {
            trace!(count = self.count, max, "tap at bound");
            self.emit(CounterEvent::BoundReached { count: self.count });
        } else {
            self.count += 1;
            self.emit(CounterEvent::CountChanged { count: self.count });
        }

        self.press();
        let id = self.spawn_particle();
        self.play_haptic();
        id
    }

    fn press(&mut self) {
        if !self.is_pressed {
            self.is_pressed = true;
            self.emit(CounterEvent::PressedChanged { pressed: true });
        }
        let handle = self
            .scheduler
            .schedule(Duration::from_millis(PRESS_RESET_MS), Timer::PressReset);
        self.press_resets.push(handle);
    }

    fn spawn_particle(&mut self) -> ParticleId {
        let id = ParticleId(self.next_particle);
        self.next_particle += 1;

        let direction = self.directions.next_direction();
        let particle = Particle {
            id,
            direction,
            spawned_at: self.scheduler.now(),
        };
        let timer = self
            .scheduler
            .schedule(self.timeline.lifetime(), Timer::ParticleComplete(id));
        self.particles.push(ActiveParticle { particle, timer });

        debug!(particle = %id, %direction, active = self.particles.len(), "spawned flying heart");
        self.emit(CounterEvent::ParticleSpawned { id, direction });
        id
    }

    fn play_haptic(&self) {
        if !self.config.use_haptics {
            return;
        }
        if let Err(e) = self.haptics.light_impact() {
            trace!(error = %e, "haptic feedback skipped");
        }
    }

    /// Applies a timer handed back by the scheduler. Timers for state that no longer exists are
    /// ignored, so each particle leaves the collection exactly once.
    pub fn handle_timer(&mut self, fired: FiredTimer) {
        match fired.timer {
            Timer::PressReset => {
                let Some(pos) = self.press_resets.iter().position(|h| *h == fired.handle) else {
                    warn!(timer = %fired.handle, "ignoring unknown press reset");
                    return;
                };
                self.press_resets.remove(pos);
                self.scheduler.cancel(fired.handle);
                if self.is_pressed {
                    self.is_pressed = false;
                    self.emit(CounterEvent::PressedChanged { pressed: false });
                }
            }
            Timer::ParticleComplete(id) => {
                let Some(pos) = self.particles.iter().position(|a| a.particle.id == id && a.timer == fired.handle) else {
                    warn!(particle = %id, "ignoring completion for unknown particle");
                    return;
                };
                self.particles.remove(pos);
                self.scheduler.cancel(fired.handle);
                debug!(particle = %id, active = self.particles.len(), "flying heart completed");
                self.emit(CounterEvent::ParticleCompleted { id });
            }
        }
    }

    fn emit(&self, event: CounterEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> broadcast::Receiver<CounterEvent> {
        self.events.subscribe()
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn max_count(&self) -> Option<u64> {
        self.config.max_count
    }

    pub fn is_pressed(&self) -> bool {
        self.is_pressed
    }

    pub fn display_text(&self) -> String {
        self.count.to_string()
    }

    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    pub fn timeline(&self) -> &ParticleTimeline {
        &self.timeline
    }

    /// Active particles in spawn order.
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().map(|a| &a.particle)
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// True while a pressed reset or a particle completion is outstanding.
    pub fn has_pending_timers(&self) -> bool {
        !self.press_resets.is_empty() || !self.particles.is_empty()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Samples the render state at the scheduler's current time.
    pub fn snapshot(&self) -> CounterSnapshot {
        let now = self.scheduler.now();
        let particles = self
            .particles
            .iter()
            .map(|active| {
                let particle = &active.particle;
                let elapsed = particle.elapsed(now);
                ParticleDescriptor {
                    id: particle.id,
                    direction: particle.direction,
                    phase: self.timeline.phase(elapsed),
                    elapsed_ms: elapsed.as_millis() as u64,
                    pose: self.timeline.pose(particle.direction, elapsed),
                }
            })
            .collect();

        CounterSnapshot {
            count: self.count,
            display_text: self.display_text(),
            max_count: self.config.max_count,
            is_pressed: self.is_pressed,
            button_scale: if self.is_pressed { PRESSED_BUTTON_SCALE } else { 1.0 },
            heart_scale: if self.is_pressed { PRESSED_HEART_SCALE } else { 1.0 },
            accent_color: self.config.accent_color,
            particles,
        }
    }

    /// Tears the counter down, cancelling every pending timer.
    pub fn teardown(self) {
        drop(self);
    }
}

impl HeartCounter<ManualScheduler> {
    /// Moves virtual time forward by `by`, applying each due timer at its own deadline.
    pub fn advance(&mut self, by: Duration) {
        let until = self.scheduler.now() + by;
        while let Some(fired) = self.scheduler.pop_due(until) {
            self.handle_timer(fired);
        }
        self.scheduler.set_now(until);
    }

    /// Moves virtual time forward until no timers remain.
    pub fn run_until_idle(&mut self) {
        while let Some(deadline) = self.scheduler.next_deadline() {
            let by = deadline.saturating_sub(self.scheduler.now());
            self.advance(by);
        }
    }
}

impl<S: Scheduler> Drop for HeartCounter<S> {
    fn drop(&mut self) {
        self.scheduler.cancel_all();
        let cancelled = self.particles.len();
        self.particles.clear();
        self.press_resets.clear();
        debug!(cancelled, "heart counter torn down");
        self.emit(CounterEvent::TornDown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haptics::{HapticsError, MockHaptics};
    use crate::random::ScriptedDirections;
    use pretty_assertions::assert_eq;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn manual_counter(config: CounterConfig) -> HeartCounter<ManualScheduler> {
        HeartCounter::new(config, ManualScheduler::new())
            .with_direction_source(ScriptedDirections::new([Direction::Left, Direction::Right]))
    }

    fn drain(rx: &mut broadcast::Receiver<CounterEvent>) -> Vec<CounterEvent> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    #[test]
    fn test_haptics_fire_on_every_tap_even_at_bound() {
        let mut haptics = MockHaptics::new();
        haptics.expect_light_impact().times(3).returning(|| Ok(()));
        let mut counter = manual_counter(CounterConfig::default().with_max_count(1)).with_haptics(haptics);

        for _ in 0..3 {
            counter.increment();
        }
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn test_haptics_disabled_never_called() {
        let mut haptics = MockHaptics::new();
        haptics.expect_light_impact().never();
        let mut counter = manual_counter(CounterConfig::default().with_haptics(false)).with_haptics(haptics);
        counter.increment();
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn test_haptics_failure_is_invisible() {
        let mut haptics = MockHaptics::new();
        haptics
            .expect_light_impact()
            .times(1)
            .returning(|| Err(HapticsError::Engine("busy".to_string())));
        let mut counter = manual_counter(CounterConfig::default()).with_haptics(haptics);
        let mut rx = counter.subscribe();

        let id = counter.increment();
        assert_eq!(counter.count(), 1);
        assert_eq!(
            drain(&mut rx),
            vec![
                CounterEvent::CountChanged { count: 1 },
                CounterEvent::PressedChanged { pressed: true },
                CounterEvent::ParticleSpawned { id, direction: Direction::Left },
            ]
        );
    }

    #[test]
    fn test_initial_count_is_clamped_to_bound() {
        let bounded = manual_counter(CounterConfig::default().with_max_count(5)).with_initial_count(9);
        assert_eq!(bounded.count(), 5);
        let unbounded = manual_counter(CounterConfig::default()).with_initial_count(9);
        assert_eq!(unbounded.count(), 9);
    }

    #[test]
    fn test_tap_at_bound_reports_bound_reached() {
        let mut counter = manual_counter(CounterConfig::default().with_max_count(0));
        let mut rx = counter.subscribe();
        let id = counter.increment();

        assert_eq!(counter.count(), 0);
        assert_eq!(counter.particle_count(), 1);
        assert_eq!(
            drain(&mut rx),
            vec![
                CounterEvent::BoundReached { count: 0 },
                CounterEvent::PressedChanged { pressed: true },
                CounterEvent::ParticleSpawned { id, direction: Direction::Left },
            ]
        );
    }

    #[test]
    fn test_snapshot_reflects_press_and_particles() {
        let mut counter = manual_counter(CounterConfig::default().with_accent_color(Color::PINK));
        counter.increment();
        counter.advance(ms(100));
        counter.increment();

        let snapshot = counter.snapshot();
        assert_eq!(snapshot.count, 2);
        assert_eq!(snapshot.display_text, "2");
        assert!(snapshot.is_pressed);
        assert_eq!(snapshot.button_scale, PRESSED_BUTTON_SCALE);
        assert_eq!(snapshot.heart_scale, PRESSED_HEART_SCALE);
        assert_eq!(snapshot.accent_color, Color::PINK);

        let ids: Vec<_> = snapshot.particles.iter().map(|p| (p.id, p.direction, p.elapsed_ms)).collect();
        assert_eq!(
            ids,
            vec![(ParticleId(0), Direction::Left, 100), (ParticleId(1), Direction::Right, 0)]
        );
        assert_eq!(snapshot.particles[1].phase, ParticlePhase::Spawned);

        counter.advance(ms(300));
        let snapshot = counter.snapshot();
        assert!(!snapshot.is_pressed);
        assert_eq!(snapshot.button_scale, 1.0);
        assert_eq!(snapshot.particles[0].phase, ParticlePhase::Animating);
    }

    #[test]
    fn test_unknown_completion_is_ignored() {
        let mut counter = manual_counter(CounterConfig::default());
        counter.increment();
        let mut rx = counter.subscribe();

        let mut other = ManualScheduler::new();
        other.schedule(Duration::ZERO, Timer::ParticleComplete(ParticleId(99)));
        let stale = other.pop_due(Duration::ZERO).unwrap();
        counter.handle_timer(stale);

        assert_eq!(counter.particle_count(), 1);
        assert!(drain(&mut rx).is_empty());

        // The foreign handle collides with a live one; that timer must still fire.
        counter.run_until_idle();
        assert!(!counter.is_pressed());
        assert!(!counter.has_pending_timers());
        assert_eq!(counter.particle_count(), 0);
    }

    #[test]
    fn test_unbounded_count_saturates_at_max() {
        let mut counter = manual_counter(CounterConfig::default()).with_initial_count(u64::MAX);
        let mut rx = counter.subscribe();
        let id = counter.increment();

        assert_eq!(counter.count(), u64::MAX);
        assert_eq!(counter.particle_count(), 1);
        assert_eq!(
            drain(&mut rx),
            vec![
                CounterEvent::BoundReached { count: u64::MAX },
                CounterEvent::PressedChanged { pressed: true },
                CounterEvent::ParticleSpawned { id, direction: Direction::Left },
            ]
        );
    }

    #[test]
    fn test_drop_cancels_pending_timers_and_notifies() {
        let mut counter = manual_counter(CounterConfig::default());
        counter.increment();
        counter.increment();
        let mut rx = counter.subscribe();
        assert!(counter.has_pending_timers());

        counter.teardown();
        assert_eq!(drain(&mut rx), vec![CounterEvent::TornDown]);
    }

    #[test]
    fn test_run_until_idle_clears_everything() {
        let mut counter = manual_counter(CounterConfig::default());
        for _ in 0..3 {
            counter.increment();
        }
        counter.run_until_idle();
        assert!(!counter.has_pending_timers());
        assert!(!counter.is_pressed());
        assert_eq!(counter.scheduler().now(), ms(1160));
    }

    #[test]
    fn test_event_serialization_shape() {
        let json = serde_json::to_string(&CounterEvent::ParticleSpawned {
            id: ParticleId(4),
            direction: Direction::Right,
        })
        .unwrap();
        assert_eq!(json, r#"{"event":"particle_spawned","id":4,"direction":"right"}"#);
    }
}
