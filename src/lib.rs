// Library exports for microexp components

pub mod animation;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod counter;
pub mod dispatcher;
pub mod error;
pub mod haptics;
pub mod logging;
pub mod menu_icon;
pub mod particle;
pub mod random;
pub mod scheduler;
pub mod side_panel;
pub mod switch;

// Re-export commonly used types
pub use config::{Color, CounterConfig, MicroExpConfig};
pub use counter::{CounterEvent, CounterSnapshot, HeartCounter, ParticleDescriptor};
pub use dispatcher::Dispatcher;
pub use error::{MicroExpError, Result, ResultExt};
pub use haptics::{Haptics, HapticsError, NoHaptics, TracingHaptics};
pub use particle::{Direction, Particle, ParticleId, ParticlePhase, ParticlePose, ParticleTimeline};
pub use random::{DirectionSource, ScriptedDirections};
pub use scheduler::{FiredTimer, ManualScheduler, Scheduler, Timer, TimerHandle, TokioScheduler};
