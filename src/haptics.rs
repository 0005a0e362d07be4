//! Haptic feedback boundary.
//!
//! The platform engine is an external collaborator. Callers treat every call as best-effort:
//! a failure is logged and dropped, never retried.

use thiserror::Error;

/// Why a haptic impact could not be delivered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HapticsError {
    #[error("haptic feedback is not available on this platform")]
    Unavailable,

    #[error("haptic engine error: {0}")]
    Engine(String),
}

/// Platform "light impact" feedback.
#[cfg_attr(test, mockall::automock)]
pub trait Haptics: Send {
    fn light_impact(&self) -> Result<(), HapticsError>;
}

/// Desktop and headless hosts have no haptic engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn light_impact(&self) -> Result<(), HapticsError> {
        Err(HapticsError::Unavailable)
    }
}

/// Records impacts in the trace log instead of vibrating.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHaptics;

impl Haptics for TracingHaptics {
    fn light_impact(&self) -> Result<(), HapticsError> {
        tracing::debug!("haptic: light impact");
        Ok(())
    }
}
