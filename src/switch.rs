//! Soft switch: a toggle that squishes while held and springs the knob across on release.

use std::time::Duration;

use serde::Serialize;

use crate::animation::{lerp, Spring};
use crate::config::Color;
use crate::constants::{
    SWITCH_KNOB_TRAVEL, SWITCH_PRESS_RESPONSE, SWITCH_SPRING_DAMPING, SWITCH_SPRING_RESPONSE,
};

/// Side of the track its squash is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Leading,
    Trailing,
}

/// Render state of a [`SoftSwitch`] at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SwitchPose {
    pub is_on: bool,
    pub knob_offset: f32,
    pub track_scale: (f32, f32),
    pub track_anchor: Anchor,
    pub knob_scale: (f32, f32),
    pub icon: &'static str,
    pub icon_color: Color,
}

#[derive(Debug, Clone)]
pub struct SoftSwitch {
    is_on: bool,
    is_pressed: bool,
    /// 0.0 = knob on the left, 1.0 = knob on the right.
    knob: Spring,
    /// 0.0 = relaxed, 1.0 = fully squished.
    squish: Spring,
}

impl SoftSwitch {
    pub fn new(is_on: bool) -> Self {
        Self {
            is_on,
            is_pressed: false,
            knob: Spring::from_response(SWITCH_SPRING_RESPONSE, SWITCH_SPRING_DAMPING)
                .at(if is_on { 1.0 } else { 0.0 }),
            squish: Spring::from_response(SWITCH_PRESS_RESPONSE, 1.0),
        }
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn is_pressed(&self) -> bool {
        self.is_pressed
    }

    /// Finger down.
    pub fn press(&mut self) {
        self.is_pressed = true;
        self.squish.set_target(1.0);
    }

    /// Finger up: relaxes and toggles. Returns the new value. A release with no press is ignored.
    pub fn release(&mut self) -> bool {
        if !self.is_pressed {
            return self.is_on;
        }
        self.is_pressed = false;
        self.squish.set_target(0.0);
        self.set_on(!self.is_on);
        tracing::debug!(is_on = self.is_on, "soft switch toggled");
        self.is_on
    }

    /// Changes the value from outside, animating the knob.
    pub fn set_on(&mut self, is_on: bool) {
        self.is_on = is_on;
        self.knob.set_target(if is_on { 1.0 } else { 0.0 });
    }

    /// Steps both springs. Returns true while anything is still moving.
    pub fn update(&mut self, dt: Duration) -> bool {
        let knob = self.knob.update(dt);
        let squish = self.squish.update(dt);
        knob || squish
    }

    pub fn knob_offset(&self) -> f32 {
        lerp(-SWITCH_KNOB_TRAVEL, SWITCH_KNOB_TRAVEL, self.knob.position)
    }

    pub fn track_scale(&self) -> (f32, f32) {
        let t = self.squish.position;
        (lerp(1.0, 0.97, t), lerp(1.0, 0.94, t))
    }

    pub fn track_anchor(&self) -> Anchor {
        if self.is_on {
            Anchor::Trailing
        } else {
            Anchor::Leading
        }
    }

    /// Wider and flatter while pressed.
    pub fn knob_scale(&self) -> (f32, f32) {
        let t = self.squish.position;
        (lerp(1.0, 1.08, t), lerp(1.0, 0.9, t))
    }

    pub fn icon(&self) -> &'static str {
        if self.is_on {
            "moon"
        } else {
            "sun.min"
        }
    }

    pub fn icon_color(&self) -> Color {
        if self.is_on {
            Color::YELLOW
        } else {
            Color::WHITE
        }
    }

    pub fn pose(&self) -> SwitchPose {
        SwitchPose {
            is_on: self.is_on,
            knob_offset: self.knob_offset(),
            track_scale: self.track_scale(),
            track_anchor: self.track_anchor(),
            knob_scale: self.knob_scale(),
            icon: self.icon(),
            icon_color: self.icon_color(),
        }
    }
}

impl Default for SoftSwitch {
    fn default() -> Self {
        Self::new(false)
    }
}
