//! Side panel: a slide-in icon rail with a selectable item list and a theme toggle.
//!
//! The panel slides in from the trailing edge while the main content shifts left by the panel
//! width. Both offsets ride one spring. A scrim fades in behind the panel after a short delay;
//! tapping it hides the panel again. The theme knob moves linearly.

use std::time::Duration;

use serde::Serialize;

use crate::animation::{lerp, Curve, Spring, Tween};
use crate::constants::{
    PANEL_SPRING_DAMPING, PANEL_SPRING_RESPONSE, PANEL_WIDTH_FRACTION, THEME_KNOB_TRAVEL,
};
use crate::error::{MicroExpError, Result};

/// Icon names of the rail, top to bottom.
pub const PANEL_ICONS: [&str; 6] = [
    "house",
    "chart.bar",
    "list.bullet.clipboard",
    "heart",
    "bell",
    "person",
];

/// Item carrying the notification badge.
pub const BADGE_INDEX: usize = 4;

const SCRIM_FADE: Duration = Duration::from_millis(350);
const SCRIM_DELAY: Duration = Duration::from_millis(200);
const THEME_KNOB_DURATION: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelItem {
    pub icon: String,
    pub selected: bool,
    pub has_badge: bool,
}

#[derive(Debug, Clone)]
pub struct SidePanel {
    screen_width: f32,
    visible: bool,
    selected_index: usize,
    light_theme: bool,
    slide: Spring,
    clock: Duration,
    scrim_from: f32,
    scrim_changed_at: Duration,
    knob_from: f32,
    theme_changed_at: Duration,
}

impl SidePanel {
    /// A hidden panel on a light theme with the first item selected.
    pub fn new(screen_width: f32) -> Self {
        Self {
            screen_width,
            visible: false,
            selected_index: 0,
            light_theme: true,
            slide: Spring::from_response(PANEL_SPRING_RESPONSE, PANEL_SPRING_DAMPING),
            clock: Duration::ZERO,
            scrim_from: 0.0,
            scrim_changed_at: Duration::ZERO,
            knob_from: THEME_KNOB_TRAVEL,
            theme_changed_at: Duration::ZERO,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn is_light_theme(&self) -> bool {
        self.light_theme
    }

    pub fn set_visible(&mut self, visible: bool) {
        if visible == self.visible {
            return;
        }
        self.scrim_from = self.scrim_opacity();
        self.scrim_changed_at = self.clock;
        self.visible = visible;
        self.slide.set_target(if visible { 1.0 } else { 0.0 });
    }

    /// Shows or hides the panel. Also what a tap on the scrim does.
    pub fn toggle(&mut self) -> bool {
        self.set_visible(!self.visible);
        self.visible
    }

    pub fn select(&mut self, index: usize) -> Result<()> {
        if index >= PANEL_ICONS.len() {
            return Err(MicroExpError::IndexOutOfRange {
                index,
                len: PANEL_ICONS.len(),
            });
        }
        self.selected_index = index;
        Ok(())
    }

    pub fn toggle_theme(&mut self) -> bool {
        self.knob_from = self.theme_knob_offset();
        self.theme_changed_at = self.clock;
        self.light_theme = !self.light_theme;
        self.light_theme
    }

    /// Advances the panel's animations. Returns true while anything is still moving.
    pub fn update(&mut self, dt: Duration) -> bool {
        self.clock += dt;
        let sliding = self.slide.update(dt);
        let fading = self.clock < self.scrim_changed_at + self.scrim_tween().end();
        let knob = self.clock < self.theme_changed_at + THEME_KNOB_DURATION;
        sliding || fading || knob
    }

    /// Icon for `index`, filled when selected.
    pub fn icon_name(&self, index: usize) -> Option<String> {
        let icon = PANEL_ICONS.get(index)?;
        Some(if index == self.selected_index {
            format!("{}.fill", icon)
        } else {
            icon.to_string()
        })
    }

    pub fn items(&self) -> Vec<PanelItem> {
        (0..PANEL_ICONS.len())
            .filter_map(|index| {
                Some(PanelItem {
                    icon: self.icon_name(index)?,
                    selected: index == self.selected_index,
                    has_badge: index == BADGE_INDEX,
                })
            })
            .collect()
    }

    pub fn panel_width(&self) -> f32 {
        self.screen_width * PANEL_WIDTH_FRACTION
    }

    /// Leading x of the panel. Off screen when hidden.
    pub fn panel_offset(&self) -> f32 {
        lerp(
            self.screen_width,
            self.screen_width - self.panel_width(),
            self.slide.position,
        )
    }

    /// Horizontal shift of the main content.
    pub fn content_offset(&self) -> f32 {
        lerp(0.0, -self.panel_width(), self.slide.position)
    }

    fn scrim_tween(&self) -> Tween {
        Tween::new(SCRIM_FADE, Curve::EaseInOut).delay(SCRIM_DELAY)
    }

    pub fn scrim_opacity(&self) -> f32 {
        let to = if self.visible { 1.0 } else { 0.0 };
        self.scrim_tween()
            .lerp(self.scrim_from, to, self.clock - self.scrim_changed_at)
    }

    /// Knob sits right on light theme, left on dark.
    pub fn theme_knob_offset(&self) -> f32 {
        let to = if self.light_theme {
            THEME_KNOB_TRAVEL
        } else {
            -THEME_KNOB_TRAVEL
        };
        Tween::new(THEME_KNOB_DURATION, Curve::Linear).lerp(
            self.knob_from,
            to,
            self.clock - self.theme_changed_at,
        )
    }

    pub fn theme_icon(&self) -> &'static str {
        if self.light_theme {
            "moon"
        } else {
            "sun.min"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const FRAME: Duration = Duration::from_millis(16);

    fn settle(panel: &mut SidePanel) {
        while panel.update(FRAME) {}
    }

    #[test]
    fn test_hidden_panel_sits_off_screen() {
        let panel = SidePanel::new(400.0);
        assert_eq!(panel.panel_width(), 80.0);
        assert_eq!(panel.panel_offset(), 400.0);
        assert_eq!(panel.content_offset(), 0.0);
        assert_eq!(panel.scrim_opacity(), 0.0);
    }

    #[test]
    fn test_toggle_slides_panel_and_content() {
        let mut panel = SidePanel::new(400.0);
        assert!(panel.toggle());
        panel.update(Duration::from_millis(100));
        assert_eq!(panel.scrim_opacity(), 0.0, "scrim waits for its delay");
        settle(&mut panel);

        assert_eq!(panel.panel_offset(), 320.0);
        assert_eq!(panel.content_offset(), -80.0);
        assert_eq!(panel.scrim_opacity(), 1.0);

        assert!(!panel.toggle());
        settle(&mut panel);
        assert_eq!(panel.panel_offset(), 400.0);
        assert_eq!(panel.scrim_opacity(), 0.0);
    }

    #[test]
    fn test_selection_fills_icon_and_rejects_out_of_range() {
        let mut panel = SidePanel::new(400.0);
        assert_eq!(panel.icon_name(0).as_deref(), Some("house.fill"));

        panel.select(3).unwrap();
        let items = panel.items();
        assert_eq!(items[3].icon, "heart.fill");
        assert_eq!(items[0].icon, "house");
        assert!(items[BADGE_INDEX].has_badge);
        assert_eq!(items.iter().filter(|i| i.has_badge).count(), 1);

        assert_matches!(
            panel.select(6),
            Err(MicroExpError::IndexOutOfRange { index: 6, len: 6 })
        );
        assert_eq!(panel.selected_index(), 3);
        assert_eq!(panel.icon_name(6), None);
    }

    #[test]
    fn test_theme_knob_moves_linearly() {
        let mut panel = SidePanel::new(400.0);
        assert_eq!(panel.theme_knob_offset(), 11.0);
        assert!(!panel.toggle_theme());
        panel.update(Duration::from_millis(50));
        assert!((panel.theme_knob_offset() - 0.0).abs() < 1e-4);
        settle(&mut panel);
        assert_eq!(panel.theme_knob_offset(), -11.0);
        assert_eq!(panel.theme_icon(), "sun.min");
    }
}
