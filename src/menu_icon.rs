//! Morphing menu icon: four capsules that stretch into a cross when selected.

use std::time::Duration;

use serde::Serialize;

use crate::animation::{lerp, Spring};
use crate::constants::{
    MENU_CAPSULE_HEIGHT, MENU_CAPSULE_WIDTH, MENU_CAPSULE_WIDTH_SELECTED, MENU_ICON_SPACING,
    PANEL_SPRING_DAMPING, PANEL_SPRING_RESPONSE,
};

/// Centering shift applied to the capsule grid.
const GRID_OFFSET: f32 = -5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Capsule {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation_deg: f32,
}

#[derive(Debug, Clone)]
pub struct MorphMenuIcon {
    selected: bool,
    progress: Spring,
}

impl MorphMenuIcon {
    pub fn new(selected: bool) -> Self {
        Self {
            selected,
            progress: Spring::from_response(PANEL_SPRING_RESPONSE, PANEL_SPRING_DAMPING)
                .at(if selected { 1.0 } else { 0.0 }),
        }
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
        self.progress.set_target(if selected { 1.0 } else { 0.0 });
    }

    pub fn toggle(&mut self) -> bool {
        self.set_selected(!self.selected);
        self.selected
    }

    pub fn update(&mut self, dt: Duration) -> bool {
        self.progress.update(dt)
    }

    /// Rotation of the whole icon: upright when selected, a quarter turn otherwise.
    pub fn rotation_deg(&self) -> f32 {
        lerp(90.0, 0.0, self.progress.position)
    }

    /// The 2x2 capsule grid, row-major by column index then row index.
    pub fn capsules(&self) -> [Capsule; 4] {
        let width = lerp(
            MENU_CAPSULE_WIDTH,
            MENU_CAPSULE_WIDTH_SELECTED,
            self.progress.position,
        );
        let capsule = |i: usize, j: usize| Capsule {
            x: MENU_ICON_SPACING * i as f32 + GRID_OFFSET,
            y: MENU_ICON_SPACING * j as f32 + GRID_OFFSET,
            width,
            height: MENU_CAPSULE_HEIGHT,
            rotation_deg: if i == j { 45.0 } else { -45.0 },
        };
        [capsule(0, 0), capsule(0, 1), capsule(1, 0), capsule(1, 1)]
    }
}

impl Default for MorphMenuIcon {
    fn default() -> Self {
        Self::new(false)
    }
}
