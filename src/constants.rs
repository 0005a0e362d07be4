// Press feedback
pub const PRESS_RESET_MS: u64 = 180;
pub const PRESSED_BUTTON_SCALE: f32 = 0.96;
pub const PRESSED_HEART_SCALE: f32 = 1.15;

// Flying heart timeline
pub const LEAD_DELAY_MS: u64 = 160;
pub const MOTION_MS: u64 = 1000;
pub const WING_REVEAL_MS: u64 = 180;
pub const FLAP_LEGS: u32 = 3;

// Flying heart geometry
pub const PARTICLE_LIFT: f32 = 80.0;
pub const PARTICLE_SPREAD: f32 = 40.0;
pub const PARTICLE_ROTATION_DEG: f32 = 18.0;
pub const PARTICLE_START_SCALE: f32 = 1.05;
pub const PARTICLE_END_SCALE: f32 = 1.12;
pub const LEFT_WING_BASE_DEG: f32 = 28.0;
pub const RIGHT_WING_BASE_DEG: f32 = -18.0;
pub const WING_FLAP_DEG: f32 = 10.0;

// Spring physics defaults
pub const SPRING_THRESHOLD: f32 = 0.001;
pub const SPRING_MAX_STEP: f32 = 1.0 / 240.0;

// Soft switch (interactive spring, response 0.35s, damping 0.7)
pub const SWITCH_SPRING_RESPONSE: f32 = 0.35;
pub const SWITCH_SPRING_DAMPING: f32 = 0.7;
pub const SWITCH_PRESS_RESPONSE: f32 = 0.12;
pub const SWITCH_KNOB_TRAVEL: f32 = 14.0;

// Side panel
pub const PANEL_WIDTH_FRACTION: f32 = 0.2;
pub const PANEL_SPRING_RESPONSE: f32 = 0.55;
pub const PANEL_SPRING_DAMPING: f32 = 1.0;
pub const THEME_KNOB_TRAVEL: f32 = 11.0;

// Morph menu icon
pub const MENU_ICON_SPACING: f32 = 12.0;
pub const MENU_CAPSULE_HEIGHT: f32 = 10.0;
pub const MENU_CAPSULE_WIDTH: f32 = 10.0;
pub const MENU_CAPSULE_WIDTH_SELECTED: f32 = 20.0;

// Observers
pub const EVENT_CHANNEL_CAPACITY: usize = 128;
