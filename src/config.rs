use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MicroExpError, Result};
use crate::particle::ParticleTimeline;

/// An sRGB color with alpha, serialized as `#RRGGBBAA` hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const RED: Color = Color::rgb(255, 59, 48);
    pub const PINK: Color = Color::rgb(255, 45, 85);
    pub const YELLOW: Color = Color::rgb(255, 204, 0);
    pub const BLUE: Color = Color::rgb(0, 122, 255);
    pub const GRAY: Color = Color::rgb(142, 142, 147);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Returns the same color with alpha scaled by `opacity`.
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (f32::from(self.a) * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::RED
    }
}

impl FromStr for Color {
    type Err = MicroExpError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let named = match trimmed.to_lowercase().as_str() {
            "red" => Some(Color::RED),
            "pink" => Some(Color::PINK),
            "yellow" => Some(Color::YELLOW),
            "blue" => Some(Color::BLUE),
            "gray" | "grey" => Some(Color::GRAY),
            "white" => Some(Color::WHITE),
            "black" => Some(Color::BLACK),
            _ => None,
        };
        if let Some(color) = named {
            return Ok(color);
        }

        let invalid = || MicroExpError::InvalidColor(s.to_string());
        let hex = trimmed.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Color {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if hex.len() == 8 { channel(6)? } else { 255 },
        })
    }
}

impl TryFrom<String> for Color {
    type Error = MicroExpError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Construction-time settings of a heart counter. Immutable once the counter exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub max_count: Option<u64>,
    pub accent_color: Color,
    pub use_haptics: bool,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            max_count: None,
            accent_color: Color::RED,
            use_haptics: true,
        }
    }
}

impl CounterConfig {
    pub fn with_max_count(mut self, max_count: u64) -> Self {
        self.max_count = Some(max_count);
        self
    }

    pub fn with_haptics(mut self, use_haptics: bool) -> Self {
        self.use_haptics = use_haptics;
        self
    }

    pub fn with_accent_color(mut self, accent_color: Color) -> Self {
        self.accent_color = accent_color;
        self
    }
}

/// Settings file for the demo binary and hosts embedding the components.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MicroExpConfig {
    pub counter: CounterConfig,
    pub timeline: ParticleTimeline,
}

impl MicroExpConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: MicroExpConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.timeline.validate()
    }
}

/// Serde adapter storing a `Duration` as whole milliseconds.
pub mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
