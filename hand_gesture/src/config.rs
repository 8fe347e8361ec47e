//! Tunable gesture parameters and their defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_FRAME_WIDTH:     u32 = 640;
pub const DEFAULT_FRAME_HEIGHT:    u32 = 480;
/// Pixels inset from every frame edge to form the active region.
pub const DEFAULT_MARGIN:          u32 = 100;
/// Higher = steadier but laggier; 5–10 is comfortable.
pub const DEFAULT_SMOOTHING:       f64 = 7.0;
pub const DEFAULT_CLICK_DISTANCE:  f64 = 40.0;
pub const DEFAULT_CLICK_COOLDOWN:  f64 = 0.15;

/// Geometry and timing of the gesture pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Capture resolution the landmarks are expressed in.
    pub frame_width:  u32,
    pub frame_height: u32,
    pub margin:       u32,
    /// Smoothing factor `s`; must be at least 1.
    pub smoothing:    f64,
    /// Pinch distance (pixels) under which a click is intended.
    pub click_distance: f64,
    /// Minimum seconds between two fired clicks.
    pub click_cooldown_secs: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            frame_width:         DEFAULT_FRAME_WIDTH,
            frame_height:        DEFAULT_FRAME_HEIGHT,
            margin:              DEFAULT_MARGIN,
            smoothing:           DEFAULT_SMOOTHING,
            click_distance:      DEFAULT_CLICK_DISTANCE,
            click_cooldown_secs: DEFAULT_CLICK_COOLDOWN,
        }
    }
}

impl GestureConfig {
    pub fn click_cooldown(&self) -> Duration {
        Duration::from_secs_f64(self.click_cooldown_secs.max(0.0))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(ConfigError::invalid(
                "frame_width/frame_height",
                format!("{}x{} has no pixels", self.frame_width, self.frame_height),
            ));
        }
        let shortest = self.frame_width.min(self.frame_height);
        if self.margin.saturating_mul(2) >= shortest {
            return Err(ConfigError::invalid(
                "margin",
                format!(
                    "{} leaves no active region inside a {}x{} frame",
                    self.margin, self.frame_width, self.frame_height
                ),
            ));
        }
        if !self.smoothing.is_finite() || self.smoothing < 1.0 {
            return Err(ConfigError::invalid(
                "smoothing",
                format!("{} must be a finite value >= 1", self.smoothing),
            ));
        }
        if !self.click_distance.is_finite() || self.click_distance <= 0.0 {
            return Err(ConfigError::invalid(
                "click_distance",
                format!("{} must be a positive pixel distance", self.click_distance),
            ));
        }
        if !self.click_cooldown_secs.is_finite() || self.click_cooldown_secs < 0.0 {
            return Err(ConfigError::invalid(
                "click_cooldown_secs",
                format!("{} must be a non-negative number of seconds", self.click_cooldown_secs),
            ));
        }
        Ok(())
    }
}
