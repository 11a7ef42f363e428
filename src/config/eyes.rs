//! Eye and render configuration
//!
//! Loaded from `eyeconfig.toml`. Every table is optional and falls back to
//! its default independently, so a file containing only `[render]` keeps the
//! default eye shapes.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::ConfigError;

/// Highest supported refresh rate
pub const MAX_FPS: i32 = 240;

/// Unknown top-level tables are ignored
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EyeConfig {
    pub render: RenderConfig,
    pub eye: EyesConfig,
}

/// Frame pacing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    pub fps: i32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { fps: 30 }
    }
}

impl RenderConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.clamp(1, MAX_FPS) as u32
    }
}

/// Geometry of both eyes
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EyesConfig {
    /// Horizontal gap between the eyes in pixels
    pub distance: i32,
    pub left: EyeShape,
    pub right: EyeShape,
}

impl Default for EyesConfig {
    fn default() -> Self {
        Self {
            distance: 10,
            left: EyeShape::default(),
            right: EyeShape::default(),
        }
    }
}

/// Size and corner radius of a single eye
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EyeShape {
    pub width: i32,
    pub height: i32,
    pub roundness: i32,
}

impl Default for EyeShape {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
            roundness: 8,
        }
    }
}

impl EyeConfig {
    /// Check value ranges that do not depend on the screen
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_FPS).contains(&self.render.fps) {
            return Err(ConfigError::out_of_range(
                "render.fps",
                i64::from(self.render.fps),
                "a value between 1 and 240",
            ));
        }

        if self.eye.distance < 0 {
            return Err(ConfigError::out_of_range(
                "eye.distance",
                i64::from(self.eye.distance),
                "a non-negative value",
            ));
        }

        Self::validate_shape("eye.left", &self.eye.left)?;
        Self::validate_shape("eye.right", &self.eye.right)?;
        Ok(())
    }

    /// Check that both eyes fit side by side on a canvas of the given size
    pub fn validate_fits(&self, width: u32, height: u32) -> Result<(), ConfigError> {
        let needed = i64::from(self.eye.left.width)
            + i64::from(self.eye.right.width)
            + i64::from(self.eye.distance);
        if needed > i64::from(width) {
            return Err(ConfigError::out_of_range(
                "eye.left.width + eye.right.width + eye.distance",
                needed,
                &format!("at most the screen width ({})", width),
            ));
        }

        for (field, shape) in [("eye.left.height", &self.eye.left), ("eye.right.height", &self.eye.right)] {
            if i64::from(shape.height) > i64::from(height) {
                return Err(ConfigError::out_of_range(
                    field,
                    i64::from(shape.height),
                    &format!("at most the screen height ({})", height),
                ));
            }
        }

        Ok(())
    }

    fn validate_shape(prefix: &str, shape: &EyeShape) -> Result<(), ConfigError> {
        if shape.width <= 0 {
            return Err(ConfigError::out_of_range(
                &format!("{}.width", prefix),
                i64::from(shape.width),
                "a value greater than 0",
            ));
        }
        if shape.height <= 0 {
            return Err(ConfigError::out_of_range(
                &format!("{}.height", prefix),
                i64::from(shape.height),
                "a value greater than 0",
            ));
        }
        if shape.roundness < 0 {
            return Err(ConfigError::out_of_range(
                &format!("{}.roundness", prefix),
                i64::from(shape.roundness),
                "a non-negative value",
            ));
        }
        Ok(())
    }
}
