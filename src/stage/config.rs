//! Viewer configuration.
//!
//! Every field has a default matching the stock dog viewer, so an empty JSON
//! object (or no file at all) yields the standard scene.

use std::f32::consts::PI;
use std::path::Path;

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::assets::{AnimationAsset, ModelAsset};
use crate::errors::{KennelError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 500.0,
            position: Vec3::new(0.0, 1.5, 3.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub ambient_color: Vec3,
    pub ambient_intensity: f32,
    pub directional_color: Vec3,
    pub directional_intensity: f32,
    /// Normalized when the light is created.
    pub directional_direction: Vec3,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_color: Vec3::ONE,
            ambient_intensity: 1.0,
            directional_color: Vec3::ONE,
            directional_intensity: PI,
            directional_direction: Vec3::new(0.75, 1.0, 0.75),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub target: Vec3,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            target: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub asset: ModelAsset,
    /// Uniform scale applied to the model root.
    pub scale: f32,
    /// Index of the variant shown at start-up.
    pub variant: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            asset: ModelAsset::Dogs,
            scale: 0.01,
            variant: 0,
        }
    }
}

/// Complete configuration of a [`Stage`](crate::stage::Stage).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub controls: ControlsConfig,
    pub model: ModelConfig,
    pub animation: AnimationAsset,
    /// Background colour as `#RRGGBB` (sRGB).
    pub background: String,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            lighting: LightingConfig::default(),
            controls: ControlsConfig::default(),
            model: ModelConfig::default(),
            animation: AnimationAsset::DogSitting,
            background: "#1680AF".to_string(),
        }
    }
}

impl StageConfig {
    /// Parses and validates a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading stage config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        let cam = &self.camera;
        if !(cam.fov > 0.0 && cam.fov < 180.0) {
            return Err(KennelError::InvalidConfig(format!(
                "camera.fov must be in (0, 180), got {}",
                cam.fov
            )));
        }
        if !positive(cam.aspect) {
            return Err(KennelError::InvalidConfig(format!(
                "camera.aspect must be positive, got {}",
                cam.aspect
            )));
        }
        if !(positive(cam.near) && cam.far > cam.near) {
            return Err(KennelError::InvalidConfig(format!(
                "camera clipping range must satisfy 0 < near < far, got near={} far={}",
                cam.near, cam.far
            )));
        }
        let direction_len_sq = self.lighting.directional_direction.length_squared();
        if !(direction_len_sq > f32::EPSILON && direction_len_sq.is_finite()) {
            return Err(KennelError::InvalidConfig(
                "lighting.directional_direction must be finite and non-zero".to_string(),
            ));
        }
        if !(positive(self.controls.damping_factor) && self.controls.damping_factor <= 1.0) {
            return Err(KennelError::InvalidConfig(format!(
                "controls.damping_factor must be in (0, 1], got {}",
                self.controls.damping_factor
            )));
        }
        if !(positive(self.model.scale) && self.model.scale.is_finite()) {
            return Err(KennelError::InvalidConfig(format!(
                "model.scale must be positive and finite, got {}",
                self.model.scale
            )));
        }
        parse_hex_color(&self.background)?;
        Ok(())
    }

    /// Background as linear RGBA.
    pub fn background_color(&self) -> Result<Vec4> {
        parse_hex_color(&self.background)
    }
}

/// `false` for zero, negatives and NaN.
fn positive(value: f32) -> bool {
    value > 0.0
}

/// Parses `#RRGGBB` (sRGB) into linear RGBA with alpha 1.
pub fn parse_hex_color(hex: &str) -> Result<Vec4> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    let invalid = || KennelError::InvalidConfig(format!("invalid colour '{hex}', expected #RRGGBB"));

    if digits.len() != 6 || !digits.is_ascii() {
        return Err(invalid());
    }
    let channel = |range: std::ops::Range<usize>| -> Result<f32> {
        u8::from_str_radix(&digits[range], 16)
            .map(|v| srgb_to_linear(f32::from(v) / 255.0))
            .map_err(|_| invalid())
    };

    Ok(Vec4::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 1.0))
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_endpoints() {
        let white = parse_hex_color("#FFFFFF").unwrap();
        assert!((white - Vec4::ONE).abs().max_element() < 1e-6);

        let black = parse_hex_color("000000").unwrap();
        assert_eq!(black, Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn hex_color_rejects_garbage() {
        assert!(parse_hex_color("#12345").is_err());
        assert!(parse_hex_color("#GG0000").is_err());
        assert!(parse_hex_color("#ééé").is_err());
    }
}
