/// TOML configuration for camera, light and render options
use std::fs;
use std::path::Path;

use log::info;
use serde::Deserialize;
use thiserror::Error;

use crate::projection::Frustum;
use crate::scene::{light_from_angles, RenderOptions};
use crate::transform::Orientation;
use crate::vector::Vector3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub light: LightConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub controls: ControlsConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub azimuth: f64,
    pub elevation: f64,
    pub angle: f64,
    /// Near plane, i.e. how far the camera is pulled back.
    pub distance: f64,
    pub rear: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            azimuth: 0.0,
            elevation: 0.0,
            angle: 0.0,
            distance: 5.0,
            rear: -100.0,
            width: 100.0,
            height: 100.0,
        }
    }
}

/// Either an explicit `direction`, or `azimuth` / `elevation` in radians.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LightConfig {
    pub direction: Option<[f64; 3]>,
    pub azimuth: Option<f64>,
    pub elevation: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub vertex_markers: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlsConfig {
    /// Radians per key press.
    pub step: f64,
    pub distance_step: f64,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            step: 0.05,
            distance_step: 0.1,
        }
    }
}

const DEFAULT_LIGHT: [f64; 3] = [0.3, 0.5, 0.8];

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config: Config = fs::read_to_string(path)?.parse()?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// A frustum with the configured bounds and orientation.
    pub fn frustum(&self) -> Frustum {
        let c = &self.camera;
        let mut frustum = Frustum::new(c.width, c.height, c.distance, c.rear);
        frustum.set_orientation(Orientation::new(c.azimuth, c.elevation, c.angle));
        frustum
    }

    pub fn light_direction(&self) -> Vector3 {
        let light = &self.light;
        match (light.direction, light.azimuth, light.elevation) {
            (Some(direction), _, _) => direction.into(),
            (None, None, None) => DEFAULT_LIGHT.into(),
            (None, azimuth, elevation) => {
                light_from_angles(azimuth.unwrap_or(0.0), elevation.unwrap_or(0.0))
            }
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            vertex_markers: self.render.vertex_markers,
        }
    }
}

impl std::str::FromStr for Config {
    type Err = ConfigError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(source)?)
    }
}
