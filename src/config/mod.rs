mod loader;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use loader::load_config;

/// Largest screen side; terminal cursor coordinates are 16-bit
pub const MAX_SCREEN_SIDE: usize = u16::MAX as usize;

/// Upper bound on width * height, keeping buffer allocations sane
pub const MAX_SCREEN_CELLS: usize = 1 << 24;

/// Main renderer configuration
///
/// Every section is optional; missing keys take the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DonutConfig {
    pub screen: ScreenConfig,
    pub camera: CameraConfig,
    pub torus: TorusConfig,
    pub animation: AnimationConfig,
    pub light: LightConfig,
    pub shading: ShadingConfig,
    pub render: RenderConfig,
}

/// Character grid dimensions
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: crate::SCREEN_WIDTH,
            height: crate::SCREEN_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Horizontal field of view in degrees
    pub fov_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: crate::FOV_DEGREES,
        }
    }
}

/// Torus radii and placement
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TorusConfig {
    pub minor_radius: f32,
    pub major_radius: f32,
    pub position: [f32; 3],
}

impl Default for TorusConfig {
    fn default() -> Self {
        Self {
            minor_radius: 5.0,
            major_radius: 10.0,
            position: [0.0, 0.0, 60.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Per-frame rotation increments about x, y and z (radians)
    pub increments: [f32; 3],
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            increments: [0.06, 0.09, 0.04],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LightConfig {
    pub position: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 20.0, 30.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShadingConfig {
    /// Characters from sparsest to densest
    pub ramp: String,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            ramp: crate::SHADING_RAMP.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Rasterize theta bands on the rayon thread pool
    pub parallel: bool,
}

impl DonutConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        load_config(path)
    }

    /// Load configuration with fallback to default paths, then built-in defaults
    pub fn load_or_default(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        match config_path {
            Some(path) => Self::from_file(path),
            None => {
                let default_paths = ["donut.yaml", "donut.yml", "./config/donut.yaml"];
                for p in default_paths {
                    let path = Path::new(p);
                    if path.exists() {
                        return Self::from_file(path);
                    }
                }
                tracing::debug!("No config file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Check value ranges the pipeline relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(ConfigError::Validation(format!(
                "screen must be at least 1x1, got {}x{}",
                self.screen.width, self.screen.height
            )));
        }
        let cells = self.screen.width.checked_mul(self.screen.height);
        if self.screen.width > MAX_SCREEN_SIDE
            || self.screen.height > MAX_SCREEN_SIDE
            || cells.map_or(true, |n| n > MAX_SCREEN_CELLS)
        {
            return Err(ConfigError::Validation(format!(
                "screen {}x{} is too large (at most {} per side and {} cells)",
                self.screen.width, self.screen.height, MAX_SCREEN_SIDE, MAX_SCREEN_CELLS
            )));
        }

        let fov = self.camera.fov_degrees;
        if !(fov > 0.0 && fov < 180.0) {
            return Err(ConfigError::Validation(format!(
                "camera.fov_degrees must be between 0 and 180, got {}",
                fov
            )));
        }

        let torus = &self.torus;
        if !(torus.minor_radius > 0.0 && torus.major_radius > 0.0) {
            return Err(ConfigError::Validation(
                "torus radii must be positive".to_string(),
            ));
        }
        if torus.minor_radius >= torus.major_radius {
            return Err(ConfigError::Validation(format!(
                "torus.minor_radius ({}) must be smaller than torus.major_radius ({})",
                torus.minor_radius, torus.major_radius
            )));
        }
        if !(torus.position[2] > 0.0) {
            return Err(ConfigError::Validation(
                "torus.position z must be in front of the camera".to_string(),
            ));
        }

        let finite = |v: &[f32; 3]| v.iter().all(|c| c.is_finite());
        if !finite(&torus.position)
            || !finite(&self.light.position)
            || !finite(&self.animation.increments)
        {
            return Err(ConfigError::Validation(
                "positions and increments must be finite".to_string(),
            ));
        }

        if self.shading.ramp.is_empty() {
            return Err(ConfigError::Validation(
                "shading.ramp must contain at least one character".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}
