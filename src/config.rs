use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Viewer configuration. Every field has a default, so a config file only
/// needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowSettings,
    pub asset_root: PathBuf,
    pub model_path: PathBuf,
    /// 0xRRGGBB clear color
    pub background: u32,
    pub camera: CameraSettings,
    pub controls: ControlSettings,
    pub model: PlacementSettings,
    pub lights: LightSettings,
    pub axes: AxesSettings,
    pub show_ui: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Vertical field of view in degrees
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    pub enable_damping: bool,
    pub damping_factor: f32,
    /// Radians from the +Y axis
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub min_distance: f32,
    /// `None` leaves zoom-out unbounded
    pub max_distance: Option<f32>,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementSettings {
    pub scale: f32,
    /// When set, replaces the centered position outright
    pub position: Option<[f32; 3]>,
    /// XYZ Euler angles in degrees
    pub rotation_deg: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightSettings {
    pub ambient: Vec<AmbientSettings>,
    pub directional: Vec<DirectionalSettings>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbientSettings {
    pub color: u32,
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionalSettings {
    pub color: u32,
    pub intensity: f32,
    /// Light shines from this position towards the origin
    pub position: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxesSettings {
    pub visible: bool,
    pub length: f32,
    pub labels: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            asset_root: PathBuf::from("."),
            model_path: PathBuf::from("eglise/main.gltf"),
            background: 0xf0f0f0,
            camera: CameraSettings::default(),
            controls: ControlSettings::default(),
            model: PlacementSettings::default(),
            lights: LightSettings::default(),
            axes: AxesSettings::default(),
            show_ui: true,
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Scene Viewer".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_deg: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [100.0, 200.0, 400.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            min_polar_angle: 0.0,
            max_polar_angle: std::f32::consts::PI / 2.2,
            min_distance: 0.0,
            max_distance: None,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
        }
    }
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            scale: 7.0,
            position: Some([100.0, 0.0, 0.0]),
            rotation_deg: [-90.0, 0.0, -90.0],
        }
    }
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            ambient: vec![
                AmbientSettings {
                    color: 0x404040,
                    intensity: 1.0,
                },
                AmbientSettings {
                    color: 0x404040,
                    intensity: 1.0,
                },
            ],
            directional: vec![
                DirectionalSettings {
                    color: 0xffffff,
                    intensity: 1.0,
                    position: [1.0, 1.0, 1.0],
                },
                DirectionalSettings {
                    color: 0xffffff,
                    intensity: 1.0,
                    position: [1.0, 1.0, -1.0],
                },
            ],
        }
    }
}

impl Default for AxesSettings {
    fn default() -> Self {
        Self {
            visible: true,
            length: 100.0,
            labels: true,
        }
    }
}

impl ViewerConfig {
    /// Reads a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Defaults, then the `--config` file, then individual flags
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(model) = &cli.model {
            self.model_path = model.clone();
        }
        if let Some(root) = &cli.asset_root {
            self.asset_root = root.clone();
        }
        if let Some(scale) = cli.scale {
            self.model.scale = scale;
        }
        if let Some(width) = cli.width {
            self.window.width = width;
        }
        if let Some(height) = cli.height {
            self.window.height = height;
        }
        if cli.no_ui {
            self.show_ui = false;
        }
    }

    /// Model path joined onto the asset root unless already absolute
    pub fn resolved_model_path(&self) -> PathBuf {
        if self.model_path.is_absolute() {
            self.model_path.clone()
        } else {
            self.asset_root.join(&self.model_path)
        }
    }
}
