use glam::Vec3;

use crate::config::LightSettings;
use crate::math::hex_to_linear;

/// Directional lights beyond this count are dropped by the renderer
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    /// Linear RGB
    pub color: Vec3,
    pub intensity: f32,
}

/// Light arriving from infinitely far away
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Vec3,
    pub intensity: f32,
    /// Unit vector pointing from the surface towards the light
    pub direction: Vec3,
}

impl DirectionalLight {
    /// A light placed at `position` shining at the origin
    pub fn from_position(color: Vec3, intensity: f32, position: Vec3) -> Self {
        Self {
            color,
            intensity,
            direction: position.normalize_or(Vec3::Y),
        }
    }

    pub fn radiance(&self) -> Vec3 {
        self.color * self.intensity
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lighting {
    pub ambient: Vec<AmbientLight>,
    pub directional: Vec<DirectionalLight>,
}

impl Lighting {
    pub fn from_settings(settings: &LightSettings) -> Self {
        let ambient = settings
            .ambient
            .iter()
            .map(|a| AmbientLight {
                color: Vec3::from_array(hex_to_linear(a.color)),
                intensity: a.intensity,
            })
            .collect();

        let directional: Vec<_> = settings
            .directional
            .iter()
            .map(|d| {
                DirectionalLight::from_position(
                    Vec3::from_array(hex_to_linear(d.color)),
                    d.intensity,
                    Vec3::from_array(d.position),
                )
            })
            .collect();

        if directional.len() > MAX_DIRECTIONAL_LIGHTS {
            log::warn!(
                "{} directional lights configured, only the first {} are used",
                directional.len(),
                MAX_DIRECTIONAL_LIGHTS
            );
        }

        Self {
            ambient,
            directional,
        }
    }

    /// Ambient lights add up
    pub fn ambient_total(&self) -> Vec3 {
        self.ambient
            .iter()
            .fold(Vec3::ZERO, |sum, a| sum + a.color * a.intensity)
    }
}
