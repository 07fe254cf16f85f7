use glam::{Mat4, Quat, Vec3};

use super::node::{Node, Transform};
use crate::config::PlacementSettings;
use crate::math::AABB;

/// How a freshly loaded model is normalized before joining the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: f32,
    /// Replaces the centering offset when set
    pub position: Option<Vec3>,
    pub rotation: Quat,
}

impl Placement {
    pub fn from_settings(settings: &PlacementSettings) -> Self {
        Self {
            scale: settings.scale,
            position: settings.position.map(Vec3::from_array),
            rotation: Transform::rotation_from_euler_deg(settings.rotation_deg),
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::from_settings(&PlacementSettings::default())
    }
}

/// Scale the model, center it on its scaled bounds, then let a configured
/// position override the centering and finally rotate it. Returns the
/// scaled bounds measured before translation.
pub fn place_model(model: &mut Node, placement: &Placement) -> AABB {
    model.transform.scale = Vec3::splat(placement.scale);
    let bounds = model.world_bounds(Mat4::IDENTITY);

    if !bounds.is_empty() {
        model.transform.translation -= bounds.center();
    }
    if let Some(position) = placement.position {
        model.transform.translation = position;
    }
    model.transform.rotation = placement.rotation;

    log::debug!(
        "Placed model '{}': bounds {:?}..{:?}, translation {:?}",
        model.name,
        bounds.min,
        bounds.max,
        model.transform.translation
    );
    bounds
}
