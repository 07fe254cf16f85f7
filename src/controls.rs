use glam::{Vec2, Vec3};
use std::f32::consts::PI;

use crate::camera::PerspectiveCamera;
use crate::config::ControlSettings;
use crate::core::{Button, Controller, PointerEvent, PIXELS_PER_LINE};

/// Keeps the polar angle off the poles where look-at degenerates
const POLAR_EPSILON: f32 = 1e-6;
/// Squared movement below which the camera counts as still
const MOVE_EPSILON: f32 = 1e-6;
/// Dolly factor per wheel notch before `zoom_speed` is applied
const ZOOM_BASE: f32 = 0.95;

/// Position on a sphere around the orbit target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    /// Polar angle from +Y
    pub phi: f32,
    /// Azimuth around +Y, zero on +Z
    pub theta: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self {
                radius: 0.0,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            theta: offset.x.atan2(offset.z),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// Orbit, dolly and pan of a camera around its target, driven by pointer drags
#[derive(Debug, Clone)]
pub struct OrbitControls {
    settings: ControlSettings,
    /// Pending azimuth / polar change
    delta_theta: f32,
    delta_phi: f32,
    pan_offset: Vec3,
    /// Pending radius multiplier
    scale: f32,
    viewport_height: f32,
}

impl OrbitControls {
    pub fn new(settings: ControlSettings, viewport_height: u32) -> Self {
        Self {
            settings,
            delta_theta: 0.0,
            delta_phi: 0.0,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
            viewport_height: viewport_height.max(1) as f32,
        }
    }

    /// Drag distances are measured against the viewport height
    pub fn set_viewport_height(&mut self, height: u32) {
        if height > 0 {
            self.viewport_height = height as f32;
        }
    }

    /// Feed one pointer event. The held button picks the drag mode:
    /// left rotates, middle dollies, right pans. Returns whether the event
    /// moved the camera.
    pub fn handle_pointer(
        &mut self,
        event: &PointerEvent,
        input: &impl Controller,
        camera: &PerspectiveCamera,
    ) -> bool {
        match *event {
            PointerEvent::Moved { delta, .. } if delta != Vec2::ZERO => {
                if input.is_down(Button::MouseLeft) {
                    self.rotate(delta * self.settings.rotate_speed);
                    true
                } else if input.is_down(Button::MouseMiddle) {
                    let factor = self.zoom_scale(delta.y.abs() / PIXELS_PER_LINE);
                    if delta.y > 0.0 {
                        self.dolly_out(factor);
                    } else if delta.y < 0.0 {
                        self.dolly_in(factor);
                    }
                    true
                } else if input.is_down(Button::MouseRight) {
                    self.pan(delta * self.settings.pan_speed, camera);
                    true
                } else {
                    false
                }
            }
            PointerEvent::Wheel { notches } => {
                let factor = self.zoom_scale(notches.abs());
                if notches > 0.0 {
                    self.dolly_in(factor);
                } else {
                    self.dolly_out(factor);
                }
                true
            }
            _ => false,
        }
    }

    /// Queue a rotation for a drag of `delta` pixels
    pub fn rotate(&mut self, delta: Vec2) {
        self.delta_theta -= 2.0 * PI * delta.x / self.viewport_height;
        self.delta_phi -= 2.0 * PI * delta.y / self.viewport_height;
    }

    /// Queue a screen-space pan for a drag of `delta` pixels
    pub fn pan(&mut self, delta: Vec2, camera: &PerspectiveCamera) {
        let offset = camera.position - camera.target;
        // Half the visible height at the target distance
        let target_distance = offset.length() * (camera.fov_y / 2.0).tan();

        let left = -camera.right() * (2.0 * delta.x * target_distance / self.viewport_height);
        let up = camera.camera_up() * (2.0 * delta.y * target_distance / self.viewport_height);
        self.pan_offset += left + up;
    }

    /// Move towards the target; `factor` below one
    pub fn dolly_in(&mut self, factor: f32) {
        self.scale *= factor;
    }

    pub fn dolly_out(&mut self, factor: f32) {
        self.scale /= factor;
    }

    fn zoom_scale(&self, notches: f32) -> f32 {
        ZOOM_BASE.powf(self.settings.zoom_speed * notches)
    }

    /// Apply pending motion to the camera. Returns whether it moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let offset = camera.position - camera.target;
        let mut spherical = Spherical::from_offset(offset);

        let damping = self.settings.enable_damping;
        let factor = if damping {
            self.settings.damping_factor
        } else {
            1.0
        };

        spherical.theta += self.delta_theta * factor;
        spherical.phi += self.delta_phi * factor;
        spherical.phi = spherical
            .phi
            .clamp(self.settings.min_polar_angle, self.settings.max_polar_angle)
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);

        let max_distance = self.settings.max_distance.unwrap_or(f32::INFINITY);
        spherical.radius =
            (spherical.radius * self.scale).clamp(self.settings.min_distance, max_distance);

        let target = camera.target + self.pan_offset * factor;
        let position = target + spherical.to_offset();

        if damping {
            let decay = 1.0 - self.settings.damping_factor;
            self.delta_theta *= decay;
            self.delta_phi *= decay;
            self.pan_offset *= decay;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        let moved = position.distance_squared(camera.position) > MOVE_EPSILON
            || target.distance_squared(camera.target) > MOVE_EPSILON;
        camera.position = position;
        camera.target = target;
        moved
    }
}
