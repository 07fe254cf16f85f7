use glam::{Vec2, Vec3};
use std::cmp::Ordering;

use crate::camera::PerspectiveCamera;
use crate::math::{distance_ray_segment, intersect_aabb, intersect_triangle, Ray};
use crate::scene::{LineSegment, Scene, WorldMesh};

/// World-space distance within which a ray counts as touching a line
pub const LINE_THRESHOLD: f32 = 1.0;

/// Tooltip text for hits on objects without a name
pub const UNNAMED_OBJECT: &str = "Unnamed object";

#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    /// Distance from the ray origin
    pub distance: f32,
    pub point: Vec3,
    /// Pickable name, empty when the object has none
    pub object: String,
}

/// Everything hover picking tests against, in world space
#[derive(Debug, Clone, Default)]
pub struct PickScene {
    pub meshes: Vec<WorldMesh>,
    pub lines: Vec<LineSegment>,
}

impl PickScene {
    pub fn new(meshes: Vec<WorldMesh>, lines: Vec<LineSegment>) -> Self {
        Self { meshes, lines }
    }

    pub fn from_scene(scene: &Scene) -> Self {
        Self::new(scene.flatten(), scene.line_segments())
    }
}

/// Cursor pixel to normalized device coordinates, +Y up
pub fn screen_to_ndc(cursor: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(
        cursor.x / viewport.x * 2.0 - 1.0,
        -(cursor.y / viewport.y * 2.0 - 1.0),
    )
}

#[derive(Debug, Clone, Copy)]
pub struct Raycaster {
    pub ray: Ray,
    pub near: f32,
    pub far: f32,
    pub line_threshold: f32,
}

impl Raycaster {
    pub fn new(ray: Ray) -> Self {
        Self {
            ray,
            near: 0.0,
            far: f32::INFINITY,
            line_threshold: LINE_THRESHOLD,
        }
    }

    /// Ray through a cursor position; `None` for a zero-sized viewport
    pub fn from_screen(camera: &PerspectiveCamera, cursor: Vec2, viewport: Vec2) -> Option<Self> {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return None;
        }
        Some(Self::new(camera.ray_from_ndc(screen_to_ndc(cursor, viewport))))
    }

    fn in_range(&self, distance: f32) -> bool {
        distance >= self.near && distance <= self.far
    }

    /// All hits, nearest first. Each mesh and line contributes its closest hit.
    pub fn intersect_scene(&self, scene: &PickScene) -> Vec<Intersection> {
        let mut hits: Vec<Intersection> = scene
            .meshes
            .iter()
            .filter_map(|mesh| self.intersect_mesh(mesh))
            .chain(scene.lines.iter().filter_map(|line| self.intersect_line(line)))
            .collect();

        hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
        hits
    }

    pub fn intersect_mesh(&self, mesh: &WorldMesh) -> Option<Intersection> {
        let entry = intersect_aabb(
            self.ray.origin,
            self.ray.direction,
            mesh.bounds.min,
            mesh.bounds.max,
        );
        if entry < 0.0 || entry > self.far {
            return None;
        }

        let cull = !mesh.double_sided;
        (0..mesh.triangle_count())
            .filter_map(|i| {
                let [v0, v1, v2] = mesh.triangle(i);
                intersect_triangle(&self.ray, v0, v1, v2, cull)
            })
            .filter(|hit| self.in_range(hit.t))
            .min_by(|a, b| a.t.partial_cmp(&b.t).unwrap_or(Ordering::Equal))
            .map(|hit| Intersection {
                distance: hit.t,
                point: self.ray.at(hit.t),
                object: mesh.name.clone(),
            })
    }

    pub fn intersect_line(&self, line: &LineSegment) -> Option<Intersection> {
        let (distance_to_line, t, on_segment) =
            distance_ray_segment(&self.ray, line.start, line.end);
        if distance_to_line > self.line_threshold || !self.in_range(t) {
            return None;
        }

        Some(Intersection {
            distance: t,
            point: on_segment,
            object: String::new(),
        })
    }
}

/// Tooltip text for the nearest hit, `None` when nothing was hit
pub fn hover_text(hits: &[Intersection]) -> Option<String> {
    hits.first().map(|hit| {
        if hit.object.is_empty() {
            UNNAMED_OBJECT.to_string()
        } else {
            hit.object.clone()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::AABB;

    /// Unit quad in the z = `z` plane facing +Z
    fn quad(name: &str, z: f32, double_sided: bool) -> WorldMesh {
        let positions = vec![
            Vec3::new(-1.0, -1.0, z),
            Vec3::new(1.0, -1.0, z),
            Vec3::new(1.0, 1.0, z),
            Vec3::new(-1.0, 1.0, z),
        ];
        WorldMesh {
            name: name.to_string(),
            bounds: AABB::from_points(&positions),
            normals: vec![Vec3::Z; 4],
            positions,
            indices: vec![0, 1, 2, 0, 2, 3],
            color: [1.0; 4],
            double_sided,
        }
    }

    fn looking_down_z() -> Raycaster {
        Raycaster::new(Ray::new(Vec3::new(0.2, 0.1, 10.0), Vec3::NEG_Z))
    }

    #[test]
    fn test_screen_to_ndc() {
        let viewport = Vec2::new(800.0, 600.0);
        assert_eq!(screen_to_ndc(Vec2::new(400.0, 300.0), viewport), Vec2::ZERO);
        assert_eq!(screen_to_ndc(Vec2::ZERO, viewport), Vec2::new(-1.0, 1.0));
        assert_eq!(screen_to_ndc(viewport, viewport), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_nearest_mesh_first() {
        let scene = PickScene::new(
            vec![quad("far", -5.0, false), quad("near", 2.0, false)],
            vec![],
        );
        let hits = looking_down_z().intersect_scene(&scene);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].object, "near");
        assert!((hits[0].distance - 8.0).abs() < 1e-4);
        assert!((hits[0].point - Vec3::new(0.2, 0.1, 2.0)).length() < 1e-4);
        assert_eq!(hits[1].object, "far");
    }

    #[test]
    fn test_back_faces_need_double_sided() {
        let from_behind = Raycaster::new(Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Z));

        let single = PickScene::new(vec![quad("wall", 0.0, false)], vec![]);
        assert!(from_behind.intersect_scene(&single).is_empty());

        let double = PickScene::new(vec![quad("wall", 0.0, true)], vec![]);
        assert_eq!(from_behind.intersect_scene(&double).len(), 1);
    }

    #[test]
    fn test_miss_returns_nothing() {
        let scene = PickScene::new(vec![quad("wall", 0.0, false)], vec![]);
        let ray = Raycaster::new(Ray::new(Vec3::new(5.0, 5.0, 10.0), Vec3::NEG_Z));
        assert!(ray.intersect_scene(&scene).is_empty());
        assert_eq!(hover_text(&[]), None);
    }

    #[test]
    fn test_line_within_threshold() {
        let line = LineSegment {
            start: Vec3::ZERO,
            end: Vec3::new(100.0, 0.0, 0.0),
            color: Vec3::X,
        };
        let scene = PickScene::new(vec![], vec![line]);

        let close = Raycaster::new(Ray::new(Vec3::new(50.0, 0.5, 10.0), Vec3::NEG_Z));
        let hits = close.intersect_scene(&scene);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].point - Vec3::new(50.0, 0.0, 0.0)).length() < 1e-4);

        // Unnamed helper lines fall back to the generic label
        assert_eq!(hover_text(&hits).as_deref(), Some(UNNAMED_OBJECT));

        let far = Raycaster::new(Ray::new(Vec3::new(50.0, 1.5, 10.0), Vec3::NEG_Z));
        assert!(far.intersect_scene(&scene).is_empty());
    }

    #[test]
    fn test_hover_text_uses_first_name() {
        let hits = vec![
            Intersection {
                distance: 1.0,
                point: Vec3::ZERO,
                object: "Clocher".to_string(),
            },
            Intersection {
                distance: 2.0,
                point: Vec3::ZERO,
                object: String::new(),
            },
        ];
        assert_eq!(hover_text(&hits).as_deref(), Some("Clocher"));
    }

    #[test]
    fn test_from_screen_center_hits_target() {
        let settings = crate::config::CameraSettings {
            position: [0.0, 0.0, 10.0],
            ..Default::default()
        };
        let camera = PerspectiveCamera::new(&settings, 800, 600);
        let viewport = Vec2::new(800.0, 600.0);

        let raycaster = Raycaster::from_screen(&camera, viewport / 2.0, viewport).unwrap();
        let scene = PickScene::new(vec![quad("target", 0.0, false)], vec![]);
        let hits = raycaster.intersect_scene(&scene);
        assert_eq!(hits[0].object, "target");
        assert!((hits[0].distance - 10.0).abs() < 1e-3);

        assert!(Raycaster::from_screen(&camera, Vec2::ZERO, Vec2::ZERO).is_none());
    }
}
