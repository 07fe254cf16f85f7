pub mod axes;
pub mod lights;
pub mod node;
pub mod placement;

pub use axes::{AxesHelper, AxisLabel, LineSegment};
pub use lights::{AmbientLight, DirectionalLight, Lighting, MAX_DIRECTIONAL_LIGHTS};
pub use node::{Mesh, Node, Primitive, Transform};
pub use placement::{place_model, Placement};

use glam::{Mat3, Mat4, Vec3};

use crate::config::ViewerConfig;
use crate::math::{hex_to_linear, AABB};

/// Primitive with its vertices baked into world space
#[derive(Debug, Clone, PartialEq)]
pub struct WorldMesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub color: [f32; 4],
    pub double_sided: bool,
    pub bounds: AABB,
}

impl WorldMesh {
    fn bake(primitive: &Primitive, world: Mat4) -> Self {
        let normal_matrix = Mat3::from_mat4(world).inverse().transpose();
        let positions: Vec<Vec3> = primitive
            .positions
            .iter()
            .map(|p| world.transform_point3(*p))
            .collect();
        let normals = primitive
            .normals
            .iter()
            .map(|n| (normal_matrix * *n).normalize_or_zero())
            .collect();

        // Mirroring transforms flip the winding
        let mut indices = primitive.indices.clone();
        if world.determinant() < 0.0 {
            for triangle in indices.chunks_exact_mut(3) {
                triangle.swap(1, 2);
            }
        }

        Self {
            name: primitive.name.clone(),
            bounds: AABB::from_points(&positions),
            positions,
            normals,
            indices,
            color: primitive.color,
            double_sided: primitive.double_sided,
        }
    }

    pub fn triangle(&self, index: usize) -> [Vec3; 3] {
        let i = &self.indices[index * 3..index * 3 + 3];
        [
            self.positions[i[0] as usize],
            self.positions[i[1] as usize],
            self.positions[i[2] as usize],
        ]
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Everything the viewer draws: background, lights, axes and loaded models
#[derive(Debug, Clone)]
pub struct Scene {
    /// Linear RGB clear color
    pub background: Vec3,
    pub lighting: Lighting,
    pub axes: Option<AxesHelper>,
    pub show_labels: bool,
    pub models: Vec<Node>,
}

impl Scene {
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            background: Vec3::from_array(hex_to_linear(config.background)),
            lighting: Lighting::from_settings(&config.lights),
            axes: config.axes.visible.then(|| AxesHelper::new(config.axes.length)),
            show_labels: config.axes.labels,
            models: Vec::new(),
        }
    }

    pub fn add(&mut self, node: Node) {
        log::info!(
            "Adding '{}' to scene ({} nodes, {} primitives)",
            node.name,
            node.node_count(),
            node.primitive_count()
        );
        self.models.push(node);
    }

    /// World-space copies of every primitive in the scene
    pub fn flatten(&self) -> Vec<WorldMesh> {
        let mut meshes = Vec::new();
        for model in &self.models {
            model.visit(Mat4::IDENTITY, &mut |node, world| {
                if let Some(mesh) = &node.mesh {
                    meshes.extend(mesh.primitives.iter().map(|p| WorldMesh::bake(p, world)));
                }
            });
        }
        meshes
    }

    pub fn line_segments(&self) -> Vec<LineSegment> {
        self.axes.map(|axes| axes.segments().to_vec()).unwrap_or_default()
    }

    pub fn labels(&self) -> Vec<AxisLabel> {
        match self.axes {
            Some(axes) if self.show_labels => axes.labels(),
            _ => Vec::new(),
        }
    }

    /// Bounds of all loaded models
    pub fn bounds(&self) -> AABB {
        self.models
            .iter()
            .fold(AABB::empty(), |b, m| b.union(&m.world_bounds(Mat4::IDENTITY)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_node(name: &str) -> Node {
        Node::new(name).with_mesh(Mesh {
            name: Some("quad".to_string()),
            primitives: vec![Primitive {
                name: name.to_string(),
                positions: vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
                normals: vec![Vec3::Z; 4],
                indices: vec![0, 1, 2, 0, 2, 3],
                color: [0.5, 0.5, 0.5, 1.0],
                double_sided: false,
            }],
        })
    }

    #[test]
    fn test_from_default_config() {
        let scene = Scene::from_config(&ViewerConfig::default());
        assert!(scene.models.is_empty());
        assert!(scene.bounds().is_empty());
        assert_eq!(scene.line_segments().len(), 3);
        assert_eq!(scene.labels().len(), 3);
        assert_eq!(scene.lighting.directional.len(), 2);
    }

    #[test]
    fn test_hidden_axes_have_no_labels() {
        let mut config = ViewerConfig::default();
        config.axes.visible = false;
        let scene = Scene::from_config(&config);
        assert!(scene.line_segments().is_empty());
        assert!(scene.labels().is_empty());
    }

    #[test]
    fn test_flatten_bakes_world_transform() {
        let mut scene = Scene::from_config(&ViewerConfig::default());
        let mut node = quad_node("wall");
        node.transform.translation = Vec3::new(0.0, 0.0, -5.0);
        node.transform.rotation = glam::Quat::from_rotation_y(std::f32::consts::PI);
        scene.add(node);

        let meshes = scene.flatten();
        assert_eq!(meshes.len(), 1);
        let mesh = &meshes[0];
        assert_eq!(mesh.name, "wall");
        assert_eq!(mesh.triangle_count(), 2);
        assert!((mesh.normals[0] - Vec3::NEG_Z).length() < 1e-5);
        assert!((mesh.bounds.min.z + 5.0).abs() < 1e-5);
        assert!((mesh.positions[1] - Vec3::new(-1.0, 0.0, -5.0)).length() < 1e-5);
    }

    #[test]
    fn test_mirror_flips_winding() {
        let mut scene = Scene::from_config(&ViewerConfig::default());
        let mut node = quad_node("mirror");
        node.transform.scale = Vec3::new(-1.0, 1.0, 1.0);
        scene.add(node);

        let mesh = &scene.flatten()[0];
        assert_eq!(&mesh.indices[..3], &[0, 2, 1]);

        // Winding still agrees with the normal
        let [a, b, c] = mesh.triangle(0);
        let face = (b - a).cross(c - a).normalize();
        assert!(face.dot(mesh.normals[0]) > 0.99);
    }
}
