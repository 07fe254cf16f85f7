use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::math::AABB;

/// Local translation, rotation and scale of a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// XYZ Euler angles in degrees, composed as Rx * Ry * Rz
    pub fn rotation_from_euler_deg(degrees: [f32; 3]) -> Quat {
        let [x, y, z] = degrees.map(f32::to_radians);
        Quat::from_euler(EulerRot::XYZ, x, y, z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Triangle list with per-vertex normals and a flat material color
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    /// Name reported by hover picking
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Three per triangle, all in range of `positions`
    pub indices: Vec<u32>,
    /// Linear RGBA
    pub color: [f32; 4],
    pub double_sided: bool,
}

impl Primitive {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: Option<String>,
    pub primitives: Vec<Primitive>,
}

/// Scene graph node
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub mesh: Option<Mesh>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
            mesh: None,
            children: Vec::new(),
        }
    }

    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Depth-first walk with accumulated world matrices
    pub fn visit<'a>(&'a self, parent: Mat4, visitor: &mut impl FnMut(&'a Node, Mat4)) {
        let world = parent * self.transform.matrix();
        visitor(self, world);
        for child in &self.children {
            child.visit(world, visitor);
        }
    }

    /// World-space bounds of all geometry below this node
    pub fn world_bounds(&self, parent: Mat4) -> AABB {
        let mut bounds = AABB::empty();
        self.visit(parent, &mut |node, world| {
            if let Some(mesh) = &node.mesh {
                for primitive in &mesh.primitives {
                    let points = primitive.positions.iter().map(|p| world.transform_point3(*p));
                    bounds = points.fold(bounds, |b, p| b.expand(p));
                }
            }
        });
        bounds
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    pub fn primitive_count(&self) -> usize {
        let own = self.mesh.as_ref().map_or(0, |m| m.primitives.len());
        own + self.children.iter().map(Node::primitive_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Primitive {
        Primitive {
            name: "tri".to_string(),
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            normals: vec![Vec3::Z; 3],
            indices: vec![0, 1, 2],
            color: [1.0; 4],
            double_sided: false,
        }
    }

    #[test]
    fn test_transform_matrix_order() {
        let transform = Transform {
            translation: Vec3::new(10.0, 0.0, 0.0),
            rotation: Quat::IDENTITY,
            scale: Vec3::splat(2.0),
        };
        // Scale first, then translate
        let p = transform.matrix().transform_point3(Vec3::ONE);
        assert_eq!(p, Vec3::new(12.0, 2.0, 2.0));
    }

    #[test]
    fn test_euler_rotation_about_x() {
        let rotation = Transform::rotation_from_euler_deg([-90.0, 0.0, 0.0]);
        // Z-up content becomes Y-up
        let up = rotation * Vec3::Z;
        assert!((up - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_world_bounds_follow_hierarchy() {
        let mut child = Node::new("child").with_mesh(Mesh {
            name: None,
            primitives: vec![unit_triangle()],
        });
        child.transform.translation = Vec3::new(0.0, 0.0, 5.0);

        let mut root = Node::new("root").with_child(child);
        root.transform.scale = Vec3::splat(2.0);

        let bounds = root.world_bounds(Mat4::IDENTITY);
        assert_eq!(bounds.min, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(bounds.max, Vec3::new(2.0, 2.0, 10.0));
        assert_eq!(root.node_count(), 2);
        assert_eq!(root.primitive_count(), 1);
    }

    #[test]
    fn test_empty_node_has_empty_bounds() {
        assert!(Node::new("empty").world_bounds(Mat4::IDENTITY).is_empty());
    }
}
