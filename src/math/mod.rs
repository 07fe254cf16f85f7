mod aabb;
mod color;
mod ray;
mod triangle;

pub use aabb::AABB;
pub use color::{hex_to_linear, hex_to_rgb, srgb_to_linear};
pub use ray::{distance_ray_segment, intersect_aabb, Ray};
pub use triangle::{intersect_triangle, TriangleHit};
