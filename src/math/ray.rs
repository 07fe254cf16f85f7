use glam::Vec3;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Direction is normalized on construction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

pub fn intersect_aabb(ray_origin: Vec3, ray_dir: Vec3, box_min: Vec3, box_max: Vec3) -> f32 {
    const EPSILON: f32 = 1e-8;

    // Near-zero components clamp to a huge inverse instead of dividing by zero
    let safe_inverse = |d: f32| {
        if d.abs() < EPSILON {
            1.0 / EPSILON.copysign(d)
        } else {
            1.0 / d
        }
    };
    let inv_dir = Vec3::new(
        safe_inverse(ray_dir.x),
        safe_inverse(ray_dir.y),
        safe_inverse(ray_dir.z),
    );

    let t_min = (box_min - ray_origin) * inv_dir;
    let t_max = (box_max - ray_origin) * inv_dir;

    let t1 = t_min.min(t_max);
    let t2 = t_min.max(t_max);

    let t_near = t1.x.max(t1.y).max(t1.z);
    let t_far = t2.x.min(t2.y).min(t2.z);

    if t_near > t_far || t_far < 0.0 {
        return -1.0;
    }

    if t_near < 0.0 {
        // Origin is inside the box
        0.0
    } else {
        t_near
    }
}

/// Closest approach between a ray and the segment `a..b`.
/// Returns `(distance, t_ray, point_on_segment)`.
pub fn distance_ray_segment(ray: &Ray, a: Vec3, b: Vec3) -> (f32, f32, Vec3) {
    let seg = b - a;
    let seg_len_sq = seg.length_squared();
    let w0 = ray.origin - a;

    if seg_len_sq < f32::EPSILON {
        let t = (-w0).dot(ray.direction).max(0.0);
        return (ray.at(t).distance(a), t, a);
    }

    let b_dot = ray.direction.dot(seg);
    let d = ray.direction.dot(w0);
    let e = seg.dot(w0);
    let denom = seg_len_sq - b_dot * b_dot;

    // Parametric position along the segment, clamped
    let s = if denom.abs() < f32::EPSILON {
        0.0
    } else {
        ((e - b_dot * d) / denom).clamp(0.0, 1.0)
    };
    let on_segment = a + seg * s;

    let t = (on_segment - ray.origin).dot(ray.direction).max(0.0);
    let on_ray = ray.at(t);

    (on_ray.distance(on_segment), t, on_segment)
}
