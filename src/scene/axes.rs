use glam::Vec3;

/// Colored line segment in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Vec3,
    pub end: Vec3,
    /// Linear RGB
    pub color: Vec3,
}

/// World-anchored text drawn by the overlay
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub text: String,
    pub position: Vec3,
}

/// Three axis lines from the origin: X red, Y green, Z blue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxesHelper {
    pub length: f32,
}

impl AxesHelper {
    pub fn new(length: f32) -> Self {
        Self { length }
    }

    pub fn segments(&self) -> [LineSegment; 3] {
        let axis = |dir: Vec3, color: Vec3| LineSegment {
            start: Vec3::ZERO,
            end: dir * self.length,
            color,
        };
        [
            axis(Vec3::X, Vec3::new(1.0, 0.0, 0.0)),
            axis(Vec3::Y, Vec3::new(0.0, 1.0, 0.0)),
            axis(Vec3::Z, Vec3::new(0.0, 0.0, 1.0)),
        ]
    }

    /// "X", "Y" and "Z" at the axis tips
    pub fn labels(&self) -> Vec<AxisLabel> {
        self.segments()
            .iter()
            .zip(["X", "Y", "Z"])
            .map(|(segment, text)| AxisLabel {
                text: text.to_string(),
                position: segment.end,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_sit_on_axis_tips() {
        let labels = AxesHelper::new(100.0).labels();
        assert_eq!(labels.len(), 3);
        assert_eq!(labels[0].text, "X");
        assert_eq!(labels[0].position, Vec3::new(100.0, 0.0, 0.0));
        assert_eq!(labels[1].position, Vec3::new(0.0, 100.0, 0.0));
        assert_eq!(labels[2].text, "Z");
        assert_eq!(labels[2].position, Vec3::new(0.0, 0.0, 100.0));
    }

    #[test]
    fn test_segment_colors() {
        let [x, y, z] = AxesHelper::new(1.0).segments();
        assert_eq!(x.color, Vec3::X);
        assert_eq!(y.color, Vec3::Y);
        assert_eq!(z.color, Vec3::Z);
        assert_eq!(x.start, Vec3::ZERO);
    }
}
