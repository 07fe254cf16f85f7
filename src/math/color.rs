/// Splits a 0xRRGGBB value into sRGB components in [0, 1]
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// 0xRRGGBB to linear RGB, the space the shaders light in
pub fn hex_to_linear(hex: u32) -> [f32; 3] {
    hex_to_rgb(hex).map(srgb_to_linear)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb_channels() {
        let rgb = hex_to_rgb(0xff8000);
        assert!((rgb[0] - 1.0).abs() < 0.01);
        assert!((rgb[1] - 128.0 / 255.0).abs() < 0.01);
        assert!(rgb[2].abs() < 0.01);
    }

    #[test]
    fn test_linear_endpoints() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_background_grey_is_darker_in_linear() {
        let linear = hex_to_linear(0xf0f0f0);
        let srgb = hex_to_rgb(0xf0f0f0);
        assert!(linear[0] < srgb[0]);
        assert!((linear[0] - 0.8714).abs() < 0.001);
    }
}
