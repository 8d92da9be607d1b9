use glam::Vec3;

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Encodes a linear color for 8-bit output. Out-of-range input is clamped.
pub fn linear_to_srgb_u8(color: Vec3) -> [u8; 3] {
    let encode = |c: f32| (linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0).round() as u8;
    [encode(color.x), encode(color.y), encode(color.z)]
}
