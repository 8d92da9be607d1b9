use super::Sky;
use crate::raytracer::texture::Texture;
use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

const MIN_DIRECTION_LENGTH: f32 = 1e-8;

/// Equirectangular sky sphere with +Z as the pole, so the horizon lines up
/// with the accretion disk plane.
pub struct TextureSky {
    texture: Texture,
    rotation: f32,
}

impl TextureSky {
    pub fn new(texture: Texture) -> Self {
        Self { texture, rotation: 0.0 }
    }

    /// Turns the sky by `rotation` radians about +Z.
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    fn rotate_direction(&self, direction: Vec3) -> Vec3 {
        if self.rotation == 0.0 {
            return direction;
        }
        let cos_r = self.rotation.cos();
        let sin_r = self.rotation.sin();
        Vec3::new(
            direction.x * cos_r - direction.y * sin_r,
            direction.x * sin_r + direction.y * cos_r,
            direction.z,
        )
    }

    /// `u = φ/2π`, `v = 1 - θ/π`: the zenith (+Z) reads the bottom image
    /// row and the nadir the top row.
    pub(crate) fn direction_to_uv(direction: Vec3) -> Vec2 {
        let len = direction.length();
        if len < MIN_DIRECTION_LENGTH {
            return Vec2::new(0.0, 0.5);
        }
        let d = direction / len;
        let theta = d.z.clamp(-1.0, 1.0).acos();
        // `+ 0.0` folds -0.0 into +0.0 so both poles land on u = 0
        let mut phi = (d.y + 0.0).atan2(d.x + 0.0);
        if phi < 0.0 {
            phi += TAU;
        }
        Vec2::new(phi / TAU, 1.0 - theta / PI)
    }
}

impl Sky for TextureSky {
    fn sample(&self, direction: Vec3) -> Vec3 {
        let rotated = self.rotate_direction(direction);
        let uv = Self::direction_to_uv(rotated);
        self.texture.sample(uv)
    }
}
