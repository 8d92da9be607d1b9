use crate::raytracer::texture::Texture;
use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

/// Thin annulus in the z = 0 plane.
pub struct AccretionDisk {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub alpha: f32,
    pub temperature: f32,
    texture: Option<Texture>,
}

impl AccretionDisk {
    pub fn new(inner_radius: f32, outer_radius: f32, alpha: f32, temperature: f32) -> Self {
        Self {
            inner_radius,
            outer_radius,
            alpha,
            temperature,
            texture: None,
        }
    }

    pub fn with_texture(mut self, texture: Texture) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }

    /// Inclusive on both edges.
    pub fn contains(&self, r: f32) -> bool {
        r >= self.inner_radius && r <= self.outer_radius
    }

    /// Returns zero outside the annulus.
    pub fn color(&self, x: f32, y: f32) -> Vec3 {
        let r = x.hypot(y);
        if !self.contains(r) {
            return Vec3::ZERO;
        }

        match &self.texture {
            Some(texture) => {
                let mut phi = y.atan2(x);
                if phi < 0.0 {
                    phi += TAU;
                }
                let u = phi / TAU;
                let v = (r - self.inner_radius) / (self.outer_radius - self.inner_radius);
                texture.sample(Vec2::new(u, v))
            }
            None => blackbody_color(self.temperature),
        }
    }
}

/// Approximate sRGB-ish tint of a blackbody, valid for 800K..40000K.
pub fn blackbody_color(temp: f32) -> Vec3 {
    let t = temp.clamp(800.0, 40000.0);
    let r = if t < 6600.0 {
        1.0
    } else {
        (1.29 * ((t - 6000.0) / 1000.0).powf(-0.1332)).clamp(0.0, 1.0)
    };
    let g = if t < 6600.0 {
        (0.39 * (t / 1000.0).ln() - 0.19).clamp(0.0, 1.0)
    } else {
        (1.29 * ((t - 6000.0) / 1000.0).powf(-0.0755)).clamp(0.0, 1.0)
    };
    let b = if t < 1900.0 {
        0.0
    } else if t < 6600.0 {
        (0.39 * (t / 1000.0 - 1.0).ln() - 0.35).clamp(0.0, 1.0)
    } else {
        1.0
    };
    Vec3::new(r, g, b)
}
