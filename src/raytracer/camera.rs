use crate::raytracer::ray::RayBatch;
use glam::Vec3;
use rayon::prelude::*;

/// Pinhole camera. Column `x` runs along `right`, row `y = 0` is the top of
/// the image.
#[derive(Clone)]
pub struct Camera {
    pub position: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    pub focal_length: f32,
    pub fov: f32,
    pub width: usize,
    pub height: usize,
    forward: Vec3,
    right: Vec3,
    true_up: Vec3,
}

impl Camera {
    pub fn new(position: Vec3, look_at: Vec3, focal_length: f32, fov: f32, width: usize, height: usize) -> Self {
        let mut camera = Camera {
            position,
            look_at,
            up: Vec3::Z,
            focal_length,
            fov,
            width,
            height,
            forward: Vec3::NEG_Y,
            right: Vec3::X,
            true_up: Vec3::Z,
        };
        camera.update_basis();
        camera
    }

    pub fn with_up(mut self, up: Vec3) -> Self {
        self.up = up;
        self.update_basis();
        self
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Re-derives the orthonormal frame. Call after moving the camera.
    pub fn update_basis(&mut self) {
        self.forward = (self.look_at - self.position)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Y);
        // up parallel to forward: any perpendicular works for `right`
        self.right = self
            .forward
            .cross(self.up)
            .try_normalize()
            .unwrap_or_else(|| self.forward.any_orthonormal_vector());
        self.true_up = self.right.cross(self.forward).normalize();
    }

    /// Moves the camera around the z axis to azimuth `angle`, keeping its
    /// cylindrical radius and height, and re-aims it at `look_at`.
    pub fn orbit_to(&mut self, angle: f32) {
        let radius = self.position.truncate().length();
        self.position = Vec3::new(radius * angle.cos(), radius * angle.sin(), self.position.z);
        self.update_basis();
    }

    pub fn azimuth(&self) -> f32 {
        if self.position.truncate().length() > 0.0 {
            self.position.y.atan2(self.position.x)
        } else {
            0.0
        }
    }

    /// Unit direction through the center of pixel `(x, y)`.
    pub fn generate_direction(&self, x: usize, y: usize) -> Vec3 {
        let plane_height = 2.0 * self.focal_length * (self.fov.to_radians() * 0.5).tan();
        let plane_width = plane_height * self.aspect_ratio();

        // integer numerators keep mirrored pixels exactly antisymmetric
        let sx = (2 * x as i64 + 1 - self.width as i64) as f32 / (2 * self.width) as f32;
        let sy = (self.height as i64 - 2 * y as i64 - 1) as f32 / (2 * self.height) as f32;

        let offset = self.forward * self.focal_length
            + self.right * (sx * plane_width)
            + self.true_up * (sy * plane_height);
        offset.try_normalize().unwrap_or(self.forward)
    }

    pub fn generate_batch(&self) -> RayBatch {
        let width = self.width;
        let directions: Vec<Vec3> = (0..width * self.height)
            .into_par_iter()
            .map(|idx| self.generate_direction(idx % width, idx / width))
            .collect();
        let positions = vec![self.position; directions.len()];
        RayBatch::new(width, self.height, positions, directions)
    }
}
