mod texture;

use glam::Vec3;

pub use texture::TextureSky;

pub trait Sky {
    /// Background color seen along `direction`. Need not be normalized.
    fn sample(&self, direction: Vec3) -> Vec3;
}
