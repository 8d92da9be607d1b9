use crate::raytracer::disk::AccretionDisk;
use crate::raytracer::error::SceneError;
use crate::raytracer::geodesic::{DeflectionLaw, SceneAccess};
use crate::raytracer::sky::Sky;
use glam::Vec3;

/// Physical constants and textures for one render. Built once, then shared
/// read-only across all rays.
pub struct Scene<S: Sky> {
    blackhole_radius: f32,
    escape_radius: f32,
    deflection: DeflectionLaw,
    disk: AccretionDisk,
    sky: S,
}

impl<S: Sky> Scene<S> {
    pub fn new(
        blackhole_radius: f32,
        escape_radius: f32,
        deflection: DeflectionLaw,
        disk: AccretionDisk,
        sky: S,
    ) -> Result<Self, SceneError> {
        if !(blackhole_radius.is_finite() && blackhole_radius > 0.0) {
            return Err(SceneError::InvalidBlackHoleRadius(blackhole_radius));
        }
        let (inner, outer) = (disk.inner_radius, disk.outer_radius);
        if !(inner.is_finite() && outer.is_finite()) || inner < 0.0 || inner >= outer {
            return Err(SceneError::InvalidDiskRadii { inner, outer });
        }
        if !escape_radius.is_finite() || escape_radius <= blackhole_radius {
            return Err(SceneError::InvalidEscapeRadius {
                escape: escape_radius,
                blackhole: blackhole_radius,
            });
        }
        if !(0.0..=1.0).contains(&disk.alpha) {
            return Err(SceneError::InvalidDiskAlpha(disk.alpha));
        }
        if !(deflection.coefficient.is_finite() && deflection.coefficient >= 0.0) {
            return Err(SceneError::InvalidDeflection(deflection.coefficient));
        }

        Ok(Scene {
            blackhole_radius,
            escape_radius,
            deflection,
            disk,
            sky,
        })
    }
}

impl<S: Sky> SceneAccess for Scene<S> {
    fn blackhole_radius(&self) -> f32 {
        self.blackhole_radius
    }

    fn escape_radius(&self) -> f32 {
        self.escape_radius
    }

    fn deflection(&self) -> DeflectionLaw {
        self.deflection
    }

    fn disk(&self) -> &AccretionDisk {
        &self.disk
    }

    fn sky_color(&self, direction: Vec3) -> Vec3 {
        self.sky.sample(direction)
    }

    fn disk_color(&self, x: f32, y: f32) -> Vec3 {
        self.disk.color(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raytracer::sky::TextureSky;
    use crate::raytracer::texture::Texture;

    fn build(bh: f32, escape: f32, inner: f32, outer: f32, alpha: f32) -> Result<Scene<TextureSky>, SceneError> {
        Scene::new(
            bh,
            escape,
            DeflectionLaw::default(),
            AccretionDisk::new(inner, outer, alpha, 4500.0),
            TextureSky::new(Texture::solid(Vec3::ONE)),
        )
    }

    #[test]
    fn accepts_default_parameters() {
        let scene = build(1.0, 10.0, 2.0, 6.0, 1.0).unwrap();
        assert_eq!(scene.blackhole_radius(), 1.0);
        assert_eq!(scene.escape_radius(), 10.0);
        assert_eq!(scene.sky_color(Vec3::X), Vec3::ONE);
        assert_eq!(scene.disk_color(0.5, 0.0), Vec3::ZERO);
    }

    #[test]
    fn rejects_inverted_disk() {
        assert_eq!(
            build(1.0, 10.0, 6.0, 2.0, 1.0).err(),
            Some(SceneError::InvalidDiskRadii { inner: 6.0, outer: 2.0 })
        );
        assert!(build(1.0, 10.0, 3.0, 3.0, 1.0).is_err());
        assert!(build(1.0, 10.0, -1.0, 3.0, 1.0).is_err());
    }

    #[test]
    fn rejects_escape_inside_horizon() {
        assert_eq!(
            build(1.0, 1.0, 2.0, 6.0, 1.0).err(),
            Some(SceneError::InvalidEscapeRadius { escape: 1.0, blackhole: 1.0 })
        );
    }

    #[test]
    fn rejects_bad_radius_and_alpha() {
        assert!(matches!(build(0.0, 10.0, 2.0, 6.0, 1.0), Err(SceneError::InvalidBlackHoleRadius(_))));
        assert!(matches!(build(f32::NAN, 10.0, 2.0, 6.0, 1.0), Err(SceneError::InvalidBlackHoleRadius(_))));
        assert!(matches!(build(1.0, 10.0, 2.0, 6.0, 1.5), Err(SceneError::InvalidDiskAlpha(_))));
    }

    #[test]
    fn rejects_negative_deflection() {
        let result = Scene::new(
            1.0,
            10.0,
            DeflectionLaw {
                coefficient: -1.0,
                exponent: 5,
            },
            AccretionDisk::new(2.0, 6.0, 1.0, 4500.0),
            TextureSky::new(Texture::solid(Vec3::ONE)),
        );
        assert!(matches!(result, Err(SceneError::InvalidDeflection(_))));
    }
}
