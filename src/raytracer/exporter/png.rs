use super::{linear_to_srgb_u8, Exporter, Framebuffer};
use crate::raytracer::error::ExportError;
use crate::raytracer::framebuffer::FramebufferView;
use image::{ImageBuffer, Rgb, RgbImage};
use std::path::Path;

/// Writes frames as 8-bit sRGB. The format follows the file extension.
#[derive(Clone, Copy, Debug, Default)]
pub struct PngExporter;

impl PngExporter {
    pub fn to_image(&self, framebuffer: &Framebuffer) -> RgbImage {
        ImageBuffer::from_fn(framebuffer.width() as u32, framebuffer.height() as u32, |x, y| {
            Rgb(linear_to_srgb_u8(framebuffer.get_pixel(x as usize, y as usize)))
        })
    }
}

impl Exporter for PngExporter {
    fn export(&self, framebuffer: &Framebuffer, path: &Path) -> Result<(), ExportError> {
        self.to_image(framebuffer)
            .save(path)
            .map_err(|source| ExportError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!(
            "Wrote {}x{} image to {}",
            framebuffer.width(),
            framebuffer.height(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn image_matches_framebuffer_layout() {
        let fb = Framebuffer::from_colors(2, 2, &[Vec3::ONE, Vec3::ZERO, Vec3::X, Vec3::Z]);
        let img = PngExporter.to_image(&fb);
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(img.get_pixel(1, 0).0, [0, 0, 0]);
        assert_eq!(img.get_pixel(0, 1).0, [255, 0, 0]);
        assert_eq!(img.get_pixel(1, 1).0, [0, 0, 255]);
    }

    #[test]
    fn export_writes_a_readable_png() {
        let path = std::env::temp_dir().join(format!("lensing-export-{}.png", std::process::id()));
        let fb = Framebuffer::from_colors(3, 1, &[Vec3::ONE; 3]);
        PngExporter.export(&fb, &path).unwrap();
        let back = image::open(&path).unwrap().into_rgb8();
        assert_eq!(back.dimensions(), (3, 1));
        assert_eq!(back.get_pixel(2, 0).0, [255, 255, 255]);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let fb = Framebuffer::from_colors(1, 1, &[Vec3::ZERO]);
        let path = Path::new("/nonexistent-dir/definitely/missing.png");
        assert!(matches!(
            PngExporter.export(&fb, path),
            Err(ExportError::Write { .. })
        ));
    }
}
