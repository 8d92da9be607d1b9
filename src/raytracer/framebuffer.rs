use glam::Vec3;

pub trait FramebufferView {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn get_pixel(&self, x: usize, y: usize) -> Vec3;
}

/// Finished frame of linear RGB in `[0, 1]`, row-major, `y = 0` at the top.
pub struct Framebuffer {
    pixels: Vec<Vec3>,
    width: usize,
    height: usize,
}

impl Framebuffer {
    pub fn from_colors(width: usize, height: usize, colors: &[Vec3]) -> Self {
        debug_assert_eq!(colors.len(), width * height);
        Self {
            pixels: colors.iter().map(|c| c.clamp(Vec3::ZERO, Vec3::ONE)).collect(),
            width,
            height,
        }
    }
}

impl FramebufferView for Framebuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn get_pixel(&self, x: usize, y: usize) -> Vec3 {
        self.pixels[y * self.width + x]
    }
}
