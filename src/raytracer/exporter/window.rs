use super::linear_to_srgb_u8;
use crate::raytracer::error::ExportError;
use crate::raytracer::framebuffer::FramebufferView;
use minifb::{Key, Window, WindowOptions};

/// Preview window showing the last finished frame.
pub struct WindowExporter {
    window: Window,
    buffer: Vec<u32>,
}

impl WindowExporter {
    pub fn new(width: usize, height: usize) -> Result<Self, ExportError> {
        let window = Window::new(
            "lensing",
            width,
            height,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        )?;

        Ok(Self {
            window,
            buffer: vec![0; width * height],
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    pub fn update<F: FramebufferView>(&mut self, framebuffer: &F) -> Result<(), ExportError> {
        let width = framebuffer.width();
        let height = framebuffer.height();
        self.buffer.resize(width * height, 0);

        for y in 0..height {
            for x in 0..width {
                let [r, g, b] = linear_to_srgb_u8(framebuffer.get_pixel(x, y));
                self.buffer[y * width + x] = ((r as u32) << 16) | ((g as u32) << 8) | (b as u32);
            }
        }

        self.window.update_with_buffer(&self.buffer, width, height)?;
        Ok(())
    }

    /// Keeps the window responsive until the user closes it.
    pub fn wait_for_close<F: FramebufferView>(&mut self, framebuffer: &F) -> Result<(), ExportError> {
        self.window.set_target_fps(30);
        while self.is_open() {
            self.update(framebuffer)?;
        }
        Ok(())
    }

    pub fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }
}
