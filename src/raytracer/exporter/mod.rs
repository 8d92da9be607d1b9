mod png;
mod tonemapping;
#[cfg(feature = "preview")]
mod window;

pub use png::PngExporter;
pub use tonemapping::linear_to_srgb_u8;
#[cfg(feature = "preview")]
pub use window::WindowExporter;

use super::error::ExportError;
use super::framebuffer::Framebuffer;
use std::path::Path;

pub trait Exporter {
    fn export(&self, framebuffer: &Framebuffer, path: &Path) -> Result<(), ExportError>;
}
