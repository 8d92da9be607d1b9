pub mod app;
pub mod camera;
pub mod config;
pub mod disk;
pub mod error;
pub mod exporter;
pub mod framebuffer;
pub mod geodesic;
pub mod ray;
pub mod renderloop;
pub mod scene;
pub mod shading;
pub mod sky;
pub mod texture;

pub use app::App;
