use crate::raytracer::camera::Camera;
use crate::raytracer::config::RenderConfig;
use crate::raytracer::disk::AccretionDisk;
use crate::raytracer::error::ExportError;
use crate::raytracer::exporter::{Exporter, PngExporter};
use crate::raytracer::framebuffer::Framebuffer;
use crate::raytracer::geodesic::{Method, RenderStats};
use crate::raytracer::renderloop::{ParallelRenderLoop, RenderLoop};
use crate::raytracer::scene::Scene;
use crate::raytracer::sky::TextureSky;
use crate::raytracer::texture::Texture;
use anyhow::{Context, Result};
use glam::Vec3;
use std::f32::consts::TAU;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// A validated configuration plus the scene built from it. The scene and its
/// textures are loaded once and reused by every frame.
pub struct App {
    pub config: RenderConfig,
    pub scene: Scene<TextureSky>,
    pub render_loop: ParallelRenderLoop,
}

impl App {
    pub fn new(config: RenderConfig) -> Result<Self> {
        config.validate().context("invalid render configuration")?;

        let s = &config.scene;
        let sky_texture = match &s.sky_texture {
            Some(path) => Texture::from_file(path).unwrap_or_else(|e| {
                log::warn!("{:#}; using a white sky instead", anyhow::Error::new(e));
                Texture::solid(Vec3::ONE)
            }),
            None => Texture::solid(Vec3::ONE),
        };
        let sky = TextureSky::new(sky_texture).with_rotation(s.sky_rotation.to_radians());

        let mut disk = AccretionDisk::new(s.disk_inner_radius, s.disk_outer_radius, s.disk_alpha, s.disk_temperature);
        if let Some(path) = &s.disk_texture {
            match Texture::from_file(path) {
                Ok(texture) => disk = disk.with_texture(texture),
                Err(e) => log::warn!(
                    "{:#}; coloring the disk at {} K instead",
                    anyhow::Error::new(e),
                    s.disk_temperature
                ),
            }
        }
        if !disk.has_texture() {
            log::debug!("Disk colored as a {} K blackbody", s.disk_temperature);
        }

        let scene = Scene::new(s.blackhole_radius, s.escape_radius, s.deflection, disk, sky)
            .context("invalid scene parameters")?;

        Ok(Self {
            render_loop: ParallelRenderLoop::new(config.integrator.max_steps),
            config,
            scene,
        })
    }

    /// Traces one frame from `camera` with the given integrator settings.
    pub fn render_frame(&self, camera: &Camera, method: Method, step_size: f32) -> (Framebuffer, RenderStats) {
        log::info!("Generating {}x{} rays", camera.width, camera.height);
        let mut batch = camera.generate_batch();

        log::info!("Solving {} rays with {method} (h = {step_size})", batch.len());
        let start = Instant::now();
        let stats = self.render_loop.render_pass(&mut batch, &self.scene, method, step_size);
        log::debug!(
            "{method}: {:.2}s, {} absorbed, {} escaped, {} disk hits ({} repeated), {} indeterminate, {} steps",
            start.elapsed().as_secs_f32(),
            stats.absorbed,
            stats.escaped,
            stats.disk_hits,
            stats.repeat_disk_hits,
            stats.indeterminate,
            stats.total_steps
        );

        (Framebuffer::from_colors(batch.width, batch.height, &batch.colors), stats)
    }

    pub fn render(&self, output: &Path, show: bool) -> Result<RenderStats> {
        let camera = self.config.build_camera();
        let integrator = &self.config.integrator;
        let (framebuffer, stats) = self.render_frame(&camera, integrator.method, integrator.step_size);

        PngExporter
            .export(&framebuffer, output)
            .with_context(|| format!("saving {}", output.display()))?;
        log::info!("Saved {}", output.display());

        if show {
            show_preview(&framebuffer).context("preview window")?;
        }
        Ok(stats)
    }

    /// Circles the camera about the z axis, one frame per `TAU / frames`
    /// of azimuth, starting from the configured position.
    pub fn orbit(&self, frames: usize, output_dir: &Path) -> Result<Vec<PathBuf>> {
        create_dir(output_dir)?;
        let mut camera = self.config.build_camera();
        let start_angle = camera.azimuth();
        let integrator = &self.config.integrator;

        let mut written = Vec::with_capacity(frames);
        let exporter = PngExporter;
        for frame in 0..frames {
            camera.orbit_to(start_angle + TAU * frame as f32 / frames as f32);
            let (framebuffer, _) = self.render_frame(&camera, integrator.method, integrator.step_size);
            let path = output_dir.join(format!("frame_{frame:03}.png"));
            exporter
                .export(&framebuffer, &path)
                .with_context(|| format!("saving {}", path.display()))?;
            log::info!("Saved frame {}/{}", frame + 1, frames);
            written.push(path);
        }
        Ok(written)
    }

    /// Renders every (method, step size) pair from the same initial rays.
    pub fn sweep(&self, methods: &[Method], step_sizes: &[f32], output_dir: &Path) -> Result<Vec<PathBuf>> {
        for &h in step_sizes {
            if !(h.is_finite() && h > 0.0) {
                anyhow::bail!("step size must be positive and finite, got {h}");
            }
        }
        create_dir(output_dir)?;
        let camera = self.config.build_camera();
        let rays = camera.generate_batch();
        let exporter = PngExporter;
        log::info!("Sweeping {} runs over {} rays", methods.len() * step_sizes.len(), rays.len());

        let mut written = Vec::with_capacity(methods.len() * step_sizes.len());
        for &method in methods {
            for &h in step_sizes {
                let start = Instant::now();
                let (colors, stats) = self
                    .render_loop
                    .integrate(&rays.positions, &rays.directions, &self.scene, h, method);
                log::info!(
                    "{method} h={h}: {:.2}s, {} of {} rays escaped, worst L^2 drift {:.2e}",
                    start.elapsed().as_secs_f32(),
                    stats.escaped,
                    stats.rays(),
                    stats.max_l_square_drift
                );
                let framebuffer = Framebuffer::from_colors(rays.width, rays.height, &colors);
                let path = output_dir.join(format!("result_{method}_lambda_{h}.png"));
                exporter
                    .export(&framebuffer, &path)
                    .with_context(|| format!("saving {}", path.display()))?;
                written.push(path);
            }
        }
        Ok(written)
    }
}

fn create_dir(dir: &Path) -> Result<(), ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(feature = "preview")]
fn show_preview(framebuffer: &Framebuffer) -> Result<(), ExportError> {
    use crate::raytracer::exporter::WindowExporter;
    use crate::raytracer::framebuffer::FramebufferView;

    let mut window = WindowExporter::new(framebuffer.width(), framebuffer.height())?;
    window.set_title("lensing - Esc to close");
    window.wait_for_close(framebuffer)
}

#[cfg(not(feature = "preview"))]
fn show_preview(_framebuffer: &Framebuffer) -> Result<(), ExportError> {
    log::warn!("--show needs a build with the `preview` feature; skipping the window");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raytracer::framebuffer::FramebufferView;
    use crate::raytracer::error::ConfigError;
    use crate::raytracer::geodesic::SceneAccess;

    fn tiny_config() -> RenderConfig {
        let mut config = RenderConfig::default();
        config.camera.position = [0.0, 8.0, 0.5];
        config.camera.fov = 60.0;
        config.camera.width = 32;
        config.camera.height = 18;
        config.integrator.step_size = 0.02;
        config
    }

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lensing-{name}-{}", std::process::id()))
    }

    #[test_log::test]
    fn missing_textures_fall_back() {
        let mut config = tiny_config();
        config.scene.sky_texture = Some(PathBuf::from("/no/such/sky.png"));
        config.scene.disk_texture = Some(PathBuf::from("/no/such/disk.png"));
        let app = App::new(config).unwrap();
        assert!(!app.scene.disk().has_texture());
        assert_eq!(app.scene.sky_color(Vec3::X), Vec3::ONE);
    }

    #[test]
    fn invalid_scene_is_rejected_before_rendering() {
        let mut config = tiny_config();
        config.scene.disk_inner_radius = 7.0;
        assert!(App::new(config).is_err());

        let mut config = tiny_config();
        config.integrator.step_size = -1.0;
        assert!(App::new(config).is_err());
    }

    #[test]
    fn camera_past_the_escape_shell_is_rejected() {
        let mut config = tiny_config();
        config.camera.position = [0.0, 15.0, 0.5];
        let err = App::new(config).err().expect("camera outside the shell");
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::CameraOutsideEscapeRadius { .. })
        ));
    }

    #[test_log::test]
    fn render_writes_the_output_file() {
        let dir = scratch_dir("render");
        std::fs::create_dir_all(&dir).unwrap();
        let output = dir.join("result.png");

        let app = App::new(tiny_config()).unwrap();
        let stats = app.render(&output, false).unwrap();
        assert_eq!(stats.rays(), 32 * 18);

        let img = image::open(&output).unwrap().into_rgb8();
        assert_eq!(img.dimensions(), (32, 18));
        // just above the disk band sits the shadow, a top corner is the white sky
        assert_eq!(img.get_pixel(16, 6).0, [0, 0, 0]);
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255]);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test_log::test]
    fn orbit_names_frames_in_order() {
        let dir = scratch_dir("orbit");
        let mut config = tiny_config();
        config.camera.width = 8;
        config.camera.height = 6;
        let app = App::new(config).unwrap();
        let frames = app.orbit(3, &dir).unwrap();
        let names: Vec<_> = frames
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["frame_000.png", "frame_001.png", "frame_002.png"]);
        assert!(frames.iter().all(|p| p.exists()));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test_log::test]
    fn sweep_covers_every_combination() {
        let dir = scratch_dir("sweep");
        let mut config = tiny_config();
        config.camera.width = 8;
        config.camera.height = 6;
        let app = App::new(config).unwrap();
        let files = app.sweep(&[Method::Euler, Method::Am4], &[0.1, 0.05], &dir).unwrap();
        assert_eq!(files.len(), 4);
        assert!(dir.join("result_euler_lambda_0.1.png").exists());
        assert!(dir.join("result_am4_lambda_0.05.png").exists());
        assert!(app.sweep(&[Method::Rk4], &[0.0], &dir).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn render_frame_is_repeatable() {
        let app = App::new(tiny_config()).unwrap();
        let camera = app.config.build_camera();
        let (a, _) = app.render_frame(&camera, Method::Rk4, 0.02);
        let (b, _) = app.render_frame(&camera, Method::Rk4, 0.02);
        assert_eq!((a.width(), a.height()), (32, 18));
        for y in 0..a.height() {
            for x in 0..a.width() {
                assert_eq!(a.get_pixel(x, y), b.get_pixel(x, y));
            }
        }
    }
}
