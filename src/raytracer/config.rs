use crate::raytracer::camera::Camera;
use crate::raytracer::error::ConfigError;
use crate::raytracer::geodesic::{DeflectionLaw, Method};
use crate::raytracer::renderloop::DEFAULT_MAX_STEPS;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Output size presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum Resolution {
    #[value(name = "4k")]
    #[serde(rename = "4k")]
    UltraHd,
    #[value(name = "fhd")]
    #[serde(rename = "fhd")]
    FullHd,
}

impl Resolution {
    pub fn dimensions(self) -> (usize, usize) {
        match self {
            Resolution::UltraHd => (3840, 2160),
            Resolution::FullHd => (1920, 1080),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub look_at: [f32; 3],
    pub up: [f32; 3],
    pub focal_length: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub width: usize,
    pub height: usize,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let (width, height) = Resolution::FullHd.dimensions();
        Self {
            position: [0.0, 3.0, 0.2],
            look_at: [0.0, 0.0, 0.0],
            up: [0.0, 0.0, 1.0],
            focal_length: 1.5,
            fov: 90.0,
            width,
            height,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    pub blackhole_radius: f32,
    pub disk_inner_radius: f32,
    pub disk_outer_radius: f32,
    pub disk_alpha: f32,
    /// Kelvin. Only used when no disk texture is given.
    pub disk_temperature: f32,
    pub escape_radius: f32,
    pub deflection: DeflectionLaw,
    pub sky_texture: Option<PathBuf>,
    /// Degrees about +Z.
    pub sky_rotation: f32,
    pub disk_texture: Option<PathBuf>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            blackhole_radius: 1.0,
            disk_inner_radius: 2.0,
            disk_outer_radius: 6.0,
            disk_alpha: 1.0,
            disk_temperature: 4500.0,
            escape_radius: 10.0,
            deflection: DeflectionLaw::default(),
            sky_texture: None,
            sky_rotation: 0.0,
            disk_texture: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntegratorConfig {
    pub method: Method,
    pub step_size: f32,
    pub max_steps: u32,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            method: Method::Am4,
            step_size: 0.01,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub camera: CameraConfig,
    pub scene: SceneConfig,
    pub integrator: IntegratorConfig,
}

impl RenderConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Camera and integrator checks, including that the camera starts inside
    /// the escape shell. Remaining scene parameters are checked when the
    /// scene is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let camera = &self.camera;
        if camera.width == 0 || camera.height == 0 {
            return Err(ConfigError::InvalidResolution {
                width: camera.width,
                height: camera.height,
            });
        }
        if !(camera.fov > 0.0 && camera.fov < 180.0) {
            return Err(ConfigError::InvalidFieldOfView(camera.fov));
        }
        if !(camera.focal_length.is_finite() && camera.focal_length > 0.0) {
            return Err(ConfigError::InvalidFocalLength(camera.focal_length));
        }
        if Vec3::from(camera.position) == Vec3::from(camera.look_at) {
            return Err(ConfigError::DegenerateCamera);
        }
        // rays launched on or past the shell escape on their first step
        let distance = Vec3::from(camera.position).length();
        if !(distance < self.scene.escape_radius) {
            return Err(ConfigError::CameraOutsideEscapeRadius {
                distance,
                escape: self.scene.escape_radius,
            });
        }

        let integrator = &self.integrator;
        if !(integrator.step_size.is_finite() && integrator.step_size > 0.0) {
            return Err(ConfigError::InvalidStepSize(integrator.step_size));
        }
        if integrator.max_steps == 0 {
            return Err(ConfigError::ZeroMaxSteps);
        }
        Ok(())
    }

    pub fn build_camera(&self) -> Camera {
        let c = &self.camera;
        Camera::new(
            Vec3::from(c.position),
            Vec3::from(c.look_at),
            c.focal_length,
            c.fov,
            c.width,
            c.height,
        )
        .with_up(Vec3::from(c.up))
    }
}
