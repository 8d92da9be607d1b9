mod raytracer;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use raytracer::config::{RenderConfig, Resolution};
use raytracer::geodesic::Method;
use raytracer::App;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Gravitational lensing ray tracer for a Schwarzschild black hole")]
struct Cli {
    /// JSON render configuration; flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a single frame
    Render {
        #[command(flatten)]
        overrides: Overrides,

        #[arg(short, long, default_value = "result.png")]
        output: PathBuf,

        /// Open a preview window after saving
        #[arg(long)]
        show: bool,
    },
    /// Render frames while circling the camera around the z axis
    Orbit {
        #[command(flatten)]
        overrides: Overrides,

        #[arg(long, default_value_t = 600)]
        frames: usize,

        #[arg(long, default_value = "frames")]
        output_dir: PathBuf,
    },
    /// Render one image per integrator and step size
    Sweep {
        #[command(flatten)]
        overrides: Overrides,

        #[arg(long, value_enum, value_delimiter = ',', default_values_t = Method::ALL)]
        methods: Vec<Method>,

        #[arg(long, value_delimiter = ',', default_values_t = [0.1, 0.05, 0.01, 0.001])]
        step_sizes: Vec<f32>,

        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
}

#[derive(Args)]
struct Overrides {
    /// Camera position
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    pov: Option<Vec<f32>>,

    /// Focal length
    #[arg(long)]
    focal: Option<f32>,

    /// Vertical field of view in degrees
    #[arg(long)]
    fov: Option<f32>,

    #[arg(long, value_enum)]
    resolution: Option<Resolution>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,

    /// Equirectangular sky image
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Accretion disk image, u = azimuth, v = radius
    #[arg(long)]
    disk_texture: Option<PathBuf>,

    #[arg(long, value_enum)]
    integrator: Option<Method>,

    #[arg(long)]
    step_size: Option<f32>,

    #[arg(long)]
    max_steps: Option<u32>,

    /// Accretion disk inner radius
    #[arg(long)]
    ar1: Option<f32>,

    /// Accretion disk outer radius
    #[arg(long)]
    ar2: Option<f32>,
}

impl Overrides {
    fn apply(&self, config: &mut RenderConfig) {
        if let Some(pov) = &self.pov {
            config.camera.position = [pov[0], pov[1], pov[2]];
        }
        if let Some(focal) = self.focal {
            config.camera.focal_length = focal;
        }
        if let Some(fov) = self.fov {
            config.camera.fov = fov;
        }
        if let Some(resolution) = self.resolution {
            (config.camera.width, config.camera.height) = resolution.dimensions();
        }
        if let Some(width) = self.width {
            config.camera.width = width;
        }
        if let Some(height) = self.height {
            config.camera.height = height;
        }
        if let Some(texture) = &self.texture {
            config.scene.sky_texture = Some(texture.clone());
        }
        if let Some(texture) = &self.disk_texture {
            config.scene.disk_texture = Some(texture.clone());
        }
        if let Some(method) = self.integrator {
            config.integrator.method = method;
        }
        if let Some(h) = self.step_size {
            config.integrator.step_size = h;
        }
        if let Some(max_steps) = self.max_steps {
            config.integrator.max_steps = max_steps;
        }
        if let Some(r1) = self.ar1 {
            config.scene.disk_inner_radius = r1;
        }
        if let Some(r2) = self.ar2 {
            config.scene.disk_outer_radius = r2;
        }
    }
}

fn build_app(config_path: Option<&PathBuf>, overrides: &Overrides) -> Result<App> {
    let mut config = match config_path {
        Some(path) => RenderConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => RenderConfig::default(),
    };
    overrides.apply(&mut config);
    App::new(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match &cli.command {
        Command::Render {
            overrides,
            output,
            show,
        } => {
            let app = build_app(cli.config.as_ref(), overrides)?;
            let stats = app.render(output, *show)?;
            log::info!(
                "{} rays: {} escaped, {} absorbed, {} hit the disk",
                stats.rays(),
                stats.escaped,
                stats.absorbed,
                stats.disk_hits
            );
        }
        Command::Orbit {
            overrides,
            frames,
            output_dir,
        } => {
            let app = build_app(cli.config.as_ref(), overrides)?;
            let written = app.orbit(*frames, output_dir)?;
            log::info!("Wrote {} frames to {}", written.len(), output_dir.display());
        }
        Command::Sweep {
            overrides,
            methods,
            step_sizes,
            output_dir,
        } => {
            let app = build_app(cli.config.as_ref(), overrides)?;
            let written = app.sweep(methods, step_sizes, output_dir)?;
            log::info!("Wrote {} images to {}", written.len(), output_dir.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "lensing", "render", "--pov", "1", "-4", "0.5", "--resolution", "4k", "--integrator", "rk4",
            "--ar1", "2.5", "--step-size", "0.05",
        ]);
        let Command::Render { overrides, output, show } = cli.command else {
            panic!("expected render");
        };
        let mut config = RenderConfig::default();
        overrides.apply(&mut config);
        assert_eq!(config.camera.position, [1.0, -4.0, 0.5]);
        assert_eq!((config.camera.width, config.camera.height), (3840, 2160));
        assert_eq!(config.integrator.method, Method::Rk4);
        assert_eq!(config.integrator.step_size, 0.05);
        assert_eq!(config.scene.disk_inner_radius, 2.5);
        assert_eq!(config.scene.disk_outer_radius, 6.0);
        assert_eq!(output, PathBuf::from("result.png"));
        assert!(!show);
    }

    #[test]
    fn explicit_size_wins_over_preset() {
        let cli = Cli::parse_from(["lensing", "orbit", "--resolution", "fhd", "--width", "640", "--frames", "10"]);
        let Command::Orbit { overrides, frames, output_dir } = cli.command else {
            panic!("expected orbit");
        };
        let mut config = RenderConfig::default();
        overrides.apply(&mut config);
        assert_eq!((config.camera.width, config.camera.height), (640, 1080));
        assert_eq!(frames, 10);
        assert_eq!(output_dir, PathBuf::from("frames"));
    }

    #[test]
    fn sweep_defaults_cover_all_methods() {
        let cli = Cli::parse_from(["lensing", "sweep"]);
        let Command::Sweep { methods, step_sizes, .. } = cli.command else {
            panic!("expected sweep");
        };
        assert_eq!(methods, Method::ALL.to_vec());
        assert_eq!(step_sizes, vec![0.1, 0.05, 0.01, 0.001]);

        let cli = Cli::parse_from(["lensing", "--config", "a.json", "sweep", "--methods", "euler,am4", "--step-sizes", "0.2"]);
        let Command::Sweep { methods, step_sizes, .. } = cli.command else {
            panic!("expected sweep");
        };
        assert_eq!(cli.config, Some(PathBuf::from("a.json")));
        assert_eq!(methods, vec![Method::Euler, Method::Am4]);
        assert_eq!(step_sizes, vec![0.2]);
    }
}
