mod parallel;

use crate::raytracer::geodesic::{Method, RenderStats, SceneAccess};
use crate::raytracer::ray::RayBatch;

pub use parallel::{ParallelRenderLoop, DEFAULT_MAX_STEPS};

pub trait RenderLoop {
    /// Integrates every ray in `batch` with `method`, writing colors and
    /// final ray states back in place.
    fn render_pass<S>(&self, batch: &mut RayBatch, scene: &S, method: Method, step_size: f32) -> RenderStats
    where
        S: SceneAccess + Sync;
}
