use super::RenderLoop;
use crate::raytracer::geodesic::{Method, RenderStats, SceneAccess};
use crate::raytracer::ray::{RayBatch, RayState};
use crate::raytracer::shading::resolve_color;
use glam::Vec3;
use rayon::prelude::*;

pub const DEFAULT_MAX_STEPS: u32 = 100_000;

/// Rayon kernel: one task per ray, no shared mutable state between rays.
pub struct ParallelRenderLoop {
    pub max_steps: u32,
}

impl Default for ParallelRenderLoop {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl ParallelRenderLoop {
    pub fn new(max_steps: u32) -> Self {
        Self { max_steps }
    }

    pub fn solve_euler<S: SceneAccess + Sync>(
        &self,
        positions: &mut [Vec3],
        directions: &mut [Vec3],
        colors: &mut [Vec3],
        scene: &S,
        step_size: f32,
    ) -> RenderStats {
        self.solve(Method::Euler, positions, directions, colors, scene, step_size)
    }

    pub fn solve_rk4<S: SceneAccess + Sync>(
        &self,
        positions: &mut [Vec3],
        directions: &mut [Vec3],
        colors: &mut [Vec3],
        scene: &S,
        step_size: f32,
    ) -> RenderStats {
        self.solve(Method::Rk4, positions, directions, colors, scene, step_size)
    }

    pub fn solve_leapfrog<S: SceneAccess + Sync>(
        &self,
        positions: &mut [Vec3],
        directions: &mut [Vec3],
        colors: &mut [Vec3],
        scene: &S,
        step_size: f32,
    ) -> RenderStats {
        self.solve(Method::Leapfrog, positions, directions, colors, scene, step_size)
    }

    pub fn solve_ab2<S: SceneAccess + Sync>(
        &self,
        positions: &mut [Vec3],
        directions: &mut [Vec3],
        colors: &mut [Vec3],
        scene: &S,
        step_size: f32,
    ) -> RenderStats {
        self.solve(Method::Ab2, positions, directions, colors, scene, step_size)
    }

    pub fn solve_am4<S: SceneAccess + Sync>(
        &self,
        positions: &mut [Vec3],
        directions: &mut [Vec3],
        colors: &mut [Vec3],
        scene: &S,
        step_size: f32,
    ) -> RenderStats {
        self.solve(Method::Am4, positions, directions, colors, scene, step_size)
    }

    fn solve<S: SceneAccess + Sync>(
        &self,
        method: Method,
        positions: &mut [Vec3],
        directions: &mut [Vec3],
        colors: &mut [Vec3],
        scene: &S,
        step_size: f32,
    ) -> RenderStats {
        debug_assert_eq!(positions.len(), directions.len());
        debug_assert_eq!(positions.len(), colors.len());
        let max_steps = self.max_steps;

        positions
            .par_iter_mut()
            .zip(directions.par_iter_mut())
            .zip(colors.par_iter_mut())
            .map(|((position, direction), color)| {
                let outcome = method.trace(RayState::new(*position, *direction), scene, step_size, max_steps);
                *color = resolve_color(&outcome, scene);
                *position = outcome.state.position;
                *direction = outcome.state.direction;
                RenderStats::from_outcome(&outcome)
            })
            .reduce(RenderStats::default, RenderStats::merge)
    }

    /// Pure variant: colors for the given initial rays, inputs untouched.
    pub fn integrate<S: SceneAccess + Sync>(
        &self,
        positions: &[Vec3],
        directions: &[Vec3],
        scene: &S,
        step_size: f32,
        method: Method,
    ) -> (Vec<Vec3>, RenderStats) {
        let mut positions = positions.to_vec();
        let mut directions = directions.to_vec();
        let mut colors = vec![Vec3::ZERO; positions.len()];
        let stats = self.dispatch(method, &mut positions, &mut directions, &mut colors, scene, step_size);
        (colors, stats)
    }

    fn dispatch<S: SceneAccess + Sync>(
        &self,
        method: Method,
        positions: &mut [Vec3],
        directions: &mut [Vec3],
        colors: &mut [Vec3],
        scene: &S,
        step_size: f32,
    ) -> RenderStats {
        let stats = match method {
            Method::Euler => self.solve_euler(positions, directions, colors, scene, step_size),
            Method::Rk4 => self.solve_rk4(positions, directions, colors, scene, step_size),
            Method::Leapfrog => self.solve_leapfrog(positions, directions, colors, scene, step_size),
            Method::Ab2 => self.solve_ab2(positions, directions, colors, scene, step_size),
            Method::Am4 => self.solve_am4(positions, directions, colors, scene, step_size),
        };
        if stats.indeterminate > 0 {
            log::warn!(
                "{} of {} rays ended indeterminate (non-finite or past the {}-step cap), drawn black",
                stats.indeterminate,
                stats.rays(),
                self.max_steps
            );
        }
        stats
    }
}

impl RenderLoop for ParallelRenderLoop {
    fn render_pass<S>(&self, batch: &mut RayBatch, scene: &S, method: Method, step_size: f32) -> RenderStats
    where
        S: SceneAccess + Sync,
    {
        self.dispatch(
            method,
            &mut batch.positions,
            &mut batch.directions,
            &mut batch.colors,
            scene,
            step_size,
        )
    }
}
