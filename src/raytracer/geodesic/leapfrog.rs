use super::{Dynamics, Integrator};
use crate::raytracer::ray::RayState;

/// Kick-drift leapfrog. The direction is advanced half a step up front, so
/// every committed direction sits at `t + h/2` relative to its position.
pub struct Leapfrog;

impl Integrator for Leapfrog {
    fn begin(&mut self, state: RayState, dynamics: &Dynamics, h: f32) -> RayState {
        let direction = state.direction + dynamics.acceleration(state.position) * (h * 0.5);
        RayState::new(state.position, direction)
    }

    fn step(&mut self, state: &RayState, dynamics: &Dynamics, h: f32) -> RayState {
        let position = state.position + state.direction * h;
        let direction = state.direction + dynamics.acceleration(position) * h;
        RayState::new(position, direction)
    }
}
