use super::{Dynamics, Integrator};
use crate::raytracer::ray::RayState;

/// Position first, then the direction kicked by the force at the *new*
/// position (semi-implicit Euler).
pub struct Euler;

impl Integrator for Euler {
    fn step(&mut self, state: &RayState, dynamics: &Dynamics, h: f32) -> RayState {
        let position = state.position + state.direction * h;
        let direction = state.direction + dynamics.acceleration(position) * h;
        RayState::new(position, direction)
    }
}
