use super::{Dynamics, Integrator};
use crate::raytracer::ray::RayState;

/// Classical four-stage Runge-Kutta on `(pos' = dir, dir' = f(pos))`.
pub struct RungeKutta4;

impl Integrator for RungeKutta4 {
    fn step(&mut self, state: &RayState, dynamics: &Dynamics, h: f32) -> RayState {
        let k1 = dynamics.eval(state);
        let k2 = dynamics.eval(&state.advance(k1, h * 0.5));
        let k3 = dynamics.eval(&state.advance(k2, h * 0.5));
        let k4 = dynamics.eval(&state.advance(k3, h));
        state.advance(k1 + k2 * 2.0 + k3 * 2.0 + k4, h / 6.0)
    }
}
