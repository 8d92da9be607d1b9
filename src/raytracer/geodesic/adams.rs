use super::{Dynamics, Integrator};
use crate::raytracer::ray::{Derivative, RayState};

/// Fixed-length derivative history, oldest first.
///
/// `push` shifts everything one slot toward the front and writes the new
/// value at the back, so after `N` pushes the buffer always holds the last
/// `N` evaluations.
#[derive(Clone, Copy, Debug)]
pub struct History<const N: usize> {
    entries: [Derivative; N],
    len: usize,
}

impl<const N: usize> Default for History<N> {
    fn default() -> Self {
        Self {
            entries: [Derivative::default(); N],
            len: 0,
        }
    }
}

impl<const N: usize> History<N> {
    pub fn push(&mut self, value: Derivative) {
        self.entries.copy_within(1.., 0);
        self.entries[N - 1] = value;
        self.len = (self.len + 1).min(N);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// `back(0)` is the newest entry, `back(1)` the one before it.
    #[inline]
    pub fn back(&self, k: usize) -> Derivative {
        debug_assert!(k < self.len);
        self.entries[N - 1 - k]
    }
}

fn bashforth(history: &History<4>, order: usize) -> Derivative {
    let f = |k| history.back(k);
    match order {
        1 => f(0),
        2 => f(0) * 1.5 + f(1) * -0.5,
        3 => (f(0) * 23.0 + f(1) * -16.0 + f(2) * 5.0) * (1.0 / 12.0),
        _ => (f(0) * 55.0 + f(1) * -59.0 + f(2) * 37.0 + f(3) * -9.0) * (1.0 / 24.0),
    }
}

/// Two-step Adams-Bashforth. The first step has only one derivative on
/// record and falls back to forward Euler.
#[derive(Default)]
pub struct AdamsBashforth2 {
    history: History<2>,
}

impl Integrator for AdamsBashforth2 {
    fn step(&mut self, state: &RayState, dynamics: &Dynamics, h: f32) -> RayState {
        self.history.push(dynamics.eval(state));
        let rate = if self.history.len() < 2 {
            self.history.back(0)
        } else {
            self.history.back(0) * 1.5 + self.history.back(1) * -0.5
        };
        state.advance(rate, h)
    }
}

/// Four-step Adams-Bashforth predictor with an Adams-Moulton corrector
/// (PECE). Bootstraps through AB1, AB2 and AB3 while the history fills.
#[derive(Default)]
pub struct AdamsBashforthMoulton4 {
    history: History<4>,
}

impl Integrator for AdamsBashforthMoulton4 {
    fn step(&mut self, state: &RayState, dynamics: &Dynamics, h: f32) -> RayState {
        self.history.push(dynamics.eval(state));
        let order = self.history.len();
        let predicted = state.advance(bashforth(&self.history, order), h);
        if order < 4 {
            return predicted;
        }

        let f = |k| self.history.back(k);
        let corrector = (dynamics.eval(&predicted) * 9.0 + f(0) * 19.0 + f(1) * -5.0 + f(2))
            * (1.0 / 24.0);
        state.advance(corrector, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raytracer::geodesic::{DeflectionLaw, RungeKutta4};
    use glam::Vec3;

    fn tagged(tag: f32) -> Derivative {
        Derivative {
            position: Vec3::splat(tag),
            direction: Vec3::ZERO,
        }
    }

    #[test]
    fn history_evicts_oldest_first() {
        let mut history = History::<3>::default();
        assert_eq!(history.len(), 0);
        for tag in 1..=5 {
            history.push(tagged(tag as f32));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.back(0), tagged(5.0));
        assert_eq!(history.back(1), tagged(4.0));
        assert_eq!(history.back(2), tagged(3.0));
    }

    #[test]
    fn history_len_tracks_partial_fill() {
        let mut history = History::<4>::default();
        history.push(tagged(1.0));
        history.push(tagged(2.0));
        assert_eq!(history.len(), 2);
        assert_eq!(history.back(0), tagged(2.0));
        assert_eq!(history.back(1), tagged(1.0));
    }

    #[test]
    fn bashforth_weights_sum_to_one() {
        let mut history = History::<4>::default();
        for _ in 0..4 {
            history.push(tagged(1.0));
        }
        for order in 1..=4 {
            let rate = bashforth(&history, order);
            assert!((rate.position - Vec3::ONE).length() < 1e-6, "order {order}");
        }
    }

    #[test]
    fn first_ab2_step_is_forward_euler() {
        let start = RayState::new(Vec3::new(3.0, 0.0, 0.0), Vec3::Y);
        let dynamics = Dynamics::new(DeflectionLaw::default(), start.l_square());
        let mut ab2 = AdamsBashforth2::default();
        let next = ab2.step(&start, &dynamics, 0.1);
        assert_eq!(next, start.advance(dynamics.eval(&start), 0.1));
    }

    #[test]
    fn multistep_methods_track_rk4() {
        let start = RayState::new(Vec3::new(4.0, 0.0, 0.3), Vec3::new(0.0, 1.0, 0.0));
        let dynamics = Dynamics::new(DeflectionLaw::default(), start.l_square());
        let h = 0.01;

        let mut rk = start;
        let mut ab2_state = start;
        let mut am4_state = start;
        let mut ab2 = AdamsBashforth2::default();
        let mut am4 = AdamsBashforthMoulton4::default();
        for _ in 0..300 {
            rk = RungeKutta4.step(&rk, &dynamics, h);
            ab2_state = ab2.step(&ab2_state, &dynamics, h);
            am4_state = am4.step(&am4_state, &dynamics, h);
        }
        let ab2_err = (ab2_state.position - rk.position).length();
        let am4_err = (am4_state.position - rk.position).length();
        assert!(ab2_err < 1e-3, "ab2 error {ab2_err}");
        assert!(am4_err < 1e-4, "am4 error {am4_err}");
    }
}
