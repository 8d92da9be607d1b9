mod adams;
mod crossing;
mod euler;
mod leapfrog;
mod rk4;

use crate::raytracer::disk::AccretionDisk;
use crate::raytracer::ray::{Derivative, RayState};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use adams::{AdamsBashforth2, AdamsBashforthMoulton4};
pub use crossing::disk_crossing;
pub use euler::Euler;
pub use leapfrog::Leapfrog;
pub use rk4::RungeKutta4;

/// Radii below this are treated as this when dividing by `r^p`.
const MIN_RADIUS: f32 = 1e-6;
const MIN_DIRECTION_LENGTH_SQ: f32 = 1e-12;

/// What the integration engine needs to know about the world.
pub trait SceneAccess {
    fn blackhole_radius(&self) -> f32;
    fn escape_radius(&self) -> f32;
    fn deflection(&self) -> DeflectionLaw;
    fn disk(&self) -> &AccretionDisk;
    fn sky_color(&self, direction: Vec3) -> Vec3;
    fn disk_color(&self, x: f32, y: f32) -> Vec3;
}

/// Effective radial deflection `dir' = -k * L^2 * pos / r^p`.
///
/// With `k = 1.5`, `p = 5` and the horizon at r = 1 this is the photon
/// equation of motion in Schwarzschild geometry written in Cartesian form.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeflectionLaw {
    pub coefficient: f32,
    pub exponent: i32,
}

impl Default for DeflectionLaw {
    fn default() -> Self {
        Self {
            coefficient: 1.5,
            exponent: 5,
        }
    }
}

impl DeflectionLaw {
    pub fn acceleration(&self, position: Vec3, l_square: f32) -> Vec3 {
        let r = position.length().max(MIN_RADIUS);
        position * (-self.coefficient * l_square / r.powi(self.exponent))
    }
}

/// The right-hand side for one ray: the law with that ray's `L^2` baked in.
#[derive(Clone, Copy, Debug)]
pub struct Dynamics {
    pub law: DeflectionLaw,
    pub l_square: f32,
}

impl Dynamics {
    pub fn new(law: DeflectionLaw, l_square: f32) -> Self {
        Self { law, l_square }
    }

    #[inline]
    pub fn acceleration(&self, position: Vec3) -> Vec3 {
        self.law.acceleration(position, self.l_square)
    }

    #[inline]
    pub fn eval(&self, state: &RayState) -> Derivative {
        Derivative {
            position: state.direction,
            direction: self.acceleration(state.position),
        }
    }
}

/// One step-update strategy. A fresh value is created per ray, so any
/// derivative history lives in `self` and never crosses rays.
pub trait Integrator {
    /// Called once before the first step.
    fn begin(&mut self, state: RayState, _dynamics: &Dynamics, _h: f32) -> RayState {
        state
    }

    fn step(&mut self, state: &RayState, dynamics: &Dynamics, h: f32) -> RayState;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[value(name = "euler")]
    Euler,
    #[value(name = "rk4")]
    Rk4,
    #[value(name = "leapfrog")]
    Leapfrog,
    #[value(name = "ab2")]
    Ab2,
    #[value(name = "am4")]
    Am4,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::Euler,
        Method::Rk4,
        Method::Leapfrog,
        Method::Ab2,
        Method::Am4,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Method::Euler => "euler",
            Method::Rk4 => "rk4",
            Method::Leapfrog => "leapfrog",
            Method::Ab2 => "ab2",
            Method::Am4 => "am4",
        }
    }

    pub fn trace<S: SceneAccess>(self, start: RayState, scene: &S, h: f32, max_steps: u32) -> RayOutcome {
        match self {
            Method::Euler => trace_ray(start, scene, h, max_steps, Euler),
            Method::Rk4 => trace_ray(start, scene, h, max_steps, RungeKutta4),
            Method::Leapfrog => trace_ray(start, scene, h, max_steps, Leapfrog),
            Method::Ab2 => trace_ray(start, scene, h, max_steps, AdamsBashforth2::default()),
            Method::Am4 => trace_ray(start, scene, h, max_steps, AdamsBashforthMoulton4::default()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// `r < blackhole_radius` after a step, or already inside at launch.
    Absorbed,
    /// `r > escape_radius` after a step.
    Escaped,
    /// Iteration cap reached, non-finite state, or zero-length direction.
    Indeterminate,
}

#[derive(Clone, Copy, Debug)]
pub struct RayOutcome {
    pub termination: Termination,
    /// First in-annulus crossing of z = 0.
    pub disk_hit: Option<Vec2>,
    pub disk_crossings: u32,
    pub steps: u32,
    pub state: RayState,
    pub l_square: f32,
}

/// Runs one ray to a terminal state.
///
/// Each iteration proposes a step, tests the segment against the disk plane,
/// commits, then checks the horizon before the escape shell. Both radius
/// tests are strict: a ray sitting exactly on either sphere keeps going.
pub fn trace_ray<S, I>(start: RayState, scene: &S, h: f32, max_steps: u32, mut integrator: I) -> RayOutcome
where
    S: SceneAccess,
    I: Integrator,
{
    let l_square = start.l_square();
    let blackhole_radius = scene.blackhole_radius();
    let escape_radius = scene.escape_radius();
    let disk = scene.disk();

    let mut outcome = RayOutcome {
        termination: Termination::Indeterminate,
        disk_hit: None,
        disk_crossings: 0,
        steps: 0,
        state: start,
        l_square,
    };

    if start.radius() < blackhole_radius {
        outcome.termination = Termination::Absorbed;
        return outcome;
    }
    if start.direction.length_squared() < MIN_DIRECTION_LENGTH_SQ {
        return outcome;
    }

    let dynamics = Dynamics::new(scene.deflection(), l_square);
    let mut state = integrator.begin(start, &dynamics, h);

    outcome.termination = loop {
        if outcome.steps >= max_steps {
            break Termination::Indeterminate;
        }

        let next = integrator.step(&state, &dynamics, h);
        outcome.steps += 1;

        if let Some(hit) = disk_crossing(state.position, next.position, disk) {
            outcome.disk_crossings += 1;
            if outcome.disk_hit.is_none() {
                outcome.disk_hit = Some(hit);
            }
        }

        state = next;

        let r = state.radius();
        if !r.is_finite() || !state.direction.is_finite() {
            break Termination::Indeterminate;
        }
        if r < blackhole_radius {
            break Termination::Absorbed;
        }
        if r > escape_radius {
            break Termination::Escaped;
        }
    };

    outcome.state = state;
    outcome
}

/// Per-batch totals. `max_l_square_drift` is the worst relative change of
/// `L^2` over escaped rays, a cheap accuracy gauge for an integrator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderStats {
    pub absorbed: usize,
    pub escaped: usize,
    pub indeterminate: usize,
    pub disk_hits: usize,
    /// Rays that crossed the disk plane inside the annulus more than once.
    pub repeat_disk_hits: usize,
    pub total_steps: u64,
    pub max_l_square_drift: f32,
}

impl RenderStats {
    pub fn from_outcome(outcome: &RayOutcome) -> Self {
        let mut stats = Self {
            total_steps: outcome.steps as u64,
            disk_hits: outcome.disk_hit.is_some() as usize,
            repeat_disk_hits: (outcome.disk_crossings > 1) as usize,
            ..Self::default()
        };
        match outcome.termination {
            Termination::Absorbed => stats.absorbed = 1,
            Termination::Escaped => {
                stats.escaped = 1;
                if outcome.l_square > 0.0 {
                    stats.max_l_square_drift =
                        (outcome.state.l_square() - outcome.l_square).abs() / outcome.l_square;
                }
            }
            Termination::Indeterminate => stats.indeterminate = 1,
        }
        stats
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            absorbed: self.absorbed + other.absorbed,
            escaped: self.escaped + other.escaped,
            indeterminate: self.indeterminate + other.indeterminate,
            disk_hits: self.disk_hits + other.disk_hits,
            repeat_disk_hits: self.repeat_disk_hits + other.repeat_disk_hits,
            total_steps: self.total_steps + other.total_steps,
            max_l_square_drift: self.max_l_square_drift.max(other.max_l_square_drift),
        }
    }

    pub fn rays(&self) -> usize {
        self.absorbed + self.escaped + self.indeterminate
    }
}
