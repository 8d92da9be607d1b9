use glam::Vec3;
use std::ops::{Add, Mul};

/// Position and (unnormalized) direction of a photon between steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayState {
    pub position: Vec3,
    pub direction: Vec3,
}

impl RayState {
    pub fn new(position: Vec3, direction: Vec3) -> Self {
        Self {
            position,
            direction,
        }
    }

    pub fn radius(&self) -> f32 {
        self.position.length()
    }

    /// Squared orbital angular momentum `|pos x dir|^2`.
    pub fn l_square(&self) -> f32 {
        self.position.cross(self.direction).length_squared()
    }

    pub fn advance(&self, rate: Derivative, h: f32) -> Self {
        Self {
            position: self.position + rate.position * h,
            direction: self.direction + rate.direction * h,
        }
    }
}

/// Time derivative of a [`RayState`]: `(pos', dir')`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Derivative {
    pub position: Vec3,
    pub direction: Vec3,
}

impl Add for Derivative {
    type Output = Derivative;

    fn add(self, rhs: Derivative) -> Derivative {
        Derivative {
            position: self.position + rhs.position,
            direction: self.direction + rhs.direction,
        }
    }
}

impl Mul<f32> for Derivative {
    type Output = Derivative;

    fn mul(self, rhs: f32) -> Derivative {
        Derivative {
            position: self.position * rhs,
            direction: self.direction * rhs,
        }
    }
}

/// Per-pixel ray arrays for one frame, row-major with `y = 0` at the top.
pub struct RayBatch {
    pub width: usize,
    pub height: usize,
    pub positions: Vec<Vec3>,
    pub directions: Vec<Vec3>,
    pub colors: Vec<Vec3>,
}

impl RayBatch {
    pub fn new(width: usize, height: usize, positions: Vec<Vec3>, directions: Vec<Vec3>) -> Self {
        debug_assert_eq!(positions.len(), width * height);
        debug_assert_eq!(directions.len(), width * height);
        Self {
            width,
            height,
            positions,
            directions,
            colors: vec![Vec3::ZERO; width * height],
        }
    }

    pub fn len(&self) -> usize {
        self.width * self.height
    }
}
