//! Objective functions minimized by the school.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Benchmark objective functions over a 2D point. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type")]
pub enum Objective {
    /// `(1 - x)^2 + 100 (y - x^2)^2`, minimum 0 at (1, 1).
    #[default]
    Rosenbrock,
    /// `x^2 + y^2`, minimum 0 at the origin.
    Sphere,
    /// Rastrigin with A = 10, minimum 0 at the origin.
    Rastrigin,
    /// Himmelblau, four minima of 0; (3, 2) is reported.
    Himmelblau,
}

impl Objective {
    /// Evaluate the objective at `(x, y)`.
    #[inline]
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        match self {
            Self::Rosenbrock => (1.0 - x).powi(2) + 100.0 * (y - x * x).powi(2),
            Self::Sphere => x * x + y * y,
            Self::Rastrigin => {
                20.0 + (x * x - 10.0 * (2.0 * PI * x).cos()) + (y * y - 10.0 * (2.0 * PI * y).cos())
            }
            Self::Himmelblau => (x * x + y - 11.0).powi(2) + (x + y * y - 7.0).powi(2),
        }
    }

    /// Evaluate the objective at a position.
    #[inline]
    pub fn at(&self, position: [f64; 2]) -> f64 {
        self.evaluate(position[0], position[1])
    }

    /// A known global minimizer.
    pub fn minimum(&self) -> [f64; 2] {
        match self {
            Self::Rosenbrock => [1.0, 1.0],
            Self::Sphere | Self::Rastrigin => [0.0, 0.0],
            Self::Himmelblau => [3.0, 2.0],
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rosenbrock => "Rosenbrock",
            Self::Sphere => "Sphere",
            Self::Rastrigin => "Rastrigin",
            Self::Himmelblau => "Himmelblau",
        }
    }
}
