//! The school: an ordered, fixed-size population coupled by social attraction.

use rayon::prelude::*;

use crate::schema::{FrameSnapshot, MovementConfig, SchoolConfig};

use super::fish::Fish;
use super::rng::UniformSource;

/// Ordered collection of fish. Size is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct School {
    fish: Vec<Fish>,
}

impl School {
    /// Create a school from existing fish, preserving their order.
    pub fn new(fish: Vec<Fish>) -> Self {
        Self { fish }
    }

    /// Draw `config.population.size` fish from the configured ranges.
    pub fn random<R: UniformSource + ?Sized>(config: &SchoolConfig, rng: &mut R) -> Self {
        let fish = (0..config.population.size)
            .map(|_| Fish::random(config, rng))
            .collect();
        Self { fish }
    }

    pub fn len(&self) -> usize {
        self.fish.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fish.is_empty()
    }

    /// Fish in school order.
    pub fn fish(&self) -> &[Fish] {
        &self.fish
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fish> {
        self.fish.iter()
    }

    /// Velocity of fish `index` after attraction to every neighbor closer
    /// than the school radius.
    ///
    /// Each neighbor `j` adds `social * (p_j - p_i) / w_j` per axis, so
    /// heavier neighbors pull less. Contributions are added in school order
    /// starting from the fish's current velocity.
    pub fn social_velocity(&self, index: usize, movement: &MovementConfig) -> [f64; 2] {
        let this = &self.fish[index];
        let mut velocity = this.velocity;

        for (j, other) in self.fish.iter().enumerate() {
            if j == index {
                continue;
            }
            if this.distance_to(other) < movement.school_radius {
                for axis in 0..2 {
                    velocity[axis] +=
                        movement.social * (other.position[axis] - this.position[axis]) / other.weight;
                }
            }
        }

        velocity
    }

    /// Social velocities for every fish, read from the current state only.
    ///
    /// The parallel path yields bit-identical results to the sequential one.
    pub fn social_pass(&self, movement: &MovementConfig, parallel: bool) -> Vec<[f64; 2]> {
        if parallel {
            (0..self.fish.len())
                .into_par_iter()
                .map(|i| self.social_velocity(i, movement))
                .collect()
        } else {
            (0..self.fish.len())
                .map(|i| self.social_velocity(i, movement))
                .collect()
        }
    }

    /// Advance the whole school by one generation.
    ///
    /// Social velocities for all fish are computed from the start-of-iteration
    /// state before any fish moves; individual updates then run in school
    /// order, drawing from `rng` in that order.
    pub fn update<R: UniformSource + ?Sized>(&mut self, config: &SchoolConfig, rng: &mut R) {
        let velocities = self.social_pass(&config.movement, config.parallel);

        for (fish, velocity) in self.fish.iter_mut().zip(velocities) {
            fish.velocity = velocity;
            *fish = fish.advanced(config, rng);
        }
    }

    /// Read-only view for renderers.
    pub fn snapshot(&self, iteration: usize) -> FrameSnapshot {
        FrameSnapshot {
            iteration,
            fish: self.fish.iter().map(Fish::sample).collect(),
        }
    }

    /// Fish with the lowest last fitness.
    pub fn best(&self) -> Option<&Fish> {
        self.fish
            .iter()
            .min_by(|a, b| a.last_fitness.total_cmp(&b.last_fitness))
    }

    /// Mean last fitness, 0 for an empty school.
    pub fn avg_fitness(&self) -> f64 {
        self.mean(|f| f.last_fitness)
    }

    /// Mean weight, 0 for an empty school.
    pub fn avg_weight(&self) -> f64 {
        self.mean(|f| f.weight)
    }

    fn mean(&self, value: impl Fn(&Fish) -> f64) -> f64 {
        if self.fish.is_empty() {
            return 0.0;
        }
        self.fish.iter().map(value).sum::<f64>() / self.fish.len() as f64
    }
}
