//! A single fish and its individual movement and feeding rule.

use serde::{Deserialize, Serialize};

use crate::schema::{FeedingConfig, FishSample, Objective, SchoolConfig};

use super::rng::UniformSource;

/// One candidate solution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fish {
    /// Position in the search space.
    pub position: [f64; 2],
    /// Velocity applied on the next update.
    pub velocity: [f64; 2],
    /// Feeding weight. Acts as inertia against social pull.
    pub weight: f64,
    /// Objective value at `position` as of the last update.
    pub last_fitness: f64,
}

impl Fish {
    /// Create a fish and evaluate the objective at its position.
    pub fn new(position: [f64; 2], velocity: [f64; 2], weight: f64, objective: Objective) -> Self {
        Self {
            position,
            velocity,
            weight,
            last_fitness: objective.at(position),
        }
    }

    /// Draw a fish uniformly from the configured ranges.
    ///
    /// Draw order: x, y, vx, vy, weight.
    pub fn random<R: UniformSource + ?Sized>(config: &SchoolConfig, rng: &mut R) -> Self {
        let x = rng.uniform_in(config.bounds.position);
        let y = rng.uniform_in(config.bounds.position);
        let vx = rng.uniform_in(config.bounds.velocity);
        let vy = rng.uniform_in(config.bounds.velocity);
        let weight = rng.uniform(
            config.feeding.initial_weight_min,
            config.feeding.weight_scale,
        );
        Self::new([x, y], [vx, vy], weight, config.objective)
    }

    /// Compute the next state of this fish; `self` is left untouched.
    ///
    /// The position advances by the current velocity. The velocity is then
    /// perturbed, reversed on both axes if the new position left the bounds
    /// on either axis, and damped. Finally the fish feeds at its new
    /// position. The new position itself is never clamped.
    pub fn advanced<R: UniformSource + ?Sized>(&self, config: &SchoolConfig, rng: &mut R) -> Fish {
        let influence = config.movement.influence;
        let mut next = *self;

        for axis in 0..2 {
            next.position[axis] = self.position[axis] + self.velocity[axis];
        }
        for axis in 0..2 {
            next.velocity[axis] = self.velocity[axis] + rng.uniform(-influence, influence);
        }

        if !config.bounds.contains(next.position) {
            next.velocity[0] = -next.velocity[0];
            next.velocity[1] = -next.velocity[1];
        }

        let damping = config.damping();
        next.velocity[0] *= damping;
        next.velocity[1] *= damping;

        next.feed(&config.feeding, config.objective);
        next
    }

    /// Update weight from the change in fitness since the last feeding.
    ///
    /// The raw difference is used, so a worse (higher) fitness adds weight.
    fn feed(&mut self, feeding: &FeedingConfig, objective: Objective) {
        let fitness = objective.at(self.position);
        let delta = feeding.weight_increment * (fitness - self.last_fitness);
        self.weight = feeding.weight_floor.max(self.weight + delta);
        self.last_fitness = fitness;
    }

    /// Euclidean distance to another fish.
    #[inline]
    pub fn distance_to(&self, other: &Fish) -> f64 {
        let dx = self.position[0] - other.position[0];
        let dy = self.position[1] - other.position[1];
        (dx * dx + dy * dy).sqrt()
    }

    /// Render-facing sample.
    #[inline]
    pub fn sample(&self) -> FishSample {
        FishSample {
            x: self.position[0],
            y: self.position[1],
            weight: self.weight,
        }
    }
}
