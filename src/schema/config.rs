//! Configuration types for Fish School Search runs.

use serde::{Deserialize, Serialize};

use super::Objective;

/// Top-level configuration for a Fish School Search run.
///
/// All values are fixed at start; the engine never mutates its config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolConfig {
    /// Population and iteration settings.
    #[serde(default)]
    pub population: PopulationConfig,
    /// Position and velocity bounds.
    #[serde(default)]
    pub bounds: BoundsConfig,
    /// Individual and social movement coefficients.
    #[serde(default)]
    pub movement: MovementConfig,
    /// Weight (feeding) parameters.
    #[serde(default)]
    pub feeding: FeedingConfig,
    /// Objective function to minimize.
    #[serde(default)]
    pub objective: Objective,
    /// Random seed for reproducibility. `None` draws a fresh seed at start.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Compute the social pass on the rayon thread pool.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for SchoolConfig {
    fn default() -> Self {
        Self {
            population: PopulationConfig::default(),
            bounds: BoundsConfig::default(),
            movement: MovementConfig::default(),
            feeding: FeedingConfig::default(),
            objective: Objective::default(),
            random_seed: None,
            parallel: false,
        }
    }
}

/// Population size and iteration count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Number of fish in the school.
    #[serde(default = "default_population_size")]
    pub size: usize,
    /// Number of generations to run. There is no early exit.
    #[serde(default = "default_iterations")]
    pub iterations: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: default_population_size(),
            iterations: default_iterations(),
        }
    }
}

fn default_population_size() -> usize {
    100
}
fn default_iterations() -> usize {
    1000
}

/// Search-space bounds, applied identically to both axes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundsConfig {
    /// Position range (min, max).
    #[serde(default = "default_position_bounds")]
    pub position: (f64, f64),
    /// Initial velocity range (min, max).
    #[serde(default = "default_velocity_bounds")]
    pub velocity: (f64, f64),
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            position: default_position_bounds(),
            velocity: default_velocity_bounds(),
        }
    }
}

impl BoundsConfig {
    /// Whether a point lies inside the position rectangle (inclusive).
    #[inline]
    pub fn contains(&self, position: [f64; 2]) -> bool {
        let (min, max) = self.position;
        position.iter().all(|&v| v >= min && v <= max)
    }
}

fn default_position_bounds() -> (f64, f64) {
    (-5.0, 10.0)
}
fn default_velocity_bounds() -> (f64, f64) {
    (-1.0, 1.0)
}

/// Coefficients for individual and collective movement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementConfig {
    /// Half-width of the uniform velocity perturbation.
    #[serde(default = "default_influence")]
    pub influence: f64,
    /// Social attraction coefficient.
    #[serde(default = "default_social")]
    pub social: f64,
    /// Fraction of velocity removed every update (0.0-1.0).
    #[serde(default = "default_velocity_decrement")]
    pub velocity_decrement: f64,
    /// Neighbors strictly closer than this attract each other.
    #[serde(default = "default_school_radius")]
    pub school_radius: f64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            influence: default_influence(),
            social: default_social(),
            velocity_decrement: default_velocity_decrement(),
            school_radius: default_school_radius(),
        }
    }
}

fn default_influence() -> f64 {
    0.01
}
fn default_social() -> f64 {
    0.1
}
fn default_velocity_decrement() -> f64 {
    0.05
}
fn default_school_radius() -> f64 {
    2.0
}

/// Feeding (weight update) parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedingConfig {
    /// Upper end of the initial weight range.
    #[serde(default = "default_weight_scale")]
    pub weight_scale: f64,
    /// Lower end of the initial weight range.
    #[serde(default = "default_initial_weight_min")]
    pub initial_weight_min: f64,
    /// Multiplier applied to the fitness change on every feeding.
    #[serde(default = "default_weight_increment")]
    pub weight_increment: f64,
    /// Minimum weight after feeding. Never below `weight_scale`.
    #[serde(default = "default_weight_floor")]
    pub weight_floor: f64,
}

impl Default for FeedingConfig {
    fn default() -> Self {
        Self {
            weight_scale: default_weight_scale(),
            initial_weight_min: default_initial_weight_min(),
            weight_increment: default_weight_increment(),
            weight_floor: default_weight_floor(),
        }
    }
}

fn default_weight_scale() -> f64 {
    1.0
}
fn default_initial_weight_min() -> f64 {
    0.1
}
fn default_weight_increment() -> f64 {
    0.01
}
fn default_weight_floor() -> f64 {
    1.0
}

impl SchoolConfig {
    /// Damping factor applied to velocity after every individual update.
    #[inline]
    pub fn damping(&self) -> f64 {
        1.0 - self.movement.velocity_decrement
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population.size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }

        let check_bounds = |bounds: (f64, f64), name: &'static str| {
            if !bounds.0.is_finite() || !bounds.1.is_finite() || bounds.0 > bounds.1 {
                Err(ConfigError::InvalidBounds {
                    name,
                    min: bounds.0,
                    max: bounds.1,
                })
            } else {
                Ok(())
            }
        };

        check_bounds(self.bounds.position, "position")?;
        check_bounds(self.bounds.velocity, "velocity")?;

        let movement = &self.movement;
        if !(movement.influence >= 0.0 && movement.influence.is_finite()) {
            return Err(ConfigError::InvalidCoefficient {
                name: "influence",
                value: movement.influence,
            });
        }
        if !movement.social.is_finite() {
            return Err(ConfigError::InvalidCoefficient {
                name: "social",
                value: movement.social,
            });
        }
        if !(0.0..=1.0).contains(&movement.velocity_decrement) {
            return Err(ConfigError::InvalidCoefficient {
                name: "velocity_decrement",
                value: movement.velocity_decrement,
            });
        }
        if !(movement.school_radius >= 0.0) {
            return Err(ConfigError::InvalidCoefficient {
                name: "school_radius",
                value: movement.school_radius,
            });
        }

        let feeding = &self.feeding;
        if !(feeding.initial_weight_min > 0.0) {
            return Err(ConfigError::NonPositiveWeight(feeding.initial_weight_min));
        }
        check_bounds(
            (feeding.initial_weight_min, feeding.weight_scale),
            "initial_weight",
        )?;
        if !feeding.weight_increment.is_finite() {
            return Err(ConfigError::InvalidCoefficient {
                name: "weight_increment",
                value: feeding.weight_increment,
            });
        }
        if !(feeding.weight_floor >= feeding.weight_scale) {
            return Err(ConfigError::WeightFloorBelowScale {
                floor: feeding.weight_floor,
                scale: feeding.weight_scale,
            });
        }

        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Population size must be non-zero")]
    EmptyPopulation,
    #[error("Invalid {name} bounds: min ({min}) must be finite and not exceed max ({max})")]
    InvalidBounds {
        name: &'static str,
        min: f64,
        max: f64,
    },
    #[error("Invalid {name} coefficient: {value}")]
    InvalidCoefficient { name: &'static str, value: f64 },
    #[error("Initial weights must be positive, got minimum {0}")]
    NonPositiveWeight(f64),
    #[error("Weight floor ({floor}) must not be below the weight scale ({scale})")]
    WeightFloorBelowScale { floor: f64, scale: f64 },
}
