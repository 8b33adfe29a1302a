//! Random sources for school initialization and exploration.

use rand::prelude::*;

/// Uniform real draws over a closed range.
///
/// The engine owns one source and threads it through every update, so a
/// deterministic source makes a whole run reproducible.
pub trait UniformSource {
    /// Draw a value in `[min, max]`.
    fn uniform(&mut self, min: f64, max: f64) -> f64;

    /// Draw a value in `[bounds.0, bounds.1]`.
    #[inline]
    fn uniform_in(&mut self, bounds: (f64, f64)) -> f64 {
        self.uniform(bounds.0, bounds.1)
    }
}

impl<S: UniformSource + ?Sized> UniformSource for &mut S {
    #[inline]
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        (**self).uniform(min, max)
    }
}

/// Seeded random number generator for the school.
pub struct SchoolRng {
    rng: StdRng,
    seed: u64,
}

impl SchoolRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create with a freshly drawn seed.
    pub fn random() -> Self {
        Self::new(rand::random())
    }

    /// Seed this generator was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl UniformSource for SchoolRng {
    #[inline]
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}

/// Source that always returns the same value, clamped into the requested range.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantSource(pub f64);

impl UniformSource for ConstantSource {
    #[inline]
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        self.0.clamp(min, max)
    }
}
