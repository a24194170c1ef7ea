//! Random sources for the sampling estimator.
//!
//! The sampler only ever needs one capability: a uniform draw from `[0, 1)`.
//! [`RandomSource`] captures that, so production code can plug in any
//! [`rand::Rng`] through [`RngSource`] and tests can replay an exact sequence
//! through [`FixedSequence`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Something that produces uniform values in `[0, 1)`.
pub trait RandomSource {
    /// Next value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

/// Adapter turning any [`rand::Rng`] into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    /// Wrap an existing generator.
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// Reproducible source seeded from `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Source seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}

/// Replays a fixed list of draws, cycling when it runs out.
///
/// Values are clamped into `[0, 1)` so a hand-written sequence cannot push
/// the sampler outside its contract.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    values: Vec<f64>,
    cursor: usize,
}

impl FixedSequence {
    /// Create a sequence. An empty list replays `0.0` forever.
    #[must_use]
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Number of draws taken so far.
    #[must_use]
    pub const fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for FixedSequence {
    fn next_unit(&mut self) -> f64 {
        let value = if self.values.is_empty() {
            0.0
        } else {
            self.values[self.cursor % self.values.len()]
        };
        self.cursor += 1;
        if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 1.0 - f64::EPSILON)
        }
    }
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}
