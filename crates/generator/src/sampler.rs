use crate::error::GeneratorError;
use core_types::PRICE_DP;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rand_pcg::Pcg64;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::ops::RangeInclusive;

/// A seeded source of the draws every dataset needs.
pub struct Sampler {
    rng: Pcg64,
}

impl Sampler {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    /// Picks one element uniformly.
    pub fn choose<'a, T>(&mut self, what: &'static str, items: &'a [T]) -> Result<&'a T, GeneratorError> {
        if items.is_empty() {
            return Err(GeneratorError::EmptyCategory(what));
        }
        Ok(&items[self.rng.gen_range(0..items.len())])
    }

    /// A uniform integer in the inclusive range.
    pub fn int<T>(&mut self, range: RangeInclusive<T>) -> T
    where
        T: rand::distributions::uniform::SampleUniform + PartialOrd,
    {
        self.rng.gen_range(range)
    }

    /// Draws from `dist` and rounds to a two-decimal-place price.
    pub fn price(&mut self, dist: &Normal<f64>) -> Result<Decimal, GeneratorError> {
        let value = dist.sample(&mut self.rng);
        Decimal::from_f64(value)
            .map(|d| d.round_dp(PRICE_DP))
            .ok_or(GeneratorError::NonFinitePrice(value))
    }
}
