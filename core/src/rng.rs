//! Deterministic random number generation.
//!
//! RULE: Nothing in the generator may touch a platform RNG.
//! Every draw flows through one SeededRng instance, passed explicitly
//! down the call chain, so the entire dataset is reproducible from the
//! seed alone and generation is reentrant.
//!
//! The generator is the Park–Miller "minimal standard" multiplicative
//! LCG: modulus 2^31 - 1 (a Mersenne prime), multiplier 16807.
//! Downstream determinism also depends on draws being issued in a
//! fixed order; see dataset.rs for the documented iteration order.

use crate::error::{CoreError, CoreResult};

const MODULUS: u64 = 2_147_483_647; // 2^31 - 1
const MULTIPLIER: u64 = 16_807;

/// Seeded Park–Miller generator. Same seed, same sequence, every run.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// The seed must be non-zero modulo 2^31 - 1; a zero state would
    /// make the generator emit zeros forever.
    pub fn new(seed: u64) -> CoreResult<Self> {
        let state = seed % MODULUS;
        if state == 0 {
            return Err(CoreError::ZeroSeed);
        }
        Ok(Self { state })
    }

    /// Uniform draw in [0, 1). The state ranges over [1, 2^31 - 2], so
    /// the numerator tops out one below the divisor and 1.0 is never
    /// reached.
    pub fn next(&mut self) -> f64 {
        self.state = (self.state * MULTIPLIER) % MODULUS;
        (self.state - 1) as f64 / (MODULUS - 1) as f64
    }

    /// Uniform float in [min, max).
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next() * (max - min)
    }

    /// Uniform integer in [min, max] inclusive.
    pub fn int(&mut self, min: i64, max: i64) -> i64 {
        (min as f64 + self.next() * ((max - min + 1) as f64)).floor() as i64
    }

    /// Uniform choice from a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        assert!(!items.is_empty(), "pick() on empty slice");
        &items[self.int(0, items.len() as i64 - 1) as usize]
    }

    /// Normal draw via the Box–Muller transform.
    /// Always consumes exactly two uniform draws.
    pub fn gaussian(&mut self, mean: f64, std: f64) -> f64 {
        let u1 = self.next();
        let u2 = self.next();
        let z = (-2.0 * u1.max(f64::MIN_POSITIVE).ln()).sqrt()
            * (2.0 * std::f64::consts::PI * u2).cos();
        mean + z * std
    }
}
