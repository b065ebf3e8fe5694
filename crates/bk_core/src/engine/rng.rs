//! # Sampling Provider
//!
//! 모든 확률 샘플링은 `Sampler` 트레이트를 통해 주입된다.
//! The engine never touches a global RNG: a game is fully determined by its
//! inputs and the sampler it was built with.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};
use tracing::warn;

/// Rejection attempts before `trunc_gauss` gives up and clamps
const TRUNC_GAUSS_MAX_TRIES: usize = 100;

pub trait Sampler {
    /// Uniform draw in [0, 1)
    fn random(&mut self) -> f64;

    /// Normal draw
    fn gauss(&mut self, mu: f64, sigma: f64) -> f64;

    fn uniform(&mut self, a: f64, b: f64) -> f64 {
        a + (b - a) * self.random()
    }

    /// Normal draw restricted to [lo, hi]
    fn trunc_gauss(&mut self, mu: f64, sigma: f64, lo: f64, hi: f64) -> f64 {
        if lo >= hi {
            return hi;
        }
        for _ in 0..TRUNC_GAUSS_MAX_TRIES {
            let x = self.gauss(mu, sigma);
            if (lo..=hi).contains(&x) {
                return x;
            }
        }
        mu.clamp(lo, hi)
    }

    /// Weighted categorical draw. Returns `None` only for an empty slice.
    ///
    /// Degenerate weights (all zero, negative or non-finite) fall back to a
    /// uniform pick.
    fn choice(&mut self, weights: &[f64]) -> Option<usize> {
        if weights.is_empty() {
            return None;
        }
        let clean = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };
        let total: f64 = weights.iter().map(|&w| clean(w)).sum();
        if total <= 0.0 {
            warn!(n = weights.len(), "degenerate weights, falling back to uniform choice");
            let idx = (self.random() * weights.len() as f64) as usize;
            return Some(idx.min(weights.len() - 1));
        }

        let target = self.random() * total;
        let mut acc = 0.0;
        let mut last_positive = 0;
        for (i, &w) in weights.iter().enumerate() {
            let w = clean(w);
            if w > 0.0 {
                last_positive = i;
                acc += w;
                if target < acc {
                    return Some(i);
                }
            }
        }
        // Rounding can leave target == total.
        Some(last_positive)
    }
}

/// ChaCha8-backed sampler (기본 구현)
#[derive(Debug, Clone)]
pub struct SeededSampler {
    rng: ChaCha8Rng,
}

impl SeededSampler {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl Sampler for SeededSampler {
    fn random(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn gauss(&mut self, mu: f64, sigma: f64) -> f64 {
        let z: f64 = StandardNormal.sample(&mut self.rng);
        mu + sigma * z
    }
}

/// Replays a fixed uniform stream, cycling when exhausted. `gauss` returns the mean.
#[derive(Debug, Clone)]
pub struct ScriptedSampler {
    values: Vec<f64>,
    pos: usize,
}

impl ScriptedSampler {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, pos: 0 }
    }

    /// Every draw returns `value`
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of uniform draws consumed so far
    pub fn draws(&self) -> usize {
        self.pos
    }
}

impl Sampler for ScriptedSampler {
    fn random(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.5;
        }
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v
    }

    fn gauss(&mut self, mu: f64, _sigma: f64) -> f64 {
        mu
    }
}

/// Per-game seed for a batch run
pub fn game_seed(seed: u64, gid: u32) -> u64 {
    seed ^ (gid as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
}
