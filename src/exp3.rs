//! EXP3 (adversarial bandit) over the ground set, one arm per round.
//!
//! This is the per-rank building block of [`RankedBandits`][crate::RankedBandits].
//! It is **seedable** so selections are reproducible; default construction is
//! deterministic (fixed seed 0).
//!
//! The weight vector grows multiplicatively and is never renormalized; only
//! the derived probability vector is a distribution.

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::{Error, Result};

/// Configuration for a single EXP3 bandit.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exp3Config {
    /// Number of arms (the ground-set size for ranked use).
    pub arms: usize,
    /// Time horizon used to set the exploration rate.
    pub horizon: usize,
    /// Seed for the internal RNG.
    pub seed: u64,
}

impl Default for Exp3Config {
    fn default() -> Self {
        Self {
            arms: 10,
            horizon: 1_000,
            seed: 0,
        }
    }
}

/// Seedable EXP3 bandit with importance-weighted multiplicative updates.
#[derive(Debug, Clone)]
pub struct Exp3 {
    cfg: Exp3Config,
    gamma: f64,
    rng: StdRng,
    weights: Vec<f64>,
    probs: Vec<f64>,
}

impl Exp3 {
    /// Create a new EXP3 instance with the seed from `cfg`.
    pub fn new(cfg: Exp3Config) -> Result<Self> {
        Self::with_seed(cfg, cfg.seed)
    }

    /// Create with an explicit seed.
    pub fn with_seed(mut cfg: Exp3Config, seed: u64) -> Result<Self> {
        cfg.seed = seed;
        if cfg.arms == 0 {
            return Err(Error::InvalidConfig(
                "EXP3 needs at least one arm".to_string(),
            ));
        }
        if cfg.horizon == 0 {
            return Err(Error::InvalidConfig(
                "EXP3 time horizon must be at least 1".to_string(),
            ));
        }
        let n = cfg.arms as f64;
        let gamma = 1.0_f64.min((n * n.ln() / ((std::f64::consts::E - 1.0) * cfg.horizon as f64)).sqrt());
        Ok(Self {
            cfg,
            gamma,
            rng: StdRng::seed_from_u64(seed),
            weights: vec![1.0; cfg.arms],
            probs: vec![1.0 / n; cfg.arms],
        })
    }

    /// Exploration rate `gamma`, fixed at construction.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Current per-arm weights (never renormalized).
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Selection probabilities as of the most recent [`select_arm`][Self::select_arm].
    pub fn probabilities(&self) -> &[f64] {
        &self.probs
    }

    fn recompute_probs(&mut self) {
        let n = self.cfg.arms as f64;
        let total: f64 = self.weights.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            // Overflowed or degenerate weights: fall back to uniform.
            for p in &mut self.probs {
                *p = 1.0 / n;
            }
            return;
        }
        for (p, &w) in self.probs.iter_mut().zip(&self.weights) {
            *p = (1.0 - self.gamma) * w / total + self.gamma / n;
        }
    }

    /// Select an arm: recompute `p = (1 - gamma) * w / sum(w) + gamma / n`
    /// and sample from it. Returns a 1-based arm id.
    pub fn select_arm(&mut self) -> usize {
        self.recompute_probs();
        let r: f64 = self.rng.random();
        let mut cdf = 0.0;
        for (i, &p) in self.probs.iter().enumerate() {
            cdf += p;
            if r < cdf {
                return i + 1;
            }
        }
        // Numerical fallthrough.
        self.cfg.arms
    }

    /// EXP3 update: multiply the chosen arm's weight by
    /// `exp(reward * gamma / (p[arm] * n))`, importance-weighting the reward
    /// by the probability it was selected with. Rewards live in `{0, 1}`.
    pub fn update(&mut self, arm: usize, reward: f64) -> Result<()> {
        if arm == 0 || arm > self.cfg.arms {
            return Err(Error::ElementOutOfRange {
                element: arm,
                n: self.cfg.arms,
            });
        }
        let n = self.cfg.arms as f64;
        let p = self.probs[arm - 1];
        self.weights[arm - 1] *= (reward * self.gamma / (p * n)).exp();
        Ok(())
    }
}
