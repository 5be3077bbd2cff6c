//! Optimistic follow-the-perturbed-leader with hints.
//!
//! The policy keeps a cumulative reward gradient and perturbs it with a
//! fixed Gaussian vector whose magnitude tracks the accumulated hint error:
//! when hints have been accurate, the perturbation shrinks and the policy
//! trusts the hint term; when hints have been poor, the perturbation grows
//! and the policy behaves like plain perturbed-leader. Each round it
//! maximizes `cumulative_gradient + hint + eta * gamma` linearly over the
//! fractional k-subset polytope and rounds the vertex with the Madow
//! sampler.
//!
//! Seedable: the perturbation vector is drawn once at construction from the
//! seeded RNG and is immutable afterwards.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::{
    linear_optimize, madow_sample,
    subset::{validate_hint, validate_reward},
    Error, PolicyName, Result, SubsetPolicy,
};

/// Configuration for [`OftplHints`].
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OftplConfig {
    /// Ground-set size.
    pub n: usize,
    /// Subset size selected each round.
    pub k: usize,
    /// Perturbation-schedule parameter. Must satisfy `c >= 11` and
    /// `2 * c <= n`.
    pub c: usize,
    /// Seed for the perturbation vector and the per-round Madow draw.
    pub seed: u64,
}

impl Default for OftplConfig {
    fn default() -> Self {
        Self {
            n: 30,
            k: 10,
            c: 11,
            seed: 0,
        }
    }
}

/// Optimistic FTPL policy that exploits hint vectors.
#[derive(Debug, Clone)]
pub struct OftplHints {
    cfg: OftplConfig,
    scale: f64,
    eta: f64,
    gamma: Vec<f64>,
    cumulative_gradient: Vec<f64>,
    l1_errors: f64,
    p: Vec<f64>,
    rounds: u64,
    rng: StdRng,
}

impl OftplHints {
    /// Create the policy, validating the configuration.
    ///
    /// Rejects `k` outside `[1, n]` and any `c` violating `c >= 11` or
    /// `2 * c <= n`, the range where the perturbation schedule's regret
    /// guarantee holds. Nothing is clamped.
    pub fn new(cfg: OftplConfig) -> Result<Self> {
        Self::with_seed(cfg, cfg.seed)
    }

    /// Create with an explicit seed.
    pub fn with_seed(mut cfg: OftplConfig, seed: u64) -> Result<Self> {
        cfg.seed = seed;
        if cfg.k == 0 || cfg.k > cfg.n {
            return Err(Error::InvalidSubsetSize { k: cfg.k, n: cfg.n });
        }
        if cfg.c < 11 || 2 * cfg.c > cfg.n {
            return Err(Error::InvalidConfig(format!(
                "the conditions C >= 11 and 2*C <= N must be satisfied (C = {}, N = {})",
                cfg.c, cfg.n
            )));
        }
        let nf = cfg.n as f64;
        let cf = cfg.c as f64;
        let scale = (1.3 / cf.sqrt()) * (1.0 / (nf * std::f64::consts::E / cf).ln()).powf(0.25);

        let mut rng = StdRng::seed_from_u64(seed);
        let gamma: Vec<f64> = (0..cfg.n).map(|_| rng.sample(StandardNormal)).collect();

        Ok(Self {
            cfg,
            scale,
            eta: 0.0,
            gamma,
            cumulative_gradient: vec![0.0; cfg.n],
            l1_errors: 0.0,
            p: vec![0.0; cfg.n],
            rounds: 0,
            rng,
        })
    }

    /// The fixed Gaussian perturbation vector.
    pub fn perturbation(&self) -> &[f64] {
        &self.gamma
    }

    /// Sum of observed reward gradients.
    pub fn cumulative_gradient(&self) -> &[f64] {
        &self.cumulative_gradient
    }

    /// Accumulated hint error (drives the perturbation magnitude).
    pub fn l1_errors(&self) -> f64 {
        self.l1_errors
    }

    /// Inclusion probabilities from the most recent prediction.
    pub fn probabilities(&self) -> &[f64] {
        &self.p
    }

    /// Rounds of reward observed so far.
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    fn require_hint<'a>(&self, hint: Option<&'a [f64]>) -> Result<&'a [f64]> {
        let hint = hint.ok_or(Error::HintRequired)?;
        validate_hint(hint, self.cfg.n)?;
        Ok(hint)
    }

    fn predict(&mut self, hint: &[f64]) -> Result<Vec<usize>> {
        self.eta = self.scale * self.l1_errors;
        let cost: Vec<f64> = (0..self.cfg.n)
            .map(|i| self.cumulative_gradient[i] + hint[i] + self.eta * self.gamma[i])
            .collect();
        self.p = linear_optimize(&cost, self.cfg.k)?;
        madow_sample(&self.p, self.cfg.k, &mut self.rng)
    }

    fn observe(&mut self, reward: &[usize], hint: &[f64]) -> Result<()> {
        validate_reward(reward, self.cfg.n)?;
        self.rounds += 1;

        // Among the vertices of the reward's 1-core (standard basis vectors
        // for elements of `reward`), charge the one L1-closest to the hint.
        // If an element of `reward` appears in the hint its distance is
        // ||hint||_1 - 1, else ||hint||_1 + 1, so the first hint-matching
        // element short-circuits the scan; with no match the last scanned
        // element is charged. The short-circuit is an encoded policy, not an
        // approximation to fix.
        let l1hint: f64 = hint.iter().sum();
        let (closest, l1dist) = match reward.iter().copied().find(|&e| hint[e - 1] != 0.0) {
            Some(e) => (e, l1hint - 1.0),
            None => (reward[reward.len() - 1], l1hint + 1.0),
        };

        self.l1_errors = (self.l1_errors * self.l1_errors + l1dist).sqrt();
        self.cumulative_gradient[closest - 1] += 1.0;
        Ok(())
    }
}

impl SubsetPolicy for OftplHints {
    fn name(&self) -> PolicyName {
        PolicyName::OftplHints
    }

    fn ground_set_size(&self) -> usize {
        self.cfg.n
    }

    fn subset_size(&self) -> usize {
        self.cfg.k
    }

    fn get_k_set(&mut self, hint: Option<&[f64]>) -> Result<Vec<usize>> {
        let hint = self.require_hint(hint)?;
        self.predict(hint)
    }

    fn feed_reward(&mut self, reward: &[usize], hint: Option<&[f64]>) -> Result<()> {
        let hint = self.require_hint(hint)?;
        self.observe(reward, hint)
    }
}
