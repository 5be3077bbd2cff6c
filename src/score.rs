//! SCore: entropic follow-the-regularized-leader without hints.
//!
//! The policy maintains a fractional inclusion-probability vector, samples a
//! subset from it each round with the Madow sampler, and after each reward
//! re-solves the entropy-regularized leader problem over the cumulative
//! gradient with a fixed, horizon-tuned learning rate.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::{
    ftrl_optimize, madow_sample, subset::validate_reward, Error, PolicyName, Result, SubsetPolicy,
};

/// Configuration for [`SCore`].
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SCoreConfig {
    /// Ground-set size.
    pub n: usize,
    /// Subset size selected each round.
    pub k: usize,
    /// Upper bound on the L2 norms of reward-gradient vertices.
    pub g: f64,
    /// Total number of rounds the run will last; tunes the learning rate.
    pub horizon: usize,
    /// Seed for the per-round Madow draw.
    pub seed: u64,
}

impl Default for SCoreConfig {
    fn default() -> Self {
        Self {
            n: 30,
            k: 10,
            g: 1.0,
            horizon: 1_000,
            seed: 0,
        }
    }
}

/// Entropic-FTRL subset policy (hint-free).
#[derive(Debug, Clone)]
pub struct SCore {
    cfg: SCoreConfig,
    eta: f64,
    p: Vec<f64>,
    cumulative_gradient: Vec<f64>,
    rounds: u64,
    rng: StdRng,
}

impl SCore {
    /// Create the policy, validating the configuration.
    ///
    /// The learning rate is derived once: `eta = sqrt(k ln(n/k) / (2 G^2 T))`,
    /// the regret-minimizing FTRL rate for this polytope. Rejects `k`
    /// outside `[1, n]`, non-positive `g`, and a zero horizon.
    pub fn new(cfg: SCoreConfig) -> Result<Self> {
        Self::with_seed(cfg, cfg.seed)
    }

    /// Create with an explicit seed.
    pub fn with_seed(mut cfg: SCoreConfig, seed: u64) -> Result<Self> {
        cfg.seed = seed;
        if cfg.k == 0 || cfg.k > cfg.n {
            return Err(Error::InvalidSubsetSize { k: cfg.k, n: cfg.n });
        }
        if !(cfg.g.is_finite() && cfg.g > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "gradient bound G must be finite and positive, got {}",
                cfg.g
            )));
        }
        if cfg.horizon == 0 {
            return Err(Error::InvalidConfig(
                "time horizon must be at least 1".to_string(),
            ));
        }
        let nf = cfg.n as f64;
        let kf = cfg.k as f64;
        let eta = (kf * (nf / kf).ln() / (2.0 * cfg.g * cfg.g * cfg.horizon as f64)).sqrt();
        Ok(Self {
            cfg,
            eta,
            p: vec![kf / nf; cfg.n],
            cumulative_gradient: vec![0.0; cfg.n],
            rounds: 0,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// The fixed learning rate.
    pub fn eta(&self) -> f64 {
        self.eta
    }

    /// Current inclusion-probability vector.
    pub fn probabilities(&self) -> &[f64] {
        &self.p
    }

    /// Sum of observed reward gradients.
    pub fn cumulative_gradient(&self) -> &[f64] {
        &self.cumulative_gradient
    }

    /// Rounds of reward observed so far.
    pub fn rounds(&self) -> u64 {
        self.rounds
    }
}

impl SubsetPolicy for SCore {
    fn name(&self) -> PolicyName {
        PolicyName::SCore
    }

    fn ground_set_size(&self) -> usize {
        self.cfg.n
    }

    fn subset_size(&self) -> usize {
        self.cfg.k
    }

    /// Sample directly from the current probabilities; the hint is ignored
    /// and no optimization runs before the first update.
    fn get_k_set(&mut self, _hint: Option<&[f64]>) -> Result<Vec<usize>> {
        madow_sample(&self.p, self.cfg.k, &mut self.rng)
    }

    /// Charge the **first** reward element as the realized 1-core vertex
    /// (the policy neither consults hints nor weighs alternate reward
    /// elements), then re-solve the FTRL step with the fixed rate.
    fn feed_reward(&mut self, reward: &[usize], _hint: Option<&[f64]>) -> Result<()> {
        validate_reward(reward, self.cfg.n)?;
        self.rounds += 1;
        self.cumulative_gradient[reward[0] - 1] += 1.0;
        if self.cfg.k < self.cfg.n {
            self.p = ftrl_optimize(&self.cumulative_gradient, self.cfg.k, self.eta)?;
        }
        // k = n pins p at all-ones; the FTRL solution cannot move it.
        Ok(())
    }
}
