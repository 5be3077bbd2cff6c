//! Ranked bandits: one EXP3 instance per output rank.
//!
//! Rank `i` learns which element to show in position `i` under a
//! single-click user model: the user scans the predicted list in order and
//! clicks the first relevant element, so only the first rank whose bandit
//! choice was both kept and relevant earns reward 1 that round; every
//! later rank (and every rank whose choice was substituted) earns 0.
//! Hint-free.

use crate::{
    subset::validate_reward, Error, Exp3, Exp3Config, PolicyName, Result, SubsetPolicy,
};

/// Mixing constant for deriving per-rank seeds from the master seed.
const SEED_MIX: u64 = 0x9e37_79b9_7f4a_7c15;

/// Configuration for [`RankedBandits`].
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedBanditsConfig {
    /// Ground-set size (arms per rank).
    pub n: usize,
    /// Number of ranks, i.e. the subset size.
    pub k: usize,
    /// Time horizon; tunes each rank's exploration rate.
    pub horizon: usize,
    /// Master seed; rank `i` runs on `seed ^ SEED_MIX * (i + 1)`.
    pub seed: u64,
}

impl Default for RankedBanditsConfig {
    fn default() -> Self {
        Self {
            n: 30,
            k: 10,
            horizon: 1_000,
            seed: 0,
        }
    }
}

/// Ensemble of `k` per-rank EXP3 bandits.
#[derive(Debug, Clone)]
pub struct RankedBandits {
    cfg: RankedBanditsConfig,
    mabs: Vec<Exp3>,
    /// Raw bandit choices from the current round, one per rank.
    arms: Vec<usize>,
    /// The possibly-substituted prediction actually returned.
    predicted: Vec<usize>,
    rounds: u64,
}

impl RankedBandits {
    /// Create the ensemble, validating the configuration.
    pub fn new(cfg: RankedBanditsConfig) -> Result<Self> {
        Self::with_seed(cfg, cfg.seed)
    }

    /// Create with an explicit master seed.
    pub fn with_seed(mut cfg: RankedBanditsConfig, seed: u64) -> Result<Self> {
        cfg.seed = seed;
        if cfg.k == 0 || cfg.k > cfg.n {
            return Err(Error::InvalidSubsetSize { k: cfg.k, n: cfg.n });
        }
        let mabs = (0..cfg.k)
            .map(|rank| {
                Exp3::new(Exp3Config {
                    arms: cfg.n,
                    horizon: cfg.horizon,
                    seed: seed ^ SEED_MIX.wrapping_mul(rank as u64 + 1),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            cfg,
            mabs,
            arms: vec![0; cfg.k],
            predicted: Vec::new(),
            rounds: 0,
        })
    }

    /// The per-rank bandits (rank order).
    pub fn bandits(&self) -> &[Exp3] {
        &self.mabs
    }

    /// Rounds of reward observed so far.
    pub fn rounds(&self) -> u64 {
        self.rounds
    }
}

impl SubsetPolicy for RankedBandits {
    fn name(&self) -> PolicyName {
        PolicyName::RankedBandits
    }

    fn ground_set_size(&self) -> usize {
        self.cfg.n
    }

    fn subset_size(&self) -> usize {
        self.cfg.k
    }

    /// Ask each rank's bandit for an arm; when a rank repeats an element
    /// already placed above it, substitute the lowest-index element not yet
    /// selected this round. The substitution guarantees a duplicate-free
    /// prediction of exactly `k` elements and is part of the algorithm's
    /// observable behavior, not an implementation convenience.
    fn get_k_set(&mut self, _hint: Option<&[f64]>) -> Result<Vec<usize>> {
        let mut selected = vec![false; self.cfg.n];
        self.predicted.clear();
        for i in 0..self.cfg.k {
            let arm = self.mabs[i].select_arm();
            self.arms[i] = arm;
            if self.predicted.contains(&arm) {
                // Lowest-index unselected element; one always remains since
                // fewer than k <= n are placed so far.
                let free = selected.iter().position(|&s| !s).unwrap_or_else(|| {
                    panic!("ranked bandits: no unselected element left at rank {i}")
                });
                selected[free] = true;
                self.predicted.push(free + 1);
            } else {
                selected[arm - 1] = true;
                self.predicted.push(arm);
            }
        }
        Ok(self.predicted.clone())
    }

    /// Attribute the round's click to the first rank whose prediction was
    /// the bandit's own (unsubstituted) choice and appears in the reward;
    /// that bandit earns 1, all others 0. Every bandit updates exactly once
    /// per round.
    fn feed_reward(&mut self, reward: &[usize], _hint: Option<&[f64]>) -> Result<()> {
        validate_reward(reward, self.cfg.n)?;
        if self.predicted.len() != self.cfg.k {
            return Err(Error::NoPrediction);
        }
        self.rounds += 1;

        let mut clicked = false;
        for i in 0..self.cfg.k {
            let prediction = self.predicted[i];
            let earned = !clicked && reward.contains(&prediction) && prediction == self.arms[i];
            if earned {
                clicked = true;
            }
            self.mabs[i].update(self.arms[i], if earned { 1.0 } else { 0.0 })?;
        }
        Ok(())
    }
}
