//! In-memory simulation driver for comparing policies round by round.
//!
//! The driver owns the per-round loop: supply the hint, collect the
//! prediction, feed the observed reward back, and accumulate **augmented
//! regret**: `k/n` (the offline-uniform baseline inclusion rate) minus 1
//! when the prediction intersected the true reward set, else minus 0.
//!
//! Dataset loading and plotting stay outside the crate; the driver consumes
//! plain in-memory reward sequences and produces log-ready per-round rows.

use rand::Rng;

use crate::{
    indicator, sets_intersect, subset::validate_reward, Error, PolicyName, Result, SubsetPolicy,
};

/// How the driver synthesizes hint vectors from the true reward sets.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HintModel {
    /// Singleton hint at the round's first true reward element.
    Perfect,
    /// Per-element independent noise: a true reward element enters the hint
    /// with probability `hit_rate`, any other element with `miss_rate`.
    Random { hit_rate: f64, miss_rate: f64 },
}

impl HintModel {
    /// The noisy model with the standard rates (0.3 for true elements,
    /// 0.1 for the rest).
    pub fn random_default() -> Self {
        HintModel::Random {
            hit_rate: 0.3,
            miss_rate: 0.1,
        }
    }
}

/// Synthesize one round's hint vector for `reward` under `model`.
pub fn hint_for_round<R: Rng + ?Sized>(
    model: HintModel,
    reward: &[usize],
    n: usize,
    rng: &mut R,
) -> Result<Vec<f64>> {
    validate_reward(reward, n)?;
    match model {
        HintModel::Perfect => indicator(&[reward[0]], n),
        HintModel::Random {
            hit_rate,
            miss_rate,
        } => {
            for (name, rate) in [("hit_rate", hit_rate), ("miss_rate", miss_rate)] {
                if !(rate.is_finite() && (0.0..=1.0).contains(&rate)) {
                    return Err(Error::InvalidConfig(format!(
                        "{name} must lie in [0, 1], got {rate}"
                    )));
                }
            }
            let truth = indicator(reward, n)?;
            let mut hint = vec![0.0; n];
            for (h, &t) in hint.iter_mut().zip(&truth) {
                let rate = if t != 0.0 { hit_rate } else { miss_rate };
                if rng.random::<f64>() < rate {
                    *h = 1.0;
                }
            }
            Ok(hint)
        }
    }
}

/// Synthesize a hint per round for a whole reward sequence.
pub fn generate_hints<R: Rng + ?Sized>(
    model: HintModel,
    rewards: &[Vec<usize>],
    n: usize,
    rng: &mut R,
) -> Result<Vec<Vec<f64>>> {
    rewards
        .iter()
        .map(|reward| hint_for_round(model, reward, n, rng))
        .collect()
}

/// Per-round augmented regret: `k/n - 1` on a hit, `k/n` on a miss.
pub fn augmented_regret(n: usize, k: usize, prediction: &[usize], reward: &[usize]) -> f64 {
    let baseline = k as f64 / n as f64;
    baseline - f64::from(u8::from(sets_intersect(prediction, reward)))
}

/// A log-ready row for one simulation round.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundRecord {
    /// 1-based round index.
    pub round: usize,
    /// The policy's predicted k-subset.
    pub prediction: Vec<usize>,
    /// Whether the prediction intersected the reward set.
    pub hit: bool,
    /// Augmented regret for the round.
    pub regret: f64,
}

/// Result of driving one policy over a reward sequence.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationReport {
    /// Which policy produced the run.
    pub policy: PolicyName,
    /// One record per round, in order.
    pub records: Vec<RoundRecord>,
}

impl SimulationReport {
    /// Sum of per-round augmented regret.
    pub fn cumulative_regret(&self) -> f64 {
        self.records.iter().map(|r| r.regret).sum()
    }

    /// Running cumulative regret, one entry per round (plot-ready).
    pub fn regret_curve(&self) -> Vec<f64> {
        let mut acc = 0.0;
        self.records
            .iter()
            .map(|r| {
                acc += r.regret;
                acc
            })
            .collect()
    }

    /// Fraction of rounds whose prediction intersected the reward.
    pub fn hit_rate(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let hits = self.records.iter().filter(|r| r.hit).count();
        hits as f64 / self.records.len() as f64
    }
}

/// Drive `policy` through `rewards`, one synchronous round per entry.
///
/// `hints`, when given, must be one vector per round and is passed to both
/// `get_k_set` and `feed_reward` (the same hint, per the round protocol).
/// An `Err` from the policy aborts the run at that round.
///
/// # Example
///
/// ```rust
/// use kpick::{simulate, SCore, SCoreConfig};
///
/// let rewards = vec![vec![1], vec![2], vec![1]];
/// let mut policy = SCore::new(SCoreConfig {
///     n: 5, k: 2, g: 1.0, horizon: 3, seed: 0,
/// }).unwrap();
/// let report = simulate::run(&mut policy, &rewards, None).unwrap();
/// assert_eq!(report.records.len(), 3);
/// ```
pub fn run<P: SubsetPolicy>(
    policy: &mut P,
    rewards: &[Vec<usize>],
    hints: Option<&[Vec<f64>]>,
) -> Result<SimulationReport> {
    if let Some(hints) = hints {
        if hints.len() != rewards.len() {
            return Err(Error::LengthMismatch {
                expected: rewards.len(),
                got: hints.len(),
            });
        }
    }
    let n = policy.ground_set_size();
    let k = policy.subset_size();

    let mut records = Vec::with_capacity(rewards.len());
    for (t, reward) in rewards.iter().enumerate() {
        let hint = hints.map(|h| h[t].as_slice());
        let prediction = policy.get_k_set(hint)?;
        policy.feed_reward(reward, hint)?;

        let hit = sets_intersect(&prediction, reward);
        records.push(RoundRecord {
            round: t + 1,
            regret: augmented_regret(n, k, &prediction, reward),
            hit,
            prediction,
        });
    }
    Ok(SimulationReport {
        policy: policy.name(),
        records,
    })
}
