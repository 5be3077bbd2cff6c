//! `kpick`: deterministic online k-subset selection policies.
//!
//! Designed for repeated subset selection: each round you must pick a
//! size-`k` subset of a fixed `n`-element ground set (items to surface,
//! documents to rank, cache lines to keep, anything chosen repeatedly),
//! then you observe which elements actually mattered and update for the
//! next round. Some settings also give you a **hint** before you pick: a
//! cheap prediction of the reward set from a recommender, a heuristic, or
//! yesterday's answer. `kpick` implements policies for both regimes and the
//! numerical machinery they share.
//!
//! **Goals:**
//! - **Deterministic by default**: every randomness source (perturbation
//!   vector, bandit draws, the sampler's shared uniform) is an explicitly
//!   owned, seeded generator. Same seed + same reward/hint stream → same
//!   trajectory, every round.
//! - **Fail fast**: configuration errors are rejected at construction,
//!   never clamped.
//! - **Single-threaded, synchronous**: every policy call runs to completion
//!   before control returns; no state is shared across instances.
//!
//! **Selection policies** (all implement [`SubsetPolicy`]):
//! - [`OftplHints`]: optimistic follow-the-perturbed-leader. Adds the hint
//!   to the cumulative gradient and scales a fixed Gaussian perturbation by
//!   the accumulated hint error, so good hints shrink the noise and bad
//!   hints restore plain FTPL behavior.
//! - [`SCore`]: entropic follow-the-regularized-leader, hint-free. Keeps a
//!   fractional inclusion-probability vector, re-solved in closed form
//!   after every reward.
//! - [`RankedBandits`]: one adversarial [`Exp3`] bandit per output rank
//!   under a single-click attribution model.
//!
//! **Shared primitives:**
//! - [`linear_optimize`] / [`ftrl_optimize`]: exact optimization over the
//!   fractional k-subset polytope (vertex and entropic-regularized interior
//!   point respectively).
//! - [`madow_sample`]: correlated rounding: exactly `k` distinct elements
//!   from one uniform draw, marginals matching the fractional vector.
//! - [`simulate`]: a driver loop producing per-round augmented-regret
//!   records for policy comparison.
//!
//! **Non-goals:** no distributed or concurrent execution, no persistence of
//! policy state across runs, no online hyperparameter tuning beyond the
//! closed-form schedules, no multi-objective rewards. Dataset loading and
//! plotting live outside the crate.
//!
//! # Example
//!
//! ```rust
//! use kpick::{simulate, HintModel, OftplConfig, OftplHints};
//! use rand::SeedableRng;
//!
//! // Rewards for five rounds; element 3 keeps coming back.
//! let rewards = vec![vec![3], vec![3, 8], vec![5], vec![3], vec![3]];
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! let hints = simulate::generate_hints(HintModel::Perfect, &rewards, 24, &mut rng).unwrap();
//!
//! let mut policy = OftplHints::new(OftplConfig { n: 24, k: 3, c: 11, seed: 0 }).unwrap();
//! let report = simulate::run(&mut policy, &rewards, Some(&hints)).unwrap();
//! assert_eq!(report.records.len(), 5);
//! ```
//!
//! # Related work
//!
//! The OFTPL schedule (perturbation scaled by accumulated hint error, with
//! the `C`-parameterized constant) follows the optimistic online-learning
//! line of Rakhlin & Sridharan (arXiv:1208.3728) and the imperfect-hints
//! analysis of Bhaskara, Cutkosky, Kumar & Purohit (arXiv:2002.04726).
//! Madow's systematic sampling is the classic fixed-size unequal-probability
//! design (Madow & Madow, Ann. Math. Statist. 1944). EXP3 and its
//! exploration schedule are from Auer, Cesa-Bianchi, Freund & Schapire
//! (SIAM J. Comput. 2002); the per-rank ensemble follows the ranked-bandits
//! construction of Radlinski, Kleinberg & Joachims (ICML 2008).

/// Feasibility tolerance for inclusion-probability vectors.
///
/// Used when validating that coordinates lie in `[0, 1]` and sum to `k`;
/// a single shared threshold keeps the optimizers and the sampler agreeing
/// on what counts as feasible.
pub const FEASIBILITY_TOL: f64 = 1e-9;

mod error;
pub use error::*;

mod subset;
pub use subset::*;

mod optimize;
pub use optimize::*;

mod madow;
pub use madow::*;

mod policy;
pub use policy::*;

mod exp3;
pub use exp3::*;

mod oftpl;
pub use oftpl::*;

mod score;
pub use score::*;

mod ranked;
pub use ranked::*;

pub mod simulate;
pub use simulate::{augmented_regret, HintModel, RoundRecord, SimulationReport};

pub const KPICK_VERSION: &str = env!("CARGO_PKG_VERSION");
