//! Unified `SubsetPolicy` trait for the online subset-selection policies.
//!
//! [`OftplHints`][crate::OftplHints], [`SCore`][crate::SCore], and
//! [`RankedBandits`][crate::RankedBandits] share the same two-method round
//! interface: `get_k_set(hint)` to pick a subset, `feed_reward(reward, hint)`
//! to learn from the round. The policy set is closed: these three are the
//! inventory, and generic drivers (see [`simulate`][crate::simulate]) swap
//! between them without code changes.
//!
//! Hints are optional at the trait level: the OFTPL policy requires one and
//! errors without it, while SCore and RankedBandits accept and ignore it,
//! so one driver loop can feed all three.

use crate::Result;

/// Which policy produced a prediction. Used to tag simulation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PolicyName {
    OftplHints,
    SCore,
    RankedBandits,
}

/// Common interface for online k-subset selection policies.
///
/// Per round the driver calls [`get_k_set`][SubsetPolicy::get_k_set] to
/// obtain a prediction, evaluates it, then calls
/// [`feed_reward`][SubsetPolicy::feed_reward] with the observed reward set
/// and the same hint. Both calls run to completion synchronously; an `Err`
/// aborts the round (no retries).
///
/// # Example
///
/// ```rust
/// use kpick::{SCore, SCoreConfig, SubsetPolicy};
///
/// fn one_round<P: SubsetPolicy>(policy: &mut P) -> kpick::Result<Vec<usize>> {
///     let picked = policy.get_k_set(None)?;
///     policy.feed_reward(&[1], None)?;
///     Ok(picked)
/// }
///
/// let mut score = SCore::new(SCoreConfig { n: 5, k: 2, ..SCoreConfig::default() }).unwrap();
/// let picked = one_round(&mut score).unwrap();
/// assert_eq!(picked.len(), 2);
/// ```
pub trait SubsetPolicy {
    /// Which policy this is (for report tagging).
    fn name(&self) -> PolicyName;

    /// Number of elements in the ground set.
    fn ground_set_size(&self) -> usize;

    /// Size of the subset selected each round.
    fn subset_size(&self) -> usize;

    /// Pick this round's subset: exactly `k` distinct element ids in
    /// `[1, n]`, using the `hint` if the policy consumes hints.
    fn get_k_set(&mut self, hint: Option<&[f64]>) -> Result<Vec<usize>>;

    /// Feed the observed reward set (nonempty, distinct ids in `[1, n]`)
    /// and the round's hint back into the policy state.
    fn feed_reward(&mut self, reward: &[usize], hint: Option<&[f64]>) -> Result<()>;
}
