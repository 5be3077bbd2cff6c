//! Correlated rounding via Madow's systematic sampling.
//!
//! Given a feasible inclusion-probability vector `p` (each coordinate in
//! `[0, 1]`, coordinates summing to `k`), Madow's method derives exactly `k`
//! distinct elements from **one** shared uniform draw: lay the coordinates
//! end to end over `[0, k)` and read off the elements covering
//! `u, u+1, ..., u+k-1`. Marginal inclusion probability of element `j` is
//! exactly `p_j`, and the selections are negatively correlated, which makes
//! the sampled subsets low-variance and unbiased.

use crate::{subset::validate_marginals, Error, Result};
use rand::Rng;

/// Sample exactly `k` distinct elements of `[1, n]` with the marginal
/// inclusion probabilities given by `p`.
///
/// Draws the single shared uniform from `rng` and delegates to
/// [`madow_sample_with_u`]. Errors if `p` is not a feasible fractional
/// k-subset.
///
/// # Example
///
/// ```rust
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// let picked = kpick::madow_sample(&[0.5, 0.5, 0.5, 0.5], 2, &mut rng).unwrap();
/// assert_eq!(picked.len(), 2);
/// ```
pub fn madow_sample<R: Rng + ?Sized>(p: &[f64], k: usize, rng: &mut R) -> Result<Vec<usize>> {
    let u: f64 = rng.random();
    madow_sample_with_u(p, k, u)
}

/// Deterministic core of [`madow_sample`]: the shared uniform draw `u` is a
/// parameter, so callers can reproduce or exhaustively test selections.
///
/// Builds cumulative sums `pi[0..=n]` (with `pi[0] = 0` and the final entry
/// pinned up to `k`, so the array covers `[0, k)` via the repeated
/// unit-interval offsets rather than any modular wraparound) and, for each
/// offset `i` in `0..k`, includes the unique element `j` with
/// `pi[j-1] <= u + i < pi[j]`.
///
/// Boundary convention: intervals are **half-open on the right**. A draw
/// landing exactly on `pi[j]` selects element `j + 1`, and zero-probability
/// elements (empty intervals) are never selected. Consecutive offsets differ
/// by a full unit while no interval is longer than one, so the scan resumes
/// strictly after each picked element, so the output is always `k` distinct
/// ids in increasing order.
///
/// Errors on infeasible marginals or `u` outside `[0, 1)`. Failure to find a
/// covering interval after validation is a programming fault and panics.
pub fn madow_sample_with_u(p: &[f64], k: usize, u: f64) -> Result<Vec<usize>> {
    validate_marginals(p, k)?;
    if !(0.0..1.0).contains(&u) {
        return Err(Error::InvalidConfig(format!(
            "shared uniform draw must lie in [0, 1), got {u}"
        )));
    }

    let n = p.len();
    let mut cum = Vec::with_capacity(n + 1);
    cum.push(0.0);
    let mut acc = 0.0;
    for &pi in p {
        acc += pi;
        cum.push(acc);
    }
    // Feasibility leaves the total within tolerance of k; pin the endpoint
    // so every offset u + i < k finds a covering interval.
    cum[n] = cum[n].max(k as f64);

    let mut picked = Vec::with_capacity(k);
    let mut j = 0usize;
    for i in 0..k {
        let target = u + i as f64;
        while j < n && cum[j + 1] <= target {
            j += 1;
        }
        if j >= n {
            panic!(
                "madow sampler found no covering interval for offset {i} \
                 (target {target}, total mass {})",
                cum[n]
            );
        }
        picked.push(j + 1);
        // The next target exceeds this interval's end; advancing also pins
        // distinctness at interval boundaries under floating tolerance.
        j += 1;
    }
    Ok(picked)
}
