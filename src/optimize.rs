//! Constrained optimization over the fractional k-subset polytope.
//!
//! Both optimizers operate on the polytope `{ p : 0 <= p_i <= 1, sum p_i = k }`
//! (the convex hull of the indicator vectors of k-element subsets).
//!
//! - [`linear_optimize`] maximizes a linear objective and lands on a vertex
//!   (the indicator of the k largest-cost coordinates).
//! - [`ftrl_optimize`] maximizes the entropic-regularized objective
//!   `<p, g> - (1/eta) * sum p_i ln p_i` and returns an interior (fractional)
//!   point via a closed-form threshold search.
//!
//! These are deterministic utilities with stable tie-breaking, in the same
//! spirit as score-to-probability helpers: same input, same output, no RNG.

use crate::{Error, Result};

/// Maximize `<p, cost>` over the fractional k-subset polytope.
///
/// Returns the indicator vector of the k indices with the largest cost
/// values. The sort is stable and descending, so **equal costs resolve to
/// the lowest index**, an explicit tie-break kept for reproducibility.
///
/// The only error condition is `k > cost.len()`.
///
/// # Example
///
/// ```rust
/// // Indices 1 and 3 tie for the second slot; the lower index wins.
/// let p = kpick::linear_optimize(&[0.3, 1.0, 2.0, 1.0], 2).unwrap();
/// assert_eq!(p, vec![0.0, 1.0, 1.0, 0.0]);
/// ```
pub fn linear_optimize(cost: &[f64], k: usize) -> Result<Vec<f64>> {
    let n = cost.len();
    if k > n {
        return Err(Error::InvalidSubsetSize { k, n });
    }
    let mut order: Vec<usize> = (0..n).collect();
    // Stable sort: equal costs keep ascending-index order.
    order.sort_by(|&a, &b| cost[b].total_cmp(&cost[a]));

    let mut p = vec![0.0; n];
    for &i in order.iter().take(k) {
        p[i] = 1.0;
    }
    Ok(p)
}

/// Maximize `<p, g> - (1/eta) * sum p_i ln p_i` over the fractional
/// k-subset polytope (the FTRL step).
///
/// The unconstrained-coordinate solution is exponential in the gradient;
/// the box constraint `p_i <= 1` saturates the largest coordinates. The
/// unique KKT breakpoint `i*` (number of saturated coordinates) is found by
/// a one-pass scan over the gradient sorted non-increasing: scanning `i`
/// from `n` down to 1 with `tail_sum` accumulating `exp(eta * g)` over the
/// already-rejected tail, `i*` is the first (largest) index where
/// `(k - i) * exp(eta * ordered[i]) >= tail_sum`. The remaining mass is
/// spread as `p_i = min(1, K * exp(eta * g_i))` with
/// `K = (k - i*) / tail_sum`.
///
/// Exponentials are shifted by the maximum gradient coordinate before
/// evaluation (max-trick); the scan condition and the normalizer are
/// homogeneous in that shift.
///
/// Guarantees: the output lies in the polytope: every coordinate in
/// `[0, 1]`, coordinates summing to `k` up to floating tolerance. The
/// degenerate `k = n` case returns the all-ones vector through an explicit
/// branch, and a fully underflowed tail falls back to the saturated top-k
/// vertex. A zero gradient yields the uniform vector `k/n`.
///
/// Larger `eta` sharpens the distribution toward the empirical top-k of the
/// gradient. `eta` must be finite and positive.
pub fn ftrl_optimize(cumulative_gradient: &[f64], k: usize, eta: f64) -> Result<Vec<f64>> {
    let n = cumulative_gradient.len();
    if k > n {
        return Err(Error::InvalidSubsetSize { k, n });
    }
    if !(eta.is_finite() && eta > 0.0) {
        return Err(Error::InvalidConfig(format!(
            "learning rate must be finite and positive, got {eta}"
        )));
    }
    if k == 0 {
        return Ok(vec![0.0; n]);
    }

    let mut ordered: Vec<f64> = cumulative_gradient.to_vec();
    ordered.sort_by(|a, b| b.total_cmp(a));
    let shift = eta * ordered[0];

    // Breakpoint scan from the smallest coordinate up. The saturation count
    // cannot exceed k (k saturated coordinates already sum to k), so the condition
    // is only consulted once i <= k; this also keeps a fully underflowed
    // tail (e == 0, so (k - i) * e == -0.0 >= 0.0) from breaking early.
    let mut tail_sum = 0.0;
    let mut istar = 0usize;
    for i in (1..=n).rev() {
        let e = (eta * ordered[i - 1] - shift).exp();
        if i <= k && (k as f64 - i as f64) * e >= tail_sum {
            istar = i;
            break;
        }
        tail_sum += e;
    }

    if istar == n {
        // Every coordinate saturates; only reachable when k = n.
        return Ok(vec![1.0; n]);
    }
    if tail_sum <= 0.0 {
        // The whole tail underflowed relative to the saturated head: the
        // entropic solution is indistinguishable from the linear vertex.
        return linear_optimize(cumulative_gradient, k);
    }

    let norm = (k - istar) as f64 / tail_sum;
    Ok(cumulative_gradient
        .iter()
        .map(|&g| (norm * (eta * g - shift).exp()).min(1.0))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate_marginals;
    use proptest::prelude::*;

    #[test]
    fn linear_optimize_picks_largest() {
        let p = linear_optimize(&[0.1, 5.0, -2.0, 3.0, 0.2], 2).unwrap();
        assert_eq!(p, vec![0.0, 1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn linear_optimize_ties_go_to_lowest_index() {
        let p = linear_optimize(&[1.0, 1.0, 1.0, 1.0], 2).unwrap();
        assert_eq!(p, vec![1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn linear_optimize_rejects_oversized_k() {
        assert_eq!(
            linear_optimize(&[1.0, 2.0], 3),
            Err(Error::InvalidSubsetSize { k: 3, n: 2 })
        );
    }

    #[test]
    fn ftrl_zero_gradient_is_uniform() {
        let p = ftrl_optimize(&[0.0; 5], 2, 1.0).unwrap();
        for &pi in &p {
            assert!((pi - 0.4).abs() < 1e-12, "expected uniform k/n, got {pi}");
        }
    }

    #[test]
    fn ftrl_k_equals_n_is_all_ones() {
        let p = ftrl_optimize(&[3.0, -1.0, 0.5], 3, 2.0).unwrap();
        assert_eq!(p, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn ftrl_saturates_dominant_coordinate() {
        // One coordinate far above the rest saturates at 1; the leftover
        // unit of mass spreads evenly over the remaining three.
        let p = ftrl_optimize(&[50.0, 0.0, 0.0, 0.0], 2, 1.0).unwrap();
        assert_eq!(p[0], 1.0);
        for &pi in &p[1..] {
            assert!((pi - 1.0 / 3.0).abs() < 1e-9, "got {pi}");
        }
    }

    #[test]
    fn ftrl_rejects_bad_eta() {
        assert!(ftrl_optimize(&[0.0; 4], 2, 0.0).is_err());
        assert!(ftrl_optimize(&[0.0; 4], 2, -1.0).is_err());
        assert!(ftrl_optimize(&[0.0; 4], 2, f64::NAN).is_err());
    }

    #[test]
    fn ftrl_survives_extreme_gradients() {
        // Large eta * gradient would overflow exp without the max-trick.
        let p = ftrl_optimize(&[800.0, 400.0, 0.0, -400.0], 2, 2.0).unwrap();
        validate_marginals(&p, 2).unwrap();
        assert_eq!(p[0], 1.0);
    }

    proptest! {
        #[test]
        fn linear_optimize_matches_brute_force(
            cost in proptest::collection::vec(-1.0e3f64..1.0e3, 1..30),
            k_frac in 0.0f64..1.0,
        ) {
            let n = cost.len();
            let k = ((n as f64) * k_frac) as usize;
            let p = linear_optimize(&cost, k).unwrap();

            let ones = p.iter().filter(|&&x| x == 1.0).count();
            prop_assert_eq!(ones, k);

            // Oracle: every chosen cost >= every rejected cost.
            let chosen_min = cost.iter().zip(&p).filter(|(_, &x)| x == 1.0)
                .map(|(&c, _)| c).fold(f64::INFINITY, f64::min);
            let rejected_max = cost.iter().zip(&p).filter(|(_, &x)| x == 0.0)
                .map(|(&c, _)| c).fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(k == 0 || k == n || chosen_min >= rejected_max);
        }

        #[test]
        fn ftrl_output_is_in_the_polytope(
            gradient in proptest::collection::vec(-50.0f64..50.0, 1..40),
            k_frac in 0.0f64..=1.0,
            eta in 1.0e-3f64..10.0,
        ) {
            let n = gradient.len();
            let k = (((n as f64) * k_frac) as usize).min(n);
            let p = ftrl_optimize(&gradient, k, eta).unwrap();
            prop_assert!(validate_marginals(&p, k).is_ok(), "p = {:?}", p);
        }
    }
}
