//! Ground-set conventions and characteristic-vector helpers.
//!
//! Elements of the ground set are 1-based ids in `[1, n]`. A characteristic
//! vector is a length-`n` `f64` vector: binary (`{0, 1}`) for concrete sets
//! and hints, fractional for inclusion-probability vectors (every coordinate
//! in `[0, 1]`, coordinates summing to `k`).

use crate::{Error, Result, FEASIBILITY_TOL};

/// Build the characteristic vector of a set of 1-based element ids.
///
/// Duplicate ids are idempotent (the coordinate is set to 1 once).
///
/// # Example
///
/// ```rust
/// let v = kpick::indicator(&[1, 4], 5).unwrap();
/// assert_eq!(v, vec![1.0, 0.0, 0.0, 1.0, 0.0]);
/// ```
pub fn indicator(elements: &[usize], n: usize) -> Result<Vec<f64>> {
    let mut v = vec![0.0; n];
    for &e in elements {
        if e == 0 || e > n {
            return Err(Error::ElementOutOfRange { element: e, n });
        }
        v[e - 1] = 1.0;
    }
    Ok(v)
}

/// Whether two sets of element ids share at least one element.
///
/// This is the binary reward signal the driver loop derives per round.
pub fn sets_intersect(prediction: &[usize], reward: &[usize]) -> bool {
    prediction.iter().any(|e| reward.contains(e))
}

/// Validate a reward set: nonempty, every element in `[1, n]`.
pub fn validate_reward(reward: &[usize], n: usize) -> Result<()> {
    if reward.is_empty() {
        return Err(Error::EmptyReward);
    }
    for &e in reward {
        if e == 0 || e > n {
            return Err(Error::ElementOutOfRange { element: e, n });
        }
    }
    Ok(())
}

/// Validate a hint vector: length `n`, every coordinate exactly 0 or 1.
pub fn validate_hint(hint: &[f64], n: usize) -> Result<()> {
    if hint.len() != n {
        return Err(Error::LengthMismatch {
            expected: n,
            got: hint.len(),
        });
    }
    if let Some(x) = hint.iter().find(|&&x| x != 0.0 && x != 1.0) {
        return Err(Error::InvalidConfig(format!(
            "hint coordinates must be 0 or 1, got {x}"
        )));
    }
    Ok(())
}

/// Validate an inclusion-probability vector against the fractional k-subset
/// polytope: every coordinate in `[0, 1]` and the coordinates summing to `k`,
/// both within [`FEASIBILITY_TOL`].
pub fn validate_marginals(p: &[f64], k: usize) -> Result<()> {
    let mut sum = 0.0;
    for (i, &pi) in p.iter().enumerate() {
        if !pi.is_finite() || pi < -FEASIBILITY_TOL || pi > 1.0 + FEASIBILITY_TOL {
            return Err(Error::InfeasibleMarginals(format!(
                "coordinate {} = {pi} outside [0, 1]",
                i + 1
            )));
        }
        sum += pi;
    }
    if (sum - k as f64).abs() > FEASIBILITY_TOL * (p.len() as f64).max(1.0) {
        return Err(Error::InfeasibleMarginals(format!(
            "coordinates sum to {sum}, expected k = {k}"
        )));
    }
    Ok(())
}
