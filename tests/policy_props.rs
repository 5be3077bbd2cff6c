//! Property tests for the optimizers, the sampler, and the policies.

use kpick::{
    ftrl_optimize, linear_optimize, madow_sample_with_u, validate_marginals, OftplConfig,
    OftplHints, RankedBandits, RankedBanditsConfig, SCore, SCoreConfig, SubsetPolicy,
};
use proptest::prelude::*;

/// A feasible inclusion-probability vector: spread k units of mass over the
/// coordinates proportionally to `raw`, clipping at 1 and re-spreading the
/// excess until everything is placed.
fn feasible_marginals(raw: &[f64], k: usize) -> Vec<f64> {
    let n = raw.len();
    let mut p = vec![0.0; n];
    let mut remaining = k as f64;
    let mut active: Vec<usize> = (0..n).collect();
    while remaining > 1e-12 && !active.is_empty() {
        let total: f64 = active.iter().map(|&i| raw[i].max(1e-9)).sum();
        let mut placed = 0.0;
        let mut still_open = Vec::new();
        for &i in &active {
            let share = remaining * raw[i].max(1e-9) / total;
            let add = share.min(1.0 - p[i]);
            p[i] += add;
            placed += add;
            if p[i] < 1.0 {
                still_open.push(i);
            }
        }
        remaining -= placed;
        if placed <= 1e-15 {
            break;
        }
        active = still_open;
    }
    assert!(
        validate_marginals(&p, k).is_ok(),
        "generator produced infeasible marginals for n={n}, k={k}: {p:?}"
    );
    p
}

proptest! {
    /// Madow returns exactly k distinct, increasing, in-range element ids
    /// for any feasible marginals and any shared draw.
    #[test]
    fn madow_returns_k_distinct_elements(
        raw in proptest::collection::vec(0.0f64..1.0, 2..40),
        k_frac in 0.0f64..1.0,
        u in 0.0f64..1.0,
    ) {
        let n = raw.len();
        let k = (((n as f64) * k_frac) as usize).clamp(1, n);
        let p = feasible_marginals(&raw, k);

        let picked = madow_sample_with_u(&p, k, u).unwrap();
        prop_assert_eq!(picked.len(), k);
        for w in picked.windows(2) {
            prop_assert!(w[0] < w[1], "ids must be distinct and increasing: {:?}", picked);
        }
        for &e in &picked {
            prop_assert!((1..=n).contains(&e));
        }
    }

    /// Madow never selects an element with zero inclusion probability.
    #[test]
    fn madow_skips_zero_marginals(
        k in 1usize..6,
        gap in 1usize..5,
        u in 0.0f64..1.0,
    ) {
        // k ones separated by zero-probability gaps.
        let mut p = Vec::new();
        for _ in 0..k {
            p.push(1.0);
            p.extend(std::iter::repeat(0.0).take(gap));
        }
        let picked = madow_sample_with_u(&p, k, u).unwrap();
        for &e in &picked {
            prop_assert!(p[e - 1] > 0.0, "picked zero-probability element {e}");
        }
    }

    /// The linear optimizer agrees with a brute-force oracle: exactly k
    /// ones, and no swap of a chosen for a rejected index improves the
    /// objective.
    #[test]
    fn linear_optimizer_is_optimal(
        cost in proptest::collection::vec(-1.0e4f64..1.0e4, 1..30),
        k_frac in 0.0f64..1.0,
    ) {
        let n = cost.len();
        let k = (((n as f64) * k_frac) as usize).min(n);
        let p = linear_optimize(&cost, k).unwrap();

        prop_assert_eq!(p.iter().filter(|&&x| x == 1.0).count(), k);
        prop_assert_eq!(p.iter().filter(|&&x| x == 0.0).count(), n - k);

        let worst_chosen = cost.iter().zip(&p).filter(|(_, &x)| x == 1.0)
            .map(|(&c, _)| c).fold(f64::INFINITY, f64::min);
        let best_rejected = cost.iter().zip(&p).filter(|(_, &x)| x == 0.0)
            .map(|(&c, _)| c).fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(k == 0 || k == n || worst_chosen >= best_rejected);
    }

    /// The FTRL step lands in the polytope for arbitrary gradients and
    /// learning rates, including aggressively sharp ones.
    #[test]
    fn ftrl_stays_feasible(
        gradient in proptest::collection::vec(-200.0f64..200.0, 1..50),
        k_frac in 0.0f64..=1.0,
        eta in prop_oneof![1.0e-4f64..1.0e-1, 0.1f64..5.0, 5.0f64..100.0],
    ) {
        let n = gradient.len();
        let k = (((n as f64) * k_frac) as usize).min(n);
        let p = ftrl_optimize(&gradient, k, eta).unwrap();
        prop_assert!(validate_marginals(&p, k).is_ok(), "p = {:?}", p);
    }

    /// Sharper learning rates concentrate FTRL mass on the top-k support.
    #[test]
    fn ftrl_sharpens_toward_top_k(
        seedish in 0u64..1000,
    ) {
        let gradient: Vec<f64> = (0..10).map(|i| ((i as u64 * 7 + seedish) % 13) as f64).collect();
        let k = 3;
        let soft = ftrl_optimize(&gradient, k, 0.01).unwrap();
        let sharp = ftrl_optimize(&gradient, k, 50.0).unwrap();
        let top_k = linear_optimize(&gradient, k).unwrap();

        let mass = |p: &[f64]| -> f64 {
            p.iter().zip(&top_k).filter(|(_, &t)| t == 1.0).map(|(&x, _)| x).sum()
        };
        prop_assert!(mass(&sharp) >= mass(&soft) - 1e-9);
    }

    /// RankedBandits never emits duplicates, whatever the stream does.
    #[test]
    fn ranked_bandits_outputs_are_duplicate_free(
        seed in any::<u64>(),
        n in 3usize..12,
        k_frac in 0.0f64..1.0,
        rewards in proptest::collection::vec(1usize..12, 1..60),
    ) {
        let k = (((n as f64) * k_frac) as usize).clamp(1, n);
        let mut policy = RankedBandits::new(RankedBanditsConfig {
            n, k, horizon: 60, seed,
        }).unwrap();

        for &r in &rewards {
            let picked = policy.get_k_set(None).unwrap();
            let mut sorted = picked.clone();
            sorted.sort_unstable();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), k, "duplicates in {:?}", picked);
            policy.feed_reward(&[(r % n) + 1], None).unwrap();
        }
    }

    /// Two identically-seeded instances of each policy stay in lockstep over
    /// an identical reward stream.
    #[test]
    fn policies_are_deterministic_given_seed(
        seed in any::<u64>(),
        rewards in proptest::collection::vec(1usize..30, 1..40),
    ) {
        let n = 30;
        let rewards: Vec<Vec<usize>> = rewards.iter().map(|&r| vec![r]).collect();

        let cfg = OftplConfig { n, k: 4, c: 11, seed };
        let mut o1 = OftplHints::new(cfg).unwrap();
        let mut o2 = OftplHints::new(cfg).unwrap();

        let scfg = SCoreConfig { n, k: 4, g: 1.0, horizon: 40, seed };
        let mut s1 = SCore::new(scfg).unwrap();
        let mut s2 = SCore::new(scfg).unwrap();

        let rcfg = RankedBanditsConfig { n, k: 4, horizon: 40, seed };
        let mut r1 = RankedBandits::new(rcfg).unwrap();
        let mut r2 = RankedBandits::new(rcfg).unwrap();

        for (t, reward) in rewards.iter().enumerate() {
            let mut hint = vec![0.0; n];
            hint[reward[0] - 1] = 1.0;

            prop_assert_eq!(
                o1.get_k_set(Some(&hint)).unwrap(),
                o2.get_k_set(Some(&hint)).unwrap(),
                "oftpl diverged at round {}", t
            );
            o1.feed_reward(reward, Some(&hint)).unwrap();
            o2.feed_reward(reward, Some(&hint)).unwrap();

            prop_assert_eq!(
                s1.get_k_set(None).unwrap(),
                s2.get_k_set(None).unwrap(),
                "score diverged at round {}", t
            );
            s1.feed_reward(reward, None).unwrap();
            s2.feed_reward(reward, None).unwrap();

            prop_assert_eq!(
                r1.get_k_set(None).unwrap(),
                r2.get_k_set(None).unwrap(),
                "ranked diverged at round {}", t
            );
            r1.feed_reward(reward, None).unwrap();
            r2.feed_reward(reward, None).unwrap();
        }
    }
}
