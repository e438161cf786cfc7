use super::binomial::choose;

/// Clamps floating drift into the probability range.
pub fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

/// Probability of exactly `k` successes when drawing `draws` cards from a
/// library of `population` cards containing `successes` hits.
pub fn exactly_k(population: i64, successes: i64, draws: i64, k: i64) -> f64 {
    let failures = population - successes;
    let misses = draws - k;
    if k < 0 || k > successes || misses < 0 || misses > failures {
        return 0.0;
    }
    let total = choose(population, draws);
    if total == 0.0 {
        return 0.0;
    }
    clamp_probability(choose(successes, k) * choose(failures, misses) / total)
}

/// `P(X >= k)`, summed over the complementary low tail.
pub fn at_least_k(population: i64, successes: i64, draws: i64, k: i64) -> f64 {
    if k <= 0 {
        return 1.0;
    }
    if successes < 0 || successes > population || choose(population, draws) == 0.0 {
        return 0.0;
    }
    let below: f64 = (0..k)
        .map(|i| exactly_k(population, successes, draws, i))
        .sum();
    clamp_probability(1.0 - below)
}

/// `P(X <= k)`.
pub fn at_most_k(population: i64, successes: i64, draws: i64, k: i64) -> f64 {
    if k < 0 {
        return 0.0;
    }
    let upper = k.min(draws.max(0));
    let total: f64 = (0..=upper)
        .map(|i| exactly_k(population, successes, draws, i))
        .sum();
    clamp_probability(total)
}

/// Dense probability mass function over `0..=draws`.
pub fn pmf(population: i64, successes: i64, draws: i64) -> Vec<f64> {
    if draws < 0 {
        return Vec::new();
    }
    (0..=draws)
        .map(|k| exactly_k(population, successes, draws, k))
        .collect()
}

/// Mean number of hits, `draws * successes / population`.
pub fn expected_value(population: i64, successes: i64, draws: i64) -> f64 {
    if population <= 0 || successes <= 0 || draws <= 0 {
        return 0.0;
    }
    draws as f64 * successes as f64 / population as f64
}

pub fn variance(population: i64, successes: i64, draws: i64) -> f64 {
    if population <= 1 || successes <= 0 || draws <= 0 {
        return 0.0;
    }
    let n = population as f64;
    let p = successes as f64 / n;
    let finite = (n - draws as f64) / (n - 1.0);
    (draws as f64 * p * (1.0 - p) * finite).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pmf_sums_to_one() {
        let cases = [(60, 24, 7), (40, 17, 10), (100, 50, 4), (99, 1, 30)];
        for (population, successes, draws) in cases {
            let total: f64 = pmf(population, successes, draws).iter().sum();
            assert!((total - 1.0).abs() < 1e-9, "N={population} K={successes} n={draws}: {total}");
        }
    }

    #[test]
    fn impossible_draws_are_zero() {
        assert_eq!(exactly_k(60, 4, 7, 5), 0.0);
        // Seven misses needed out of only five non-hits.
        assert_eq!(exactly_k(10, 5, 7, 0), 0.0);
        assert_eq!(exactly_k(10, 5, 11, 5), 0.0);
        assert_eq!(exactly_k(0, 0, 1, 0), 0.0);
        assert_eq!(exactly_k(60, 24, 7, -1), 0.0);
    }

    #[test]
    fn impossible_parameters_fail_closed() {
        // More draws than cards.
        assert_eq!(at_least_k(10, 5, 11, 1), 0.0);
        // More hits than cards.
        assert_eq!(at_least_k(5, 10, 3, 1), 0.0);
        assert_eq!(at_least_k(10, -1, 3, 1), 0.0);
        assert_eq!(at_least_k(10, 5, -1, 1), 0.0);
        assert_eq!(at_least_k(0, 0, 1, 1), 0.0);
    }

    #[test]
    fn opening_hand_two_lands() {
        let p = exactly_k(60, 24, 7, 2);
        assert!((p - 0.2694).abs() < 1e-4, "p = {p}");
    }

    #[test]
    fn opening_hand_at_least_one_land() {
        let p = at_least_k(60, 24, 7, 1);
        assert!((p - 0.9784).abs() < 1e-4, "p = {p}");
    }

    #[test]
    fn at_least_zero_is_certain() {
        for (population, successes, draws) in [(60, 24, 7), (1, 0, 1), (0, 0, 0), (30, 30, 30)] {
            assert_eq!(at_least_k(population, successes, draws, 0), 1.0);
        }
    }

    #[test]
    fn at_least_is_non_increasing() {
        let mut previous = 1.0;
        for k in 0..=8 {
            let p = at_least_k(60, 24, 7, k);
            assert!(p <= previous + 1e-12, "k={k}");
            assert!((0.0..=1.0).contains(&p));
            previous = p;
        }
        assert!(at_least_k(60, 24, 7, 8) < 1e-12);
    }

    #[test]
    fn tails_are_complementary() {
        for k in 0..7 {
            let sum = at_most_k(60, 24, 7, k) + at_least_k(60, 24, 7, k + 1);
            assert!((sum - 1.0).abs() < 1e-9);
        }
        assert_eq!(at_most_k(60, 24, 7, -1), 0.0);
    }

    #[test]
    fn expected_matches_closed_form() {
        assert_eq!(expected_value(100, 50, 4), 2.0);
        assert_eq!(expected_value(0, 0, 4), 0.0);
        let mean: f64 = pmf(60, 24, 7)
            .iter()
            .enumerate()
            .map(|(k, p)| k as f64 * p)
            .sum();
        assert!((mean - expected_value(60, 24, 7)).abs() < 1e-9);
    }

    #[test]
    fn variance_matches_pmf() {
        let probs = pmf(60, 24, 7);
        let mean = expected_value(60, 24, 7);
        let var: f64 = probs
            .iter()
            .enumerate()
            .map(|(k, p)| (k as f64 - mean).powi(2) * p)
            .sum();
        assert!((var - variance(60, 24, 7)).abs() < 1e-9);
        assert_eq!(variance(1, 1, 1), 0.0);
    }

    #[test]
    fn clamp_handles_drift_and_nan() {
        assert_eq!(clamp_probability(1.0 + 1e-15), 1.0);
        assert_eq!(clamp_probability(-1e-17), 0.0);
        assert_eq!(clamp_probability(f64::NAN), 0.0);
    }
}
