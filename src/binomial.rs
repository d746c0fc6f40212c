//! Binomial tail: chance of landing at least `threshold` hits

use crate::combinatorics::combination;

/// P(X = k) for X ~ Binomial(n, p).
#[inline]
pub fn binomial_probability(n: u32, k: u32, p: f64) -> f64 {
    if k > n {
        return 0.0;
    }
    combination(n, k) * p.powi(k as i32) * (1.0 - p).powi((n - k) as i32)
}

/// P(X >= threshold) for X ~ Binomial(n, p).
///
/// Sums the point probabilities from `threshold` to `n`. A threshold above
/// `n` is an empty sum and yields +0.
pub fn probability_of_at_least(n: u32, p: f64, threshold: u32) -> f64 {
    // an empty f64 `sum()` is -0.0, which renders as "-0.00"
    (threshold..=n).fold(0.0, |acc, k| acc + binomial_probability(n, k, p))
}
