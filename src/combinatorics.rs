//! Factorials and binomial coefficients in floating point
//!
//! Values are computed as `f64` products, so precision degrades well before
//! overflow and `factorial(171)` is already infinite. Callers bound `n`
//! through [`MAX_FACTORIAL_INPUT`].

/// Largest `n` whose factorial is still finite in `f64`.
pub const MAX_FACTORIAL_INPUT: u32 = 170;

/// n! as a float. `factorial(0) == factorial(1) == 1`.
pub fn factorial(n: u32) -> f64 {
    if n <= 1 {
        return 1.0;
    }
    n as f64 * factorial(n - 1)
}

/// Binomial coefficient C(n, k), defined as 0 when `k > n`.
pub fn combination(n: u32, k: u32) -> f64 {
    if k > n {
        return 0.0;
    }
    factorial(n) / (factorial(k) * factorial(n - k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factorial_small_values() {
        assert_eq!(factorial(0), 1.0);
        assert_eq!(factorial(1), 1.0);
        assert_eq!(factorial(5), 120.0);
        assert_eq!(factorial(10), 3_628_800.0);
    }

    #[test]
    fn test_factorial_bound_is_finite() {
        assert!(factorial(MAX_FACTORIAL_INPUT).is_finite());
        assert!(factorial(MAX_FACTORIAL_INPUT + 1).is_infinite());
    }

    #[test]
    fn test_combination() {
        assert_eq!(combination(5, 2), 10.0);
        for n in 0..20 {
            assert_eq!(combination(n, 0), 1.0);
            assert_eq!(combination(n, n), 1.0);
        }
        assert_eq!(combination(10, 3), combination(10, 7));
    }

    #[test]
    fn test_combination_k_greater_than_n_is_zero() {
        assert_eq!(combination(3, 4), 0.0);
        assert_eq!(combination(0, 1), 0.0);
    }
}
