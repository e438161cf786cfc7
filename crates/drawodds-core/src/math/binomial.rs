/// Binomial coefficient `n choose k` as a float.
///
/// Accumulates one factor at a time (`result * (n - i) / (i + 1)`) so the
/// intermediate value never exceeds the final coefficient by more than a
/// factor of `n`. Out-of-range arguments yield 0.
pub fn choose(n: i64, k: i64) -> f64 {
    if n < 0 || k < 0 || k > n {
        return 0.0;
    }
    // Symmetry keeps the loop short for k close to n.
    let k = k.min(n - k);
    let mut result = 1.0_f64;
    for i in 0..k {
        result = result * (n - i) as f64 / (i + 1) as f64;
    }
    result
}
