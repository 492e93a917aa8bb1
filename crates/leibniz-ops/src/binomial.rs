//! Rows of Pascal's triangle.

use leibniz_poly::IBig;

/// Returns `[C(n, 0), C(n, 1), ..., C(n, n)]` as exact integers.
///
/// Uses the multiplicative recurrence `C(n, k+1) = C(n, k) * (n-k) / (k+1)`;
/// every division is exact.
#[must_use]
pub fn binomial_row(n: usize) -> Vec<IBig> {
    let mut row = Vec::with_capacity(n + 1);
    let mut c = IBig::ONE;
    row.push(c.clone());
    for k in 0..n {
        c = c * IBig::from(n - k) / IBig::from(k + 1);
        row.push(c.clone());
    }
    row
}

/// Returns row `n` of Pascal's triangle as reals.
///
/// Computed in `f64` directly so that large orders degrade gracefully
/// instead of overflowing.
#[must_use]
pub fn binomial_row_f64(n: usize) -> Vec<f64> {
    let mut row = Vec::with_capacity(n + 1);
    let mut c = 1.0;
    row.push(c);
    for k in 0..n {
        c = c * (n - k) as f64 / (k + 1) as f64;
        row.push(c);
    }
    row
}

/// Returns `n!` as an exact integer.
#[must_use]
pub fn factorial(n: usize) -> IBig {
    (1..=n).fold(IBig::ONE, |acc, k| acc * IBig::from(k))
}
