//! Integer powers as a special case of composition.

/// Returns the raw derivatives `f[0..=order+1]` of `f(y) = y^n` at `y = x`.
///
/// `f[k] = n (n-1) ... (n-k+1) · x^(n-k)`. For `n >= 0` the falling factorial
/// reaches zero at `k = n + 1`, and those entries are written as exact zeros
/// so that `x = 0` does not produce `0 · inf`. For `n < 0` and `x = 0` the
/// entries are non-finite, as for ordinary division by zero.
#[must_use]
pub fn power_derivatives(x: f64, n: i32, order: usize) -> Vec<f64> {
    let len = order + 2;
    let mut f = Vec::with_capacity(len);
    let mut falling = 1.0;

    for k in 0..len {
        let exponent = i64::from(n) - k as i64;
        if n >= 0 && exponent < 0 {
            f.push(0.0);
            continue;
        }
        let base = if exponent >= 0 {
            num_traits::pow(x, exponent as usize)
        } else {
            num_traits::pow(x.recip(), exponent.unsigned_abs() as usize)
        };
        f.push(falling * base);
        falling *= exponent as f64;
    }

    f
}
