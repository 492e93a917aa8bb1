//! Symbolic polynomials evaluated over Taylor numbers.
//!
//! This is the slow, obviously-correct path: every term is built from
//! integer powers and products of its arguments. It shares no code with the
//! Bell polynomial machinery and serves as a reference for it.

use leibniz_ops::{Layout, OperatorCache, TaylorError};
use leibniz_poly::Polynomial;

use crate::number::TaylorNumber;

/// Evaluates `p` with `x_v = args[v]`, using `cache`.
///
/// The result has the given layout even when `p` is constant.
///
/// # Errors
///
/// Fails if an argument's layout differs from `layout`.
///
/// # Panics
///
/// Panics if a variable index is out of range for `args`.
pub fn eval_polynomial_in(
    p: &Polynomial,
    layout: Layout,
    args: &[TaylorNumber],
    cache: &OperatorCache,
) -> Result<TaylorNumber, TaylorError> {
    for arg in args {
        layout.check_same(&arg.layout())?;
    }

    let mut sum = TaylorNumber::new(layout.params(), layout.order());
    for term in p.terms() {
        let mut product = TaylorNumber::constant(layout.params(), layout.order(), term.factor_f64());
        for (v, e) in term.monomial.iter() {
            let arg = &args[v as usize];
            let factor = if e == 1 {
                arg.clone()
            } else {
                arg.pow_in(e as i32, cache)
            };
            product = product.try_mul_in(&factor, cache)?;
        }
        sum = sum.try_add(&product)?;
    }

    tracing::trace!(
        target: "leibniz::eval",
        terms = p.len(),
        order = layout.order(),
        "polynomial_evaluated"
    );
    Ok(sum)
}

/// Evaluates `p` with `x_v = args[v]`, using the global cache.
///
/// # Errors
///
/// See [`eval_polynomial_in`].
///
/// # Panics
///
/// Panics if a variable index is out of range for `args`.
pub fn eval_polynomial(p: &Polynomial, layout: Layout, args: &[TaylorNumber]) -> Result<TaylorNumber, TaylorError> {
    eval_polynomial_in(p, layout, args, OperatorCache::global())
}
