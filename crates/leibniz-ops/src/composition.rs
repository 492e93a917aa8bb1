//! Faà di Bruno composition over coefficient buffers.
//!
//! Given the derivatives `f[0..=order+1]` of an outer scalar function at the
//! value of `a`, `Composition` at order `n` fills row `n` of `f(a)`:
//!
//! ```text
//! row 0:  f(a)[0]   = f[0]
//!         f(a)[j]   = f[1] · a[j]
//! row n:  f(a)[n,0] = Σ_{k=1}^{n} f[k] · B(n,k)
//!         f(a)[n,j] = Σ_{k=1}^{n} f[k+1] · a[j] · B(n,k) + f[k] · ∂_j B(n,k)
//! ```
//!
//! with `B(n,k)` evaluated on the value column of `a` and `∂_j B(n,k)` its
//! total derivative read through parameter column `j`.
//!
//! Unlike multiplication, building level `n` needs the convolutions stored
//! in every lower level, not just the binomial row.

use std::sync::Arc;

use leibniz_poly::Polynomial;

use crate::bell::{convolutes, BellPolynomial};
use crate::buffer::Layout;
use crate::config::BellEvaluator;
use crate::error::TaylorError;

/// The composition operator for one order.
#[derive(Debug)]
pub struct Composition {
    order: usize,
    convolutes: Vec<Polynomial>,
    bell: Vec<BellPolynomial>,
    lower: Option<Arc<Composition>>,
}

/// Reusable evaluation buffers for [`Composition::apply_in`].
///
/// Holds the Bell polynomial values of the current level and the argument
/// vector and stack of the bytecode evaluator. Buffers grow to the largest
/// order seen and are then reused without allocating.
#[derive(Clone, Debug, Default)]
pub struct CompositionScratch {
    values: Vec<f64>,
    args: Vec<f64>,
    stack: Vec<f64>,
}

impl CompositionScratch {
    /// Creates empty scratch space.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Composition {
    /// Builds the level for `order` from all levels below it.
    pub(crate) fn new(order: usize, lower_levels: &[Arc<Self>]) -> Self {
        debug_assert_eq!(lower_levels.len(), order);
        debug_assert!(lower_levels.iter().enumerate().all(|(m, l)| l.order == m));

        let lower: Vec<&[Polynomial]> = lower_levels.iter().map(|l| l.convolutes.as_slice()).collect();
        let convolutes = convolutes(order, &lower);
        let bell = convolutes
            .iter()
            .enumerate()
            .map(|(i, c)| BellPolynomial::new(order, i + 1, c))
            .collect();

        Self {
            order,
            convolutes,
            bell,
            lower: lower_levels.last().cloned(),
        }
    }

    /// Returns the order this level computes.
    #[must_use]
    pub const fn order(&self) -> usize {
        self.order
    }

    /// Returns `B(order, k)` for `k = 1..=order`.
    #[must_use]
    pub fn bell_polynomials(&self) -> &[BellPolynomial] {
        &self.bell
    }

    /// Returns the convolution `conv(k, order)`, if `1 <= k <= order`.
    #[must_use]
    pub fn convolute(&self, k: usize) -> Option<&Polynomial> {
        k.checked_sub(1).and_then(|i| self.convolutes.get(i))
    }

    /// Returns the number of flattened products evaluated per column at
    /// this level (value plus derivative forms).
    #[must_use]
    pub fn product_count(&self) -> usize {
        self.bell
            .iter()
            .map(|b| b.value_sum().len() + b.derivative_sum().len())
            .sum()
    }

    /// Writes `f(a)` into `target` using flattened products.
    ///
    /// # Errors
    ///
    /// See [`Composition::apply_with`].
    pub fn apply(&self, f: &[f64], a: &[f64], target: &mut [f64], width: usize) -> Result<(), TaylorError> {
        self.apply_with(BellEvaluator::Products, f, a, target, width)
    }

    /// Writes `f(a)` into `target`, rows `0..=order`.
    ///
    /// `f[k]` is the raw `k`-th derivative of the outer function at `a`'s
    /// value; at least `order + 2` entries are required.
    ///
    /// # Errors
    ///
    /// Fails on mismatched buffer shapes or a short derivative sequence.
    pub fn apply_with(
        &self,
        evaluator: BellEvaluator,
        f: &[f64],
        a: &[f64],
        target: &mut [f64],
        width: usize,
    ) -> Result<(), TaylorError> {
        self.apply_in(evaluator, f, a, target, width, &mut CompositionScratch::new())
    }

    /// Same as [`Composition::apply_with`], reusing `scratch` across calls.
    ///
    /// # Errors
    ///
    /// See [`Composition::apply_with`].
    pub fn apply_in(
        &self,
        evaluator: BellEvaluator,
        f: &[f64],
        a: &[f64],
        target: &mut [f64],
        width: usize,
        scratch: &mut CompositionScratch,
    ) -> Result<(), TaylorError> {
        let layout = Layout::from_width(width, a.len())?;
        layout.check_same(&Layout::new(width - 1, self.order))?;
        layout.check(target)?;
        if f.len() < self.order + 2 {
            return Err(TaylorError::DerivativeSequence {
                expected: self.order + 2,
                actual: f.len(),
            });
        }

        self.fill(evaluator, f, a, target, width, scratch);
        Ok(())
    }

    fn fill(
        &self,
        evaluator: BellEvaluator,
        f: &[f64],
        a: &[f64],
        target: &mut [f64],
        width: usize,
        scratch: &mut CompositionScratch,
    ) {
        if let Some(lower) = &self.lower {
            lower.fill(evaluator, f, a, target, width, scratch);
        }

        let n = self.order;
        if n == 0 {
            target[0] = f[0];
            for j in 1..width {
                target[j] = f[1] * a[j];
            }
            return;
        }

        let row = n * width;
        let CompositionScratch { values, args, stack } = scratch;

        if evaluator == BellEvaluator::Bytecode {
            // [x_0..=x_n, dx_0..=dx_n]
            args.clear();
            args.extend((0..=n).map(|r| a[r * width]));
            args.resize(2 * (n + 1), 0.0);
        }

        values.clear();
        values.extend(self.bell.iter().map(|b| match evaluator {
            BellEvaluator::Products => b.value_sum().eval(a, width),
            BellEvaluator::Bytecode => b.value_program().eval_with(args, stack),
        }));

        target[row] = self.bell.iter().zip(values.iter()).map(|(b, v)| f[b.k()] * v).sum();

        for j in 1..width {
            if evaluator == BellEvaluator::Bytecode {
                for r in 0..=n {
                    args[n + 1 + r] = a[r * width + j];
                }
            }
            let mut d = 0.0;
            for (b, v) in self.bell.iter().zip(values.iter()) {
                let k = b.k();
                let der = match evaluator {
                    BellEvaluator::Products => b.derivative_sum().eval(a, width, j),
                    BellEvaluator::Bytecode => b.derivative_program().eval_with(args, stack),
                };
                d += f[k + 1] * a[j] * v;
                d += f[k] * der;
            }
            target[row + j] = d;
        }
    }
}
