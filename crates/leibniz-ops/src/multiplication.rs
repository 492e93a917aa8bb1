//! Product rule over coefficient buffers.
//!
//! `Multiplication` at order `n` fills row `n` of `a * b` with the Leibniz
//! convolution
//!
//! ```text
//! (ab)[n, 0] = Σ_k C(n,k) a[n-k, 0] b[k, 0]
//! (ab)[n, j] = Σ_k C(n,k) (a[n-k, j] b[k, 0] + a[n-k, 0] b[k, j])
//! ```
//!
//! and delegates rows `0..n` to the level below it. Levels are chained
//! through [`Arc`] so a level can be shared by the cache and its callers.

use std::sync::Arc;

use crate::binomial::binomial_row_f64;
use crate::buffer::Layout;
use crate::error::TaylorError;

/// The multiplication operator for one order.
#[derive(Debug)]
pub struct Multiplication {
    order: usize,
    binomial: Vec<f64>,
    lower: Option<Arc<Multiplication>>,
}

impl Multiplication {
    /// Builds the level for `order`, chained onto the level for `order - 1`.
    pub(crate) fn new(order: usize, lower: Option<Arc<Self>>) -> Self {
        debug_assert_eq!(lower.as_ref().map(|l| l.order), order.checked_sub(1));
        Self {
            order,
            binomial: binomial_row_f64(order),
            lower,
        }
    }

    /// Returns the order this level computes.
    #[must_use]
    pub const fn order(&self) -> usize {
        self.order
    }

    /// Returns the binomial row `C(order, k)`.
    #[must_use]
    pub fn binomial(&self) -> &[f64] {
        &self.binomial
    }

    fn layout(&self, width: usize, len: usize) -> Result<Layout, TaylorError> {
        let layout = Layout::from_width(width, len)?;
        layout.check_same(&Layout::new(width - 1, self.order))?;
        Ok(layout)
    }

    /// Writes `a * b` into `target`, rows `0..=order`.
    ///
    /// # Errors
    ///
    /// Fails unless all three buffers have the layout of `width` columns and
    /// this level's order.
    pub fn apply(&self, a: &[f64], b: &[f64], target: &mut [f64], width: usize) -> Result<(), TaylorError> {
        let layout = self.layout(width, a.len())?;
        layout.check(b)?;
        layout.check(target)?;
        self.fill(a, b, target, width);
        Ok(())
    }

    /// Replaces `a` with `a * b`.
    ///
    /// Rows of `a` are read after lower rows of the result are written, so
    /// the left operand is copied first.
    ///
    /// # Errors
    ///
    /// Same as [`Multiplication::apply`].
    pub fn apply_assign(&self, a: &mut [f64], b: &[f64], width: usize) -> Result<(), TaylorError> {
        let left = a.to_vec();
        self.apply(&left, b, a, width)
    }

    fn fill(&self, a: &[f64], b: &[f64], target: &mut [f64], width: usize) {
        if let Some(lower) = &self.lower {
            lower.fill(a, b, target, width);
        }

        let n = self.order;
        let row = n * width;

        let mut value = 0.0;
        for (k, c) in self.binomial.iter().enumerate() {
            value += c * a[(n - k) * width] * b[k * width];
        }
        target[row] = value;

        for j in 1..width {
            let mut d = 0.0;
            for (k, c) in self.binomial.iter().enumerate() {
                d += c * a[(n - k) * width + j] * b[k * width];
                d += c * a[(n - k) * width] * b[k * width + j];
            }
            target[row + j] = d;
        }
    }
}
