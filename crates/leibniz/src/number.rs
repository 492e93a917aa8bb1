//! Multivariate Taylor numbers.
//!
//! A [`TaylorNumber`] owns one coefficient buffer (see
//! [`leibniz_ops::buffer`]) and forwards its arithmetic to an
//! [`OperatorCache`]. Operator sugar (`+`, `-`, `*`) uses the global cache
//! and panics on mismatched shapes, like slice indexing; the `try_*` methods
//! report the same conditions as [`TaylorError`]s and the `*_in` methods
//! take an explicit cache.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use leibniz_ops::{buffer, Layout, OperatorCache, TaylorError};

/// A value with all derivatives along a free variable up to a fixed order,
/// each with its first partial derivatives in a fixed set of parameters.
///
/// Derivatives are raw: row `r` holds `d^r/dt^r`, not divided by `r!`.
#[derive(Clone, Debug, PartialEq)]
pub struct TaylorNumber {
    layout: Layout,
    values: Vec<f64>,
}

impl TaylorNumber {
    /// Creates the zero number.
    #[must_use]
    pub fn new(params: usize, order: usize) -> Self {
        let layout = Layout::new(params, order);
        Self {
            layout,
            values: vec![0.0; layout.len()],
        }
    }

    /// Creates a constant: every derivative zero.
    #[must_use]
    pub fn constant(params: usize, order: usize, value: f64) -> Self {
        let mut n = Self::new(params, order);
        buffer::write_constant(&mut n.values, value);
        n
    }

    /// Creates the free variable `t` at `value`.
    #[must_use]
    pub fn free_variable(params: usize, order: usize, value: f64) -> Self {
        let mut n = Self::constant(params, order, value);
        if order > 0 {
            n.values[n.layout.index(1, 0)] = 1.0;
        }
        n
    }

    /// Creates parameter `param` (1-based) at `value`.
    ///
    /// Same as `constant(params, order, value).as_parameter(param)`.
    ///
    /// # Errors
    ///
    /// Fails if `param` is not in `1..=params`.
    pub fn parameter(params: usize, order: usize, value: f64, param: usize) -> Result<Self, TaylorError> {
        Self::constant(params, order, value).as_parameter(param)
    }

    /// Wraps an existing buffer of the given width.
    ///
    /// # Errors
    ///
    /// Fails if `values.len()` is not a positive multiple of `width`.
    pub fn from_values(width: usize, values: Vec<f64>) -> Result<Self, TaylorError> {
        let layout = Layout::from_width(width, values.len())?;
        Ok(Self { layout, values })
    }

    /// Returns a copy seeded as parameter `param`: `∂self/∂p_param = 1`.
    ///
    /// The seed is written to every row of the column, so that
    /// `der(param, r)` of any polynomial in parameters is its partial
    /// derivative in `param`, whatever the row `r`.
    ///
    /// # Errors
    ///
    /// Fails if `param` is not in `1..=params`.
    pub fn as_parameter(&self, param: usize) -> Result<Self, TaylorError> {
        let mut n = self.clone();
        buffer::seed_parameter(n.layout, &mut n.values, param)?;
        Ok(n)
    }

    /// Returns the buffer layout.
    #[must_use]
    pub const fn layout(&self) -> Layout {
        self.layout
    }

    /// Returns the number of parameters.
    #[must_use]
    pub const fn params(&self) -> usize {
        self.layout.params()
    }

    /// Returns the order.
    #[must_use]
    pub const fn order(&self) -> usize {
        self.layout.order()
    }

    /// Returns the width, `params + 1`.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.layout.width()
    }

    /// Returns the value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.values[0]
    }

    /// Returns the raw coefficient buffer.
    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.values
    }

    /// Consumes the number, returning its buffer.
    #[must_use]
    pub fn into_data(self) -> Vec<f64> {
        self.values
    }

    /// Returns the stored derivative at `(order, param)`.
    ///
    /// # Errors
    ///
    /// Fails if either index is out of range.
    pub fn der(&self, param: usize, order: usize) -> Result<f64, TaylorError> {
        buffer::mixed_derivative(self.layout, &self.values, order, param)
    }

    /// Returns the `order`-th derivative along the free variable.
    ///
    /// # Errors
    ///
    /// Fails if `order` exceeds the number's order.
    pub fn total_derivative(&self, order: usize) -> Result<f64, TaylorError> {
        buffer::total_derivative(self.layout, &self.values, order)
    }

    /// Returns the first partial derivative with respect to `param`.
    ///
    /// # Errors
    ///
    /// Fails if `param` exceeds the number of parameters.
    pub fn partial_derivative(&self, param: usize) -> Result<f64, TaylorError> {
        buffer::partial_derivative(self.layout, &self.values, param)
    }

    fn zip_with(
        &self,
        other: &Self,
        op: fn(Layout, &[f64], &[f64], &mut [f64]) -> Result<(), TaylorError>,
    ) -> Result<Self, TaylorError> {
        self.layout.check_same(&other.layout)?;
        let mut out = Self::new(self.params(), self.order());
        op(self.layout, &self.values, &other.values, &mut out.values)?;
        Ok(out)
    }

    /// Componentwise sum.
    ///
    /// # Errors
    ///
    /// Fails on mismatched shapes.
    pub fn try_add(&self, other: &Self) -> Result<Self, TaylorError> {
        self.zip_with(other, buffer::add)
    }

    /// Componentwise difference.
    ///
    /// # Errors
    ///
    /// Fails on mismatched shapes.
    pub fn try_sub(&self, other: &Self) -> Result<Self, TaylorError> {
        self.zip_with(other, buffer::sub)
    }

    /// Product by the Leibniz rule, using `cache`.
    ///
    /// # Errors
    ///
    /// Fails on mismatched shapes.
    pub fn try_mul_in(&self, other: &Self, cache: &OperatorCache) -> Result<Self, TaylorError> {
        self.layout.check_same(&other.layout)?;
        let mut out = Self::new(self.params(), self.order());
        cache.multiply(&self.values, &other.values, &mut out.values, self.width())?;
        Ok(out)
    }

    /// Product by the Leibniz rule, using the global cache.
    ///
    /// # Errors
    ///
    /// Fails on mismatched shapes.
    pub fn try_mul(&self, other: &Self) -> Result<Self, TaylorError> {
        self.try_mul_in(other, OperatorCache::global())
    }

    /// Division is not supported.
    ///
    /// # Errors
    ///
    /// Always returns [`TaylorError::Unsupported`].
    pub fn try_div(&self, _other: &Self) -> Result<Self, TaylorError> {
        Err(TaylorError::Unsupported("division of Taylor numbers"))
    }

    /// Composes an outer function with this number, using `cache`.
    ///
    /// `f[k]` is the raw `k`-th derivative of the outer function at
    /// [`TaylorNumber::value`]; `order + 2` entries are needed.
    ///
    /// # Errors
    ///
    /// Fails if `f` has fewer than `order + 2` entries.
    pub fn compose_in(&self, f: &[f64], cache: &OperatorCache) -> Result<Self, TaylorError> {
        let mut out = Self::new(self.params(), self.order());
        cache.compose(f, &self.values, &mut out.values, self.width())?;
        Ok(out)
    }

    /// Composes an outer function with this number, using the global cache.
    ///
    /// # Errors
    ///
    /// See [`TaylorNumber::compose_in`].
    pub fn compose(&self, f: &[f64]) -> Result<Self, TaylorError> {
        self.compose_in(f, OperatorCache::global())
    }

    /// Raises to an integer power, using `cache`.
    ///
    /// Negative powers of a zero value yield non-finite coefficients.
    #[must_use]
    pub fn pow_in(&self, n: i32, cache: &OperatorCache) -> Self {
        self.map(|layout, a, target| cache.pow(a, n, target, layout.width()))
    }

    /// Raises to an integer power, using the global cache.
    #[must_use]
    pub fn pow(&self, n: i32) -> Self {
        self.pow_in(n, OperatorCache::global())
    }

    fn map(&self, f: impl Fn(Layout, &[f64], &mut [f64]) -> Result<(), TaylorError>) -> Self {
        let mut out = Self::new(self.params(), self.order());
        // Both buffers share `self.layout` and every derivative sequence built
        // here has `order + 2` entries, so the checks cannot fail.
        if let Err(e) = f(self.layout, &self.values, &mut out.values) {
            unreachable!("{e}");
        }
        out
    }
}

fn shape_ok<T>(result: Result<T, TaylorError>, op: &str) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("{op}: {e}"),
    }
}

/// # Panics
///
/// Panics if the operands have different shapes.
impl Add for &TaylorNumber {
    type Output = TaylorNumber;

    fn add(self, rhs: &TaylorNumber) -> TaylorNumber {
        shape_ok(self.try_add(rhs), "add")
    }
}

impl Add for TaylorNumber {
    type Output = TaylorNumber;

    fn add(self, rhs: TaylorNumber) -> TaylorNumber {
        &self + &rhs
    }
}

/// # Panics
///
/// Panics if the operands have different shapes.
impl Sub for &TaylorNumber {
    type Output = TaylorNumber;

    fn sub(self, rhs: &TaylorNumber) -> TaylorNumber {
        shape_ok(self.try_sub(rhs), "sub")
    }
}

impl Sub for TaylorNumber {
    type Output = TaylorNumber;

    fn sub(self, rhs: TaylorNumber) -> TaylorNumber {
        &self - &rhs
    }
}

/// # Panics
///
/// Panics if the operands have different shapes.
impl Mul for &TaylorNumber {
    type Output = TaylorNumber;

    fn mul(self, rhs: &TaylorNumber) -> TaylorNumber {
        shape_ok(self.try_mul(rhs), "mul")
    }
}

impl Mul for TaylorNumber {
    type Output = TaylorNumber;

    fn mul(self, rhs: TaylorNumber) -> TaylorNumber {
        &self * &rhs
    }
}

impl AddAssign<&TaylorNumber> for TaylorNumber {
    fn add_assign(&mut self, rhs: &TaylorNumber) {
        *self = &*self + rhs;
    }
}

impl SubAssign<&TaylorNumber> for TaylorNumber {
    fn sub_assign(&mut self, rhs: &TaylorNumber) {
        *self = &*self - rhs;
    }
}

/// In-place product; the left operand is copied before rows are overwritten.
impl MulAssign<&TaylorNumber> for TaylorNumber {
    fn mul_assign(&mut self, rhs: &TaylorNumber) {
        shape_ok(self.layout.check_same(&rhs.layout), "mul_assign");
        let width = self.width();
        shape_ok(
            OperatorCache::global().multiply_assign(&mut self.values, &rhs.values, width),
            "mul_assign",
        );
    }
}

impl Add<f64> for &TaylorNumber {
    type Output = TaylorNumber;

    fn add(self, rhs: f64) -> TaylorNumber {
        self.map(|layout, a, t| buffer::add_scalar(layout, a, rhs, t))
    }
}

impl Add<f64> for TaylorNumber {
    type Output = TaylorNumber;

    fn add(self, rhs: f64) -> TaylorNumber {
        &self + rhs
    }
}

impl Sub<f64> for &TaylorNumber {
    type Output = TaylorNumber;

    fn sub(self, rhs: f64) -> TaylorNumber {
        self.map(|layout, a, t| buffer::sub_scalar(layout, a, rhs, t))
    }
}

impl Sub<f64> for TaylorNumber {
    type Output = TaylorNumber;

    fn sub(self, rhs: f64) -> TaylorNumber {
        &self - rhs
    }
}

impl Mul<f64> for &TaylorNumber {
    type Output = TaylorNumber;

    fn mul(self, rhs: f64) -> TaylorNumber {
        self.map(|layout, a, t| buffer::scale(layout, a, rhs, t))
    }
}

impl Mul<f64> for TaylorNumber {
    type Output = TaylorNumber;

    fn mul(self, rhs: f64) -> TaylorNumber {
        &self * rhs
    }
}

impl Neg for &TaylorNumber {
    type Output = TaylorNumber;

    fn neg(self) -> TaylorNumber {
        self * -1.0
    }
}

impl Neg for TaylorNumber {
    type Output = TaylorNumber;

    fn neg(self) -> TaylorNumber {
        -&self
    }
}

impl fmt::Display for TaylorNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "taylor{{width={}, order={}, values=[", self.width(), self.order())?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]}}")
    }
}
