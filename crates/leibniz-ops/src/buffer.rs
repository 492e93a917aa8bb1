//! Flat coefficient buffers.
//!
//! A buffer for `params` parameters and order `order` holds
//! `width * (order + 1)` reals with `width = params + 1`. Row `r` stores the
//! `r`-th derivative along the free variable: column 0 is the value itself,
//! column `j` its partial derivative with respect to parameter `j`.
//! Derivatives are raw, not divided by `r!`.
//!
//! The free functions here are the linear part of the arithmetic (sums,
//! scalar products, seeding) and work directly on slices.

use crate::error::TaylorError;

/// Shape of a coefficient buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Layout {
    width: usize,
    order: usize,
}

impl Layout {
    /// Creates the layout for `params` parameters up to order `order`.
    #[must_use]
    pub const fn new(params: usize, order: usize) -> Self {
        Self {
            width: params + 1,
            order,
        }
    }

    /// Recovers the layout of a buffer of length `len` with the given width.
    ///
    /// # Errors
    ///
    /// Fails if `width` is zero or `len` is not a positive multiple of it.
    pub fn from_width(width: usize, len: usize) -> Result<Self, TaylorError> {
        if width == 0 {
            return Err(TaylorError::ZeroWidth);
        }
        if len == 0 || len % width != 0 {
            return Err(TaylorError::BufferLength {
                expected: width * (len / width).max(1),
                actual: len,
            });
        }
        Ok(Self {
            width,
            order: len / width - 1,
        })
    }

    /// Returns the number of columns, `params + 1`.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of parameters.
    #[must_use]
    pub const fn params(&self) -> usize {
        self.width - 1
    }

    /// Returns the highest stored derivative order.
    #[must_use]
    pub const fn order(&self) -> usize {
        self.order
    }

    /// Returns the required buffer length.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.width * (self.order + 1)
    }

    /// Always false: a layout has at least one row and one column.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns the linear index of `(row, column)`.
    #[must_use]
    pub const fn index(&self, row: usize, column: usize) -> usize {
        row * self.width + column
    }

    /// Checks that `buf` has exactly this layout's length.
    ///
    /// # Errors
    ///
    /// Returns [`TaylorError::BufferLength`] on a mismatch.
    pub fn check(&self, buf: &[f64]) -> Result<(), TaylorError> {
        if buf.len() == self.len() {
            Ok(())
        } else {
            Err(TaylorError::BufferLength {
                expected: self.len(),
                actual: buf.len(),
            })
        }
    }

    /// Checks that two layouts describe the same shape.
    ///
    /// # Errors
    ///
    /// Reports the first differing dimension.
    pub fn check_same(&self, other: &Self) -> Result<(), TaylorError> {
        if self.width != other.width {
            return Err(TaylorError::WidthMismatch {
                left: self.width,
                right: other.width,
            });
        }
        if self.order != other.order {
            return Err(TaylorError::OrderMismatch {
                left: self.order,
                right: other.order,
            });
        }
        Ok(())
    }
}

/// Returns the buffer length for `params` parameters up to order `order`.
#[must_use]
pub const fn payload_len(params: usize, order: usize) -> usize {
    Layout::new(params, order).len()
}

/// Sets every coefficient to zero.
pub fn to_zero(buf: &mut [f64]) {
    buf.fill(0.0);
}

/// Writes a constant: value `val`, every derivative zero.
pub fn write_constant(buf: &mut [f64], val: f64) {
    to_zero(buf);
    if let Some(first) = buf.first_mut() {
        *first = val;
    }
}

/// Writes parameter `param` (1-based column) with value `val`.
///
/// # Errors
///
/// Fails on a buffer of the wrong length or a column outside `1..=params`.
pub fn write_parameter(layout: Layout, buf: &mut [f64], val: f64, param: usize) -> Result<(), TaylorError> {
    layout.check(buf)?;
    if param == 0 || param > layout.params() {
        return Err(TaylorError::ParamOutOfRange {
            param,
            params: layout.params(),
        });
    }
    write_constant(buf, val);
    buf[param] = 1.0;
    Ok(())
}

/// Seeds column `param` (1-based) with `1.0` in every row, leaving the rest
/// of the buffer untouched.
///
/// This is the seed that keeps `der(param, r)` equal to the partial
/// derivative in `param` for every row `r` through products and
/// compositions of parameters.
///
/// # Errors
///
/// Fails on a buffer of the wrong length or a column outside `1..=params`.
pub fn seed_parameter(layout: Layout, buf: &mut [f64], param: usize) -> Result<(), TaylorError> {
    layout.check(buf)?;
    if param == 0 || param > layout.params() {
        return Err(TaylorError::ParamOutOfRange {
            param,
            params: layout.params(),
        });
    }
    for r in 0..=layout.order() {
        buf[layout.index(r, param)] = 1.0;
    }
    Ok(())
}

/// Writes the free variable `t` with value `val`, so that `dt/dt = 1`.
///
/// # Errors
///
/// Fails on a buffer of the wrong length.
pub fn write_free_variable(layout: Layout, buf: &mut [f64], val: f64) -> Result<(), TaylorError> {
    layout.check(buf)?;
    write_constant(buf, val);
    if layout.order() > 0 {
        buf[layout.index(1, 0)] = 1.0;
    }
    Ok(())
}

/// Reads the derivative of order `order` in parameter column `param`.
///
/// Column 0 is the pure derivative along the free variable.
///
/// # Errors
///
/// Fails on a buffer of the wrong length or an out-of-range index.
pub fn mixed_derivative(layout: Layout, buf: &[f64], order: usize, param: usize) -> Result<f64, TaylorError> {
    layout.check(buf)?;
    if param > layout.params() {
        return Err(TaylorError::ParamOutOfRange {
            param,
            params: layout.params(),
        });
    }
    if order > layout.order() {
        return Err(TaylorError::OrderOutOfRange {
            order,
            max: layout.order(),
        });
    }
    Ok(buf[layout.index(order, param)])
}

/// Reads the `order`-th derivative along the free variable.
///
/// # Errors
///
/// See [`mixed_derivative`].
pub fn total_derivative(layout: Layout, buf: &[f64], order: usize) -> Result<f64, TaylorError> {
    mixed_derivative(layout, buf, order, 0)
}

/// Reads the first partial derivative with respect to `param`.
///
/// # Errors
///
/// See [`mixed_derivative`].
pub fn partial_derivative(layout: Layout, buf: &[f64], param: usize) -> Result<f64, TaylorError> {
    mixed_derivative(layout, buf, 0, param)
}

fn check_binary(layout: Layout, a: &[f64], b: &[f64], target: &[f64]) -> Result<(), TaylorError> {
    layout.check(a)?;
    layout.check(b)?;
    layout.check(target)
}

/// `target = a + b`, componentwise.
///
/// # Errors
///
/// Fails if any buffer has the wrong length.
pub fn add(layout: Layout, a: &[f64], b: &[f64], target: &mut [f64]) -> Result<(), TaylorError> {
    check_binary(layout, a, b, target)?;
    for ((t, x), y) in target.iter_mut().zip(a).zip(b) {
        *t = x + y;
    }
    Ok(())
}

/// `target = a - b`, componentwise.
///
/// # Errors
///
/// Fails if any buffer has the wrong length.
pub fn sub(layout: Layout, a: &[f64], b: &[f64], target: &mut [f64]) -> Result<(), TaylorError> {
    check_binary(layout, a, b, target)?;
    for ((t, x), y) in target.iter_mut().zip(a).zip(b) {
        *t = x - y;
    }
    Ok(())
}

/// `target = s * a`; a scalar scales every derivative.
///
/// # Errors
///
/// Fails if either buffer has the wrong length.
pub fn scale(layout: Layout, a: &[f64], s: f64, target: &mut [f64]) -> Result<(), TaylorError> {
    layout.check(a)?;
    layout.check(target)?;
    for (t, x) in target.iter_mut().zip(a) {
        *t = s * x;
    }
    Ok(())
}

/// `target = a + s`; a scalar only shifts the value.
///
/// # Errors
///
/// Fails if either buffer has the wrong length.
pub fn add_scalar(layout: Layout, a: &[f64], s: f64, target: &mut [f64]) -> Result<(), TaylorError> {
    layout.check(a)?;
    layout.check(target)?;
    target.copy_from_slice(a);
    target[0] += s;
    Ok(())
}

/// `target = a - s`.
///
/// # Errors
///
/// Fails if either buffer has the wrong length.
pub fn sub_scalar(layout: Layout, a: &[f64], s: f64, target: &mut [f64]) -> Result<(), TaylorError> {
    add_scalar(layout, a, -s, target)
}
