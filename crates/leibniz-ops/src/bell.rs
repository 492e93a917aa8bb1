//! Bell polynomials for Faà di Bruno's formula.
//!
//! The `n`-th derivative of `f(g)` is `Σ_k f^(k)(g) · B(n,k)(g', g'', ...)`.
//! Here variable `x_r` stands for row `r` of the inner buffer, so `B(n,k)` is
//! a polynomial in `x_1..x_n`.
//!
//! # Derivation
//!
//! Bell polynomials are obtained from self-convolutions of the variable
//! sequence:
//!
//! ```text
//! conv(1, n) = x_n
//! conv(k, n) = Σ_{j=1}^{n-1} C(n,j) · x_j · conv(k-1, n-j)
//! B(n, k)    = conv(k, n) / k!
//! ```
//!
//! `conv(k, n)` only needs convolutions of strictly lower orders, which is
//! what lets the composition cache build level `n` from levels `0..n`.
//!
//! # Evaluators
//!
//! Each Bell polynomial is kept in two evaluable forms:
//! - [`SumOfProducts`] / [`DerSumOfProducts`]: flat lists of row indices to
//!   multiply, no monomial lookups at evaluation time.
//! - Compiled [`Program`]s for the value and the total derivative.
//!
//! The derivative forms come from [`Polynomial::total_derivative`]: the
//! shadow variable of each term says which row is read in the parameter
//! column instead of the value column.
//!
//! Coefficients stay exact integers through the whole derivation and are
//! rounded to `f64` only when flattened or compiled, so every order builds.

use leibniz_poly::{Differentiation, Horner, Monomial, Polynomial, Program, Term, Var};
use smallvec::SmallVec;

use crate::binomial::{binomial_row, factorial};

/// Computes `conv(k, n)` for `k = 1..=n`.
///
/// `lower[m]` must hold the convolutions of order `m` (so `lower.len() == n`
/// and `lower[m][k-1] == conv(k, m)`).
#[must_use]
pub fn convolutes(n: usize, lower: &[&[Polynomial]]) -> Vec<Polynomial> {
    debug_assert_eq!(lower.len(), n);
    if n == 0 {
        return Vec::new();
    }

    let binomial = binomial_row(n);
    let mut out = Vec::with_capacity(n);
    out.push(Polynomial::var(n as Var));

    for k in 2..=n {
        let mut p = Polynomial::zero();
        for j in 1..n {
            // conv(k-1, n-j) vanishes once k-1 exceeds n-j.
            if let Some(c) = lower[n - j].get(k - 2) {
                let head = Term::new(binomial[j].clone(), Monomial::var(j as Var));
                p += &c.mul_term(&head);
            }
        }
        out.push(p);
    }

    out
}

/// A flat product `factor · Π a[row_i · width]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Product {
    /// Scalar factor.
    pub factor: f64,
    /// Rows to multiply, repeated according to their exponent.
    pub rows: SmallVec<[usize; 8]>,
}

impl Product {
    #[inline]
    fn eval(&self, a: &[f64], width: usize) -> f64 {
        self.rows.iter().fold(self.factor, |acc, &r| acc * a[r * width])
    }
}

fn flatten(term: &Term, skip_from: Var) -> SmallVec<[usize; 8]> {
    let mut rows = SmallVec::new();
    for (v, e) in term.monomial.iter() {
        if v < skip_from {
            for _ in 0..e {
                rows.push(v as usize);
            }
        }
    }
    rows
}

/// A polynomial as a flat sum of [`Product`]s over the value column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SumOfProducts {
    products: Vec<Product>,
}

impl SumOfProducts {
    /// Flattens a polynomial whose variables are row indices.
    #[must_use]
    pub fn from_polynomial(p: &Polynomial) -> Self {
        let products = p
            .terms()
            .iter()
            .map(|t| Product {
                factor: t.factor_f64(),
                rows: flatten(t, Var::MAX),
            })
            .collect();
        Self { products }
    }

    /// Returns the products.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Returns the number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns true if the sum is empty (the zero polynomial).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Evaluates against the value column of buffer `a`.
    #[must_use]
    pub fn eval(&self, a: &[f64], width: usize) -> f64 {
        self.products.iter().map(|p| p.eval(a, width)).sum()
    }
}

/// A flat product with one factor read from a parameter column:
/// `factor · Π a[row_i · width] · a[der_row · width + j]`.
#[derive(Clone, Debug, PartialEq)]
pub struct DerProduct {
    /// Scalar factor.
    pub factor: f64,
    /// Rows read in the value column.
    pub rows: SmallVec<[usize; 8]>,
    /// Row read in the parameter column.
    pub der_row: usize,
}

/// A total derivative as a flat sum of [`DerProduct`]s.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DerSumOfProducts {
    products: Vec<DerProduct>,
}

impl DerSumOfProducts {
    /// Flattens the total derivative of `p` taken with `shadow_offset`.
    ///
    /// Every term of a total derivative carries exactly one shadow variable
    /// with exponent one; it becomes the `der_row` of the product.
    #[must_use]
    pub fn from_total_derivative(p: &Polynomial, shadow_offset: Var) -> Self {
        let products = p
            .total_derivative(shadow_offset)
            .terms()
            .iter()
            .filter_map(|t| {
                let shadow = t.monomial.max_variable().filter(|&v| v >= shadow_offset);
                debug_assert!(shadow.is_some(), "term without shadow variable");
                Some(DerProduct {
                    factor: t.factor_f64(),
                    rows: flatten(t, shadow_offset),
                    der_row: (shadow? - shadow_offset) as usize,
                })
            })
            .collect();
        Self { products }
    }

    /// Returns the products.
    #[must_use]
    pub fn products(&self) -> &[DerProduct] {
        &self.products
    }

    /// Returns the number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns true if the sum is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Evaluates against buffer `a`, reading derivatives from `column`.
    #[must_use]
    pub fn eval(&self, a: &[f64], width: usize, column: usize) -> f64 {
        self.products
            .iter()
            .map(|p| {
                p.rows
                    .iter()
                    .fold(p.factor * a[p.der_row * width + column], |acc, &r| acc * a[r * width])
            })
            .sum()
    }
}

/// The Bell polynomial `B(n, k)` with its evaluators.
#[derive(Clone, Debug)]
pub struct BellPolynomial {
    n: usize,
    k: usize,
    polynomial: Polynomial,
    value: SumOfProducts,
    derivative: DerSumOfProducts,
    value_program: Program,
    derivative_program: Program,
}

impl BellPolynomial {
    /// Builds `B(n, k)` from `conv(k, n)`.
    ///
    /// Shadow variables for the derivative forms start at `n + 1`.
    ///
    /// # Panics
    ///
    /// Panics if `convolute` is not divisible by `k!`, which cannot happen
    /// for a true convolution.
    #[must_use]
    pub fn new(n: usize, k: usize, convolute: &Polynomial) -> Self {
        let polynomial = match convolute.div_exact(factorial(k)) {
            Some(p) => p,
            None => unreachable!("conv({k}, {n}) is not divisible by {k}!"),
        };
        let shadow_offset = Self::shadow_offset(n);

        let tree = Horner::factorize(&polynomial);
        let value_program = Program::value(tree.as_ref());
        let derivative_program = Program::derivative(tree.as_ref(), Differentiation::Total { shadow_offset });

        Self {
            n,
            k,
            value: SumOfProducts::from_polynomial(&polynomial),
            derivative: DerSumOfProducts::from_total_derivative(&polynomial, shadow_offset),
            value_program,
            derivative_program,
            polynomial,
        }
    }

    /// Returns the shadow offset used at order `n`.
    #[must_use]
    pub const fn shadow_offset(n: usize) -> Var {
        (n + 1) as Var
    }

    /// Returns `n`.
    #[must_use]
    pub const fn n(&self) -> usize {
        self.n
    }

    /// Returns `k`.
    #[must_use]
    pub const fn k(&self) -> usize {
        self.k
    }

    /// Returns the symbolic polynomial.
    #[must_use]
    pub fn polynomial(&self) -> &Polynomial {
        &self.polynomial
    }

    /// Returns the flattened value form.
    #[must_use]
    pub fn value_sum(&self) -> &SumOfProducts {
        &self.value
    }

    /// Returns the flattened total-derivative form.
    #[must_use]
    pub fn derivative_sum(&self) -> &DerSumOfProducts {
        &self.derivative
    }

    /// Returns the compiled value program.
    #[must_use]
    pub fn value_program(&self) -> &Program {
        &self.value_program
    }

    /// Returns the compiled total-derivative program.
    ///
    /// It expects arguments laid out as `[x_0..=x_n, dx_0..=dx_n]`.
    #[must_use]
    pub fn derivative_program(&self) -> &Program {
        &self.derivative_program
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leibniz_poly::{var, IBig};

    fn all_convolutes(max: usize) -> Vec<Vec<Polynomial>> {
        let mut levels: Vec<Vec<Polynomial>> = Vec::new();
        for n in 0..=max {
            let lower: Vec<&[Polynomial]> = levels.iter().map(Vec::as_slice).collect();
            let next = convolutes(n, &lower);
            levels.push(next);
        }
        levels
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-12 * a.abs().max(b.abs()).max(1.0)
    }

    fn bell(levels: &[Vec<Polynomial>], n: usize, k: usize) -> Polynomial {
        BellPolynomial::new(n, k, &levels[n][k - 1]).polynomial().clone()
    }

    #[test]
    fn test_known_bell_polynomials() {
        let levels = all_convolutes(4);
        let x = |v: Var| Polynomial::var(v);

        assert_eq!(bell(&levels, 1, 1), x(1));
        assert_eq!(bell(&levels, 2, 1), x(2));
        assert_eq!(bell(&levels, 2, 2), &x(1) * &x(1));
        assert_eq!(bell(&levels, 3, 2), Polynomial::from(var(1) * var(2) * 3));
        assert_eq!(bell(&levels, 3, 3), Polynomial::from(var(1).pow(3)));

        // B(4,2) = 4 x1 x3 + 3 x2^2
        let expected = var(1) * var(3) * 4 + var(2).pow(2) * 3;
        assert_eq!(bell(&levels, 4, 2), expected);
    }

    #[test]
    fn test_convolute_counts() {
        let levels = all_convolutes(5);
        for (n, level) in levels.iter().enumerate() {
            assert_eq!(level.len(), n);
        }
        // conv(k, n) evaluated at all-ones counts ordered set partitions:
        // Σ_k conv(k, n)/k! at ones is the Bell number.
        let ones = [1.0; 8];
        let bell_numbers = [1.0, 1.0, 2.0, 5.0, 15.0, 52.0];
        for n in 1..=5 {
            let total: f64 = (1..=n).map(|k| bell(&levels, n, k).eval(&ones)).sum();
            assert_eq!(total, bell_numbers[n]);
        }
    }

    #[test]
    fn test_flat_forms_match_polynomial() {
        let levels = all_convolutes(4);
        let width = 3;
        // Rows 0..=4, three columns each.
        let a: Vec<f64> = (0..15i32).map(|i| 0.5 + f64::from(i) * 0.25).collect();
        let values: Vec<f64> = (0..5).map(|r| a[r * width]).collect();

        for k in 1..=4 {
            let b = BellPolynomial::new(4, k, &levels[4][k - 1]);
            assert_eq!(b.n(), 4);
            assert_eq!(b.k(), k);

            let direct = b.polynomial().eval(&values);
            assert!(close(b.value_sum().eval(&a, width), direct));
            assert!(close(b.value_program().eval(&values), direct));

            for column in 1..width {
                let mut args = values.clone();
                args.extend((0..5).map(|r| a[r * width + column]));
                let symbolic = b.polynomial().total_derivative(BellPolynomial::shadow_offset(4)).eval(&args);

                assert!(close(b.derivative_sum().eval(&a, width, column), symbolic));
                assert!(close(b.derivative_program().eval(&args), symbolic));
            }
        }
    }

    #[test]
    fn test_bell_numbers_past_64_bit_coefficients() {
        // conv(k, n) coefficients exceed i64 from n = 19 on.
        let n = 22;
        let levels = all_convolutes(n);
        let ones = vec![1.0; n + 1];

        let widest = levels[n]
            .iter()
            .flat_map(Polynomial::terms)
            .map(|t| t.factor.clone())
            .max();
        assert!(widest.is_some_and(|c| c > IBig::from(i64::MAX)));

        let mut exact = IBig::ZERO;
        let mut rounded = 0.0;
        for k in 1..=n {
            let b = BellPolynomial::new(n, k, &levels[n][k - 1]);
            for t in b.polynomial().terms() {
                exact += t.factor.clone();
            }
            rounded += b.value_sum().eval(&ones, 1);
        }

        // Bell number B_22.
        assert_eq!(exact, IBig::from(4_506_715_738_447_323_i64));
        assert!(close(rounded, 4_506_715_738_447_323.0));
    }

    #[test]
    fn test_der_products_have_one_shadow_row() {
        let levels = all_convolutes(3);
        let b = BellPolynomial::new(3, 2, &levels[3][1]);
        // B(3,2) = 3 x1 x2 => 3 x2 dx1 + 3 x1 dx2
        let der = b.derivative_sum().products();
        assert_eq!(der.len(), 2);
        for p in der {
            assert_eq!(p.factor, 3.0);
            assert_eq!(p.rows.len(), 1);
            assert_ne!(p.rows[0], p.der_row);
        }
    }
}
