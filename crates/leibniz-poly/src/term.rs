//! Signed integer terms.
//!
//! Factors are arbitrary precision, so no amount of multiplication or
//! differentiation can overflow them.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Mul, Neg};

use dashu::integer::IBig;

use crate::monomial::{Monomial, Var};
use crate::polynomial::Polynomial;

/// An integer factor times a monomial.
///
/// Terms order by monomial first, so sorting a list of terms groups equal
/// monomials together for merging.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Term {
    /// The integer coefficient.
    pub factor: IBig,
    /// The variable part.
    pub monomial: Monomial,
}

/// Creates the term `1 * x_v`.
#[must_use]
pub fn var(v: Var) -> Term {
    Term::new(1, Monomial::var(v))
}

impl Term {
    /// Creates a new term.
    #[must_use]
    pub fn new(factor: impl Into<IBig>, monomial: Monomial) -> Self {
        Self {
            factor: factor.into(),
            monomial,
        }
    }

    /// Creates a constant term.
    #[must_use]
    pub fn constant(factor: impl Into<IBig>) -> Self {
        Self::new(factor, Monomial::one())
    }

    /// Returns true if the factor is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.factor.is_zero()
    }

    /// Returns true if no variable occurs.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.monomial.is_one()
    }

    /// Raises the term to a power.
    #[must_use]
    pub fn pow(&self, p: u32) -> Self {
        Self::new(self.factor.pow(p as usize), self.monomial.pow(p))
    }

    /// Returns true if `self` divides `other` as a monomial.
    ///
    /// Factors are not considered.
    #[must_use]
    pub fn divides(&self, other: &Self) -> bool {
        self.monomial.divides(&other.monomial)
    }

    /// Returns the factor rounded to the nearest `f64`.
    #[must_use]
    pub fn factor_f64(&self) -> f64 {
        coefficient_to_f64(&self.factor)
    }

    /// Evaluates the term; variable `v` takes the value `args[v]`.
    #[must_use]
    pub fn eval(&self, args: &[f64]) -> f64 {
        self.factor_f64() * self.monomial.eval(args)
    }
}

/// Rounds an integer coefficient to the nearest `f64`.
#[must_use]
pub fn coefficient_to_f64(c: &IBig) -> f64 {
    c.to_f64().value()
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        self.monomial
            .cmp(&other.monomial)
            .then(self.factor.cmp(&other.factor))
    }
}

impl Mul for &Term {
    type Output = Term;

    fn mul(self, rhs: &Term) -> Term {
        Term::new(&self.factor * &rhs.factor, self.monomial.mul(&rhs.monomial))
    }
}

impl Mul for Term {
    type Output = Term;

    fn mul(self, rhs: Term) -> Term {
        &self * &rhs
    }
}

impl Mul<i64> for Term {
    type Output = Term;

    fn mul(self, rhs: i64) -> Term {
        Term::new(self.factor * IBig::from(rhs), self.monomial)
    }
}

impl Neg for Term {
    type Output = Term;

    fn neg(self) -> Term {
        Term::new(-self.factor, self.monomial)
    }
}

impl std::ops::Add for Term {
    type Output = Polynomial;

    fn add(self, rhs: Term) -> Polynomial {
        Polynomial::from_terms([self, rhs])
    }
}

impl std::ops::Add<i64> for Term {
    type Output = Polynomial;

    fn add(self, rhs: i64) -> Polynomial {
        Polynomial::from_terms([self, Term::constant(rhs)])
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.monomial.is_one() {
            write!(f, "{}", self.factor)
        } else if self.factor == IBig::ONE {
            write!(f, "{}", self.monomial)
        } else if self.factor == -IBig::ONE {
            write!(f, "-{}", self.monomial)
        } else {
            write!(f, "{}*{}", self.factor, self.monomial)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pow() {
        let t = Term::new(3, Monomial::from_exponents([(0, 1), (1, 2)]));
        let cube = t.pow(3);
        assert_eq!(cube.factor, IBig::from(27));
        assert_eq!(cube.monomial, Monomial::from_exponents([(0, 3), (1, 6)]));
        assert_eq!(t.pow(0), Term::constant(1));
    }

    #[test]
    fn test_mul() {
        let t = (var(0).pow(2) * var(1)) * 5;
        assert_eq!(t.factor, IBig::from(5));
        assert_eq!(t.monomial.exponent(0), 2);
        assert_eq!(t.monomial.exponent(1), 1);
    }

    #[test]
    fn test_add_same_monomial_merges() {
        let p = var(2) + var(2);
        assert_eq!(p.len(), 1);
        assert_eq!(p.terms()[0].factor, IBig::from(2));

        let zero = var(2) + (-var(2));
        assert!(zero.is_zero());
    }

    #[test]
    fn test_ordering_by_monomial() {
        let a = Term::new(100, Monomial::var(0));
        let b = Term::new(1, Monomial::var(1));
        let c = Term::constant(-7);
        let mut ts = vec![b.clone(), a.clone(), c.clone()];
        ts.sort();
        assert_eq!(ts, vec![c, a, b]);
    }

    #[test]
    fn test_factor_beyond_i64() {
        // 3^50 overflows i64 but is an ordinary factor here.
        let t = Term::constant(3).pow(50);
        assert_eq!(t.factor, IBig::from(3).pow(50));
        let expected = 3.0_f64.powi(50);
        assert!((t.factor_f64() - expected).abs() <= 1e-12 * expected);
    }

    #[test]
    fn test_display() {
        assert_eq!(Term::new(-1, Monomial::var(3)).to_string(), "-x3");
        assert_eq!(Term::new(4, Monomial::power(0, 2)).to_string(), "4*x0^2");
        assert_eq!(Term::constant(9).to_string(), "9");
    }
}
