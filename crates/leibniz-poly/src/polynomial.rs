//! Canonical sparse polynomials with arbitrary precision integer coefficients.
//!
//! A [`Polynomial`] keeps its terms sorted by monomial with pairwise
//! distinct monomials and no zero factors. Every constructor and every
//! operation restores that form, so structural equality is polynomial
//! equality.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use dashu::integer::IBig;
use rustc_hash::FxHashMap;

use crate::monomial::{Monomial, Var};
use crate::term::Term;

/// A sparse multivariate polynomial over the integers.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Polynomial {
    /// Terms in ascending monomial order.
    terms: Vec<Term>,
}

impl Polynomial {
    /// Creates a polynomial from arbitrary terms.
    ///
    /// Terms are sorted, equal monomials merged, and zero factors dropped.
    pub fn from_terms(terms: impl IntoIterator<Item = Term>) -> Self {
        let mut poly = Self {
            terms: terms.into_iter().collect(),
        };
        poly.normalize();
        poly
    }

    /// Creates the zero polynomial.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Creates the constant polynomial 1.
    #[must_use]
    pub fn one() -> Self {
        Self::constant(1)
    }

    /// Creates a constant polynomial.
    #[must_use]
    pub fn constant(c: impl Into<IBig>) -> Self {
        Self::from_terms([Term::constant(c)])
    }

    /// Creates the polynomial `x_v`.
    #[must_use]
    pub fn var(v: Var) -> Self {
        Self::from_terms([crate::term::var(v)])
    }

    /// Returns true if this is the zero polynomial.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if there are no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the terms in canonical order.
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Consumes the polynomial, returning its terms.
    #[must_use]
    pub fn into_terms(self) -> Vec<Term> {
        self.terms
    }

    /// Returns true if no term contains a variable.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.terms.iter().all(Term::is_constant)
    }

    /// Returns the lowest-indexed variable occurring in any term.
    #[must_use]
    pub fn min_variable(&self) -> Option<Var> {
        self.terms.iter().filter_map(|t| t.monomial.min_variable()).min()
    }

    /// Returns the highest-indexed variable occurring in any term.
    #[must_use]
    pub fn max_variable(&self) -> Option<Var> {
        self.terms.iter().filter_map(|t| t.monomial.max_variable()).max()
    }

    /// Computes the total degree.
    #[must_use]
    pub fn total_degree(&self) -> u32 {
        self.terms
            .iter()
            .map(|t| t.monomial.total_degree())
            .max()
            .unwrap_or(0)
    }

    /// Sorts terms and combines like terms.
    fn normalize(&mut self) {
        self.terms.sort_unstable_by(|a, b| a.monomial.cmp(&b.monomial));

        let mut merged: Vec<Term> = Vec::with_capacity(self.terms.len());
        for term in self.terms.drain(..) {
            match merged.last_mut() {
                Some(last) if last.monomial == term.monomial => last.factor += term.factor,
                _ => {
                    if merged.last().is_some_and(Term::is_zero) {
                        merged.pop();
                    }
                    merged.push(term);
                }
            }
        }
        if merged.last().is_some_and(Term::is_zero) {
            merged.pop();
        }

        self.terms = merged;
    }

    /// Multiplies by a single term.
    #[must_use]
    pub fn mul_term(&self, t: &Term) -> Self {
        if t.is_zero() {
            return Self::zero();
        }
        // Multiplying by a monomial does not preserve the lexicographic order.
        Self::from_terms(self.terms.iter().map(|s| s * t))
    }

    /// Multiplies by an integer scalar.
    #[must_use]
    pub fn scale(&self, c: impl Into<IBig>) -> Self {
        let c = c.into();
        if c.is_zero() {
            return Self::zero();
        }
        Self {
            terms: self
                .terms
                .iter()
                .map(|t| Term::new(&t.factor * &c, t.monomial.clone()))
                .collect(),
        }
    }

    /// Divides every factor by `d`, provided all of them are multiples of `d`.
    #[must_use]
    pub fn div_exact(&self, d: impl Into<IBig>) -> Option<Self> {
        let d = d.into();
        if d.is_zero() || self.terms.iter().any(|t| !(&t.factor % &d).is_zero()) {
            return None;
        }
        Some(Self {
            terms: self
                .terms
                .iter()
                .map(|t| Term::new(&t.factor / &d, t.monomial.clone()))
                .collect(),
        })
    }

    /// Term-wise division by `t`.
    ///
    /// Keeps only the terms whose monomial is divisible by `t`'s monomial and
    /// divides them (exponents subtracted, factors divided). Together with
    /// [`Polynomial::remainder`] this partitions the terms of `self`.
    #[must_use]
    pub fn divide(&self, t: &Term) -> Self {
        debug_assert!(!t.is_zero(), "division by a zero term");
        Self::from_terms(self.terms.iter().filter_map(|s| {
            let monomial = s.monomial.div(&t.monomial)?;
            debug_assert!((&s.factor % &t.factor).is_zero(), "inexact factor division");
            Some(Term::new(&s.factor / &t.factor, monomial))
        }))
    }

    /// Term-wise remainder by `t`.
    ///
    /// Keeps, unchanged, exactly the terms that [`Polynomial::divide`] drops.
    #[must_use]
    pub fn remainder(&self, t: &Term) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .filter(|s| !t.divides(s))
                .cloned()
                .collect(),
        }
    }

    /// Partial derivative with respect to `v`.
    #[must_use]
    pub fn partial_derivative(&self, v: Var) -> Self {
        Self::from_terms(self.terms.iter().filter_map(|t| {
            let (e, monomial) = t.monomial.differentiate(v)?;
            Some(Term::new(&t.factor * IBig::from(e), monomial))
        }))
    }

    /// Total derivative using shadow variables.
    ///
    /// For every variable `v` of a term, emits the power-rule derivative of
    /// the term with respect to `v` multiplied by the shadow variable
    /// `v + shadow_offset`, which stands for "the derivative of `x_v`".
    /// The shadow universe must not overlap the base one, so `shadow_offset`
    /// has to exceed every variable index in `self`.
    #[must_use]
    pub fn total_derivative(&self, shadow_offset: Var) -> Self {
        debug_assert!(
            self.max_variable().map_or(true, |v| v < shadow_offset),
            "shadow variables collide with base variables"
        );

        let mut terms = Vec::new();
        for t in &self.terms {
            for v in t.monomial.variables() {
                if let Some((e, monomial)) = t.monomial.differentiate(v) {
                    let shadow = Monomial::var(v + shadow_offset);
                    terms.push(Term::new(&t.factor * IBig::from(e), monomial.mul(&shadow)));
                }
            }
        }

        Self::from_terms(terms)
    }

    /// Evaluates the polynomial; variable `v` takes the value `args[v]`.
    ///
    /// # Panics
    ///
    /// Panics if a variable index is out of range for `args`.
    #[must_use]
    pub fn eval(&self, args: &[f64]) -> f64 {
        self.terms.iter().map(|t| t.eval(args)).sum()
    }
}

impl From<Term> for Polynomial {
    fn from(t: Term) -> Self {
        Self::from_terms([t])
    }
}

impl From<i64> for Polynomial {
    fn from(c: i64) -> Self {
        Self::constant(c)
    }
}

impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Polynomial {
        Polynomial::from_terms(self.terms.iter().chain(&rhs.terms).cloned())
    }
}

impl Add for Polynomial {
    type Output = Polynomial;

    fn add(mut self, rhs: Polynomial) -> Polynomial {
        self.terms.extend(rhs.terms);
        self.normalize();
        self
    }
}

impl Add<Term> for Polynomial {
    type Output = Polynomial;

    fn add(mut self, rhs: Term) -> Polynomial {
        self.terms.push(rhs);
        self.normalize();
        self
    }
}

impl Add<i64> for Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: i64) -> Polynomial {
        self + Term::constant(rhs)
    }
}

impl AddAssign<&Polynomial> for Polynomial {
    fn add_assign(&mut self, rhs: &Polynomial) {
        self.terms.extend(rhs.terms.iter().cloned());
        self.normalize();
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        Polynomial {
            terms: self.terms.iter().cloned().map(Neg::neg).collect(),
        }
    }
}

impl Neg for Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        -&self
    }
}

impl Sub for &Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &Polynomial) -> Polynomial {
        self + &(-rhs)
    }
}

impl Sub for Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: Polynomial) -> Polynomial {
        self + (-rhs)
    }
}

/// Cross product of terms, accumulating factors per resulting monomial
/// before restoring canonical order.
impl Mul for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &Polynomial) -> Polynomial {
        if self.is_zero() || rhs.is_zero() {
            return Polynomial::zero();
        }

        let mut acc: FxHashMap<Monomial, IBig> = FxHashMap::default();
        acc.reserve(self.len() * rhs.len());

        for a in &self.terms {
            for b in &rhs.terms {
                *acc.entry(a.monomial.mul(&b.monomial)).or_insert(IBig::ZERO) += &a.factor * &b.factor;
            }
        }

        Polynomial::from_terms(acc.into_iter().map(|(m, c)| Term::new(c, m)))
    }
}

impl Mul for Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: Polynomial) -> Polynomial {
        &self * &rhs
    }
}

impl Mul<Term> for Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: Term) -> Polynomial {
        self.mul_term(&rhs)
    }
}

impl Mul<i64> for Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: i64) -> Polynomial {
        self.scale(rhs)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        for (i, t) in self.terms.iter().enumerate() {
            if i == 0 {
                write!(f, "{t}")?;
            } else if t.factor < IBig::ZERO {
                write!(f, " - {}", Term::new(-t.factor.clone(), t.monomial.clone()))?;
            } else {
                write!(f, " + {t}")?;
            }
        }
        Ok(())
    }
}
