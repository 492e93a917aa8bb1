//! Sparse multivariate monomials.
//!
//! A monomial maps variable indices to positive exponents. Only variables
//! with a non-zero exponent are stored, sorted by index, so that two equal
//! monomials always have the same representation.

use std::cmp::Ordering;
use std::fmt;

use smallvec::SmallVec;

/// Index of a symbolic variable.
pub type Var = u32;

/// A product of variables raised to positive powers.
///
/// Storage is a sorted list of `(variable, exponent)` pairs. Most monomials
/// arising from Bell polynomials touch only a handful of variables, so the
/// list lives inline for up to four variables.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Monomial {
    factors: SmallVec<[(Var, u32); 4]>,
}

impl Monomial {
    /// Creates the monomial 1 (all exponents zero).
    #[must_use]
    pub fn one() -> Self {
        Self::default()
    }

    /// Creates the monomial `x_v`.
    #[must_use]
    pub fn var(v: Var) -> Self {
        Self::power(v, 1)
    }

    /// Creates the monomial `x_v^e`.
    #[must_use]
    pub fn power(v: Var, e: u32) -> Self {
        let mut factors = SmallVec::new();
        if e > 0 {
            factors.push((v, e));
        }
        Self { factors }
    }

    /// Creates a monomial from `(variable, exponent)` pairs.
    ///
    /// Pairs may come in any order; repeated variables have their exponents
    /// summed and zero exponents are dropped.
    pub fn from_exponents(pairs: impl IntoIterator<Item = (Var, u32)>) -> Self {
        let mut factors: SmallVec<[(Var, u32); 4]> = pairs.into_iter().filter(|&(_, e)| e > 0).collect();
        factors.sort_unstable_by_key(|&(v, _)| v);
        factors.dedup_by(|next, kept| {
            if next.0 == kept.0 {
                kept.1 += next.1;
                true
            } else {
                false
            }
        });
        Self { factors }
    }

    /// Returns the exponent of variable `v` (zero if absent).
    #[must_use]
    pub fn exponent(&self, v: Var) -> u32 {
        self.factors
            .binary_search_by_key(&v, |&(w, _)| w)
            .map_or(0, |i| self.factors[i].1)
    }

    /// Returns true if this is the monomial 1.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.factors.is_empty()
    }

    /// Iterates over `(variable, exponent)` pairs in ascending variable order.
    pub fn iter(&self) -> impl Iterator<Item = (Var, u32)> + '_ {
        self.factors.iter().copied()
    }

    /// Iterates over the variables that occur in this monomial.
    pub fn variables(&self) -> impl Iterator<Item = Var> + '_ {
        self.factors.iter().map(|&(v, _)| v)
    }

    /// Returns the lowest-indexed variable, if any.
    #[must_use]
    pub fn min_variable(&self) -> Option<Var> {
        self.factors.first().map(|&(v, _)| v)
    }

    /// Returns the highest-indexed variable, if any.
    #[must_use]
    pub fn max_variable(&self) -> Option<Var> {
        self.factors.last().map(|&(v, _)| v)
    }

    /// Returns the number of distinct variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// Returns true if no variable occurs (same as [`Monomial::is_one`]).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Computes the total degree.
    #[must_use]
    pub fn total_degree(&self) -> u32 {
        self.factors.iter().map(|&(_, e)| e).sum()
    }

    /// Multiplies two monomials (adds exponents per shared variable).
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        let mut factors = SmallVec::with_capacity(self.factors.len() + other.factors.len());
        let (mut i, mut j) = (0, 0);

        while i < self.factors.len() && j < other.factors.len() {
            let (a, b) = (self.factors[i], other.factors[j]);
            match a.0.cmp(&b.0) {
                Ordering::Less => {
                    factors.push(a);
                    i += 1;
                }
                Ordering::Greater => {
                    factors.push(b);
                    j += 1;
                }
                Ordering::Equal => {
                    factors.push((a.0, a.1 + b.1));
                    i += 1;
                    j += 1;
                }
            }
        }
        factors.extend_from_slice(&self.factors[i..]);
        factors.extend_from_slice(&other.factors[j..]);

        Self { factors }
    }

    /// Raises the monomial to a power (scales every exponent).
    #[must_use]
    pub fn pow(&self, p: u32) -> Self {
        if p == 0 {
            return Self::one();
        }
        Self {
            factors: self.factors.iter().map(|&(v, e)| (v, e * p)).collect(),
        }
    }

    /// Returns true if `self` divides `other`.
    ///
    /// Every variable's exponent in `self` must be at most its exponent in
    /// `other`; variables absent from `self` always match.
    #[must_use]
    pub fn divides(&self, other: &Self) -> bool {
        self.factors.iter().all(|&(v, e)| e <= other.exponent(v))
    }

    /// Divides by another monomial if possible.
    ///
    /// Returns `Some(quotient)` if `self` is divisible by `other`.
    #[must_use]
    pub fn div(&self, other: &Self) -> Option<Self> {
        if !other.divides(self) {
            return None;
        }

        let factors = self
            .factors
            .iter()
            .filter_map(|&(v, e)| {
                let rest = e - other.exponent(v);
                (rest > 0).then_some((v, rest))
            })
            .collect();

        Some(Self { factors })
    }

    /// Applies the power rule with respect to `v`.
    ///
    /// Returns the former exponent of `v` and the monomial with that exponent
    /// lowered by one, or `None` if `v` does not occur.
    #[must_use]
    pub fn differentiate(&self, v: Var) -> Option<(u32, Self)> {
        let i = self.factors.binary_search_by_key(&v, |&(w, _)| w).ok()?;
        let e = self.factors[i].1;

        let mut factors = self.factors.clone();
        if e == 1 {
            factors.remove(i);
        } else {
            factors[i].1 = e - 1;
        }

        Some((e, Self { factors }))
    }

    /// Evaluates the monomial; variable `v` takes the value `args[v]`.
    ///
    /// # Panics
    ///
    /// Panics if a variable index is out of range for `args`.
    #[must_use]
    pub fn eval(&self, args: &[f64]) -> f64 {
        self.factors
            .iter()
            .fold(1.0, |acc, &(v, e)| acc * num_traits::pow(args[v as usize], e as usize))
    }
}

impl PartialOrd for Monomial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Lexicographic comparison of the sorted `(variable, exponent)` lists.
impl Ord for Monomial {
    fn cmp(&self, other: &Self) -> Ordering {
        self.factors.as_slice().cmp(other.factors.as_slice())
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_one() {
            return write!(f, "1");
        }

        for (i, &(v, e)) in self.factors.iter().enumerate() {
            if i > 0 {
                write!(f, "*")?;
            }
            if e == 1 {
                write!(f, "x{v}")?;
            } else {
                write!(f, "x{v}^{e}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        let x = Monomial::var(0);
        let y = Monomial::var(1);

        assert_eq!(x.exponent(0), 1);
        assert_eq!(x.exponent(1), 0);
        assert_eq!(y.exponent(0), 0);
        assert_eq!(y.exponent(1), 1);
        assert!(Monomial::one().is_one());
        assert!(Monomial::power(3, 0).is_one());
    }

    #[test]
    fn test_from_exponents_canonical() {
        let m = Monomial::from_exponents([(2, 1), (0, 3), (2, 2), (5, 0)]);
        assert_eq!(m, Monomial::from_exponents([(0, 3), (2, 3)]));
        assert_eq!(m.len(), 2);
        assert_eq!(m.exponent(5), 0);
    }

    #[test]
    fn test_mul() {
        let x = Monomial::var(0);
        let y = Monomial::var(1);

        let xy = x.mul(&y);
        assert_eq!(xy.exponent(0), 1);
        assert_eq!(xy.exponent(1), 1);

        let x2y = x.mul(&xy);
        assert_eq!(x2y.exponent(0), 2);
        assert_eq!(x2y.exponent(1), 1);
    }

    #[test]
    fn test_div() {
        let x2y = Monomial::from_exponents([(0, 2), (1, 1)]);
        let xy = Monomial::from_exponents([(0, 1), (1, 1)]);
        let x = Monomial::var(0);

        assert_eq!(x2y.div(&xy), Some(x));
        assert_eq!(xy.div(&x2y), None);
        assert_eq!(xy.div(&xy), Some(Monomial::one()));
    }

    #[test]
    fn test_divides_ignores_absent_variables() {
        let y = Monomial::var(1);
        let x3y2 = Monomial::from_exponents([(0, 3), (1, 2)]);
        assert!(y.divides(&x3y2));
        assert!(Monomial::one().divides(&y));
        assert!(!x3y2.divides(&y));
    }

    #[test]
    fn test_differentiate() {
        let m = Monomial::from_exponents([(0, 3), (4, 1)]);

        let (e, d) = m.differentiate(0).unwrap();
        assert_eq!(e, 3);
        assert_eq!(d, Monomial::from_exponents([(0, 2), (4, 1)]));

        let (e, d) = m.differentiate(4).unwrap();
        assert_eq!(e, 1);
        assert_eq!(d, Monomial::power(0, 3));

        assert!(m.differentiate(2).is_none());
    }

    #[test]
    fn test_eval_and_display() {
        let m = Monomial::from_exponents([(0, 2), (1, 3)]);
        assert_eq!(m.eval(&[2.0, 3.0]), 108.0);
        assert_eq!(m.to_string(), "x0^2*x1^3");
        assert_eq!(Monomial::one().to_string(), "1");
    }
}
