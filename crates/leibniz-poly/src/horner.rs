//! Horner factorization of multivariate polynomials.
//!
//! A polynomial is rewritten as nested `factor * x_v^p * (left) + (right)`
//! expressions by repeatedly pulling the largest common power of the
//! lowest-indexed variable out of the terms that contain it. The result is
//! not guaranteed to be optimal, but it is deterministic and evaluates with
//! far fewer multiplications than the flat sum of terms.

use std::fmt;

use dashu::integer::IBig;

use crate::monomial::{Monomial, Var};
use crate::polynomial::Polynomial;
use crate::term::{coefficient_to_f64, Term};

/// A factored polynomial.
///
/// Every node exclusively owns its children; the tree has no sharing.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Horner {
    /// A constant leaf.
    Constant(IBig),
    /// `factor * x_var^power * (left) + (right)`.
    ///
    /// An absent `left` multiplies by one, an absent `right` adds zero.
    Node {
        /// The factored-out variable.
        var: Var,
        /// Its power.
        power: u32,
        /// Scalar factor of this node.
        factor: IBig,
        /// Cofactor of `x_var^power`.
        left: Option<Box<Horner>>,
        /// Terms not containing `x_var`.
        right: Option<Box<Horner>>,
    },
}

impl Horner {
    /// Factorizes a polynomial.
    ///
    /// Returns `None` for the zero polynomial.
    #[must_use]
    pub fn factorize(p: &Polynomial) -> Option<Self> {
        let Some(v) = p.min_variable() else {
            // No variables left: at most one (constant) term in canonical form.
            return p.terms().first().map(|t| Self::Constant(t.factor.clone()));
        };

        let power = p
            .terms()
            .iter()
            .map(|t| t.monomial.exponent(v))
            .filter(|&e| e > 0)
            .min()
            .unwrap_or(1);

        let divisor = Term::new(1, Monomial::power(v, power));
        let left = Self::factorize(&p.divide(&divisor));
        let right = Self::factorize(&p.remainder(&divisor));

        Some(Self::Node {
            var: v,
            power,
            factor: IBig::ONE,
            left: left.map(Box::new),
            right: right.map(Box::new),
        })
    }

    /// Evaluates the tree; variable `v` takes the value `args[v]`.
    ///
    /// Performs the same floating-point operations in the same order as the
    /// value program compiled from this tree.
    ///
    /// # Panics
    ///
    /// Panics if a variable index is out of range for `args`.
    #[must_use]
    pub fn eval(&self, args: &[f64]) -> f64 {
        match self {
            Self::Constant(c) => coefficient_to_f64(c),
            Self::Node {
                var,
                power,
                factor,
                left,
                right,
            } => {
                let mut acc = num_traits::pow(args[*var as usize], *power as usize);
                if *factor != IBig::ONE {
                    acc *= coefficient_to_f64(factor);
                }
                if let Some(left) = left {
                    acc *= left.eval(args);
                }
                if let Some(right) = right {
                    acc += right.eval(args);
                }
                acc
            }
        }
    }

    /// Expands the tree back into a canonical polynomial.
    #[must_use]
    pub fn expand(&self) -> Polynomial {
        match self {
            Self::Constant(c) => Polynomial::constant(c.clone()),
            Self::Node {
                var,
                power,
                factor,
                left,
                right,
            } => {
                let head = Term::new(factor.clone(), Monomial::power(*var, *power));
                let mut p = match left {
                    Some(left) => left.expand().mul_term(&head),
                    None => Polynomial::from(head),
                };
                if let Some(right) = right {
                    p += &right.expand();
                }
                p
            }
        }
    }

    /// Returns the number of nodes and leaves in the tree.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Constant(_) => 1,
            Self::Node { left, right, .. } => {
                1 + left.as_ref().map_or(0, |l| l.size()) + right.as_ref().map_or(0, |r| r.size())
            }
        }
    }
}

impl fmt::Display for Horner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(c) => write!(f, "{c}"),
            Self::Node {
                var,
                power,
                factor,
                left,
                right,
            } => {
                if *factor != IBig::ONE {
                    write!(f, "{factor}*")?;
                }
                write!(f, "{}", Monomial::power(*var, *power))?;
                if let Some(left) = left {
                    write!(f, "*({left})")?;
                }
                if let Some(right) = right {
                    write!(f, " + {right}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::var;

    #[test]
    fn test_empty_and_constant() {
        assert_eq!(Horner::factorize(&Polynomial::zero()), None);
        assert_eq!(
            Horner::factorize(&Polynomial::constant(-4)),
            Some(Horner::Constant(IBig::from(-4)))
        );
    }

    #[test]
    fn test_structure() {
        // x0^2*x1^3 + x1  =>  x0^2*(x1^3) + x1
        let p = var(0).pow(2) * var(1).pow(3) + var(1);
        let h = Horner::factorize(&p).unwrap();

        match &h {
            Horner::Node {
                var,
                power,
                factor,
                right,
                ..
            } => {
                assert_eq!((*var, *power), (0, 2));
                assert_eq!(*factor, IBig::ONE);
                assert!(right.is_some());
            }
            Horner::Constant(_) => panic!("expected a node"),
        }
        assert_eq!(h.to_string(), "x0^2*(x1^3*(1)) + x1*(1)");
    }

    #[test]
    fn test_min_exponent_ignores_terms_without_variable() {
        // 5 + x0^3 + x0^4  =>  x0^3*(1 + x0) + 5
        let p = Polynomial::from_terms([Term::constant(5), var(0).pow(3), var(0).pow(4)]);
        let h = Horner::factorize(&p).unwrap();
        let Horner::Node { power, right, .. } = &h else {
            panic!("expected a node");
        };
        assert_eq!(*power, 3);
        assert_eq!(right.as_deref(), Some(&Horner::Constant(IBig::from(5))));
    }

    #[test]
    fn test_eval_matches_polynomial() {
        let p = var(0).pow(2) * var(1).pow(3) + var(1) + var(0) * var(1) * 4 + (-7);
        let h = Horner::factorize(&p).unwrap();

        for args in [[13.0, 7.0], [42.0, 21.0], [0.0, 1.0], [-3.0, 2.0]] {
            assert_eq!(h.eval(&args), p.eval(&args));
        }
    }

    #[test]
    fn test_expand_round_trip() {
        let p = (var(0) + var(1) + var(2) + 1) * (var(0) * 3 + (-var(2)) + 2);
        let h = Horner::factorize(&p).unwrap();
        assert_eq!(h.expand(), p);
        assert!(h.size() > 1);
    }
}
