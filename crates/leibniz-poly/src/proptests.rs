//! Property-based tests for the polynomial algebra and its evaluators.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::bytecode::{Differentiation, Program};
    use crate::horner::Horner;
    use crate::monomial::Monomial;
    use crate::polynomial::Polynomial;
    use crate::term::Term;

    const NUM_VARS: u32 = 3;

    // Strategy for generating terms over three variables with small exponents
    fn small_term() -> impl Strategy<Value = Term> {
        (-9i64..10, proptest::collection::vec(0u32..4, NUM_VARS as usize)).prop_map(|(c, exps)| {
            let monomial = Monomial::from_exponents((0..NUM_VARS).zip(exps));
            Term::new(c, monomial)
        })
    }

    // Strategy for generating small polynomials (0-6 terms)
    fn small_poly() -> impl Strategy<Value = Polynomial> {
        proptest::collection::vec(small_term(), 0..=6).prop_map(Polynomial::from_terms)
    }

    // Small integers keep every evaluator exact in f64
    fn small_args() -> impl Strategy<Value = Vec<f64>> {
        proptest::collection::vec((-5i32..6).prop_map(f64::from), NUM_VARS as usize)
    }

    proptest! {
        // Ring axioms

        #[test]
        fn poly_add_commutative(a in small_poly(), b in small_poly()) {
            prop_assert_eq!(&a + &b, &b + &a);
        }

        #[test]
        fn poly_mul_commutative(a in small_poly(), b in small_poly()) {
            prop_assert_eq!(&a * &b, &b * &a);
        }

        #[test]
        fn poly_distributive(a in small_poly(), b in small_poly(), c in small_poly()) {
            let left = &a * &(&b + &c);
            let right = &a * &b + &a * &c;
            prop_assert_eq!(left, right);
        }

        #[test]
        fn poly_additive_inverse(a in small_poly()) {
            prop_assert!((&a + &(-&a)).is_zero());
        }

        #[test]
        fn poly_canonical_form(a in small_poly(), b in small_poly()) {
            let p = &a * &b;
            prop_assert!(p.terms().iter().all(|t| !t.is_zero()));
            prop_assert!(p.terms().windows(2).all(|w| w[0].monomial < w[1].monomial));
        }

        // Term division partitions the polynomial

        #[test]
        fn divide_remainder_partition(p in small_poly(), t in small_term()) {
            let divisor = Term::new(1, t.monomial);
            let rebuilt = p.divide(&divisor).mul_term(&divisor) + p.remainder(&divisor);
            prop_assert_eq!(rebuilt, p);
        }

        // Three evaluators agree exactly

        #[test]
        fn evaluators_agree(p in small_poly(), args in small_args()) {
            let tree = Horner::factorize(&p);
            let program = Program::value(tree.as_ref());

            let direct = p.eval(&args);
            let horner = tree.as_ref().map_or(0.0, |h| h.eval(&args));
            prop_assert_eq!(direct, horner);
            prop_assert_eq!(direct, program.eval(&args));
        }

        #[test]
        fn factorize_expand_round_trip(p in small_poly()) {
            let expanded = Horner::factorize(&p).map_or_else(Polynomial::zero, |h| h.expand());
            prop_assert_eq!(expanded, p);
        }

        // Derivative programs agree with symbolic differentiation

        #[test]
        fn partial_derivative_program(p in small_poly(), args in small_args(), x in 0..NUM_VARS) {
            let tree = Horner::factorize(&p);
            let program = Program::derivative(tree.as_ref(), Differentiation::Partial(x));
            prop_assert_eq!(program.eval(&args), p.partial_derivative(x).eval(&args));
        }

        #[test]
        fn total_derivative_program(p in small_poly(), args in small_args(), dargs in small_args()) {
            let tree = Horner::factorize(&p);
            let program = Program::derivative(
                tree.as_ref(),
                Differentiation::Total { shadow_offset: NUM_VARS },
            );

            let mut full = args.clone();
            full.extend_from_slice(&dargs);
            prop_assert_eq!(program.eval(&full), p.total_derivative(NUM_VARS).eval(&full));
        }
    }
}
