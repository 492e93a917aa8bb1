//! Property-based tests for Taylor number arithmetic.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::eval::eval_polynomial;
    use crate::number::TaylorNumber;
    use leibniz_ops::Layout;
    use leibniz_poly::{Monomial, Polynomial, Term};

    const NUM_VARS: u32 = 3;

    // Arbitrary number with up to 2 parameters and order up to 4
    fn taylor_number() -> impl Strategy<Value = TaylorNumber> {
        (0usize..3, 0usize..5).prop_flat_map(|(params, order)| {
            let len = (params + 1) * (order + 1);
            proptest::collection::vec(-2.0f64..2.0, len)
                .prop_map(move |v| TaylorNumber::from_values(params + 1, v).unwrap())
        })
    }

    fn small_poly(vars: u32) -> impl Strategy<Value = Polynomial> {
        let term = (-5i64..6, proptest::collection::vec(0u32..4, vars as usize))
            .prop_map(move |(c, exps)| Term::new(c, Monomial::from_exponents((0..vars).zip(exps))));
        proptest::collection::vec(term, 0..=4).prop_map(Polynomial::from_terms)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-10 * a.abs().max(b.abs()).max(1.0)
    }

    fn all_close(a: &TaylorNumber, b: &TaylorNumber) -> bool {
        a.layout() == b.layout() && a.data().iter().zip(b.data()).all(|(x, y)| close(*x, *y))
    }

    fn constant_like(x: &TaylorNumber, value: f64) -> TaylorNumber {
        TaylorNumber::constant(x.params(), x.order(), value)
    }

    proptest! {
        // Exact identities

        #[test]
        fn mul_by_one(x in taylor_number()) {
            prop_assert_eq!(&x * &constant_like(&x, 1.0), x);
        }

        #[test]
        fn mul_by_zero(x in taylor_number()) {
            let zero = constant_like(&x, 0.0);
            prop_assert_eq!(&x * &zero, zero);
        }

        #[test]
        fn add_zero(x in taylor_number()) {
            prop_assert_eq!(&x + &constant_like(&x, 0.0), x);
        }

        #[test]
        fn sub_self(x in taylor_number()) {
            prop_assert_eq!(&x - &x, constant_like(&x, 0.0));
        }

        #[test]
        fn mul_by_two_is_doubling(x in taylor_number()) {
            prop_assert_eq!(&x * &constant_like(&x, 2.0), &x + &x);
        }

        // Composition against multiplication

        #[test]
        fn pow_zero_and_one(x in taylor_number()) {
            prop_assert_eq!(x.pow(0), constant_like(&x, 1.0));
            prop_assert!(all_close(&x.pow(1), &x));
        }

        #[test]
        fn pow_matches_products(x in taylor_number()) {
            let square = &x * &x;
            prop_assert!(all_close(&x.pow(2), &square));
            prop_assert!(all_close(&x.pow(3), &(&square * &x)));
        }

        #[test]
        fn mul_assign_matches_mul(x in taylor_number()) {
            let mut y = x.clone();
            y *= &x;
            prop_assert_eq!(y, &x * &x);
        }

        // Differentiation consistency with symbolic calculus

        #[test]
        fn parameter_derivatives_match_symbolic(
            p in small_poly(NUM_VARS),
            vals in proptest::collection::vec(-1.5f64..1.5, NUM_VARS as usize),
            order in 0usize..4,
        ) {
            let params = NUM_VARS as usize;
            let layout = Layout::new(params, order);
            let args: Vec<TaylorNumber> = vals
                .iter()
                .enumerate()
                .map(|(i, &v)| TaylorNumber::parameter(params, order, v, i + 1).unwrap())
                .collect();

            let r = eval_polynomial(&p, layout, &args).unwrap();

            prop_assert!(close(r.value(), p.eval(&vals)));
            for param in 1..=params {
                let symbolic = p.partial_derivative((param - 1) as u32).eval(&vals);
                for row in 0..=order {
                    prop_assert!(close(r.der(param, row).unwrap(), symbolic));
                }
            }
        }

        #[test]
        fn free_variable_derivatives_match_symbolic(
            p in small_poly(1),
            t in -1.5f64..1.5,
            order in 0usize..4,
        ) {
            let layout = Layout::new(0, order);
            let x = TaylorNumber::free_variable(0, order, t);
            let r = eval_polynomial(&p, layout, &[x]).unwrap();

            let mut symbolic = p.clone();
            for row in 0..=order {
                prop_assert!(close(r.total_derivative(row).unwrap(), symbolic.eval(&[t])));
                symbolic = symbolic.partial_derivative(0);
            }
        }
    }
}
