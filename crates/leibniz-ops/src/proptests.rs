//! Property-based tests for the buffer operators.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::buffer::{self, Layout};
    use crate::cache::OperatorCache;
    use crate::config::{BellEvaluator, CacheConfig};

    // Shape plus a buffer of that shape with moderate entries
    fn shaped_buffer() -> impl Strategy<Value = (Layout, Vec<f64>)> {
        (0usize..3, 0usize..5).prop_flat_map(|(params, order)| {
            let layout = Layout::new(params, order);
            proptest::collection::vec(-2.0f64..2.0, layout.len()).prop_map(move |v| (layout, v))
        })
    }

    fn shaped_pair() -> impl Strategy<Value = (Layout, Vec<f64>, Vec<f64>)> {
        (0usize..3, 0usize..5).prop_flat_map(|(params, order)| {
            let layout = Layout::new(params, order);
            let buf = proptest::collection::vec(-2.0f64..2.0, layout.len());
            (buf.clone(), buf).prop_map(move |(a, b)| (layout, a, b))
        })
    }

    fn close(a: &[f64], b: &[f64], tol: f64) -> bool {
        a.iter()
            .zip(b)
            .all(|(x, y)| (x - y).abs() <= tol * x.abs().max(y.abs()).max(1.0))
    }

    proptest! {
        #[test]
        fn multiply_commutative((layout, a, b) in shaped_pair()) {
            let cache = OperatorCache::global();
            let mut ab = vec![0.0; layout.len()];
            let mut ba = vec![0.0; layout.len()];
            cache.multiply(&a, &b, &mut ab, layout.width()).unwrap();
            cache.multiply(&b, &a, &mut ba, layout.width()).unwrap();
            prop_assert!(close(&ab, &ba, 1e-12));
        }

        #[test]
        fn multiply_by_one_is_identity((layout, a) in shaped_buffer()) {
            let mut one = vec![0.0; layout.len()];
            buffer::write_constant(&mut one, 1.0);
            let mut t = vec![0.0; layout.len()];
            OperatorCache::global().multiply(&a, &one, &mut t, layout.width()).unwrap();
            prop_assert_eq!(t, a);
        }

        #[test]
        fn multiply_distributes_over_add((layout, a, b) in shaped_pair(), s in -3.0f64..3.0) {
            let cache = OperatorCache::global();
            let width = layout.width();

            // a * (b + s) == a * b + s * a
            let mut shifted = vec![0.0; layout.len()];
            buffer::add_scalar(layout, &b, s, &mut shifted).unwrap();
            let mut left = vec![0.0; layout.len()];
            cache.multiply(&a, &shifted, &mut left, width).unwrap();

            let mut ab = vec![0.0; layout.len()];
            cache.multiply(&a, &b, &mut ab, width).unwrap();
            let mut sa = vec![0.0; layout.len()];
            buffer::scale(layout, &a, s, &mut sa).unwrap();
            let mut right = vec![0.0; layout.len()];
            buffer::add(layout, &ab, &sa, &mut right).unwrap();

            prop_assert!(close(&left, &right, 1e-10));
        }

        #[test]
        fn compose_with_identity((layout, a) in shaped_buffer()) {
            // f(y) = y: derivatives [a0, 1, 0, ...]
            let mut f = vec![0.0; layout.order() + 2];
            f[0] = a[0];
            f[1] = 1.0;
            let mut t = vec![0.0; layout.len()];
            OperatorCache::global().compose(&f, &a, &mut t, layout.width()).unwrap();
            prop_assert!(close(&t, &a, 1e-14));
        }

        #[test]
        fn square_matches_product((layout, a) in shaped_buffer()) {
            let cache = OperatorCache::global();
            let mut product = vec![0.0; layout.len()];
            let mut square = vec![0.0; layout.len()];
            cache.multiply(&a, &a, &mut product, layout.width()).unwrap();
            cache.pow(&a, 2, &mut square, layout.width()).unwrap();
            prop_assert!(close(&product, &square, 1e-10));
        }

        #[test]
        fn bell_evaluators_agree((layout, a) in shaped_buffer(), f in proptest::collection::vec(-2.0f64..2.0, 6)) {
            let products = OperatorCache::global();
            let bytecode = OperatorCache::new(CacheConfig::new().with_bell_evaluator(BellEvaluator::Bytecode));

            let mut t1 = vec![0.0; layout.len()];
            let mut t2 = vec![0.0; layout.len()];
            products.compose(&f, &a, &mut t1, layout.width()).unwrap();
            bytecode.compose(&f, &a, &mut t2, layout.width()).unwrap();
            prop_assert!(close(&t1, &t2, 1e-10));
        }
    }
}
