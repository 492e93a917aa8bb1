//! Operator cache configuration.

/// How composition evaluates Bell polynomials.
///
/// Both evaluators compute the same sums; they differ in speed profile and
/// serve as a cross-check of each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BellEvaluator {
    /// Flattened sums of products over buffer rows.
    #[default]
    Products,
    /// Compiled Horner bytecode.
    Bytecode,
}

/// Configuration for an [`OperatorCache`](crate::OperatorCache).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// Build every level up to this order when the cache is created.
    pub prewarm_order: Option<usize>,
    /// Bell polynomial evaluator used by composition.
    pub bell_evaluator: BellEvaluator,
}

impl CacheConfig {
    /// Creates the default configuration: lazy growth, flattened products.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the order to pre-build at construction.
    #[must_use]
    pub fn with_prewarm_order(mut self, order: usize) -> Self {
        self.prewarm_order = Some(order);
        self
    }

    /// Sets the Bell polynomial evaluator.
    #[must_use]
    pub fn with_bell_evaluator(mut self, evaluator: BellEvaluator) -> Self {
        self.bell_evaluator = evaluator;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let config = CacheConfig::new();
        assert_eq!(config.prewarm_order, None);
        assert_eq!(config.bell_evaluator, BellEvaluator::Products);

        let config = config
            .with_prewarm_order(4)
            .with_bell_evaluator(BellEvaluator::Bytecode);
        assert_eq!(config.prewarm_order, Some(4));
        assert_eq!(config.bell_evaluator, BellEvaluator::Bytecode);
    }
}
