//! The operator cache context.
//!
//! An [`OperatorCache`] owns the order-indexed tables of multiplication and
//! composition levels. Tables only grow: asking for order `n` builds every
//! missing level up to `n`, and a built level is immutable and shared as an
//! [`Arc`] for the rest of the cache's life.
//!
//! Growth takes the write lock and re-checks the table length, so
//! concurrent first use is safe and idempotent. Evaluation never holds a
//! lock.

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use parking_lot::RwLock;

use crate::buffer::Layout;
use crate::composition::{Composition, CompositionScratch};
use crate::config::CacheConfig;
use crate::error::TaylorError;
use crate::multiplication::Multiplication;
use crate::power::power_derivatives;

// Per-thread composition buffers, so repeated evaluation does not allocate.
thread_local! {
    static SCRATCH: RefCell<CompositionScratch> = RefCell::new(CompositionScratch::new());
}

/// Order-indexed multiplication and composition levels.
pub struct OperatorCache {
    config: CacheConfig,
    multiplication: RwLock<Vec<Arc<Multiplication>>>,
    composition: RwLock<Vec<Arc<Composition>>>,
}

impl OperatorCache {
    /// Creates a cache, pre-building levels if the configuration asks for it.
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        let cache = Self {
            config,
            multiplication: RwLock::new(Vec::new()),
            composition: RwLock::new(Vec::new()),
        };

        if let Some(order) = config.prewarm_order {
            cache.ensure_multiplication(order);
            cache.ensure_composition(order);
        }

        cache
    }

    /// Returns the process-wide cache with the default configuration.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<OperatorCache> = OnceLock::new();
        GLOBAL.get_or_init(|| Self::new(CacheConfig::default()))
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Number of multiplication levels built so far.
    #[must_use]
    pub fn multiplication_levels(&self) -> usize {
        self.multiplication.read().len()
    }

    /// Number of composition levels built so far.
    #[must_use]
    pub fn composition_levels(&self) -> usize {
        self.composition.read().len()
    }

    /// Returns the multiplication level for `order`, building it if needed.
    pub fn ensure_multiplication(&self, order: usize) -> Arc<Multiplication> {
        {
            let levels = self.multiplication.read();
            if let Some(level) = levels.get(order) {
                return Arc::clone(level);
            }
        }

        let mut levels = self.multiplication.write();
        while levels.len() <= order {
            let n = levels.len();
            let level = Multiplication::new(n, levels.last().cloned());
            levels.push(Arc::new(level));
            tracing::debug!(target: "leibniz::cache", order = n, "multiplication_level_built");
        }
        Arc::clone(&levels[order])
    }

    /// Returns the composition level for `order`, building it if needed.
    pub fn ensure_composition(&self, order: usize) -> Arc<Composition> {
        {
            let levels = self.composition.read();
            if let Some(level) = levels.get(order) {
                return Arc::clone(level);
            }
        }

        let mut levels = self.composition.write();
        while levels.len() <= order {
            let n = levels.len();
            let start = Instant::now();
            let level = Composition::new(n, &levels);
            tracing::debug!(
                target: "leibniz::cache",
                order = n,
                products = level.product_count(),
                elapsed_us = start.elapsed().as_micros() as u64,
                "composition_level_built"
            );
            levels.push(Arc::new(level));
        }
        Arc::clone(&levels[order])
    }

    /// Writes `a * b` into `target`.
    ///
    /// # Errors
    ///
    /// Fails on mismatched buffer shapes.
    pub fn multiply(&self, a: &[f64], b: &[f64], target: &mut [f64], width: usize) -> Result<(), TaylorError> {
        let layout = Layout::from_width(width, a.len())?;
        self.ensure_multiplication(layout.order())
            .apply(a, b, target, width)
    }

    /// Replaces `a` with `a * b`.
    ///
    /// # Errors
    ///
    /// Fails on mismatched buffer shapes.
    pub fn multiply_assign(&self, a: &mut [f64], b: &[f64], width: usize) -> Result<(), TaylorError> {
        let layout = Layout::from_width(width, a.len())?;
        self.ensure_multiplication(layout.order())
            .apply_assign(a, b, width)
    }

    /// Writes `f(a)` into `target`, given the raw derivatives of `f` at the
    /// value of `a`.
    ///
    /// # Errors
    ///
    /// Fails on mismatched shapes or a short derivative sequence.
    pub fn compose(&self, f: &[f64], a: &[f64], target: &mut [f64], width: usize) -> Result<(), TaylorError> {
        let layout = Layout::from_width(width, a.len())?;
        let level = self.ensure_composition(layout.order());
        SCRATCH.with(|scratch| {
            level.apply_in(
                self.config.bell_evaluator,
                f,
                a,
                target,
                width,
                &mut scratch.borrow_mut(),
            )
        })
    }

    /// Writes `a^n` into `target`.
    ///
    /// # Errors
    ///
    /// Same as [`OperatorCache::compose`].
    pub fn pow(&self, a: &[f64], n: i32, target: &mut [f64], width: usize) -> Result<(), TaylorError> {
        let layout = Layout::from_width(width, a.len())?;
        let f = power_derivatives(a[0], n, layout.order());
        self.compose(&f, a, target, width)
    }
}

impl Default for OperatorCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl std::fmt::Debug for OperatorCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorCache")
            .field("config", &self.config)
            .field("multiplication_levels", &self.multiplication_levels())
            .field("composition_levels", &self.composition_levels())
            .finish()
    }
}
