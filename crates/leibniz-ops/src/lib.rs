//! # leibniz-ops
//!
//! Operators over flat Taylor coefficient buffers.
//!
//! A coefficient buffer stores, for a fixed number of parameters and a fixed
//! order, the value of a quantity and all of its derivatives along a free
//! variable, each together with its first partial derivatives in the
//! parameters. This crate provides:
//!
//! - [`Layout`] and linear buffer operations ([`buffer`])
//! - [`Multiplication`]: the Leibniz product rule, one level per order
//! - [`Composition`]: Faà di Bruno's formula through Bell polynomials
//!   derived symbolically with `leibniz-poly`
//! - [`OperatorCache`]: the growable, thread-safe table of both
//!
//! ## Example
//!
//! ```
//! use leibniz_ops::{buffer, Layout, OperatorCache};
//!
//! // t at t = 2, one parameter, order 2
//! let layout = Layout::new(1, 2);
//! let mut t = vec![0.0; layout.len()];
//! buffer::write_free_variable(layout, &mut t, 2.0).unwrap();
//!
//! let mut cube = vec![0.0; layout.len()];
//! OperatorCache::global().pow(&t, 3, &mut cube, layout.width()).unwrap();
//! assert_eq!(buffer::total_derivative(layout, &cube, 2).unwrap(), 12.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::module_name_repetitions)]

pub mod bell;
pub mod binomial;
pub mod buffer;
pub mod cache;
pub mod composition;
pub mod config;
pub mod error;
pub mod multiplication;
pub mod power;

#[cfg(test)]
mod proptests;

pub use bell::{BellPolynomial, DerSumOfProducts, SumOfProducts};
pub use buffer::{payload_len, Layout};
pub use cache::OperatorCache;
pub use composition::{Composition, CompositionScratch};
pub use config::{BellEvaluator, CacheConfig};
pub use error::TaylorError;
pub use multiplication::Multiplication;
pub use power::power_derivatives;
