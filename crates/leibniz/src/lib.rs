//! # Leibniz
//!
//! Arbitrary-order, arbitrary-arity forward-mode Taylor arithmetic.
//!
//! A [`TaylorNumber`] carries a value together with all of its derivatives
//! along one free variable `t` up to a fixed order, and for each of those the
//! first partial derivatives with respect to a fixed set of parameters.
//! Multiplication follows the Leibniz rule; integer powers and general
//! composition follow Faà di Bruno's formula, with the Bell polynomials
//! derived symbolically once per order and cached.
//!
//! ## Crates
//!
//! - [`poly`]: integer polynomials, Horner factorization, bytecode
//! - [`ops`]: coefficient buffers and the operator cache
//!
//! ## Quick Start
//!
//! ```
//! use leibniz::prelude::*;
//!
//! // f(t) = t^3 at t = 2, no parameters, second order
//! let t = TaylorNumber::free_variable(0, 2, 2.0);
//! let f = t.pow(3);
//! assert_eq!(f.data(), &[8.0, 12.0, 12.0]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]

pub use leibniz_ops as ops;
pub use leibniz_poly as poly;

pub mod eval;
pub mod number;

#[cfg(test)]
mod proptests;

pub use eval::{eval_polynomial, eval_polynomial_in};
pub use leibniz_ops::{BellEvaluator, CacheConfig, Layout, OperatorCache, TaylorError};
pub use number::TaylorNumber;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::eval::eval_polynomial;
    pub use crate::number::TaylorNumber;
    pub use leibniz_ops::{CacheConfig, Layout, OperatorCache, TaylorError};
    pub use leibniz_poly::{var, Polynomial, Term};
}
