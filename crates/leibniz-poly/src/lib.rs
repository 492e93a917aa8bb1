//! # leibniz-poly
//!
//! Symbolic integer polynomials and their fast numeric evaluators.
//!
//! This crate provides:
//! - Sparse multivariate monomials with small inline storage
//! - Arbitrary precision integer terms and canonical polynomials (add, multiply,
//!   term division/remainder, partial and total derivatives)
//! - A Horner factorizer rewriting polynomials into nested factored form
//! - A bytecode compiler turning Horner trees (and their derivatives) into
//!   flat stack-machine programs
//!
//! ## Evaluation Paths
//!
//! The same polynomial can be evaluated three ways, and all three must agree:
//! - [`Polynomial::eval`]: term by term
//! - [`Horner::eval`]: recursive walk over the factored tree
//! - [`Program::eval`]: linear bytecode against an explicit stack

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]

pub mod bytecode;
pub mod horner;
pub mod monomial;
pub mod polynomial;
pub mod term;

#[cfg(test)]
mod proptests;

pub use bytecode::{Differentiation, Instruction, Program};
pub use horner::Horner;
pub use monomial::{Monomial, Var};
pub use polynomial::Polynomial;
pub use term::{coefficient_to_f64, var, Term};

/// Arbitrary precision integer used for polynomial coefficients.
pub use dashu::integer::IBig;
