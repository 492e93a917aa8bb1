//! Errors raised at the buffer boundary.

use thiserror::Error;

/// Errors that can occur when applying Taylor operators.
///
/// All of these are precondition violations or unsupported requests;
/// numeric trouble (division by a zero value inside a negative power)
/// propagates as `inf`/`NaN` instead.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TaylorError {
    /// Width must count at least the value column.
    #[error("width must be at least 1")]
    ZeroWidth,

    /// Operands with different parameter counts.
    #[error("width mismatch: {left} vs {right}")]
    WidthMismatch {
        /// Width of the left operand.
        left: usize,
        /// Width of the right operand.
        right: usize,
    },

    /// Operands with different orders.
    #[error("order mismatch: {left} vs {right}")]
    OrderMismatch {
        /// Order of the left operand.
        left: usize,
        /// Order of the right operand.
        right: usize,
    },

    /// A buffer whose length does not match `width * (order + 1)`.
    #[error("buffer length {actual} does not match expected {expected}")]
    BufferLength {
        /// Required length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },

    /// A parameter column beyond the buffer width.
    #[error("parameter {param} out of range (params = {params})")]
    ParamOutOfRange {
        /// Requested parameter column.
        param: usize,
        /// Number of parameters.
        params: usize,
    },

    /// A derivative row beyond the buffer order.
    #[error("order {order} out of range (max = {max})")]
    OrderOutOfRange {
        /// Requested row.
        order: usize,
        /// Highest stored row.
        max: usize,
    },

    /// An outer-function derivative sequence that is too short.
    #[error("derivative sequence has {actual} entries, need {expected}")]
    DerivativeSequence {
        /// Required length (`order + 2`).
        expected: usize,
        /// Supplied length.
        actual: usize,
    },

    /// An operation that is deliberately not implemented.
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),
}
