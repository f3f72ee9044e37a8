//! Error types for gspmm

use thiserror::Error;

/// Result type alias using gspmm's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when configuring or invoking an SpMM kernel
///
/// Every variant is a caller/configuration error. Validation runs before any
/// output is touched, so an `Err` always leaves the output buffers unmodified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Shape mismatch between a tensor and what the kernel expects
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Feature shapes cannot be broadcast together
    #[error("Cannot broadcast feature shapes {lhs:?} and {rhs:?}")]
    BroadcastError {
        /// Feature shape of the source-node operand
        lhs: Vec<usize>,
        /// Feature shape of the edge operand
        rhs: Vec<usize>,
    },

    /// Reducer name outside `sum`, `max`, `min`
    #[error("Unsupported SpMM reducer: {0}")]
    UnsupportedReducer(String),

    /// Operator name outside the supported binary operator set
    #[error("Unsupported SpMM operator: {0}")]
    UnsupportedOperator(String),

    /// An operand required by the operator was not supplied
    #[error("Operator '{op}' requires the {operand} operand")]
    MissingOperand {
        /// The operator name
        op: &'static str,
        /// Which operand is missing (`ufeat` or `efeat`)
        operand: &'static str,
    },

    /// Index out of bounds
    #[error("Index {index} out of bounds for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index
        index: i64,
        /// Size of the dimension
        size: usize,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create a broadcast error
    pub fn broadcast(lhs: &[usize], rhs: &[usize]) -> Self {
        Self::BroadcastError {
            lhs: lhs.to_vec(),
            rhs: rhs.to_vec(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }

    /// Returns true for errors caused by disagreeing shapes, including
    /// incompatible broadcast dimensions
    pub fn is_shape_error(&self) -> bool {
        matches!(self, Self::ShapeMismatch { .. } | Self::BroadcastError { .. })
    }
}
