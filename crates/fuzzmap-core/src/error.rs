//! Error types for fuzzmap-core.

use thiserror::Error;

/// Result type for fuzzmap-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised at the boundary of the engine.
///
/// The convergence procedure itself never fails; every variant here comes
/// from validating input before it reaches the matrix or value vector.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Node count outside the configured generation range.
    #[error("invalid node count {n}: supported range is {min}..{max} ({})", bound_kind(.inclusive))]
    InvalidDimension {
        n: usize,
        min: usize,
        max: usize,
        inclusive: bool,
    },

    /// A node or edge index outside the map.
    #[error("index {index} out of range for {len} nodes")]
    IndexOutOfRange { index: usize, len: usize },

    /// An edge edit targeting the diagonal.
    #[error("node {node} cannot influence itself")]
    SelfLoop { node: usize },

    /// A NaN or infinite value was supplied.
    #[error("{what} must be finite")]
    NonFinite { what: &'static str },

    /// Weight matrix and value vector disagree on the node count.
    #[error("dimension mismatch: {weights}x{weights} weights, {values} values")]
    DimensionMismatch { weights: usize, values: usize },

    /// A matrix row has the wrong length.
    #[error("row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    /// Configuration rejected by validation or environment parsing.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

fn bound_kind(inclusive: &bool) -> &'static str {
    if *inclusive {
        "inclusive"
    } else {
        "exclusive"
    }
}
