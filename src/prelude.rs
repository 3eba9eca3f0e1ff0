use thiserror::Error;

use crate::neural::layer::LayerKind;

/// Error type for sgd_net
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A null-like, zero or otherwise unusable argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Backing storage for a matrix could not be acquired.
    #[error("could not allocate a {rows}x{cols} matrix")]
    AllocationFailure { rows: usize, cols: usize },

    /// Indicates some dimension is incorrect in a Matrix operation.
    #[error("dimension mismatch between {left:?} and {right:?}")]
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("index ({row}, {col}) is out of bounds for a {rows}x{cols} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// A layer-role-specific view was requested on the wrong kind of layer.
    #[error("layer {layer} ({kind}) has no {wanted}")]
    ShapeMismatch {
        layer: usize,
        kind: LayerKind,
        wanted: &'static str,
    },

    #[error("bad training config: {0}")]
    Config(String),

    /// The training thread panicked or hung up while a GUI was attached.
    #[error("training thread failed")]
    Thread,
}

pub type Result<T> = std::result::Result<T, Error>;
