//! Feedforward networks and the matrix engine that evaluates them.
//!
//! This crate contains the numeric core used to drive agents: an agent observes a
//! fixed-size input vector, a network maps it to an output vector, and the index of
//! the strongest output selects the agent's next action.
//!
//! # Components
//!
//! - [`matrix`] - Dense row-major [`Matrix`] and interchangeable multiply
//!   strategies (serial and parallel)
//! - [`activation`] - Elementwise [`Activation`] functions
//! - [`scalar`] - Per-neuron representation ([`Node`], [`Layer`], [`Network`])
//! - [`packed`] - Matrix representation ([`PackedLayer`], [`PackedNetwork`])
//! - [`brain`] - The [`Brain`] capability set shared by both representations and
//!   the [`AnyBrain`] union used to pick one at runtime
//!
//! # Example
//!
//! ```
//! use evonet_engine::{Activation, Network};
//!
//! let mut rng = rand::rng();
//! let mut network = Network::new(4, 5, 1)?;
//! network.randomize(&mut rng);
//!
//! let inputs = [0.5, -0.25, 0.0, 1.0];
//! let outputs = network.evaluate(&inputs, Activation::Sigmoid)?;
//! assert_eq!(outputs.len(), 5);
//!
//! // `None` means no output was positive: the agent does nothing this tick.
//! let action = network.best_index(&inputs, Activation::Sigmoid)?;
//! assert!(action.is_none_or(|i| i < 5));
//! # Ok::<(), evonet_engine::NetworkError>(())
//! ```

pub use self::{
    activation::Activation,
    brain::{AnyBrain, Brain, best_index},
    matrix::{ExecutionStrategy, MatMul, Matrix, ParallelMatMul, SerialMatMul},
    packed::{BiasMode, LayerOptions, PackedLayer, PackedNetwork},
    scalar::{Layer, Network, Node},
};

pub mod activation;
pub mod brain;
pub mod matrix;
mod mutation;
pub mod packed;
pub mod scalar;

/// Error returned when two matrices cannot be multiplied.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MatrixError {
    #[display(
        "cannot multiply {left_rows}x{left_cols} matrix by {right_rows}x{right_cols} matrix"
    )]
    DimensionMismatch {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },
    #[display("expected {expected} cells, got {actual}")]
    DataLength { expected: usize, actual: usize },
}

/// Broad classification of a [`NetworkError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum ErrorKind {
    /// Bad construction parameters.
    InvalidArgument,
    /// Vectors, matrices or layer stacks with incompatible shapes.
    ShapeMismatch,
}

/// Error returned when building, evaluating or copying a network.
///
/// Use [`NetworkError::kind`] to tell bad parameters from shape mismatches.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum NetworkError {
    #[display("network must have at least one output")]
    NoOutputs,
    #[display("expected {expected} inputs, got {actual}")]
    InputLength { expected: usize, actual: usize },
    #[display("node {node} takes {actual} inputs, expected {expected}")]
    NodeWidth {
        node: usize,
        expected: usize,
        actual: usize,
    },
    #[display("expected {expected} layers, got {actual}")]
    LayerCount { expected: usize, actual: usize },
    #[display("layer {layer} has shape {actual:?}, expected {expected:?}")]
    LayerShape {
        layer: usize,
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[display("weight matrix has shape {actual:?}, expected {expected:?}")]
    WeightShape {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[display("{_0}")]
    Matrix(#[error(source)] MatrixError),
}

impl From<MatrixError> for NetworkError {
    fn from(err: MatrixError) -> Self {
        Self::Matrix(err)
    }
}

impl NetworkError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoOutputs => ErrorKind::InvalidArgument,
            Self::InputLength { .. }
            | Self::NodeWidth { .. }
            | Self::LayerCount { .. }
            | Self::LayerShape { .. }
            | Self::WeightShape { .. }
            | Self::Matrix(_) => ErrorKind::ShapeMismatch,
        }
    }
}
