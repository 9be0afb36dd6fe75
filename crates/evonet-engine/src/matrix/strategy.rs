use serde::{Deserialize, Serialize};

use crate::{Matrix, MatrixError};

/// A matrix multiplication strategy.
///
/// `multiply(a, b)` fails with [`MatrixError::DimensionMismatch`] unless
/// `a.cols() == b.rows()`. The result has shape `(a.rows(), b.cols())` and
/// `result[(i, j)] = sum_k a[(i, k)] * b[(k, j)]`.
pub trait MatMul {
    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError>;
}

/// Straightforward triple-loop multiplication on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialMatMul;

impl MatMul for SerialMatMul {
    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
        a.check_multiply(b)?;
        let mut c = Matrix::zeros(a.rows(), b.cols());
        for i in 0..a.rows() {
            for j in 0..b.cols() {
                let mut acc = 0.0;
                for k in 0..a.cols() {
                    acc += a[(i, k)] * b[(k, j)];
                }
                c[(i, j)] = acc;
            }
        }
        Ok(c)
    }
}

/// Multiplication with output cells distributed across worker threads.
///
/// Every output cell depends on one row of `a` and one column of `b` only, so
/// cells are computed independently. The columns of `b` are first copied into a
/// contiguous scratch buffer owned by the call; it is dropped on every return
/// path. Each cell is accumulated in the same order as [`SerialMatMul`].
///
/// Without the `parallel` feature this runs the serial kernel.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParallelMatMul;

impl MatMul for ParallelMatMul {
    #[cfg(feature = "parallel")]
    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
        use rayon::prelude::*;

        a.check_multiply(b)?;
        let inner = a.cols();
        let cols = b.cols();
        let columns = b.transpose();
        let mut c = Matrix::zeros(a.rows(), cols);
        tracing::trace!(
            rows = a.rows(),
            inner,
            cols,
            threads = rayon::current_num_threads(),
            "parallel multiply"
        );
        c.as_mut_slice()
            .par_iter_mut()
            .enumerate()
            .for_each(|(idx, cell)| {
                let row = a.row(idx / cols);
                let column = columns.row(idx % cols);
                *cell = row
                    .iter()
                    .zip(column)
                    .fold(0.0, |acc, (x, y)| acc + x * y);
            });
        Ok(c)
    }

    #[cfg(not(feature = "parallel"))]
    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
        SerialMatMul.multiply(a, b)
    }
}

/// Which [`MatMul`] implementation a packed layer uses.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStrategy {
    #[default]
    Serial,
    Parallel,
}

impl ExecutionStrategy {
    /// Picks [`Self::Parallel`] when `input_width >= cutoff` or when `force_parallel`
    /// is set, [`Self::Serial`] otherwise.
    #[must_use]
    pub fn select(input_width: usize, cutoff: usize, force_parallel: bool) -> Self {
        if force_parallel || input_width >= cutoff {
            Self::Parallel
        } else {
            Self::Serial
        }
    }
}

impl MatMul for ExecutionStrategy {
    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
        match self {
            Self::Serial => SerialMatMul.multiply(a, b),
            Self::Parallel => ParallelMatMul.multiply(a, b),
        }
    }
}
