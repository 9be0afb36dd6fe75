//! Dense matrices and matrix multiplication.
//!
//! [`Matrix`] is a row-major `f32` matrix. Multiplication is provided by the
//! [`MatMul`] strategy trait with two implementations:
//!
//! - [`SerialMatMul`] - Triple nested loop on the calling thread
//! - [`ParallelMatMul`] - Output cells computed in parallel (rayon, behind the
//!   `parallel` feature)
//!
//! Both strategies accumulate each output cell in the same order, so their
//! results agree to within floating-point rounding. [`ExecutionStrategy`] is the
//! tag stored by packed layers to pick one of them.
//!
//! # Example
//!
//! ```
//! use evonet_engine::matrix::{MatMul as _, Matrix, SerialMatMul};
//!
//! let a = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])?;
//! let b = Matrix::from_vec(3, 2, vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0])?;
//! let c = SerialMatMul.multiply(&a, &b)?;
//! assert_eq!(c.as_slice(), &[58.0, 64.0, 139.0, 154.0]);
//! # Ok::<(), evonet_engine::MatrixError>(())
//! ```

use std::{
    fmt,
    ops::{Index, IndexMut},
};

use crate::MatrixError;

pub use self::strategy::{ExecutionStrategy, MatMul, ParallelMatMul, SerialMatMul};

mod strategy;

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Builds a matrix from row-major data.
    ///
    /// Fails if `data.len()` is not `rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self, MatrixError> {
        if data.len() != rows * cols {
            return Err(MatrixError::DataLength {
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Builds a matrix by evaluating `f(row, col)` for every cell.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f32,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { rows, cols, data }
    }

    /// Wraps a vector as a `1 x n` row vector.
    #[must_use]
    pub fn row_vector(values: Vec<f32>) -> Self {
        Self {
            rows: 1,
            cols: values.len(),
            data: values,
        }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        (row < self.rows && col < self.cols).then(|| self.data[row * self.cols + col])
    }

    #[must_use]
    pub fn row(&self, row: usize) -> &[f32] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    #[must_use]
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.cols, self.rows, |i, j| self[(j, i)])
    }

    /// Returns `true` if both matrices have the same shape and every pair of
    /// cells differs by at most `tolerance`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f32) -> bool {
        self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a - b).abs() <= tolerance)
    }

    /// Largest absolute difference between corresponding cells, or `None` if the
    /// shapes differ.
    #[must_use]
    pub fn max_abs_diff(&self, other: &Self) -> Option<f32> {
        (self.shape() == other.shape()).then(|| {
            self.data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f32::max)
        })
    }

    pub(crate) fn check_multiply(&self, rhs: &Self) -> Result<(), MatrixError> {
        if self.cols != rhs.rows {
            return Err(MatrixError::DimensionMismatch {
                left_rows: self.rows,
                left_cols: self.cols,
                right_rows: rhs.rows,
                right_cols: rhs.cols,
            });
        }
        Ok(())
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f32;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(row < self.rows && col < self.cols, "matrix index out of range");
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        assert!(row < self.rows && col < self.cols, "matrix index out of range");
        &mut self.data[row * self.cols + col]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for (j, v) in self.row(i).iter().enumerate() {
                if j > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{v}")?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[expect(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        assert!(Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0]).is_err());
        assert!(Matrix::from_vec(0, 5, vec![]).is_ok());
    }

    #[test]
    fn test_row_major_layout() {
        let m = Matrix::from_fn(2, 3, |i, j| (i * 10 + j) as f32);
        assert_eq!(m.as_slice(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(m[(1, 2)], 12.0);
        assert_eq!(m.get(1, 0), Some(10.0));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.row(1), &[10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_transpose() {
        let m = Matrix::from_fn(2, 3, |i, j| (i * 10 + j) as f32);
        let t = m.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.as_slice(), &[0.0, 10.0, 1.0, 11.0, 2.0, 12.0]);
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn test_approx_eq() {
        let a = Matrix::row_vector(vec![1.0, 2.0]);
        let b = Matrix::row_vector(vec![1.0, 2.000_001]);
        assert!(a.approx_eq(&b, 1e-5));
        assert!(!a.approx_eq(&b, 0.0));
        assert!(!a.approx_eq(&Matrix::zeros(2, 1), 1.0));
        assert_eq!(a.max_abs_diff(&Matrix::zeros(1, 2)), Some(2.0));
    }

    #[test]
    fn test_display() {
        let m = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.5, 4.0]).unwrap();
        assert_eq!(m.to_string(), "[1,2]\n[3.5,4]");
    }
}
