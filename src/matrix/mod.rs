use crate::prelude::*;
use std::{
    fmt,
    ops::{Index, IndexMut},
};

pub mod list;
pub mod ops;

/// Dense row-major 2D matrix. Dimensions are fixed at creation and are never zero.
#[derive(Debug, PartialEq, Clone)]
pub struct Matrix<T> {
    data: Vec<T>,
    dim: (usize, usize),
}

/// Acquires zeroed storage for `rows * cols` cells, reporting exhaustion instead of aborting.
fn alloc_cells<T: Default + Clone>(rows: usize, cols: usize) -> Result<Vec<T>> {
    let len = rows
        .checked_mul(cols)
        .ok_or(Error::AllocationFailure { rows, cols })?;

    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| Error::AllocationFailure { rows, cols })?;
    data.resize(len, T::default());
    Ok(data)
}

impl<T: Default + Clone> Matrix<T> {
    /// Creates a zero-filled `rows x cols` matrix.
    /// Fails with `InvalidArgument` if either dimension is 0.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidArgument(format!(
                "matrix dimensions must be non-zero, got {rows}x{cols}"
            )));
        }

        Ok(Self {
            data: alloc_cells(rows, cols)?,
            dim: (rows, cols),
        })
    }

    /// Creates a zero-filled matrix with the same shape as `other`.
    pub fn zeros_like(other: &Matrix<T>) -> Result<Self> {
        Self::new(other.rows(), other.cols())
    }

    /// Builds a `values.len() x 1` column vector.
    pub fn column(values: &[T]) -> Result<Self> {
        let mut m = Self::new(values.len(), 1)?;
        m.set_column(0, values)?;
        Ok(m)
    }

    pub fn zero(&mut self) {
        for x in &mut self.data {
            *x = T::default();
        }
    }
}

impl<T> Matrix<T> {
    pub fn from_array<const R: usize, const C: usize>(arr: [[T; C]; R]) -> Result<Self> {
        if R == 0 || C == 0 {
            return Err(Error::InvalidArgument(format!(
                "matrix dimensions must be non-zero, got {R}x{C}"
            )));
        }

        let mut data = Vec::with_capacity(R * C);
        for row in arr {
            for x in row {
                data.push(x);
            }
        }

        Ok(Self { data, dim: (R, C) })
    }

    /// Builds a matrix from a vector of equally sized rows.
    pub fn from_vec(vec: Vec<Vec<T>>) -> Result<Self> {
        let rows = vec.len();
        let cols = vec.first().map(|row| row.len()).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidArgument(format!(
                "matrix dimensions must be non-zero, got {rows}x{cols}"
            )));
        }

        let mut data = Vec::with_capacity(rows * cols);
        for row in vec {
            if cols != row.len() {
                return Err(Error::DimensionMismatch {
                    left: (rows, cols),
                    right: (1, row.len()),
                });
            }
            data.extend(row);
        }

        Ok(Self {
            data,
            dim: (rows, cols),
        })
    }

    pub fn dim(&self) -> (usize, usize) {
        self.dim
    }

    pub fn rows(&self) -> usize {
        self.dim.0
    }

    pub fn cols(&self) -> usize {
        self.dim.1
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        Ok(row * self.cols() + col)
    }

    /// Returns a reference to the cell at (row, col) or `IndexOutOfBounds`.
    pub fn get(&self, row: usize, col: usize) -> Result<&T> {
        let idx = self.check_bounds(row, col)?;
        Ok(&self.data[idx])
    }

    /// Overwrites the cell at (row, col). Fails with `IndexOutOfBounds`.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let idx = self.check_bounds(row, col)?;
        self.data[idx] = value;
        Ok(())
    }

    /// Iterates over the cells in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }
}

impl<T: Clone> Matrix<T> {
    /// Fills row `row` with `values`, which must hold exactly `cols` items.
    pub fn set_row(&mut self, row: usize, values: &[T]) -> Result<()> {
        if values.len() != self.cols() {
            return Err(Error::DimensionMismatch {
                left: self.dim,
                right: (1, values.len()),
            });
        }
        let start = self.check_bounds(row, 0)?;
        self.data[start..start + values.len()].clone_from_slice(values);
        Ok(())
    }

    /// Fills column `col` with `values`, which must hold exactly `rows` items.
    pub fn set_column(&mut self, col: usize, values: &[T]) -> Result<()> {
        if values.len() != self.rows() {
            return Err(Error::DimensionMismatch {
                left: self.dim,
                right: (values.len(), 1),
            });
        }
        self.check_bounds(0, col)?;
        for (row, x) in values.iter().enumerate() {
            self[(row, col)] = x.clone();
        }
        Ok(())
    }

    pub fn clone_row_to_vec(&self, row: usize) -> Vec<T> {
        (0..self.cols())
            .map(|col| self[(row, col)].clone())
            .collect()
    }

    pub fn clone_column_to_vec(&self, col: usize) -> Vec<T> {
        (0..self.rows())
            .map(|row| self[(row, col)].clone())
            .collect()
    }

    pub fn to_vec(&self) -> Vec<Vec<T>> {
        (0..self.rows()).map(|row| self.clone_row_to_vec(row)).collect()
    }

    /// Returns a new matrix with `f` applied to every element
    pub fn map<U, F: Fn(T) -> U>(&self, f: F) -> Matrix<U> {
        Matrix {
            data: self.data.iter().cloned().map(f).collect(),
            dim: self.dim,
        }
    }
}

impl<T> Matrix<T>
where
    T: Default,
{
    /// Applies a function to every element of the matrix
    pub fn apply<F: Fn(T) -> T>(&mut self, f: F) {
        for x in &mut self.data {
            let old = std::mem::take(x);
            *x = f(old);
        }
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;
    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.data[i * self.cols() + j]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        let idx = i * self.cols() + j;
        &mut self.data[idx]
    }
}

impl<T: fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}x{}]", self.rows(), self.cols())?;
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:>10.4}", self[(row, col)])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl From<Matrix<u32>> for Matrix<f64> {
    fn from(value: Matrix<u32>) -> Self {
        Self {
            dim: value.dim(),
            data: value.data.into_iter().map(|x| x as f64).collect(),
        }
    }
}

impl From<Matrix<i32>> for Matrix<f64> {
    fn from(value: Matrix<i32>) -> Self {
        Self {
            dim: value.dim(),
            data: value.data.into_iter().map(|x| x as f64).collect(),
        }
    }
}
