use super::Matrix;
use crate::prelude::*;
use std::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};

pub trait Dot<I> {
    type Output;
    fn dot(self, rhs: I) -> Result<Self::Output>;
}

pub trait Transpose: Sized {
    fn transpose(&self) -> Result<Self>;
}

impl<T: Default + Copy> Transpose for Matrix<T> {
    fn transpose(&self) -> Result<Self> {
        let mut transposed = Matrix::new(self.cols(), self.rows())?;

        for row in 0..self.rows() {
            for col in 0..self.cols() {
                transposed[(col, row)] = self[(row, col)];
            }
        }
        Ok(transposed)
    }
}

impl<'a, T> Dot<&Matrix<T>> for &'a Matrix<T>
where
    T: Mul<Output = T> + Default + AddAssign + Copy,
{
    type Output = Matrix<T>;
    fn dot(self, rhs: &Matrix<T>) -> Result<Self::Output> {
        if self.cols() != rhs.rows() {
            return Err(Error::DimensionMismatch {
                left: self.dim(),
                right: rhs.dim(),
            });
        }

        let mut res = Matrix::new(self.rows(), rhs.cols())?;

        for lhs_row in 0..self.rows() {
            for rhs_col in 0..rhs.cols() {
                let mut sum = T::default();
                for n in 0..self.cols() {
                    sum += self[(lhs_row, n)] * rhs[(n, rhs_col)]
                }
                res[(lhs_row, rhs_col)] = sum;
            }
        }

        Ok(res)
    }
}

/// Adds two Matrices element-wise.
impl<'a, T> Add for &'a Matrix<T>
where
    T: Add<Output = T> + Default + Copy,
{
    type Output = Result<Matrix<T>>;
    fn add(self, rhs: Self) -> Self::Output {
        zip_with(self, rhs, |a, b| a + b)
    }
}

/// Subs two Matrices element-wise.
impl<'a, T> Sub for &'a Matrix<T>
where
    T: Sub<Output = T> + Default + Copy,
{
    type Output = Result<Matrix<T>>;
    fn sub(self, rhs: Self) -> Self::Output {
        zip_with(self, rhs, |a, b| a - b)
    }
}

fn zip_with<T, F>(lhs: &Matrix<T>, rhs: &Matrix<T>, f: F) -> Result<Matrix<T>>
where
    T: Default + Copy,
    F: Fn(T, T) -> T,
{
    if lhs.dim() != rhs.dim() {
        return Err(Error::DimensionMismatch {
            left: lhs.dim(),
            right: rhs.dim(),
        });
    }

    let mut res = Matrix::zeros_like(lhs)?;
    for ((out, &a), &b) in res.data.iter_mut().zip(&lhs.data).zip(&rhs.data) {
        *out = f(a, b);
    }
    Ok(res)
}

impl<T: Copy> Matrix<T> {
    /// Multiplies every cell by `k` in place.
    pub fn scale(&mut self, k: T)
    where
        T: MulAssign,
    {
        for x in &mut self.data {
            *x *= k;
        }
    }

    /// Element-wise `self += rhs`. Shapes must be identical; `self` is untouched on error.
    pub fn add_in_place(&mut self, rhs: &Matrix<T>) -> Result<()>
    where
        T: AddAssign,
    {
        if self.dim() != rhs.dim() {
            return Err(Error::DimensionMismatch {
                left: self.dim(),
                right: rhs.dim(),
            });
        }
        for (x, &y) in self.data.iter_mut().zip(&rhs.data) {
            *x += y;
        }
        Ok(())
    }

    /// Element-wise `self -= rhs`. Shapes must be identical; `self` is untouched on error.
    pub fn sub_in_place(&mut self, rhs: &Matrix<T>) -> Result<()>
    where
        T: SubAssign,
    {
        if self.dim() != rhs.dim() {
            return Err(Error::DimensionMismatch {
                left: self.dim(),
                right: rhs.dim(),
            });
        }
        for (x, &y) in self.data.iter_mut().zip(&rhs.data) {
            *x -= y;
        }
        Ok(())
    }
}

/// Hadamard product of column `lhs_col` of `lhs` and column `rhs_col` of `rhs`,
/// returned as a column vector.
pub fn multiply_paired_columns<T>(
    lhs: &Matrix<T>,
    lhs_col: usize,
    rhs: &Matrix<T>,
    rhs_col: usize,
) -> Result<Matrix<T>>
where
    T: Mul<Output = T> + Default + Copy,
{
    if lhs.rows() != rhs.rows() {
        return Err(Error::DimensionMismatch {
            left: (lhs.rows(), 1),
            right: (rhs.rows(), 1),
        });
    }
    lhs.get(0, lhs_col)?;
    rhs.get(0, rhs_col)?;

    let mut res = Matrix::new(lhs.rows(), 1)?;
    for row in 0..lhs.rows() {
        res[(row, 0)] = lhs[(row, lhs_col)] * rhs[(row, rhs_col)];
    }
    Ok(res)
}
