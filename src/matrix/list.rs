use super::Matrix;
use std::ops::{Index, IndexMut};

/// Ordered, append-only sequence of owned matrices, one per layer, outermost first.
///
/// Growth is amortized O(1); dropping the list drops every matrix it holds.
#[derive(Debug, PartialEq, Clone)]
pub struct MatrixList<T> {
    matrices: Vec<Matrix<T>>,
}

impl<T> Default for MatrixList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MatrixList<T> {
    pub fn new() -> Self {
        Self {
            matrices: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            matrices: Vec::with_capacity(capacity),
        }
    }

    /// Takes ownership of `matrix` and appends it at the end.
    pub fn push(&mut self, matrix: Matrix<T>) {
        self.matrices.push(matrix);
    }

    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Matrix<T>> {
        self.matrices.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Matrix<T>> {
        self.matrices.get_mut(index)
    }

    /// Returns the matrix `k` places from the end, `from_back(0)` being the last one.
    pub fn from_back(&self, k: usize) -> Option<&Matrix<T>> {
        k.checked_add(1)
            .and_then(|n| self.len().checked_sub(n))
            .and_then(|idx| self.matrices.get(idx))
    }

    pub fn last(&self) -> Option<&Matrix<T>> {
        self.matrices.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Matrix<T>> {
        self.matrices.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Matrix<T>> {
        self.matrices.iter_mut()
    }
}

impl<T> Index<usize> for MatrixList<T> {
    type Output = Matrix<T>;
    fn index(&self, index: usize) -> &Self::Output {
        &self.matrices[index]
    }
}

impl<T> IndexMut<usize> for MatrixList<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.matrices[index]
    }
}

impl<T> FromIterator<Matrix<T>> for MatrixList<T> {
    fn from_iter<I: IntoIterator<Item = Matrix<T>>>(iter: I) -> Self {
        Self {
            matrices: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for MatrixList<T> {
    type Item = Matrix<T>;
    type IntoIter = std::vec::IntoIter<Matrix<T>>;
    fn into_iter(self) -> Self::IntoIter {
        self.matrices.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a MatrixList<T> {
    type Item = &'a Matrix<T>;
    type IntoIter = std::slice::Iter<'a, Matrix<T>>;
    fn into_iter(self) -> Self::IntoIter {
        self.matrices.iter()
    }
}
