use crate::{
    matrix::{list::MatrixList, Matrix},
    prelude::*,
};

use super::Network;

/// Weights and biases of a network in matrix form.
///
/// `weights[i]` maps layer i to layer i+1 and `biases[i]` belongs to layer i+1, so both
/// lists hold one entry per pair of adjacent layers. The same shape serves as a read-only
/// snapshot of a network, as the gradient of one sample, and as a mini-batch accumulator.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub weights: MatrixList<f64>,
    pub biases: MatrixList<f64>,
}

impl Params {
    pub(crate) fn from_network(net: &Network, copy_values: bool) -> Result<Self> {
        let transitions = net.layer_count() - 1;
        let mut weights = MatrixList::with_capacity(transitions);
        let mut biases = MatrixList::with_capacity(transitions);

        for i in 0..transitions {
            weights.push(net.weight_matrix(i, copy_values)?);
            biases.push(net.bias_matrix(i + 1, copy_values)?);
        }

        Ok(Self { weights, biases })
    }

    /// Zero-filled matrices shaped after `net`.
    pub fn zeroed(net: &Network) -> Result<Self> {
        Self::from_network(net, false)
    }

    /// Zero-filled matrices shaped after `other`.
    pub fn zeroed_like(other: &Params) -> Result<Self> {
        let weights = other
            .weights
            .iter()
            .map(Matrix::zeros_like)
            .collect::<Result<_>>()?;
        let biases = other
            .biases
            .iter()
            .map(Matrix::zeros_like)
            .collect::<Result<_>>()?;
        Ok(Self { weights, biases })
    }

    /// Amount of weight matrices, one less than the amount of layers.
    pub fn transitions(&self) -> usize {
        self.weights.len()
    }

    pub fn check_same_shape(&self, other: &Params) -> Result<()> {
        let pairs = |a: &MatrixList<f64>, b: &MatrixList<f64>| -> Result<()> {
            if a.len() != b.len() {
                return Err(Error::InvalidArgument(format!(
                    "expected {} layer matrices, got {}",
                    a.len(),
                    b.len()
                )));
            }
            for (x, y) in a.iter().zip(b) {
                if x.dim() != y.dim() {
                    return Err(Error::DimensionMismatch {
                        left: x.dim(),
                        right: y.dim(),
                    });
                }
            }
            Ok(())
        };
        pairs(&self.weights, &other.weights)?;
        pairs(&self.biases, &other.biases)
    }

    /// `self += other`, layer by layer. Nothing is modified if the shapes differ.
    pub fn add_in_place(&mut self, other: &Params) -> Result<()> {
        self.check_same_shape(other)?;
        for (x, y) in self.weights.iter_mut().zip(&other.weights) {
            x.add_in_place(y)?;
        }
        for (x, y) in self.biases.iter_mut().zip(&other.biases) {
            x.add_in_place(y)?;
        }
        Ok(())
    }

    /// `self -= other`, layer by layer. Nothing is modified if the shapes differ.
    pub fn sub_in_place(&mut self, other: &Params) -> Result<()> {
        self.check_same_shape(other)?;
        for (x, y) in self.weights.iter_mut().zip(&other.weights) {
            x.sub_in_place(y)?;
        }
        for (x, y) in self.biases.iter_mut().zip(&other.biases) {
            x.sub_in_place(y)?;
        }
        Ok(())
    }

    pub fn scale(&mut self, k: f64) {
        for m in self.weights.iter_mut().chain(self.biases.iter_mut()) {
            m.scale(k);
        }
    }
}
