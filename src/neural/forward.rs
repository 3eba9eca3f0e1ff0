use crate::{
    matrix::{list::MatrixList, ops::Dot, Matrix},
    prelude::*,
};

use super::{
    activations::{Activation, Sigmoid},
    params::Params,
};

/// Everything a forward pass produced: the activation of every layer (the input first)
/// and the pre-activation output of every layer after the input.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardPass {
    pub activations: MatrixList<f64>,
    pub outputs: MatrixList<f64>,
}

impl Params {
    /// Propagates a column vector `input` through every layer.
    ///
    /// `output_i = W_i · a_i + b_{i+1}` and `a_{i+1} = sigmoid(output_i)`.
    pub fn forward(&self, input: &Matrix<f64>) -> Result<ForwardPass> {
        let mut activations = MatrixList::with_capacity(self.transitions() + 1);
        let mut outputs = MatrixList::with_capacity(self.transitions());
        activations.push(input.clone());

        for (weights, biases) in self.weights.iter().zip(&self.biases) {
            let prev = &activations[activations.len() - 1];
            let output = (&weights.dot(prev)? + biases)?;
            let activation = output.map(|x| Sigmoid.call(x));

            outputs.push(output);
            activations.push(activation);
        }

        Ok(ForwardPass {
            activations,
            outputs,
        })
    }
}

impl ForwardPass {
    /// The activation of the output layer.
    pub fn output_activation(&self) -> Result<&Matrix<f64>> {
        self.activations
            .from_back(0)
            .ok_or_else(|| Error::InvalidArgument("empty forward pass".into()))
    }

    /// Quadratic cost `½‖a_L − y‖²` against a one-hot `target`.
    pub fn cost(&self, target: &Matrix<f64>) -> Result<f64> {
        let diff = (self.output_activation()? - target)?;
        Ok(0.5 * diff.iter().map(|x| x * x).sum::<f64>())
    }

    /// Index of the most activated output neuron.
    pub fn prediction(&self) -> Result<usize> {
        let out = self.output_activation()?;
        let mut best = 0;
        for row in 1..out.rows() {
            if out[(row, 0)] > out[(best, 0)] {
                best = row;
            }
        }
        Ok(best)
    }
}
