use std::fmt;

use super::neuron::{HiddenNeuron, InputNeuron, OutputNeuron};
use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Input,
    Hidden,
    Output,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayerKind::Input => "input",
            LayerKind::Hidden => "hidden",
            LayerKind::Output => "output",
        };
        f.write_str(name)
    }
}

/// A homogeneous group of neurons of one role.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Input(Vec<InputNeuron>),
    Hidden(Vec<HiddenNeuron>),
    Output(Vec<OutputNeuron>),
}

impl Layer {
    /// `n_neurons` input neurons, each with `n_weights` zeroed outgoing weights.
    pub fn input(n_neurons: usize, n_weights: usize) -> Self {
        Layer::Input((0..n_neurons).map(|_| InputNeuron::new(n_weights)).collect())
    }

    pub fn hidden(n_neurons: usize, n_weights: usize) -> Self {
        Layer::Hidden((0..n_neurons).map(|_| HiddenNeuron::new(n_weights)).collect())
    }

    pub fn output(n_neurons: usize) -> Self {
        Layer::Output((0..n_neurons).map(|_| OutputNeuron::new()).collect())
    }

    pub fn kind(&self) -> LayerKind {
        match self {
            Layer::Input(_) => LayerKind::Input,
            Layer::Hidden(_) => LayerKind::Hidden,
            Layer::Output(_) => LayerKind::Output,
        }
    }

    /// Returns the amount of neurons in the layer
    pub fn neuron_amount(&self) -> usize {
        match self {
            Layer::Input(neurons) => neurons.len(),
            Layer::Hidden(neurons) => neurons.len(),
            Layer::Output(neurons) => neurons.len(),
        }
    }

    /// Outgoing weights of neuron `n`, or `None` on an output layer.
    pub fn weights(&self, n: usize) -> Option<&[f64]> {
        match self {
            Layer::Input(neurons) => neurons.get(n).map(|x| x.weights.as_slice()),
            Layer::Hidden(neurons) => neurons.get(n).map(|x| x.weights.as_slice()),
            Layer::Output(_) => None,
        }
    }

    pub fn weights_mut(&mut self, n: usize) -> Option<&mut Vec<f64>> {
        match self {
            Layer::Input(neurons) => neurons.get_mut(n).map(|x| &mut x.weights),
            Layer::Hidden(neurons) => neurons.get_mut(n).map(|x| &mut x.weights),
            Layer::Output(_) => None,
        }
    }

    /// Bias of neuron `n`, or `None` on an input layer.
    pub fn bias(&self, n: usize) -> Option<f64> {
        match self {
            Layer::Input(_) => None,
            Layer::Hidden(neurons) => neurons.get(n).map(|x| x.bias),
            Layer::Output(neurons) => neurons.get(n).map(|x| x.bias),
        }
    }

    pub fn bias_mut(&mut self, n: usize) -> Option<&mut f64> {
        match self {
            Layer::Input(_) => None,
            Layer::Hidden(neurons) => neurons.get_mut(n).map(|x| &mut x.bias),
            Layer::Output(neurons) => neurons.get_mut(n).map(|x| &mut x.bias),
        }
    }

    pub fn has_weights(&self) -> bool {
        !matches!(self, Layer::Output(_))
    }

    pub fn has_biases(&self) -> bool {
        !matches!(self, Layer::Input(_))
    }

    /// Stores `inputs` into the input neurons, one scalar each.
    pub fn set_inputs(&mut self, inputs: &[f64]) -> Result<()> {
        let kind = self.kind();
        let Layer::Input(neurons) = self else {
            return Err(Error::InvalidArgument(format!(
                "cannot feed inputs to an {kind} layer"
            )));
        };
        if neurons.len() != inputs.len() {
            return Err(Error::DimensionMismatch {
                left: (neurons.len(), 1),
                right: (inputs.len(), 1),
            });
        }

        for (neuron, &x) in neurons.iter_mut().zip(inputs) {
            neuron.input = x;
        }
        Ok(())
    }

    /// Inputs currently held by an input layer.
    pub fn inputs(&self) -> Option<Vec<f64>> {
        match self {
            Layer::Input(neurons) => Some(neurons.iter().map(|x| x.input).collect()),
            _ => None,
        }
    }
}
