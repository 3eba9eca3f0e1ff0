/// A neuron of the input layer. Holds the latest input scalar fed to it and
/// one weight per neuron of the next layer.
#[derive(Debug, Clone, PartialEq)]
pub struct InputNeuron {
    pub input: f64,
    pub weights: Vec<f64>,
}

/// A neuron of a hidden layer: a bias plus one weight per neuron of the next layer.
#[derive(Debug, Clone, PartialEq)]
pub struct HiddenNeuron {
    pub weights: Vec<f64>,
    pub bias: f64,
}

/// A neuron of the output layer. It only carries a bias.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputNeuron {
    pub bias: f64,
}

impl InputNeuron {
    pub fn new(n_weights: usize) -> Self {
        Self {
            input: 0.0,
            weights: vec![0.0; n_weights],
        }
    }
}

impl HiddenNeuron {
    pub fn new(n_weights: usize) -> Self {
        Self {
            weights: vec![0.0; n_weights],
            bias: 0.0,
        }
    }
}

impl OutputNeuron {
    pub fn new() -> Self {
        Self { bias: 0.0 }
    }
}

impl Default for OutputNeuron {
    fn default() -> Self {
        Self::new()
    }
}
