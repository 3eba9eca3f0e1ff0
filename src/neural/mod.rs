pub mod activations;
pub mod backprop;
pub mod forward;
pub mod layer;
pub mod neuron;
pub mod optimizer;
pub mod params;

use crate::prelude::*;

use crate::{
    data::{Batch, Sample},
    matrix::Matrix,
};
use rand::{
    distributions::{Distribution, Uniform},
    rngs::StdRng,
    Rng, SeedableRng,
};

use self::{forward::ForwardPass, layer::Layer, params::Params};

/// Lower (inclusive) and upper (exclusive) bound of freshly drawn weights and biases.
pub const INIT_RANGE: (f64, f64) = (-2.0, 2.0);

/// Input layer, one or more hidden layers, output layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    layers: Vec<Layer>,
}

/// Outcome of classifying a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub correct: usize,
    pub total: usize,
}

impl Evaluation {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }

    /// Whether at least `threshold` (in [0, 1]) of the samples were classified correctly.
    pub fn passed(&self, threshold: f64) -> bool {
        self.accuracy() >= threshold
    }
}

impl Network {
    /// Builds a network with `neuron_counts[i]` neurons in layer i and draws every
    /// weight and bias uniformly from [-2, 2).
    ///
    /// Needs at least three layers and no empty layer.
    pub fn new<R: Rng + ?Sized>(neuron_counts: &[usize], rng: &mut R) -> Result<Self> {
        if neuron_counts.len() < 3 {
            return Err(Error::InvalidArgument(format!(
                "a network needs at least 3 layers, got {}",
                neuron_counts.len()
            )));
        }
        if let Some(i) = neuron_counts.iter().position(|&n| n == 0) {
            return Err(Error::InvalidArgument(format!("layer {i} has no neurons")));
        }

        let last = neuron_counts.len() - 1;
        let mut layers = Vec::with_capacity(neuron_counts.len());
        layers.push(Layer::input(neuron_counts[0], neuron_counts[1]));
        for i in 1..last {
            layers.push(Layer::hidden(neuron_counts[i], neuron_counts[i + 1]));
        }
        layers.push(Layer::output(neuron_counts[last]));

        let mut net = Self { layers };
        net.randomize(rng);
        Ok(net)
    }

    /// Same as [`Network::new`] with a generator seeded from `seed`.
    pub fn seeded(neuron_counts: &[usize], seed: u64) -> Result<Self> {
        Self::new(neuron_counts, &mut StdRng::seed_from_u64(seed))
    }

    /// Reset parameters to uniformly random values in [-2, 2)
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let die = Uniform::new(INIT_RANGE.0, INIT_RANGE.1);

        for layer in self.layers.iter_mut() {
            for n in 0..layer.neuron_amount() {
                if let Some(b) = layer.bias_mut(n) {
                    *b = die.sample(rng);
                }
                if let Some(weights) = layer.weights_mut(n) {
                    for w in weights.iter_mut() {
                        *w = die.sample(rng);
                    }
                }
            }
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn neuron_counts(&self) -> Vec<usize> {
        self.layers.iter().map(Layer::neuron_amount).collect()
    }

    /// Returns the amount of inputs this network accepts
    pub fn input_amount(&self) -> usize {
        self.layers[0].neuron_amount()
    }

    pub fn output_amount(&self) -> usize {
        self.layers[self.layers.len() - 1].neuron_amount()
    }

    fn layer(&self, index: usize) -> Result<&Layer> {
        self.layers.get(index).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "layer {index} does not exist in a {}-layer network",
                self.layers.len()
            ))
        })
    }

    /// `[neurons(i+1) x neurons(i)]` matrix whose column n holds the outgoing
    /// weights of neuron n of layer `i`. Zero-filled unless `copy_values`.
    pub fn weight_matrix(&self, i: usize, copy_values: bool) -> Result<Matrix<f64>> {
        let layer = self.layer(i)?;
        if !layer.has_weights() {
            return Err(Error::ShapeMismatch {
                layer: i,
                kind: layer.kind(),
                wanted: "outgoing weights",
            });
        }

        let n_next = self.layers[i + 1].neuron_amount();
        let mut m = Matrix::new(n_next, layer.neuron_amount())?;
        if copy_values {
            for n in 0..layer.neuron_amount() {
                if let Some(weights) = layer.weights(n) {
                    m.set_column(n, weights)?;
                }
            }
        }
        Ok(m)
    }

    /// Column vector of the biases of layer `i`. Zero-filled unless `copy_values`.
    pub fn bias_matrix(&self, i: usize, copy_values: bool) -> Result<Matrix<f64>> {
        let layer = self.layer(i)?;
        if !layer.has_biases() {
            return Err(Error::ShapeMismatch {
                layer: i,
                kind: layer.kind(),
                wanted: "biases",
            });
        }

        let mut m = Matrix::new(layer.neuron_amount(), 1)?;
        if copy_values {
            for n in 0..layer.neuron_amount() {
                if let Some(b) = layer.bias(n) {
                    m.set(n, 0, b)?;
                }
            }
        }
        Ok(m)
    }

    /// Writes `weights` back into layer `i`, column by column.
    pub fn set_weights(&mut self, i: usize, weights: &Matrix<f64>) -> Result<()> {
        let expected = self.weight_matrix(i, false)?.dim();
        if weights.dim() != expected {
            return Err(Error::DimensionMismatch {
                left: expected,
                right: weights.dim(),
            });
        }

        let layer = &mut self.layers[i];
        for n in 0..weights.cols() {
            if let Some(w) = layer.weights_mut(n) {
                *w = weights.clone_column_to_vec(n);
            }
        }
        Ok(())
    }

    /// Writes `biases` back into layer `i`, cell by cell.
    pub fn set_biases(&mut self, i: usize, biases: &Matrix<f64>) -> Result<()> {
        let expected = self.bias_matrix(i, false)?.dim();
        if biases.dim() != expected {
            return Err(Error::DimensionMismatch {
                left: expected,
                right: biases.dim(),
            });
        }

        let layer = &mut self.layers[i];
        for n in 0..biases.rows() {
            if let Some(b) = layer.bias_mut(n) {
                *b = *biases.get(n, 0)?;
            }
        }
        Ok(())
    }

    /// Copies every weight and bias into matrix form.
    pub fn parameters(&self) -> Result<Params> {
        Params::from_network(self, true)
    }

    /// Writes `params` back into the neurons. Shapes are checked before anything is written.
    pub fn load_parameters(&mut self, params: &Params) -> Result<()> {
        Params::zeroed(self)?.check_same_shape(params)?;

        for (i, w) in params.weights.iter().enumerate() {
            self.set_weights(i, w)?;
        }
        for (i, b) in params.biases.iter().enumerate() {
            self.set_biases(i + 1, b)?;
        }
        Ok(())
    }

    /// Propagates a column vector input through every layer.
    pub fn forward(&self, input: &Matrix<f64>) -> Result<ForwardPass> {
        self.parameters()?.forward(input)
    }

    /// Stores the pixels of `sample` in the input neurons.
    pub fn feed_input(&mut self, sample: &Sample) -> Result<()> {
        self.layers[0].set_inputs(&sample.pixels)
    }

    /// The inputs held by the input neurons as a column vector.
    pub fn input_matrix(&self) -> Result<Matrix<f64>> {
        let inputs = self.layers[0].inputs().unwrap_or_default();
        Matrix::column(&inputs)
    }

    /// Runs a forward pass on the inputs last fed with [`Network::feed_input`].
    pub fn forward_fed(&self) -> Result<ForwardPass> {
        self.forward(&self.input_matrix()?)
    }

    /// Index of the most activated output neuron.
    pub fn predict(&self, sample: &Sample) -> Result<usize> {
        self.forward(&sample.input_matrix()?)?.prediction()
    }

    /// Mean quadratic cost over `batch`.
    pub fn cost(&self, batch: &Batch) -> Result<f64> {
        let params = self.parameters()?;
        let mut sum = 0.0;
        for sample in batch.samples() {
            let pass = params.forward(&sample.input_matrix()?)?;
            sum += pass.cost(&sample.target_matrix(self.output_amount())?)?;
        }
        Ok(sum / batch.len() as f64)
    }

    /// Counts the samples of `batch` whose label matches the prediction.
    pub fn evaluate(&self, batch: &Batch) -> Result<Evaluation> {
        let params = self.parameters()?;
        let mut correct = 0;
        for sample in batch.samples() {
            let pass = params.forward(&sample.input_matrix()?)?;
            if pass.prediction()? == sample.label {
                correct += 1;
            }
        }
        Ok(Evaluation {
            correct,
            total: batch.len(),
        })
    }
}
