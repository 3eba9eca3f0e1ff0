use crate::{
    data::Sample,
    matrix::{
        ops::{multiply_paired_columns, Dot, Transpose},
        Matrix,
    },
    prelude::*,
};

use super::{
    activations::{Activation, Sigmoid},
    forward::ForwardPass,
    params::Params,
};

impl Params {
    /// Gradient of the quadratic cost of one sample with respect to every weight and bias,
    /// ordered like `self`.
    ///
    /// `pass` must come from [`Params::forward`] on these same parameters.
    pub fn backprop(&self, pass: &ForwardPass, target: &Matrix<f64>) -> Result<Params> {
        let layers = self.transitions();
        if layers == 0 || pass.outputs.len() != layers || pass.activations.len() != layers + 1 {
            return Err(Error::InvalidArgument(format!(
                "forward pass of {} outputs does not fit {layers} weight layers",
                pass.outputs.len()
            )));
        }

        let mut w_grads = Vec::with_capacity(layers);
        let mut b_grads = Vec::with_capacity(layers);

        let prime = |z: &Matrix<f64>| z.map(|x| Sigmoid.derivative(x));
        let last = layers - 1;
        let err = (&pass.activations[layers] - target)?;
        let mut delta = multiply_paired_columns(&err, 0, &prime(&pass.outputs[last]), 0)?;

        // l -- current weight layer, walked from the output backwards
        for l in (0..layers).rev() {
            if l < last {
                let err = self.weights[l + 1].transpose()?.dot(&delta)?;
                delta = multiply_paired_columns(&err, 0, &prime(&pass.outputs[l]), 0)?;
            }

            w_grads.push(delta.dot(&pass.activations[l].transpose()?)?);
            b_grads.push(delta.clone());
        }

        Ok(Params {
            weights: w_grads.into_iter().rev().collect(),
            biases: b_grads.into_iter().rev().collect(),
        })
    }

    /// Runs forward and backward on one sample.
    pub fn sample_gradient(&self, sample: &Sample) -> Result<Params> {
        let n_outputs = self
            .biases
            .last()
            .map(Matrix::rows)
            .ok_or_else(|| Error::InvalidArgument("parameters hold no layers".into()))?;

        let input = sample.input_matrix()?;
        let target = sample.target_matrix(n_outputs)?;
        let pass = self.forward(&input)?;
        self.backprop(&pass, &target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neural::{activations::sigmoid_prime, Network};
    use approx::assert_abs_diff_eq;

    fn cost(params: &Params, input: &Matrix<f64>, target: &Matrix<f64>) -> f64 {
        params.forward(input).unwrap().cost(target).unwrap()
    }

    fn check_against_finite_difference(shape: &[usize], seed: u64, sample: &Sample) {
        let net = Network::seeded(shape, seed).unwrap();
        let params = net.parameters().unwrap();
        let input = sample.input_matrix().unwrap();
        let target = sample.target_matrix(net.output_amount()).unwrap();

        let grad = params.sample_gradient(sample).unwrap();
        let eps = 1e-6;

        for l in 0..params.transitions() {
            let (rows, cols) = params.weights[l].dim();
            for r in 0..rows {
                for c in 0..cols {
                    let mut plus = params.clone();
                    plus.weights[l][(r, c)] += eps;
                    let mut minus = params.clone();
                    minus.weights[l][(r, c)] -= eps;

                    let numeric =
                        (cost(&plus, &input, &target) - cost(&minus, &input, &target)) / (2.0 * eps);
                    assert_abs_diff_eq!(grad.weights[l][(r, c)], numeric, epsilon = 1e-7);
                }

                let mut plus = params.clone();
                plus.biases[l][(r, 0)] += eps;
                let mut minus = params.clone();
                minus.biases[l][(r, 0)] -= eps;

                let numeric =
                    (cost(&plus, &input, &target) - cost(&minus, &input, &target)) / (2.0 * eps);
                assert_abs_diff_eq!(grad.biases[l][(r, 0)], numeric, epsilon = 1e-7);
            }
        }
    }

    #[test]
    fn gradient_matches_finite_difference_tiny() {
        check_against_finite_difference(&[2, 2, 1], 17, &Sample::new(vec![0.3, 0.8], 0));
    }

    #[test]
    fn gradient_matches_finite_difference_deep() {
        check_against_finite_difference(&[3, 4, 3, 2], 5, &Sample::new(vec![0.9, 0.1, 0.5], 1));
    }

    #[test]
    fn gradient_shapes_mirror_params() {
        let net = Network::seeded(&[5, 4, 3], 2).unwrap();
        let params = net.parameters().unwrap();
        let grad = params
            .sample_gradient(&Sample::new(vec![0.1; 5], 2))
            .unwrap();

        assert!(params.check_same_shape(&grad).is_ok());
    }

    #[test]
    fn output_delta_is_bias_gradient() {
        let net = Network::seeded(&[2, 2, 2], 12).unwrap();
        let params = net.parameters().unwrap();
        let sample = Sample::new(vec![0.4, 0.6], 1);

        let pass = params.forward(&sample.input_matrix().unwrap()).unwrap();
        let grad = params
            .backprop(&pass, &sample.target_matrix(2).unwrap())
            .unwrap();

        for n in 0..2 {
            let a = pass.activations[2][(n, 0)];
            let z = pass.outputs[1][(n, 0)];
            let y = if n == 1 { 1.0 } else { 0.0 };
            assert_abs_diff_eq!(
                grad.biases[1][(n, 0)],
                (a - y) * sigmoid_prime(z),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn bad_samples_fail() {
        let params = Network::seeded(&[2, 2, 2], 1).unwrap().parameters().unwrap();

        assert!(matches!(
            params.sample_gradient(&Sample::new(vec![0.1, 0.2], 2)),
            Err(Error::IndexOutOfBounds { .. })
        ));
        assert!(matches!(
            params.sample_gradient(&Sample::new(vec![0.1, 0.2, 0.3], 0)),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn mismatched_pass_is_rejected() {
        let shallow = Network::seeded(&[2, 2, 2], 1).unwrap().parameters().unwrap();
        let deep = Network::seeded(&[2, 2, 2, 2], 1).unwrap().parameters().unwrap();
        let input = Matrix::column(&[0.5, 0.5]).unwrap();
        let target = Matrix::column(&[1.0, 0.0]).unwrap();

        let pass = deep.forward(&input).unwrap();
        assert!(matches!(
            shallow.backprop(&pass, &target),
            Err(Error::InvalidArgument(_))
        ));
    }
}
