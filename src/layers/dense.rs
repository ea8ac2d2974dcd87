use serde::{Serialize, Deserialize};

use crate::{math::matrix::Matrix, activation::activation::ActivationFunction};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer{
    pub size: usize,
    #[serde(skip)]
    pub neurons: Matrix,
    pub weights: Matrix,
    pub biases: Matrix,
    pub activator: ActivationFunction
}

impl Layer {
    /// A randomly initialized layer, as a collaborator would build it before
    /// training or before synthesized parameters are loaded.
    pub fn new(size: usize, input_size: usize, activation: ActivationFunction) -> Layer {
        Layer {
            size,
            neurons: Matrix::zeros(1, size),
            weights: Matrix::random(input_size, size),
            biases: Matrix::random(1, size),
            activator: activation
        }
    }

    /// Builds a layer around existing parameters.
    ///
    /// `weights` is `(input_size, size)` and `biases` is `(1, size)`.
    pub fn from_parameters(weights: Matrix, biases: Matrix, activation: ActivationFunction) -> Layer {
        let size = biases.cols;
        Layer {
            size,
            neurons: Matrix::zeros(1, size),
            weights,
            biases,
            activator: activation
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    /// Pre-activation `z = xW + b` for a single input row.
    pub fn pre_activation(&self, input: Vec<f64>) -> Vec<f64> {
        let z = Matrix::row(input) * &self.weights + self.biases.clone();
        z.data.into_iter().next().unwrap_or_default()
    }

    pub fn feed_from(&mut self, input: Vec<f64>) -> Vec<f64> {
        let a = self.activator.apply(&self.pre_activation(input));
        self.neurons = Matrix::row(a.clone());
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_from_applies_relu_after_affine_map() {
        let weights = Matrix::from_data(vec![vec![1.0, -1.0], vec![-1.0, 1.0]]);
        let biases = Matrix::row(vec![0.0, 0.0]);
        let mut layer = Layer::from_parameters(weights, biases, ActivationFunction::ReLU);
        assert_eq!(layer.feed_from(vec![5.0, 2.0]), vec![3.0, 0.0]);
        assert_eq!(layer.neurons.data[0], vec![3.0, 0.0]);
    }

    #[test]
    fn softmax_layer_normalizes_the_row() {
        let weights = Matrix::from_data(vec![vec![1.0, 0.0, 0.0]]);
        let biases = Matrix::row(vec![0.0, 0.0, 0.0]);
        let mut layer = Layer::from_parameters(weights, biases, ActivationFunction::Softmax);
        let out = layer.feed_from(vec![0.0]);
        assert!(out.iter().all(|p| (p - 1.0 / 3.0).abs() < 1e-12));
    }

    #[test]
    fn new_layer_has_requested_shape() {
        let layer = Layer::new(6, 5, ActivationFunction::ReLU);
        assert_eq!(layer.size, 6);
        assert_eq!(layer.input_size(), 5);
        assert_eq!(layer.biases.shape(), (1, 6));
    }
}
