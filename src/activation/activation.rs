use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    ReLU,
    Identity,
    /// Softmax is a vector-valued activation; it is applied at the layer level
    /// (not element-wise) in `Layer::feed_from()`.
    Softmax,
}

impl ActivationFunction {
    /// Element-wise activation. `Softmax` is the identity here: the layer
    /// keeps the raw logits and normalizes the whole row afterwards.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Identity | ActivationFunction::Softmax => x,
        }
    }

    /// Applies the activation to a full row of pre-activations.
    pub fn apply(&self, z: &[f64]) -> Vec<f64> {
        match self {
            ActivationFunction::Softmax => softmax(z),
            _ => z.iter().map(|x| self.function(*x)).collect(),
        }
    }
}

/// Numerically stable softmax: the row maximum is subtracted before `exp`,
/// so logits around ±1e6 do not overflow.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|x| (x - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}
