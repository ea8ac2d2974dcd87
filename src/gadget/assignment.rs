use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{Result, SynthesisError};
use crate::gadget::affine::Affine;
use crate::math::matrix::Matrix;

/// One synthesized layer: `weights` is `(input_width, width)`, `biases` is
/// `(1, width)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerPlan {
    pub weights: Matrix,
    pub biases: Matrix,
    pub activation: ActivationFunction,
}

impl LayerPlan {
    pub fn input_width(&self) -> usize {
        self.weights.rows
    }

    pub fn width(&self) -> usize {
        self.biases.cols
    }
}

/// Sparse weights for one layer, built slot by slot from gadget forms.
///
/// Every entry not named by a triple is zero, so an unassigned slot has no
/// evidence and a zero pre-activation.
#[derive(Debug, Clone)]
pub struct WeightAssignment {
    layer: usize,
    input_width: usize,
    width: usize,
    triples: Vec<(usize, usize, f64)>,
    biases: Vec<(usize, f64)>,
    assigned: Vec<bool>,
}

impl WeightAssignment {
    pub fn new(layer: usize, input_width: usize, width: usize) -> WeightAssignment {
        WeightAssignment {
            layer,
            input_width,
            width,
            triples: Vec::new(),
            biases: Vec::new(),
            assigned: vec![false; width],
        }
    }

    /// Places `form` as the pre-activation of output `slot`. A slot takes
    /// exactly one meaning for the life of the layer.
    pub fn assign(&mut self, slot: usize, form: Affine) -> Result<()> {
        if slot >= self.width {
            return Err(SynthesisError::SlotOutOfRange { layer: self.layer, slot, width: self.width });
        }
        if let Some(input) = form.max_slot().filter(|s| *s >= self.input_width) {
            return Err(SynthesisError::SlotOutOfRange {
                layer: self.layer.saturating_sub(1),
                slot: input,
                width: self.input_width,
            });
        }
        if self.assigned[slot] {
            return Err(SynthesisError::SlotReused { layer: self.layer, slot });
        }
        self.assigned[slot] = true;
        self.triples.extend(form.terms.iter().map(|(input, coeff)| (*input, slot, *coeff)));
        if form.constant != 0.0 {
            self.biases.push((slot, form.constant));
        }
        Ok(())
    }

    /// Sets a bias on a slot without any incoming weights.
    pub fn bias(&mut self, slot: usize, value: f64) -> Result<()> {
        self.assign(slot, Affine::constant(value))
    }

    pub fn into_plan(self, activation: ActivationFunction) -> LayerPlan {
        let mut weights = Matrix::zeros(self.input_width, self.width);
        for (input, output, coeff) in self.triples {
            weights.set(input, output, coeff);
        }
        let mut biases = Matrix::zeros(1, self.width);
        for (slot, value) in self.biases {
            biases.set(0, slot, value);
        }
        LayerPlan { weights, biases, activation }
    }
}
