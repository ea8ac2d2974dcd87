use crate::activation::activation::ActivationFunction;
use crate::domain::vocabulary::{Token, Vocabulary};
use crate::error::Result;
use crate::gadget::affine::Affine;
use crate::gadget::assignment::{LayerPlan, WeightAssignment};
use crate::synth::constants::SynthesisConstants;
use crate::synth::slots;

/// Builds the softmax output layer from the `V` indicator slots.
///
/// A value logit is `amplification·indicator + value_bias`; key and padding
/// logits are the constant `key_bias`. With exactly one indicator at `1`
/// the fired logit leads by `amplification`; with none fired every value
/// logit ties at `value_bias` and the softmax spreads evenly across values.
pub fn calibrate(
    layer: usize,
    input_width: usize,
    vocab: &Vocabulary,
    constants: &SynthesisConstants,
) -> Result<LayerPlan> {
    let mut assignment = WeightAssignment::new(layer, input_width, vocab.output_size());
    for number in 0..vocab.output_size() {
        let logit = match vocab.token_at(number) {
            Some(Token::Value(i)) => Affine::slot(slots::indicator(i as u32 + 1))
                .scaled(constants.amplification)
                .offset(constants.value_bias),
            _ => Affine::constant(constants.key_bias),
        };
        assignment.assign(number, logit)?;
    }
    Ok(assignment.into_plan(ActivationFunction::Softmax))
}

/// Gap between `logits[winner]` and the best competing logit.
pub fn logit_margin(logits: &[f64], winner: usize) -> f64 {
    let runner_up = logits.iter()
        .enumerate()
        .filter(|(i, _)| *i != winner)
        .map(|(_, x)| *x)
        .fold(f64::NEG_INFINITY, f64::max);
    logits[winner] - runner_up
}
