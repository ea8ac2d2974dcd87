use log::{debug, info, warn};
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::domain::record::{RecordLayout, RECORD_LAYOUT};
use crate::domain::vocabulary::Vocabulary;
use crate::error::Result;
use crate::gadget::assignment::{LayerPlan, WeightAssignment};
use crate::gadget::gadgets::{identity, indicator, masked_contribution, not_equal, thermometer};
use crate::gadget::affine::Affine;
use crate::synth::calibrator::calibrate;
use crate::synth::constants::SynthesisConstants;
use crate::synth::slots::{self, equality, selection};
use crate::synth::topology::{Topology, MIN_LAYERS};

/// The full parameter set: `num_layers` hidden plans plus the output plan.
///
/// Owned outright by the caller; synthesis keeps nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedParameters {
    pub layers: Vec<LayerPlan>,
}

impl SynthesizedParameters {
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn shapes(&self) -> Vec<(usize, usize)> {
        self.layers.iter().map(|p| p.weights.shape()).collect()
    }
}

/// Synthesizes with the reference constants.
pub fn synthesize(topology: &Topology, vocab: &Vocabulary) -> Result<SynthesizedParameters> {
    synthesize_with(topology, vocab, &SynthesisConstants::default())
}

/// Compiles the two-entry lookup into `topology.num_layers + 1` layer plans.
///
/// The configuration is validated in full first; an error means nothing
/// was built.
pub fn synthesize_with(
    topology: &Topology,
    vocab: &Vocabulary,
    constants: &SynthesisConstants,
) -> Result<SynthesizedParameters> {
    if let Err(e) = topology.validate(vocab, constants) {
        warn!("rejecting configuration {:?}: {}", topology, e);
        return Err(e);
    }

    let width = topology.neurons_per_layer;
    let classes = vocab.max_value_code();
    let mut layers = Vec::with_capacity(topology.num_layers + 1);

    layers.push(equality_layer(width)?);
    layers.push(selection_layer(width, constants.suppression)?);
    layers.push(thermometer_layer(width, classes)?);
    layers.push(indicator_layer(width, classes)?);
    for layer in MIN_LAYERS + 1..=topology.num_layers {
        layers.push(padding_layer(layer, width, classes)?);
    }
    layers.push(calibrate(topology.num_layers + 1, width, vocab, constants)?);

    for (i, plan) in layers.iter().enumerate() {
        debug!(
            "layer {}: {}x{} {:?}, {} nonzero weights",
            i + 1,
            plan.input_width(),
            plan.width(),
            plan.activation,
            plan.weights.count_nonzero()
        );
    }
    info!(
        "synthesized {} layers for {} keys / {} values ({} padding)",
        layers.len(),
        vocab.key_count(),
        vocab.value_count(),
        topology.num_layers - MIN_LAYERS
    );

    Ok(SynthesizedParameters { layers })
}

/// Layer 1: the four inequality half-terms, values carried alongside.
fn equality_layer(width: usize) -> Result<LayerPlan> {
    let mut a = WeightAssignment::new(1, RecordLayout::WIDTH, width);
    let [key1_over, query_over1] = not_equal(RECORD_LAYOUT.key1, RECORD_LAYOUT.query);
    let [key2_over, query_over2] = not_equal(RECORD_LAYOUT.key2, RECORD_LAYOUT.query);
    a.assign(equality::KEY1_OVER_QUERY, key1_over)?;
    a.assign(equality::QUERY_OVER_KEY1, query_over1)?;
    a.assign(equality::KEY2_OVER_QUERY, key2_over)?;
    a.assign(equality::QUERY_OVER_KEY2, query_over2)?;
    a.assign(equality::VALUE1, identity(RECORD_LAYOUT.value1))?;
    a.assign(equality::VALUE2, identity(RECORD_LAYOUT.value2))?;
    Ok(a.into_plan(ActivationFunction::ReLU))
}

/// Layer 2: each value survives only if its key equals the query.
fn selection_layer(width: usize, suppression: f64) -> Result<LayerPlan> {
    let mut a = WeightAssignment::new(2, width, width);
    a.assign(
        selection::CONTRIBUTION1,
        masked_contribution(
            identity(equality::VALUE1),
            &[equality::KEY1_OVER_QUERY, equality::QUERY_OVER_KEY1],
            suppression,
        ),
    )?;
    a.assign(
        selection::CONTRIBUTION2,
        masked_contribution(
            identity(equality::VALUE2),
            &[equality::KEY2_OVER_QUERY, equality::QUERY_OVER_KEY2],
            suppression,
        ),
    )?;
    Ok(a.into_plan(ActivationFunction::ReLU))
}

/// Layer 3: distance of `contribution1 + contribution2` from every class.
/// At most one contribution is non-zero because `key1 != key2`.
fn thermometer_layer(width: usize, classes: u32) -> Result<LayerPlan> {
    let mut a = WeightAssignment::new(3, width, width);
    let sum = Affine::sum_of(&[selection::CONTRIBUTION1, selection::CONTRIBUTION2]);
    for class in 1..=classes {
        let [above, below] = thermometer(&sum, class);
        a.assign(slots::above(class), above)?;
        a.assign(slots::below(class), below)?;
    }
    Ok(a.into_plan(ActivationFunction::ReLU))
}

/// Layer 4: one-hot class indicators; slots past `V` stay zero.
fn indicator_layer(width: usize, classes: u32) -> Result<LayerPlan> {
    let mut a = WeightAssignment::new(4, width, width);
    for class in 1..=classes {
        a.assign(slots::indicator(class), indicator(slots::above(class), slots::below(class)))?;
    }
    Ok(a.into_plan(ActivationFunction::ReLU))
}

/// Extra depth: indicators are 0 or 1, so a bare ReLU forwards them exactly.
fn padding_layer(layer: usize, width: usize, classes: u32) -> Result<LayerPlan> {
    let mut a = WeightAssignment::new(layer, width, width);
    for class in 1..=classes {
        a.assign(slots::indicator(class), identity(slots::indicator(class)))?;
    }
    Ok(a.into_plan(ActivationFunction::ReLU))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::LookupRecord;
    use crate::domain::vocabulary::Token;
    use crate::error::SynthesisError;
    use crate::layers::dense::Layer;

    /// Runs the hidden layers only and returns the final indicator row.
    fn hidden_output(params: &SynthesizedParameters, input: Vec<f64>) -> Vec<f64> {
        let hidden = &params.layers[..params.len() - 1];
        hidden.iter().fold(input, |x, plan| {
            let mut layer = Layer::from_parameters(plan.weights.clone(), plan.biases.clone(), plan.activation);
            layer.feed_from(x)
        })
    }

    #[test_log::test]
    fn reference_shapes() {
        let vocab = Vocabulary::reference();
        let params = synthesize(&Topology::minimal(&vocab), &vocab).unwrap();
        assert_eq!(params.len(), 5);
        assert_eq!(params.shapes(), vec![(5, 6), (6, 6), (6, 6), (6, 6), (6, 6)]);
        assert_eq!(params.layers[4].activation, ActivationFunction::Softmax);
    }

    #[test]
    fn selection_layer_uses_the_suppression_constant() {
        let vocab = Vocabulary::reference();
        let params = synthesize(&Topology::minimal(&vocab), &vocab).unwrap();
        let w = &params.layers[1].weights;
        assert_eq!(w.get(equality::KEY1_OVER_QUERY, selection::CONTRIBUTION1), -1000.0);
        assert_eq!(w.get(equality::QUERY_OVER_KEY1, selection::CONTRIBUTION1), -1000.0);
        assert_eq!(w.get(equality::VALUE1, selection::CONTRIBUTION1), 1.0);
        assert_eq!(w.get(equality::VALUE2, selection::CONTRIBUTION1), 0.0);
        assert_eq!(w.count_nonzero(), 6);
    }

    #[test]
    fn indicators_are_one_hot_for_every_record() {
        let vocab = Vocabulary::reference();
        let params = synthesize(&Topology::minimal(&vocab), &vocab).unwrap();
        for record in vocab.records() {
            let out = hidden_output(&params, record.encode(&vocab));
            let mut expected = vec![0.0; 6];
            if let Some(Token::Value(i)) = record.expected() {
                expected[i] = 1.0;
            }
            assert_eq!(out, expected, "{}", record.describe(&vocab));
        }
    }

    #[test]
    fn padding_layers_leave_indicators_unchanged() {
        let vocab = Vocabulary::reference();
        let base = synthesize(&Topology::minimal(&vocab), &vocab).unwrap();
        for extra in 1..=4 {
            let deep = synthesize(&Topology::minimal(&vocab).with_extra_layers(extra), &vocab).unwrap();
            assert_eq!(deep.len(), 5 + extra);
            for record in vocab.records() {
                let input = record.encode(&vocab);
                assert_eq!(hidden_output(&base, input.clone()), hidden_output(&deep, input));
            }
            assert_eq!(deep.layers.last(), base.layers.last());
        }
    }

    #[test]
    fn wider_layers_keep_extra_slots_silent() {
        let vocab = Vocabulary::reference();
        let params = synthesize(&Topology::new(5, 10, 6), &vocab).unwrap();
        let record = LookupRecord::from_names(&vocab, ["C", "3", "A", "1", "C"]).unwrap();
        let out = hidden_output(&params, record.encode(&vocab));
        assert_eq!(out, vec![0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn contributions_hold_across_the_value_bound() {
        // Values scaled up to the largest code the default suppression
        // admits still pass or vanish exactly.
        let vocab = Vocabulary::reference();
        let params = synthesize(&Topology::minimal(&vocab), &vocab).unwrap();
        let bound = 1000.0 / crate::synth::constants::SUPPRESSION_SAFETY_FACTOR - 1.0;
        for record in vocab.records() {
            for scale in [1.0, 7.0, 40.0, bound / 3.0] {
                let mut input = record.encode(&vocab);
                input[RECORD_LAYOUT.value1] *= scale;
                input[RECORD_LAYOUT.value2] *= scale;
                let contributions = params.layers[..2].iter().fold(input.clone(), |x, plan| {
                    Layer::from_parameters(plan.weights.clone(), plan.biases.clone(), plan.activation)
                        .feed_from(x)
                });
                let expected = match record.expected() {
                    Some(_) if record.query == record.key1 => input[RECORD_LAYOUT.value1],
                    Some(_) => input[RECORD_LAYOUT.value2],
                    None => 0.0,
                };
                assert_eq!(contributions[0] + contributions[1], expected);
            }
        }
    }

    #[test]
    fn rejected_configurations_build_nothing() {
        let vocab = Vocabulary::reference();
        assert!(matches!(
            synthesize(&Topology::new(4, 5, 6), &vocab),
            Err(SynthesisError::InsufficientWidth { required: 6, got: 5 })
        ));
        let weak = SynthesisConstants { suppression: 10.0, ..Default::default() };
        assert!(matches!(
            synthesize_with(&Topology::minimal(&vocab), &vocab, &weak),
            Err(SynthesisError::SuppressionTooWeak { .. })
        ));
    }

    #[test]
    fn synthesis_is_deterministic() {
        let vocab = Vocabulary::with_counts(4, 5).unwrap();
        let t = Topology::minimal(&vocab).with_extra_layers(1);
        assert_eq!(synthesize(&t, &vocab).unwrap(), synthesize(&t, &vocab).unwrap());
    }
}
