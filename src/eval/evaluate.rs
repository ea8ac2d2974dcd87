use log::{debug, info};

use crate::activation::activation::softmax;
use crate::domain::record::RecordLayout;
use crate::domain::vocabulary::{Token, Vocabulary};
use crate::error::{Result, SynthesisError};
use crate::eval::report::EvaluationReport;
use crate::network::network::{argmax, Network};
use crate::synth::calibrator::logit_margin;

/// Failing records kept verbatim in the report.
const MAX_REPORTED_FAILURES: usize = 8;

/// Runs `network` over every record of `vocab` and compares the arg-max of
/// the softmax output with the symbolic lookup.
///
/// Fails without running anything when the network does not read a lookup
/// record or does not emit one logit per output slot of `vocab`.
pub fn evaluate(network: &Network, vocab: &Vocabulary) -> Result<EvaluationReport> {
    let outputs = network.layers.last().map_or(0, |layer| layer.size);
    if outputs != vocab.output_size() {
        return Err(SynthesisError::VocabularySizeMismatch {
            expected: vocab.output_size(),
            got: outputs,
        });
    }
    if let Some(first) = network.layers.first().filter(|l| l.input_size() != RecordLayout::WIDTH) {
        return Err(SynthesisError::ShapeMismatch {
            layer: 1,
            expected: (RecordLayout::WIDTH, first.size),
            got: first.weights.shape(),
        });
    }

    let mut report = EvaluationReport::default();
    let value_slots = vocab.value_count();
    let labels = vocab.output_labels();

    for record in vocab.records() {
        report.records += 1;
        let logits = network.logits(record.encode(vocab));
        let probs = softmax(&logits);
        let predicted = argmax(&probs);
        let key_mass: f64 = probs[value_slots..].iter().sum();
        report.max_key_mass = report.max_key_mass.max(key_mass);

        let on_value = matches!(vocab.token_at(predicted), Some(Token::Value(_)));
        if !on_value {
            report.key_predictions += 1;
        }

        let failed = match record.expected() {
            Some(token) => {
                report.fired += 1;
                let target = vocab.token_number(token);
                report.min_fired_margin = report.min_fired_margin.min(logit_margin(&logits, target));
                if predicted == target {
                    report.exact += 1;
                    false
                } else {
                    true
                }
            }
            None => {
                report.dont_care += 1;
                let least = probs[..value_slots].iter().cloned().fold(f64::INFINITY, f64::min);
                report.min_dont_care_value_prob = report.min_dont_care_value_prob.min(least);
                if on_value {
                    report.dont_care_on_value += 1;
                }
                !on_value
            }
        };

        if failed {
            debug!("{} predicted slot {}", record.describe(vocab), predicted);
            if report.failures.len() < MAX_REPORTED_FAILURES {
                report.failures.push(format!(
                    "{} -> {}",
                    record.describe(vocab),
                    labels[predicted]
                ));
            }
        }
    }

    info!(
        "evaluated {} records: {}/{} exact, {} don't-care, min margin {:.1}",
        report.records, report.exact, report.fired, report.dont_care, report.min_fired_margin
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::synthesizer::synthesize;
    use crate::synth::topology::Topology;

    #[test_log::test]
    fn synthesized_reference_network_is_exact() {
        let vocab = Vocabulary::reference();
        let network = Network::from_parameters(synthesize(&Topology::minimal(&vocab), &vocab).unwrap());
        let report = evaluate(&network, &vocab).unwrap();
        assert_eq!(report.records, 162);
        assert_eq!(report.fired, 108);
        assert_eq!(report.dont_care, 54);
        assert!(report.is_exact(), "{:?}", report.failures);
        assert_eq!(report.dont_care_on_value, 54);
        assert_eq!(report.accuracy(), 1.0);
        assert!(report.min_fired_margin >= 800.0);
        assert!(report.max_key_mass < 1e-12);
        assert!(report.min_dont_care_value_prob >= 0.33);
    }

    #[test]
    fn random_network_is_reported_as_inexact() {
        let vocab = Vocabulary::reference();
        let spec = Topology::minimal(&vocab).network_spec(&vocab, "untrained");
        let mut network = Network::from_spec(&spec);
        // A flat output layer that always prefers the first key.
        let last = network.layers.len() - 1;
        network.layers[last].weights = crate::math::matrix::Matrix::zeros(6, 6);
        network.layers[last].biases = crate::math::matrix::Matrix::row(vec![0.0, 0.0, 0.0, 5.0, 0.0, 0.0]);
        let report = evaluate(&network, &vocab).unwrap();
        assert!(!report.is_exact());
        assert_eq!(report.key_predictions, 162);
        assert_eq!(report.failures.len(), MAX_REPORTED_FAILURES);
        assert!(report.failures[0].ends_with("-> A"));
    }

    #[test]
    fn network_for_another_vocabulary_is_refused() {
        let small = Vocabulary::reference();
        let network = Network::from_parameters(synthesize(&Topology::minimal(&small), &small).unwrap());
        let large = Vocabulary::with_counts(2, 5).unwrap();
        assert_eq!(
            evaluate(&network, &large).unwrap_err(),
            SynthesisError::VocabularySizeMismatch { expected: 10, got: 6 }
        );
    }

    #[test]
    fn empty_network_is_refused() {
        let network = Network::new(Vec::new());
        assert!(matches!(
            evaluate(&network, &Vocabulary::reference()),
            Err(SynthesisError::VocabularySizeMismatch { expected: 6, got: 0 })
        ));
    }
}
