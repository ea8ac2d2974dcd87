use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{Result, SynthesisError};
use crate::layers::dense::Layer;
use crate::network::metadata::ModelMetadata;
use crate::network::spec::NetworkSpec;
use crate::synth::synthesizer::SynthesizedParameters;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub metadata: Option<ModelMetadata>,
}

impl Network {
    /// Builds a randomly initialized network from (size, input_size, activation) tuples.
    pub fn new(layer_specs: Vec<(usize, usize, ActivationFunction)>) -> Network {
        let layers = layer_specs.into_iter()
            .map(|(size, input_size, activation)| Layer::new(size, input_size, activation))
            .collect();
        Network { layers, metadata: None }
    }

    pub fn from_spec(spec: &NetworkSpec) -> Network {
        let mut network = Network::new(
            spec.layers.iter().map(|l| (l.size, l.input_size, l.activation)).collect(),
        );
        network.metadata = spec.metadata.clone();
        network
    }

    /// Wraps a synthesized parameter set, taking ownership of its matrices.
    pub fn from_parameters(params: SynthesizedParameters) -> Network {
        let layers = params.layers.into_iter()
            .map(|p| Layer::from_parameters(p.weights, p.biases, p.activation))
            .collect();
        Network { layers, metadata: None }
    }

    pub fn with_metadata(mut self, metadata: ModelMetadata) -> Network {
        self.metadata = Some(metadata);
        self
    }

    /// Overwrites every layer with synthesized parameters.
    ///
    /// All shapes are checked before anything is written, so on error the
    /// network is left exactly as it was.
    pub fn load_parameters(&mut self, params: SynthesizedParameters) -> Result<()> {
        if params.len() != self.layers.len() {
            return Err(SynthesisError::LayerCountMismatch {
                expected: self.layers.len(),
                got: params.len(),
            });
        }
        for (i, (layer, plan)) in self.layers.iter().zip(&params.layers).enumerate() {
            let expected = layer.weights.shape();
            if plan.weights.shape() != expected || plan.biases.shape() != layer.biases.shape() {
                return Err(SynthesisError::ShapeMismatch {
                    layer: i + 1,
                    expected,
                    got: plan.weights.shape(),
                });
            }
        }
        for (layer, plan) in self.layers.iter_mut().zip(params.layers) {
            *layer = Layer::from_parameters(plan.weights, plan.biases, plan.activation);
        }
        Ok(())
    }

    /// Forward pass; stores activations in each layer.
    pub fn forward(&mut self, input: Vec<f64>) -> Vec<f64> {
        let mut current = input;
        for layer in &mut self.layers {
            current = layer.feed_from(current);
        }
        current
    }

    /// Pre-activation of the output layer, i.e. the logits a softmax output
    /// normalizes.
    pub fn logits(&self, input: Vec<f64>) -> Vec<f64> {
        let Some((last, hidden)) = self.layers.split_last() else {
            return input;
        };
        let x = hidden.iter().fold(input, |x, layer| {
            layer.activator.apply(&layer.pre_activation(x))
        });
        last.pre_activation(x)
    }

    /// Forward pass without recording activations.
    pub fn infer(&self, input: Vec<f64>) -> Vec<f64> {
        let logits = self.logits(input);
        match self.layers.last() {
            Some(last) => last.activator.apply(&logits),
            None => logits,
        }
    }

    /// Index of the most probable output.
    pub fn predict(&self, input: Vec<f64>) -> usize {
        argmax(&self.infer(input))
    }

    /// Serializes the network weights to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    pub fn load_json(path: &str) -> Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Index of the maximum element in a slice; ties go to the lowest index.
pub fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, x)| match best {
            Some((_, b)) if *x <= b => best,
            _ => Some((i, *x)),
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::LookupRecord;
    use crate::domain::vocabulary::Vocabulary;
    use crate::synth::synthesizer::synthesize;
    use crate::synth::topology::Topology;

    #[test]
    fn argmax_prefers_first_of_ties() {
        assert_eq!(argmax(&[0.25, 0.5, 0.5, 0.1]), 1);
        assert_eq!(argmax(&[]), 0);
    }

    #[test]
    fn loads_parameters_into_a_random_network() {
        let vocab = Vocabulary::reference();
        let topology = Topology::minimal(&vocab);
        let mut network = Network::from_spec(&topology.network_spec(&vocab, "lookup"));
        network.load_parameters(synthesize(&topology, &vocab).unwrap()).unwrap();

        let record = LookupRecord::from_names(&vocab, ["A", "1", "B", "2", "A"]).unwrap();
        let probs = network.forward(record.encode(&vocab));
        assert_eq!(argmax(&probs), vocab.token_number(record.expected().unwrap()));
        assert!(network.metadata.is_some());
    }

    #[test]
    fn mismatched_parameters_leave_the_network_untouched() {
        let vocab = Vocabulary::reference();
        let mut network = Network::from_spec(&Topology::new(4, 8, 6).network_spec(&vocab, "wide"));
        let before = network.layers[0].weights.clone();
        let err = network
            .load_parameters(synthesize(&Topology::minimal(&vocab), &vocab).unwrap())
            .unwrap_err();
        assert_eq!(err, SynthesisError::ShapeMismatch { layer: 1, expected: (5, 8), got: (5, 6) });
        assert_eq!(network.layers[0].weights, before);

        let deeper = synthesize(&Topology::new(5, 8, 6), &vocab).unwrap();
        assert_eq!(
            network.load_parameters(deeper).unwrap_err(),
            SynthesisError::LayerCountMismatch { expected: 5, got: 6 }
        );
    }

    #[test]
    fn infer_matches_forward() {
        let vocab = Vocabulary::reference();
        let params = synthesize(&Topology::minimal(&vocab).with_extra_layers(1), &vocab).unwrap();
        let mut network = Network::from_parameters(params);
        let input = LookupRecord::from_names(&vocab, ["C", "2", "B", "3", "B"]).unwrap().encode(&vocab);
        assert_eq!(network.infer(input.clone()), network.forward(input.clone()));
        assert_eq!(network.predict(input), 2);
    }

    #[test]
    fn json_round_trip_keeps_predictions() {
        let vocab = Vocabulary::reference();
        let network = Network::from_parameters(synthesize(&Topology::minimal(&vocab), &vocab).unwrap());
        let path = std::env::temp_dir().join(format!("ferrite-synth-net-{}.json", std::process::id()));
        let path = path.to_string_lossy().into_owned();
        network.save_json(&path).unwrap();
        let loaded = Network::load_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        for record in vocab.records() {
            let input = record.encode(&vocab);
            assert_eq!(loaded.predict(input.clone()), network.predict(input));
        }
    }
}
