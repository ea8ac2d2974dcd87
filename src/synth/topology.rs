use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::domain::record::{RecordLayout, RECORD_LAYOUT};
use crate::domain::vocabulary::Vocabulary;
use crate::error::{Result, SynthesisError};
use crate::network::metadata::ModelMetadata;
use crate::network::spec::{LayerSpec, NetworkSpec};
use crate::synth::constants::SynthesisConstants;
use crate::synth::slots;

/// Hidden layers the gadget pipeline occupies before any padding.
pub const MIN_LAYERS: usize = 4;

/// Requested network shape: `num_layers` hidden ReLU layers of
/// `neurons_per_layer` each, then a softmax layer of `vocab_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub num_layers: usize,
    pub neurons_per_layer: usize,
    pub vocab_size: usize,
}

impl Topology {
    pub fn new(num_layers: usize, neurons_per_layer: usize, vocab_size: usize) -> Topology {
        Topology { num_layers, neurons_per_layer, vocab_size }
    }

    /// Smallest topology that can carry `vocab`.
    pub fn minimal(vocab: &Vocabulary) -> Topology {
        Topology::new(MIN_LAYERS, Topology::min_width(vocab), vocab.output_size())
    }

    pub fn min_width(vocab: &Vocabulary) -> usize {
        slots::min_width(vocab.value_count())
    }

    pub fn with_extra_layers(self, extra: usize) -> Topology {
        Topology { num_layers: self.num_layers + extra, ..self }
    }

    /// `(input_width, width)` of every layer including the output layer.
    pub fn layer_shapes(&self) -> Vec<(usize, usize)> {
        let w = self.neurons_per_layer;
        let mut shapes = Vec::with_capacity(self.num_layers + 1);
        shapes.push((RecordLayout::WIDTH, w));
        shapes.extend((1..self.num_layers).map(|_| (w, w)));
        shapes.push((w, self.vocab_size));
        shapes
    }

    /// Architecture description for a collaborator that builds the live
    /// network before synthesized parameters are loaded into it.
    pub fn network_spec(&self, vocab: &Vocabulary, name: &str) -> NetworkSpec {
        let last = self.num_layers;
        let layers = self.layer_shapes()
            .into_iter()
            .enumerate()
            .map(|(i, (input_size, size))| LayerSpec {
                size,
                input_size,
                activation: if i == last { ActivationFunction::Softmax } else { ActivationFunction::ReLU },
            })
            .collect();
        NetworkSpec {
            name: name.to_owned(),
            layers,
            metadata: Some(ModelMetadata {
                description: Some(format!(
                    "two-entry lookup over {} keys and {} values",
                    vocab.key_count(),
                    vocab.value_count()
                )),
                input_slots: Some(RECORD_LAYOUT.slot_names()),
                output_labels: Some(vocab.output_labels()),
            }),
        }
    }

    /// Checks everything synthesis depends on. Runs before any layer is built.
    pub fn validate(&self, vocab: &Vocabulary, constants: &SynthesisConstants) -> Result<()> {
        vocab.validate()?;
        if self.num_layers < MIN_LAYERS {
            return Err(SynthesisError::InsufficientDepth { required: MIN_LAYERS, got: self.num_layers });
        }
        let required = Topology::min_width(vocab);
        if self.neurons_per_layer < required {
            return Err(SynthesisError::InsufficientWidth { required, got: self.neurons_per_layer });
        }
        if self.vocab_size != vocab.output_size() {
            return Err(SynthesisError::VocabularySizeMismatch {
                expected: vocab.output_size(),
                got: self.vocab_size,
            });
        }
        constants.validate(vocab)
    }
}

/// Answer to "can this configuration be synthesized?", for callers that
/// grey out the feature instead of handling an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    pub ok: bool,
    pub reason: String,
}

pub fn can_synthesize(topology: &Topology, vocab: &Vocabulary) -> Capability {
    can_synthesize_with(topology, vocab, &SynthesisConstants::default())
}

pub fn can_synthesize_with(
    topology: &Topology,
    vocab: &Vocabulary,
    constants: &SynthesisConstants,
) -> Capability {
    match topology.validate(vocab, constants) {
        Ok(()) => Capability { ok: true, reason: String::new() },
        Err(e) => Capability { ok: false, reason: e.to_string() },
    }
}
