use serde::{Serialize, Deserialize};

use crate::domain::vocabulary::Vocabulary;
use crate::error::Result;
use crate::synth::constants::SynthesisConstants;
use crate::synth::synthesizer::{synthesize_with, SynthesizedParameters};
use crate::synth::topology::{can_synthesize_with, Capability, Topology};

/// Everything one synthesis run needs, loadable from a JSON file.
///
/// ```json
/// {
///   "vocabulary": { "keys": ["A", "B", "C"], "values": ["1", "2", "3"] },
///   "topology": { "num_layers": 6, "neurons_per_layer": 8, "vocab_size": 6 }
/// }
/// ```
///
/// `constants` may be omitted and falls back to the reference values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    pub vocabulary: Vocabulary,
    pub topology: Topology,
    #[serde(default)]
    pub constants: SynthesisConstants,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        let vocabulary = Vocabulary::reference();
        SynthesisConfig {
            topology: Topology::minimal(&vocabulary),
            vocabulary,
            constants: SynthesisConstants::default(),
        }
    }
}

impl SynthesisConfig {
    pub fn capability(&self) -> Capability {
        can_synthesize_with(&self.topology, &self.vocabulary, &self.constants)
    }

    pub fn synthesize(&self) -> Result<SynthesizedParameters> {
        synthesize_with(&self.topology, &self.vocabulary, &self.constants)
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a config from a JSON file. The contents are not
    /// validated here; `capability()` or `synthesize()` does that.
    pub fn load_json(path: &str) -> Result<SynthesisConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
