use serde::{Serialize, Deserialize};
use crate::activation::activation::ActivationFunction;
use crate::error::Result;
use crate::network::metadata::ModelMetadata;

/// Describes one layer in a network specification.
///
/// Fields:
/// - `size`       - number of neurons in this layer
/// - `input_size` - number of neurons feeding into this layer (i.e. the output
///                  size of the previous layer, or the record width for the
///                  first layer)
/// - `activation` - activation function applied after the linear transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub input_size: usize,
    pub activation: ActivationFunction,
}

/// A serializable description of a network architecture plus optional
/// metadata, independent of any weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name used as the model file stem.
    pub name: String,
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
    /// Optional metadata (description, input slots, output labels).
    #[serde(default)]
    pub metadata: Option<ModelMetadata>,
}

impl NetworkSpec {
    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
