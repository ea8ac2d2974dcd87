use serde::{Deserialize, Serialize};

/// Optional annotations attached to a saved Network.
/// All fields are Option<> so models without metadata deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ModelMetadata {
    pub description: Option<String>,
    /// Names of the raw input slots (e.g. ["key1","value1",...,"query"]).
    pub input_slots: Option<Vec<String>>,
    /// Human-readable labels for the output layer, one per token number.
    pub output_labels: Option<Vec<String>>,
}

impl ModelMetadata {
    pub fn output_label(&self, index: usize) -> Option<&str> {
        self.output_labels.as_ref()?.get(index).map(String::as_str)
    }
}
