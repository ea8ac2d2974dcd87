use std::fmt;

/// Everything that can stop a synthesis, a parameter load, or a config load.
///
/// Synthesis is all-or-nothing: when one of these is returned no partial
/// parameter set exists.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisError {
    /// Fewer hidden layers than the gadget pipeline needs.
    InsufficientDepth { required: usize, got: usize },
    /// Fewer neurons per hidden layer than the widest gadget layer needs.
    InsufficientWidth { required: usize, got: usize },
    /// The topology's output size does not match the vocabulary.
    VocabularySizeMismatch { expected: usize, got: usize },
    /// The suppression constant cannot dominate the largest value code.
    SuppressionTooWeak { suppression: f64, required: f64 },
    /// Calibration constants that would let a softmax blur the decision.
    InvalidCalibration(String),
    /// Empty or otherwise unusable vocabulary.
    InvalidVocabulary(String),
    /// An input record that breaks `key1 != key2` or names a foreign token.
    DomainViolation(String),
    /// A gadget was placed into a slot the layer does not have.
    SlotOutOfRange { layer: usize, slot: usize, width: usize },
    /// Two gadgets were placed into the same slot.
    SlotReused { layer: usize, slot: usize },
    /// Parameter set and network disagree on the number of layers.
    LayerCountMismatch { expected: usize, got: usize },
    /// Parameters do not fit the network they are loaded into.
    ShapeMismatch {
        layer: usize,
        expected: (usize, usize),
        got: (usize, usize),
    },
    /// IO or JSON error while reading or writing a file.
    Io(String),
}

impl SynthesisError {
    /// True for the errors that mean "this configuration can never be
    /// synthesized" as opposed to misuse of the API.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InsufficientDepth { .. }
                | Self::InsufficientWidth { .. }
                | Self::VocabularySizeMismatch { .. }
                | Self::SuppressionTooWeak { .. }
                | Self::InvalidCalibration(_)
                | Self::InvalidVocabulary(_)
        )
    }
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientDepth { required, got } => {
                write!(f, "need at least {required} hidden layers, got {got}")
            },
            Self::InsufficientWidth { required, got } => {
                write!(f, "need at least {required} neurons per layer, got {got}")
            },
            Self::VocabularySizeMismatch { expected, got } => {
                write!(f, "vocabulary needs {expected} output neurons, topology has {got}")
            },
            Self::SuppressionTooWeak { suppression, required } => write!(
                f,
                "suppression constant {suppression} is below the required {required} for this vocabulary"
            ),
            Self::InvalidCalibration(msg) => write!(f, "invalid calibration: {msg}"),
            Self::InvalidVocabulary(msg) => write!(f, "invalid vocabulary: {msg}"),
            Self::DomainViolation(msg) => write!(f, "domain violation: {msg}"),
            Self::SlotOutOfRange { layer, slot, width } => {
                write!(f, "layer {layer}: slot {slot} out of range for width {width}")
            },
            Self::SlotReused { layer, slot } => write!(f, "layer {layer}: slot {slot} assigned twice"),
            Self::LayerCountMismatch { expected, got } => {
                write!(f, "network has {expected} layers, parameters have {got}")
            },
            Self::ShapeMismatch { layer, expected, got } => write!(
                f,
                "layer {layer}: expected weights {}x{}, got {}x{}",
                expected.0, expected.1, got.0, got.1
            ),
            Self::Io(msg) => write!(f, "io error: {msg}"),
        }
    }
}

impl std::error::Error for SynthesisError {}

impl From<std::io::Error> for SynthesisError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for SynthesisError {
    fn from(e: serde_json::Error) -> Self {
        Self::Io(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SynthesisError>;
