pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod error;
pub mod domain;
pub mod gadget;
pub mod synth;
pub mod eval;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::{ActivationFunction, softmax};
pub use layers::dense::Layer;
pub use network::network::Network;
pub use error::SynthesisError;
pub use domain::{LookupRecord, Token, Vocabulary};
pub use synth::{
    can_synthesize, synthesize, synthesize_with, Capability, SynthesisConfig,
    SynthesisConstants, SynthesizedParameters, Topology,
};
pub use eval::{evaluate, EvaluationReport};
