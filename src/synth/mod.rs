pub mod calibrator;
pub mod config;
pub mod constants;
pub mod slots;
pub mod synthesizer;
pub mod topology;

pub use calibrator::{calibrate, logit_margin};
pub use config::SynthesisConfig;
pub use constants::{SynthesisConstants, MIN_FIRED_LOGIT_GAP, MIN_KEY_LOGIT_GAP};
pub use synthesizer::{synthesize, synthesize_with, SynthesizedParameters};
pub use topology::{can_synthesize, can_synthesize_with, Capability, Topology, MIN_LAYERS};
