use serde::{Serialize, Deserialize};

use crate::domain::vocabulary::Vocabulary;
use crate::error::{Result, SynthesisError};

/// The suppression constant must reach this multiple of `max value + 1`.
///
/// With the default suppression of 1000 this admits up to 249 value tokens.
pub const SUPPRESSION_SAFETY_FACTOR: f64 = 4.0;

/// Minimum distance between the unfired value logit and the key logit, so
/// keys get no visible probability even when every value logit is idle.
pub const MIN_KEY_LOGIT_GAP: f64 = 50.0;

/// Minimum lead of a fired value logit over the other value logits. At 20
/// the fired class keeps more than `1 - 1e-6` of the mass for up to 249
/// values.
pub const MIN_FIRED_LOGIT_GAP: f64 = 20.0;

/// Numeric constants of the gadgets and the output calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConstants {
    /// `BIG`: multiplier on the inequality guards of a masked contribution.
    pub suppression: f64,
    /// Weight from a fired indicator into its value logit.
    pub amplification: f64,
    /// Bias on every value logit.
    pub value_bias: f64,
    /// Bias on key and padding logits. Finite so parameters stay valid JSON.
    pub key_bias: f64,
}

impl Default for SynthesisConstants {
    fn default() -> Self {
        SynthesisConstants {
            suppression: 1000.0,
            amplification: 1000.0,
            value_bias: -100.0,
            key_bias: -1.0e6,
        }
    }
}

impl SynthesisConstants {
    /// Smallest suppression constant accepted for `vocab`.
    pub fn required_suppression(vocab: &Vocabulary) -> f64 {
        SUPPRESSION_SAFETY_FACTOR * (f64::from(vocab.max_value_code()) + 1.0)
    }

    /// Guaranteed gap between a fired value logit and every other logit.
    /// All value logits share one bias, so the spread term is zero.
    pub fn calibration_margin(&self) -> f64 {
        self.amplification
    }

    pub fn validate(&self, vocab: &Vocabulary) -> Result<()> {
        for (name, value) in [
            ("suppression", self.suppression),
            ("amplification", self.amplification),
            ("value bias", self.value_bias),
            ("key bias", self.key_bias),
        ] {
            if !value.is_finite() {
                return Err(SynthesisError::InvalidCalibration(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        let required = Self::required_suppression(vocab);
        if self.suppression < required {
            return Err(SynthesisError::SuppressionTooWeak {
                suppression: self.suppression,
                required,
            });
        }
        if self.amplification < MIN_FIRED_LOGIT_GAP {
            return Err(SynthesisError::InvalidCalibration(format!(
                "amplification must be at least {}, got {}",
                MIN_FIRED_LOGIT_GAP, self.amplification
            )));
        }
        if self.value_bias - self.key_bias < MIN_KEY_LOGIT_GAP {
            return Err(SynthesisError::InvalidCalibration(format!(
                "value bias {} must exceed key bias {} by at least {}",
                self.value_bias, self.key_bias, MIN_KEY_LOGIT_GAP
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_reference_vocabulary() {
        let vocab = Vocabulary::reference();
        assert_eq!(SynthesisConstants::required_suppression(&vocab), 16.0);
        assert!(SynthesisConstants::default().validate(&vocab).is_ok());
    }

    #[test]
    fn default_suppression_bound_is_249_values() {
        let c = SynthesisConstants::default();
        assert!(c.validate(&Vocabulary::with_counts(2, 249).unwrap()).is_ok());
        assert!(matches!(
            c.validate(&Vocabulary::with_counts(2, 250).unwrap()),
            Err(SynthesisError::SuppressionTooWeak { .. })
        ));
    }

    #[test]
    fn nan_suppression_is_rejected() {
        let c = SynthesisConstants { suppression: f64::NAN, ..Default::default() };
        assert!(c.validate(&Vocabulary::reference()).is_err());
    }

    #[test]
    fn non_finite_constants_are_rejected() {
        let vocab = Vocabulary::reference();
        for c in [
            SynthesisConstants { suppression: f64::INFINITY, ..Default::default() },
            SynthesisConstants { amplification: f64::INFINITY, ..Default::default() },
            SynthesisConstants { value_bias: f64::NAN, ..Default::default() },
            SynthesisConstants { value_bias: f64::INFINITY, ..Default::default() },
        ] {
            assert!(
                matches!(c.validate(&vocab), Err(SynthesisError::InvalidCalibration(_))),
                "{c:?}"
            );
        }
    }

    #[test]
    fn weak_amplification_is_rejected() {
        let vocab = Vocabulary::reference();
        for amplification in [1.0e-3, 0.0, -5.0, MIN_FIRED_LOGIT_GAP - 1.0] {
            let c = SynthesisConstants { amplification, ..Default::default() };
            assert!(matches!(c.validate(&vocab), Err(SynthesisError::InvalidCalibration(_))));
        }
        let edge = SynthesisConstants { amplification: MIN_FIRED_LOGIT_GAP, ..Default::default() };
        assert!(edge.validate(&vocab).is_ok());
    }

    #[test]
    fn key_bias_must_sit_well_below_value_bias() {
        let vocab = Vocabulary::reference();
        let close = SynthesisConstants { key_bias: -120.0, ..Default::default() };
        assert!(matches!(close.validate(&vocab), Err(SynthesisError::InvalidCalibration(_))));
        let infinite = SynthesisConstants { key_bias: f64::NEG_INFINITY, ..Default::default() };
        assert!(infinite.validate(&vocab).is_err());
    }
}
