use serde::{Serialize, Deserialize};

/// Outcome of running a network over every record of a vocabulary's domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Records evaluated (`key1 != key2` only).
    pub records: usize,
    /// Records where the query matched a key.
    pub fired: usize,
    /// Fired records whose arg-max is the expected value token.
    pub exact: usize,
    /// Records where the query matched neither key.
    pub dont_care: usize,
    /// Don't-care records whose arg-max still landed on a value token.
    pub dont_care_on_value: usize,
    /// Records whose arg-max is a key or padding slot. Always a defect.
    pub key_predictions: usize,
    /// Smallest winning-logit lead over any other logit across fired records.
    pub min_fired_margin: f64,
    /// Largest total probability given to key and padding slots.
    pub max_key_mass: f64,
    /// Smallest probability any value token received on a don't-care record.
    pub min_dont_care_value_prob: f64,
    /// Descriptions of the first few failing records.
    pub failures: Vec<String>,
}

impl EvaluationReport {
    /// Every fired record is exact and nothing ever predicted a key.
    pub fn is_exact(&self) -> bool {
        self.exact == self.fired && self.key_predictions == 0
    }

    pub fn accuracy(&self) -> f64 {
        if self.fired == 0 {
            return 0.0;
        }
        self.exact as f64 / self.fired as f64
    }
}

impl Default for EvaluationReport {
    fn default() -> Self {
        EvaluationReport {
            records: 0,
            fired: 0,
            exact: 0,
            dont_care: 0,
            dont_care_on_value: 0,
            key_predictions: 0,
            min_fired_margin: f64::INFINITY,
            max_key_mass: 0.0,
            min_dont_care_value_prob: 1.0,
            failures: Vec::new(),
        }
    }
}
