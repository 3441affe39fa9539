use super::traits::{invalid, ConfigSection};
use crate::error::CodonoptError;
use serde::{Deserialize, Serialize};

/// Weights of the fitness terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessConfig {
    pub gc_weight: f64,
    pub cai_weight: f64,
    pub end_penalty_weight: f64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            gc_weight: 0.7,
            cai_weight: 0.3,
            end_penalty_weight: 2.0,
        }
    }
}

impl FitnessConfig {
    /// Score given to sequences that do not encode the target protein.
    ///
    /// Valid scores are bounded below by `-2 * end_penalty_weight`: the GC and
    /// CAI terms lie in `[0, 1]` and each end zone contributes at most 1 to the
    /// penalty sum when bounds sit inside `[0, 100]`.
    pub fn failure_score(&self) -> f64 {
        -(2.0 * self.end_penalty_weight + 1.0)
    }
}

impl ConfigSection for FitnessConfig {
    fn section_name() -> &'static str {
        "fitness"
    }

    fn validate(&self) -> Result<(), CodonoptError> {
        for (name, weight) in [
            ("gc_weight", self.gc_weight),
            ("cai_weight", self.cai_weight),
            ("end_penalty_weight", self.end_penalty_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid(
                    Self::section_name(),
                    format!("{} must be finite and non-negative", name),
                ));
            }
        }
        Ok(())
    }
}
