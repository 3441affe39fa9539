use super::traits::{invalid, ConfigSection};
use crate::error::CodonoptError;
use crate::types::EndGcBounds;
use serde::{Deserialize, Serialize};

/// Hyperparameters of one optimisation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Target overall GC fraction in `[0, 1]`.
    pub target_gc: f64,
    /// Generations per genetic search.
    pub n_iter: usize,
    pub pop_size: usize,
    /// Length of the 5' and 3' windows subject to end bounds.
    pub end_zone: usize,
    /// Fallback end bounds (percent), used as-is when `n_trials` is 0.
    pub min_end_gc: f64,
    pub max_end_gc: f64,
    pub n_trials: usize,
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            target_gc: 0.55,
            n_iter: 150,
            pop_size: 45,
            end_zone: 70,
            min_end_gc: 40.0,
            max_end_gc: 70.0,
            n_trials: 30,
            seed: None,
        }
    }
}

impl OptimizerConfig {
    pub fn bounds(&self) -> EndGcBounds {
        EndGcBounds::new(self.min_end_gc, self.max_end_gc)
    }
}

impl ConfigSection for OptimizerConfig {
    fn section_name() -> &'static str {
        "optimizer"
    }

    fn validate(&self) -> Result<(), CodonoptError> {
        let section = Self::section_name();
        if !(0.0..=1.0).contains(&self.target_gc) {
            return Err(invalid(section, "target_gc must be between 0 and 1"));
        }
        if self.pop_size == 0 {
            return Err(invalid(section, "pop_size must be at least 1"));
        }
        if self.end_zone == 0 {
            return Err(invalid(section, "end_zone must be at least 1"));
        }
        for (name, value) in [("min_end_gc", self.min_end_gc), ("max_end_gc", self.max_end_gc)] {
            if !(0.0..=100.0).contains(&value) {
                return Err(invalid(section, format!("{} must be between 0 and 100", name)));
            }
        }
        if self.min_end_gc > self.max_end_gc {
            return Err(invalid(section, "min_end_gc must not exceed max_end_gc"));
        }
        Ok(())
    }
}
