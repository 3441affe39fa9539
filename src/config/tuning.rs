use super::traits::{invalid, ConfigSection};
use crate::error::CodonoptError;
use serde::{Deserialize, Serialize};

/// Closed interval searched for one hyperparameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub low: f64,
    pub high: f64,
}

impl ParamRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.low..=self.high).contains(&value)
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.low, self.high)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SamplerKind {
    /// Tree-structured Parzen estimator.
    Tpe,
    Random,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    pub min_end_gc_range: ParamRange,
    pub max_end_gc_range: ParamRange,
    pub sampler: SamplerKind,
    /// Trials sampled uniformly before the Parzen estimators take over.
    pub n_startup_trials: usize,
    pub n_ei_candidates: usize,
    /// Share of trials treated as "good" when fitting the estimators.
    pub gamma: f64,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            min_end_gc_range: ParamRange::new(38.0, 50.0),
            max_end_gc_range: ParamRange::new(55.0, 70.0),
            sampler: SamplerKind::Tpe,
            n_startup_trials: 10,
            n_ei_candidates: 24,
            gamma: 0.25,
        }
    }
}

impl ConfigSection for TuningConfig {
    fn section_name() -> &'static str {
        "tuning"
    }

    fn validate(&self) -> Result<(), CodonoptError> {
        let section = Self::section_name();
        for (name, range) in [
            ("min_end_gc_range", self.min_end_gc_range),
            ("max_end_gc_range", self.max_end_gc_range),
        ] {
            if !(range.low.is_finite() && range.high.is_finite()) || range.low > range.high {
                return Err(invalid(section, format!("{} must be an ordered interval", name)));
            }
            if range.low < 0.0 || range.high > 100.0 {
                return Err(invalid(section, format!("{} must lie within 0..=100", name)));
            }
        }
        if self.min_end_gc_range.high > self.max_end_gc_range.low {
            return Err(invalid(
                section,
                "min_end_gc_range must sit at or below max_end_gc_range",
            ));
        }
        if !(self.gamma > 0.0 && self.gamma < 1.0) {
            return Err(invalid(section, "gamma must be between 0 and 1"));
        }
        if self.n_ei_candidates == 0 {
            return Err(invalid(section, "n_ei_candidates must be at least 1"));
        }
        Ok(())
    }
}
