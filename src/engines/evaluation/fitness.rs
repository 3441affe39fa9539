use super::cai::codon_adaptation_index;
use crate::config::{ConfigSection, FitnessConfig};
use crate::error::{CodonoptError, Result};
use crate::genetics::genetic_code::encodes;
use crate::genetics::sequence::{end_windows, gc_fraction};
use crate::genetics::CodonUsageTable;
use crate::types::EndGcBounds;

/// Individual terms behind a fitness score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessBreakdown {
    pub gc_score: f64,
    pub cai_score: f64,
    pub end_penalty: f64,
    pub total: f64,
}

/// Scores coding sequences for one target protein under fixed bounds.
///
/// Evaluation is pure: the same sequence always gets the same score from the
/// same evaluator. A new evaluator is built whenever the end bounds change.
///
/// Construction requires `target_gc` in `[0, 1]`, both end bounds in
/// `[0, 100]` with `min_end_gc <= max_end_gc`, and non-negative weights.
/// Under those conditions every valid score stays above the failure score.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator<'a> {
    target: &'a str,
    target_gc: f64,
    end_zone: usize,
    bounds: EndGcBounds,
    codon_usage: Option<&'a CodonUsageTable>,
    weights: FitnessConfig,
}

impl<'a> FitnessEvaluator<'a> {
    pub fn new(
        target: &'a str,
        target_gc: f64,
        end_zone: usize,
        bounds: EndGcBounds,
        codon_usage: Option<&'a CodonUsageTable>,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&target_gc) {
            return Err(CodonoptError::InvalidInput(format!(
                "target_gc {} must be between 0 and 1",
                target_gc
            )));
        }
        for (name, value) in [("min_end_gc", bounds.min_end_gc), ("max_end_gc", bounds.max_end_gc)] {
            if !(0.0..=100.0).contains(&value) {
                return Err(CodonoptError::InvalidInput(format!(
                    "{} {} must be between 0 and 100",
                    name, value
                )));
            }
        }
        if bounds.min_end_gc > bounds.max_end_gc {
            return Err(CodonoptError::InvalidInput(format!(
                "min_end_gc {} exceeds max_end_gc {}",
                bounds.min_end_gc, bounds.max_end_gc
            )));
        }

        Ok(Self {
            target,
            target_gc,
            end_zone,
            bounds,
            codon_usage,
            weights: FitnessConfig::default(),
        })
    }

    pub fn with_weights(mut self, weights: FitnessConfig) -> Result<Self> {
        weights.validate()?;
        self.weights = weights;
        Ok(self)
    }

    pub fn target(&self) -> &'a str {
        self.target
    }

    pub fn codon_usage(&self) -> Option<&'a CodonUsageTable> {
        self.codon_usage
    }

    pub fn bounds(&self) -> EndGcBounds {
        self.bounds
    }

    pub fn failure_score(&self) -> f64 {
        self.weights.failure_score()
    }

    /// Scalar fitness, or the failure score when the sequence does not encode the target.
    pub fn evaluate(&self, sequence: &str) -> f64 {
        self.breakdown(sequence)
            .map_or_else(|| self.failure_score(), |b| b.total)
    }

    /// Fitness terms, or `None` when the sequence does not encode the target.
    pub fn breakdown(&self, sequence: &str) -> Option<FitnessBreakdown> {
        if !encodes(sequence, self.target) {
            log::debug!("Sequence does not encode the target protein, scoring as failure");
            return None;
        }

        let gc_score = 1.0 - (gc_fraction(sequence) - self.target_gc).abs();
        let cai_score = self
            .codon_usage
            .map_or(1.0, |table| codon_adaptation_index(sequence, table));
        let end_penalty = self.end_penalty(sequence);

        let total = self.weights.gc_weight * gc_score + self.weights.cai_weight * cai_score
            - end_penalty;

        Some(FitnessBreakdown {
            gc_score,
            cai_score,
            end_penalty,
            total,
        })
    }

    /// Weighted one-sided shortfall and excess of GC in both end zones.
    pub fn end_penalty(&self, sequence: &str) -> f64 {
        let (five_prime, three_prime) = end_windows(sequence, self.end_zone);
        if five_prime.is_empty() {
            return 0.0;
        }
        let (min_gc, max_gc) = self.bounds.as_fractions();

        let raw: f64 = [gc_fraction(five_prime), gc_fraction(three_prime)]
            .iter()
            .map(|&actual| (min_gc - actual).max(0.0) + (actual - max_gc).max(0.0))
            .sum();

        raw * self.weights.end_penalty_weight
    }
}

/// One-shot evaluation with the default weights.
pub fn evaluate(
    sequence: &str,
    target: &str,
    target_gc: f64,
    end_zone: usize,
    min_end_gc: f64,
    max_end_gc: f64,
    codon_usage: Option<&CodonUsageTable>,
) -> Result<f64> {
    let evaluator = FitnessEvaluator::new(
        target,
        target_gc,
        end_zone,
        EndGcBounds::new(min_end_gc, max_end_gc),
        codon_usage,
    )?;
    Ok(evaluator.evaluate(sequence))
}
