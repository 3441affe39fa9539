use serde::{Deserialize, Serialize};

/// Nucleotide coding sequence over `A`, `C`, `G`, `T`, one codon per residue.
///
/// Sequences are plain strings rather than a wrapper type: mutation only ever
/// swaps one 3-symbol window, and every other consumer (fitness, GC profile,
/// output) reads them as text.
pub type CodingSequence = String;

/// A coding sequence paired with its fitness under one fixed set of bounds.
///
/// The score is never carried across runs with different bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub sequence: CodingSequence,
    pub fitness: f64,
}

/// GC bounds for the 5' and 3' end zones, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EndGcBounds {
    pub min_end_gc: f64,
    pub max_end_gc: f64,
}

impl EndGcBounds {
    pub fn new(min_end_gc: f64, max_end_gc: f64) -> Self {
        Self {
            min_end_gc,
            max_end_gc,
        }
    }

    /// Bounds as fractions in `[0, 1]`.
    pub fn as_fractions(&self) -> (f64, f64) {
        (self.min_end_gc / 100.0, self.max_end_gc / 100.0)
    }
}

/// One recorded hyperparameter trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HyperparameterTrial {
    pub number: usize,
    pub bounds: EndGcBounds,
    pub best_fitness: f64,
}

/// Outcome of a full optimisation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub best_sequence: CodingSequence,
    pub best_fitness: f64,
    pub chosen_bounds: EndGcBounds,
    pub gc_content: f64,
    pub cai: Option<f64>,
    pub trials: Vec<HyperparameterTrial>,
}
