//! Codon optimisation for a fixed target protein.
//!
//! A constrained genetic algorithm searches synonymous coding sequences for
//! one close to a target GC content, within GC bounds at both ends, and
//! favouring the codons a reference organism uses most. An outer
//! hyperparameter search tunes the end-zone bounds.

pub mod config;
pub mod engines;
pub mod error;
pub mod genetics;
pub mod optimizer;
pub mod types;

pub use error::{CodonoptError, Result};
pub use genetics::{greedy_sequence, CodonUsageTable};
pub use optimizer::{optimize, optimize_with_rng};
pub use types::{Candidate, CodingSequence, EndGcBounds, HyperparameterTrial, OptimizationResult};
