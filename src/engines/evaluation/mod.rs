pub mod cai;
pub mod fitness;

pub use cai::codon_adaptation_index;
pub use fitness::{evaluate, FitnessBreakdown, FitnessEvaluator};
