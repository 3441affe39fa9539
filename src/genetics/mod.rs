pub mod genetic_code;
pub mod sequence;
pub mod codon_usage;

pub use genetic_code::{amino_acid_for, synonymous_codons, translate, STOP};
pub use sequence::{gc_fraction, gc_profile, normalize};
pub use codon_usage::{greedy_sequence, CodonUsageEntry, CodonUsageTable};
