use crate::genetics::{CodonUsageEntry, CodonUsageTable};
use crate::types::CodingSequence;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

/// Replace one codon with a synonymous one.
///
/// The position is uniform over the target residues. The replacement is drawn
/// by usage frequency when `codon_usage` lists the residue, falling back to a
/// uniform draw when that group's frequencies are all zero, and uniformly from
/// the standard genetic code when the table is absent or silent about the
/// residue. The parent is left untouched.
pub fn mutate<R: Rng + ?Sized>(
    sequence: &str,
    target: &str,
    codon_usage: Option<&CodonUsageTable>,
    rng: &mut R,
) -> CodingSequence {
    if target.is_empty() {
        return sequence.to_string();
    }

    let pos = rng.gen_range(0..target.len());
    let start = pos * 3;
    if sequence.len() < start + 3 {
        return sequence.to_string();
    }

    let aa = target.as_bytes()[pos] as char;
    let group = codon_usage
        .and_then(|table| table.codons_for(aa))
        .or_else(|| CodonUsageTable::standard().codons_for(aa));

    let Some(codon) = group.and_then(|entries| sample_codon(entries, rng)) else {
        return sequence.to_string();
    };

    let mut child = String::with_capacity(sequence.len());
    child.push_str(&sequence[..start]);
    child.push_str(codon);
    child.push_str(&sequence[start + 3..]);
    child
}

/// Frequency-weighted codon draw, uniform when the weights cannot form a distribution.
fn sample_codon<'e, R: Rng + ?Sized>(entries: &'e [CodonUsageEntry], rng: &mut R) -> Option<&'e str> {
    match WeightedIndex::new(entries.iter().map(|e| e.frequency)) {
        Ok(dist) => Some(entries[dist.sample(rng)].codon.as_str()),
        Err(_) => entries.choose(rng).map(|e| e.codon.as_str()),
    }
}

/// Roulette wheel over one generation's fitness scores.
///
/// Non-positive scores get zero weight. When no score is positive the wheel
/// is degenerate and every index is equally likely.
#[derive(Debug, Clone)]
pub enum SelectionWheel {
    Proportional(WeightedIndex<f64>),
    Uniform(usize),
}

impl SelectionWheel {
    pub fn new(scores: &[f64]) -> Self {
        let weights = scores
            .iter()
            .map(|&s| if s.is_finite() && s > 0.0 { s } else { 0.0 });
        match WeightedIndex::new(weights) {
            Ok(dist) => SelectionWheel::Proportional(dist),
            Err(_) => SelectionWheel::Uniform(scores.len()),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, SelectionWheel::Uniform(_))
    }

    /// Index of the sampled parent. Panics on an empty population.
    pub fn spin<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        match self {
            SelectionWheel::Proportional(dist) => dist.sample(rng),
            SelectionWheel::Uniform(len) => rng.gen_range(0..*len),
        }
    }
}

/// Index of the highest score, first occurrence on ties. NaN never wins.
pub fn elite_index(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        match best {
            Some((_, best_score)) if !(score > best_score) => {}
            _ if score.is_nan() => {}
            _ => best = Some((idx, score)),
        }
    }
    best.map(|(idx, _)| idx)
}
