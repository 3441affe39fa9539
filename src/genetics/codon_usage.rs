use super::genetic_code::{self, STOP};
use super::sequence::normalize;
use crate::error::{CodonoptError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// One synonymous codon and its relative usage frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodonUsageEntry {
    pub codon: String,
    pub frequency: f64,
}

/// Codon-usage frequencies grouped by the amino acid they encode.
///
/// Frequencies inside one group share a scale but need not sum to one; the
/// group maximum anchors relative adaptiveness. Codons are stored as DNA and
/// each group is sorted by codon string, so ties in maximum lookups resolve
/// the same way on every run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<char, Vec<CodonUsageEntry>>",
    into = "BTreeMap<char, Vec<CodonUsageEntry>>"
)]
pub struct CodonUsageTable {
    groups: BTreeMap<char, Vec<CodonUsageEntry>>,
}

impl CodonUsageTable {
    /// Build a table from amino acid groups of `(codon, frequency)` pairs.
    ///
    /// Codons may be RNA or DNA. Every codon must encode the amino acid it is
    /// listed under and every frequency must be finite and non-negative.
    pub fn new<I, G, S>(groups: I) -> Result<Self>
    where
        I: IntoIterator<Item = (char, G)>,
        G: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut table = BTreeMap::new();
        for (amino_acid, entries) in groups {
            let amino_acid = amino_acid.to_ascii_uppercase();
            let mut group = Vec::new();
            for (codon, frequency) in entries {
                group.push(checked_entry(amino_acid, codon.as_ref(), frequency)?);
            }
            if group.is_empty() {
                continue;
            }
            group.sort_by(|a, b| a.codon.cmp(&b.codon));
            if let Some(pair) = group.windows(2).find(|pair| pair[0].codon == pair[1].codon) {
                return Err(CodonoptError::InvalidInput(format!(
                    "codon {} listed twice for amino acid {}",
                    pair[0].codon, amino_acid
                )));
            }
            table.insert(amino_acid, group);
        }
        Ok(Self { groups: table })
    }

    /// Group a flat codon -> frequency listing by the standard genetic code.
    ///
    /// Stop codons and codons the code cannot read are skipped, matching how
    /// per-organism usage listings are folded into amino acid groups.
    pub fn from_codon_frequencies<I, S>(frequencies: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut groups: BTreeMap<char, Vec<(String, f64)>> = BTreeMap::new();
        for (codon, frequency) in frequencies {
            let codon = normalize(codon.as_ref());
            match genetic_code::amino_acid_for(&codon) {
                Some(aa) if aa != STOP => groups.entry(aa).or_default().push((codon, frequency)),
                _ => log::debug!("Skipping codon {} while grouping usage table", codon),
            }
        }
        Self::new(groups)
    }

    /// Equal-frequency table over the whole standard genetic code, stop codons included.
    pub fn uniform() -> Self {
        let mut groups: BTreeMap<char, Vec<CodonUsageEntry>> = BTreeMap::new();
        for (_, aa) in genetic_code::all_codons() {
            groups.entry(aa).or_insert_with(|| {
                genetic_code::synonymous_codons(aa)
                    .into_iter()
                    .map(|codon| CodonUsageEntry {
                        codon,
                        frequency: 1.0,
                    })
                    .collect()
            });
        }
        Self { groups }
    }

    /// Shared instance of [`CodonUsageTable::uniform`].
    pub fn standard() -> &'static Self {
        static STANDARD: OnceLock<CodonUsageTable> = OnceLock::new();
        STANDARD.get_or_init(Self::uniform)
    }

    pub fn codons_for(&self, amino_acid: char) -> Option<&[CodonUsageEntry]> {
        self.groups
            .get(&amino_acid.to_ascii_uppercase())
            .map(Vec::as_slice)
    }

    pub fn contains(&self, amino_acid: char) -> bool {
        self.codons_for(amino_acid).is_some()
    }

    /// Highest frequency in an amino acid's group.
    pub fn max_frequency(&self, amino_acid: char) -> Option<f64> {
        self.codons_for(amino_acid)?
            .iter()
            .map(|e| e.frequency)
            .reduce(f64::max)
    }

    pub fn frequency_of(&self, amino_acid: char, codon: &str) -> Option<f64> {
        self.codons_for(amino_acid)?
            .iter()
            .find(|e| e.codon == codon)
            .map(|e| e.frequency)
    }

    /// Amino acids whose listed frequencies are all zero.
    pub fn empty_groups(&self) -> Vec<char> {
        self.groups
            .iter()
            .filter(|(_, group)| group.iter().all(|e| e.frequency <= 0.0))
            .map(|(&aa, _)| aa)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

fn checked_entry(amino_acid: char, codon: &str, frequency: f64) -> Result<CodonUsageEntry> {
    let codon = normalize(codon);
    match genetic_code::amino_acid_for(&codon) {
        Some(aa) if aa == amino_acid => {}
        Some(aa) => {
            return Err(CodonoptError::InvalidInput(format!(
                "codon {} encodes {} but is listed under {}",
                codon, aa, amino_acid
            )))
        }
        None => {
            return Err(CodonoptError::InvalidInput(format!(
                "malformed codon '{}' for amino acid {}",
                codon, amino_acid
            )))
        }
    }
    if !frequency.is_finite() || frequency < 0.0 {
        return Err(CodonoptError::InvalidInput(format!(
            "frequency {} for codon {} must be finite and non-negative",
            frequency, codon
        )));
    }
    Ok(CodonUsageEntry { codon, frequency })
}

impl TryFrom<BTreeMap<char, Vec<CodonUsageEntry>>> for CodonUsageTable {
    type Error = CodonoptError;

    fn try_from(groups: BTreeMap<char, Vec<CodonUsageEntry>>) -> Result<Self> {
        Self::new(groups.into_iter().map(|(aa, entries)| {
            (aa, entries.into_iter().map(|e| (e.codon, e.frequency)))
        }))
    }
}

impl From<CodonUsageTable> for BTreeMap<char, Vec<CodonUsageEntry>> {
    fn from(table: CodonUsageTable) -> Self {
        table.groups
    }
}

/// Back-translate a protein by picking the most frequent codon for every residue.
///
/// Ties go to the first codon in sorted order. Residues the table does not
/// list take the first codon of the standard genetic code, the same fallback
/// mutation uses. Callers use the result as the translation-consistent
/// starting point of an optimisation run.
pub fn greedy_sequence(protein: &str, table: &CodonUsageTable) -> Result<String> {
    let mut dna = String::with_capacity(protein.len() * 3);
    for (pos, aa) in protein.chars().enumerate() {
        let best = table
            .codons_for(aa)
            .or_else(|| CodonUsageTable::standard().codons_for(aa))
            .and_then(|group| {
                group.iter().fold(None, |best: Option<&CodonUsageEntry>, entry| match best {
                    Some(b) if b.frequency >= entry.frequency => Some(b),
                    _ => Some(entry),
                })
            })
            .ok_or_else(|| {
                CodonoptError::InvalidInput(format!(
                    "amino acid {} at position {} has no codons",
                    aa, pos
                ))
            })?;
        dna.push_str(&best.codon);
    }
    Ok(dna)
}
