use crate::genetics::{amino_acid_for, CodonUsageTable};

/// Codon Adaptation Index of a coding sequence against a usage table.
///
/// Geometric mean of `frequency / group maximum` over the codons the table
/// lists. Codons whose amino acid has no group, or whose group is all zeros,
/// are skipped and leave the mean unchanged, so a partial table is neutral
/// about residues it does not cover. With nothing matched the index is 1.0.
pub fn codon_adaptation_index(sequence: &str, table: &CodonUsageTable) -> f64 {
    let mut log_sum = 0.0;
    let mut matched = 0usize;

    for codon in sequence.as_bytes().chunks_exact(3) {
        let Ok(codon) = std::str::from_utf8(codon) else {
            continue;
        };
        let Some(aa) = amino_acid_for(codon) else {
            continue;
        };
        let Some(max_frequency) = table.max_frequency(aa) else {
            continue;
        };
        if max_frequency <= 0.0 {
            continue;
        }
        let codon = codon.to_ascii_uppercase().replace('U', "T");
        if let Some(frequency) = table.frequency_of(aa, &codon) {
            let weight = frequency / max_frequency;
            if weight <= 0.0 {
                return 0.0;
            }
            log_sum += weight.ln();
            matched += 1;
        }
    }

    if matched == 0 {
        1.0
    } else {
        (log_sum / matched as f64).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CodonUsageTable {
        CodonUsageTable::new(vec![
            ('M', vec![("ATG", 10.0)]),
            ('K', vec![("AAA", 40.0), ("AAG", 10.0)]),
            ('F', vec![("TTT", 0.0), ("TTC", 5.0)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_preferred_codons_score_one() {
        assert!((codon_adaptation_index("ATGAAAAAA", &table()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_geometric_mean() {
        // weights 1.0 (ATG) and 0.25 (AAG) -> sqrt(0.25) = 0.5
        let cai = codon_adaptation_index("ATGAAG", &table());
        assert!((cai - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_unlisted_amino_acids_are_skipped() {
        // W has no group; only AAG counts
        let cai = codon_adaptation_index("TGGAAG", &table());
        assert!((cai - 0.25).abs() < 1e-12);
        assert_eq!(codon_adaptation_index("TGGTGG", &table()), 1.0);
    }

    #[test]
    fn test_zero_frequency_codon_zeroes_index() {
        assert_eq!(codon_adaptation_index("ATGTTT", &table()), 0.0);
    }
}
