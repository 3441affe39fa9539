/// Standard genetic code (NCBI translation table 1).
///
/// Codons are indexed by their bases in `T, C, A, G` order, so the index of
/// `XYZ` is `16 * X + 4 * Y + Z`. `U` is read as `T` everywhere, which lets
/// RNA codons from published usage tables line up with DNA sequences.

pub const STOP: char = '*';

/// Amino acid assigned to a codon that contains a non-nucleotide symbol.
pub const UNKNOWN: char = 'X';

const BASES: [u8; 4] = [b'T', b'C', b'A', b'G'];

const AMINO_ACIDS: &[u8; 64] =
    b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

fn base_index(base: u8) -> Option<usize> {
    match base.to_ascii_uppercase() {
        b'T' | b'U' => Some(0),
        b'C' => Some(1),
        b'A' => Some(2),
        b'G' => Some(3),
        _ => None,
    }
}

fn codon_index(codon: &[u8]) -> Option<usize> {
    if codon.len() != 3 {
        return None;
    }
    let mut index = 0;
    for &base in codon {
        index = index * 4 + base_index(base)?;
    }
    Some(index)
}

/// Amino acid encoded by a single codon, or `None` if the codon is malformed.
pub fn amino_acid_for(codon: &str) -> Option<char> {
    codon_index(codon.as_bytes()).map(|i| AMINO_ACIDS[i] as char)
}

/// Translate a nucleotide sequence in frame 0, one codon at a time.
///
/// A trailing partial codon is ignored; malformed codons become `X`.
pub fn translate(sequence: &str) -> String {
    sequence
        .as_bytes()
        .chunks_exact(3)
        .map(|codon| codon_index(codon).map_or(UNKNOWN, |i| AMINO_ACIDS[i] as char))
        .collect()
}

/// True when `sequence` has exactly one codon per residue and translates to `protein`.
pub fn encodes(sequence: &str, protein: &str) -> bool {
    sequence.len() == protein.len() * 3
        && sequence
            .as_bytes()
            .chunks_exact(3)
            .zip(protein.bytes())
            .all(|(codon, aa)| {
                codon_index(codon).is_some_and(|i| AMINO_ACIDS[i] == aa.to_ascii_uppercase())
            })
}

/// All DNA codons for an amino acid, sorted by codon string.
pub fn synonymous_codons(amino_acid: char) -> Vec<String> {
    let target = amino_acid.to_ascii_uppercase();
    let mut codons: Vec<String> = all_codons()
        .filter(|(_, aa)| *aa == target)
        .map(|(codon, _)| codon)
        .collect();
    codons.sort();
    codons
}

/// Every codon of the table paired with its amino acid.
pub fn all_codons() -> impl Iterator<Item = (String, char)> {
    (0..64).map(|i| {
        let codon: String = [BASES[i / 16], BASES[(i / 4) % 4], BASES[i % 4]]
            .iter()
            .map(|&b| b as char)
            .collect();
        (codon, AMINO_ACIDS[i] as char)
    })
}
