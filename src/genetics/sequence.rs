use crate::error::{CodonoptError, Result};

/// Uppercase a sequence, drop whitespace, and read `U` as `T`.
pub fn normalize(sequence: &str) -> String {
    sequence
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c.to_ascii_uppercase() {
            'U' => 'T',
            other => other,
        })
        .collect()
}

/// Reject anything outside `A`, `C`, `G`, `T`.
pub fn validate_nucleotides(sequence: &str) -> Result<()> {
    match sequence
        .char_indices()
        .find(|(_, c)| !matches!(c, 'A' | 'C' | 'G' | 'T'))
    {
        Some((pos, c)) => Err(CodonoptError::InvalidInput(format!(
            "unexpected nucleotide '{}' at position {}",
            c, pos
        ))),
        None => Ok(()),
    }
}

pub fn gc_count(sequence: &str) -> usize {
    sequence
        .bytes()
        .filter(|b| matches!(b.to_ascii_uppercase(), b'G' | b'C'))
        .count()
}

/// Fraction of `G`/`C` symbols; an empty sequence has fraction 0.
pub fn gc_fraction(sequence: &str) -> f64 {
    if sequence.is_empty() {
        return 0.0;
    }
    gc_count(sequence) as f64 / sequence.len() as f64
}

/// 5' and 3' windows of `zone` symbols, clamped to the sequence length.
pub fn end_windows(sequence: &str, zone: usize) -> (&str, &str) {
    let zone = zone.min(sequence.len());
    (&sequence[..zone], &sequence[sequence.len() - zone..])
}

/// Sliding-window GC percentage, one value per start position in `0..len - window`.
///
/// Returns an empty profile when the window is zero or not shorter than the sequence.
pub fn gc_profile(sequence: &str, window: usize) -> Vec<f64> {
    if window == 0 || window >= sequence.len() {
        return Vec::new();
    }
    let bytes = sequence.as_bytes();
    let is_gc = |b: u8| matches!(b.to_ascii_uppercase(), b'G' | b'C');

    let mut count = bytes[..window].iter().filter(|&&b| is_gc(b)).count();
    let mut profile = Vec::with_capacity(bytes.len() - window);
    for start in 0..bytes.len() - window {
        if start > 0 {
            if is_gc(bytes[start - 1]) {
                count -= 1;
            }
            if is_gc(bytes[start + window - 1]) {
                count += 1;
            }
        }
        profile.push(count as f64 / window as f64 * 100.0);
    }
    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("aug gcu\nUAA"), "ATGGCTTAA");
    }

    #[test]
    fn test_validate_nucleotides() {
        assert!(validate_nucleotides("ACGT").is_ok());
        let err = validate_nucleotides("ACNT").unwrap_err();
        assert!(err.to_string().contains("position 2"));
    }

    #[test]
    fn test_gc_fraction_exact() {
        // 3 of 8 symbols are G/C
        assert_eq!(gc_fraction("ATGCAACT"), 3.0 / 8.0);
        assert_eq!(gc_fraction("ATGAAACT"), 2.0 / 8.0);
        assert_eq!(gc_fraction("GGCC"), 1.0);
        assert_eq!(gc_fraction("ATAT"), 0.0);
        assert_eq!(gc_fraction(""), 0.0);
    }

    #[test]
    fn test_end_windows_clamp() {
        assert_eq!(end_windows("ATGAAA", 3), ("ATG", "AAA"));
        assert_eq!(end_windows("ATGAAA", 70), ("ATGAAA", "ATGAAA"));
        assert_eq!(end_windows("ATGAAA", 0), ("", ""));
    }

    #[test]
    fn test_gc_profile_matches_naive_windows() {
        let seq = "GGGAAATTTCCCGAGA";
        let window = 4;
        let profile = gc_profile(seq, window);
        assert_eq!(profile.len(), seq.len() - window);
        for (start, value) in profile.iter().enumerate() {
            let expected = gc_fraction(&seq[start..start + window]) * 100.0;
            assert!((value - expected).abs() < 1e-9);
        }
        assert!(gc_profile(seq, 0).is_empty());
        assert!(gc_profile(seq, seq.len()).is_empty());
    }
}
